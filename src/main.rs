use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use blocksplice::batch::run_job_file;
use blocksplice::config::{ConfigLoader, DEFAULT_JOB_FILE};
use blocksplice::splice::{locate_in_file, DEFAULT_SEPARATOR};
use blocksplice::{init_logging, MarkerPair, SpliceError, SpliceJob, SpliceOptions, SpliceOutcome};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Args)]
struct MarkerArgs {
    /// Literal text where the block starts
    #[arg(short, long)]
    start: String,

    /// Literal text of what follows the block; kept in place
    #[arg(short, long)]
    end: String,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct ReplacementArgs {
    /// Replacement text
    #[arg(long = "with")]
    text: Option<String>,

    /// File holding the replacement text, `-` for stdin
    #[arg(long = "with-file")]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the block between two markers
    Replace {
        /// File to edit in place
        path: PathBuf,

        #[command(flatten)]
        markers: MarkerArgs,

        #[command(flatten)]
        replacement: ReplacementArgs,

        /// Text written after the replacement [default: two newlines]
        #[arg(long)]
        separator: Option<String>,

        /// Show a diff instead of writing
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Keep a timestamped .bak copy of the original
        #[arg(short, long)]
        backup: bool,

        /// Skip the check that the file did not change during the edit
        #[arg(long)]
        no_verify: bool,
    },

    /// Print where the block between two markers is, without editing
    Locate {
        path: PathBuf,

        #[command(flatten)]
        markers: MarkerArgs,
    },

    /// Run every job of a job file
    Run {
        /// TOML, YAML or JSON job file
        #[arg(default_value = DEFAULT_JOB_FILE)]
        job_file: PathBuf,

        /// Directory target paths are resolved against [default: current directory]
        #[arg(long)]
        root: Option<PathBuf>,

        /// Show diffs instead of writing
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, !cli.no_color && std::io::stderr().is_terminal());

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<SpliceError>()
                .map(SpliceError::exit_code)
                .unwrap_or(3);
            ExitCode::from(code)
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Replace {
            path,
            markers,
            replacement,
            separator,
            dry_run,
            backup,
            no_verify,
        } => {
            let text = read_replacement(&replacement)?;
            let options = SpliceOptions {
                separator: separator.unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
                backup,
                dry_run,
                verify_unchanged: !no_verify,
                ..SpliceOptions::default()
            };
            let job = SpliceJob::new(path, MarkerPair::new(markers.start, markers.end), text)
                .with_options(options);

            match job.run() {
                Ok(outcome) => {
                    print_outcome(&outcome);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_boundaries_on_failure(&e);
                    Err(anyhow::Error::new(e)
                        .context(format!("Failed to replace block in {}", job.path.display())))
                }
            }
        }

        Commands::Locate { path, markers } => {
            let markers = MarkerPair::new(markers.start, markers.end);
            match locate_in_file(&path, &markers) {
                Ok(located) => {
                    println!("Found block:");
                    println!("{}", located.preview);
                    println!("Start index: {}", located.span.start());
                    println!("End index: {}", located.span.end());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_boundaries_on_failure(&e);
                    Err(e.into())
                }
            }
        }

        Commands::Run {
            job_file,
            root,
            dry_run,
        } => {
            let root = match root {
                Some(root) => root,
                None => std::env::current_dir().context("Failed to read current directory")?,
            };
            let loader = ConfigLoader::with_path(job_file);
            let batch = run_job_file(&loader, &root, dry_run)
                .with_context(|| format!("Failed to run job file {}", loader.path().display()))?;

            for report in &batch.reports {
                println!("== {}", report.label);
                match &report.result {
                    Ok(outcome) => print_outcome(outcome),
                    Err(e) => {
                        print_boundaries_on_failure(e);
                        println!("Error: {}", e);
                    }
                }
            }
            println!(
                "{} succeeded, {} failed",
                batch.succeeded(),
                batch.failed()
            );

            Ok(batch
                .first_error()
                .map(|e| ExitCode::from(e.exit_code()))
                .unwrap_or(ExitCode::SUCCESS))
        }
    }
}

fn read_replacement(args: &ReplacementArgs) -> Result<String> {
    match (&args.text, &args.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(file)) if file == Path::new("-") => {
            debug!("Reading replacement from stdin");
            std::io::read_to_string(std::io::stdin()).context("Failed to read replacement from stdin")
        }
        (None, Some(file)) => std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read replacement file: {}", file.display())),
        (None, None) => Err(SpliceError::invalid_argument("a replacement is required").into()),
    }
}

fn print_outcome(outcome: &SpliceOutcome) {
    println!("Found block:");
    println!("{}", outcome.preview);

    if !outcome.changed {
        println!("Block in {} already up to date", outcome.path.display());
    } else if let Some(diff) = &outcome.diff {
        print!("{}", diff);
        println!("Dry run: {} not modified ({})", outcome.path.display(), outcome.stats);
    } else {
        if let Some(backup) = &outcome.backup_path {
            println!("Backup written to {}", backup.display());
        }
        println!("Successfully replaced block in {}", outcome.path.display());
    }
}

fn print_boundaries_on_failure(error: &SpliceError) {
    if !error.is_marker_error() {
        return;
    }

    let show = |offset: Option<usize>| match offset {
        Some(offset) => offset.to_string(),
        None => "not found".to_string(),
    };
    let (start, end) = error.marker_offsets();
    println!("Could not find the block boundaries.");
    println!("Start index: {}", show(start));
    println!("End index: {}", show(end));
}
