use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{map_io_err, SpliceError, SpliceResult};
use crate::splice::{MarkerPair, SpliceJob, SpliceOptions, DEFAULT_SEPARATOR};
use crate::utils::fs::{find_files, is_glob_pattern};
use crate::utils::{expand_tilde, resolve_against};

/// A batch of splice jobs loaded from disk
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobFile {
    /// Settings shared by every job
    #[serde(default)]
    pub defaults: JobDefaults,

    #[serde(default, rename = "job", alias = "jobs")]
    pub jobs: Vec<JobSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobDefaults {
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default)]
    pub backup: bool,

    /// Abort a write if the file changed after it was read
    #[serde(default = "default_verify")]
    pub verify_unchanged: bool,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_verify() -> bool {
    true
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            backup: false,
            verify_unchanged: default_verify(),
        }
    }
}

/// One entry of a job file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobSpec {
    /// Label used in console output, defaults to the path
    #[serde(default)]
    pub name: Option<String>,

    /// Target file, or a glob pattern matching several
    pub path: String,

    pub start_marker: String,
    pub end_marker: String,

    /// Inline replacement text
    #[serde(default)]
    pub replacement: Option<String>,

    /// File holding the replacement text, relative to the job file
    #[serde(default)]
    pub replacement_file: Option<PathBuf>,

    #[serde(default)]
    pub separator: Option<String>,

    #[serde(default)]
    pub backup: Option<bool>,
}

impl JobSpec {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }

    /// Load the replacement text from whichever source was given
    pub fn replacement_text(&self, job_dir: &Path) -> SpliceResult<String> {
        match (&self.replacement, &self.replacement_file) {
            (Some(text), None) => Ok(text.clone()),
            (None, Some(file)) => {
                let file = resolve_against(job_dir, file);
                debug!("Loading replacement for {} from {}", self.label(), file.display());
                if !file.is_file() {
                    return Err(SpliceError::input_not_found(file));
                }
                std::fs::read_to_string(&file).map_err(map_io_err(&file))
            }
            (Some(_), Some(_)) => Err(SpliceError::invalid_argument(format!(
                "job '{}' sets both replacement and replacement_file",
                self.label()
            ))),
            (None, None) => Err(SpliceError::invalid_argument(format!(
                "job '{}' needs replacement or replacement_file",
                self.label()
            ))),
        }
    }

    /// Expand this entry into concrete jobs, one per target file
    pub fn to_jobs(
        &self,
        defaults: &JobDefaults,
        job_dir: &Path,
        root: &Path,
        dry_run: bool,
    ) -> SpliceResult<Vec<SpliceJob>> {
        let markers = MarkerPair::new(&self.start_marker, &self.end_marker);
        markers.validate()?;
        let replacement = self.replacement_text(job_dir)?;

        let options = SpliceOptions {
            separator: self
                .separator
                .clone()
                .unwrap_or_else(|| defaults.separator.clone()),
            backup: self.backup.unwrap_or(defaults.backup),
            dry_run,
            verify_unchanged: defaults.verify_unchanged,
            ..SpliceOptions::default()
        };

        // An existing file wins over glob interpretation, e.g. `[id].ts`
        let target = resolve_against(root, &self.path);
        let paths = if !target.is_file() && is_glob_pattern(&self.path) {
            let matches = find_files(&glob_pattern(root, &self.path))?;
            if matches.is_empty() {
                return Err(SpliceError::file_not_found(target));
            }
            matches
        } else {
            vec![target]
        };

        Ok(paths
            .into_iter()
            .map(|path| {
                SpliceJob::new(path, markers.clone(), replacement.clone())
                    .with_options(options.clone())
            })
            .collect())
    }
}

/// Join `pattern` onto `root` with the root taken literally
fn glob_pattern(root: &Path, pattern: &str) -> String {
    let expanded = expand_tilde(pattern);
    if expanded.is_absolute() {
        return expanded.to_string_lossy().to_string();
    }
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    Path::new(&escaped_root)
        .join(expanded)
        .to_string_lossy()
        .to_string()
}
