use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::locator::{locate, BlockSpan, MarkerPair};
use super::splicer::{existing_block, splice, BlockPreview, DEFAULT_SEPARATOR};
use crate::diff::{diff_stats, unified_diff, DiffStats, DEFAULT_CONTEXT};
use crate::error::SpliceResult;
use crate::utils::{backup_file, calculate_string_hash, read_file_to_string, write_file_atomic};

/// Knobs for a single splice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceOptions {
    /// Appended after the replacement block
    pub separator: String,
    /// Copy the original to a `.bak` file before writing
    pub backup: bool,
    /// Compute the result and a diff but leave the file alone
    pub dry_run: bool,
    /// Abort if the file changed between read and write
    pub verify_unchanged: bool,
    /// Context lines in dry-run diffs
    pub diff_context: usize,
}

impl Default for SpliceOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            backup: false,
            dry_run: false,
            verify_unchanged: true,
            diff_context: DEFAULT_CONTEXT,
        }
    }
}

/// A block found in a file, along with what was read
#[derive(Debug, Clone)]
pub struct LocatedBlock {
    pub path: PathBuf,
    pub span: BlockSpan,
    pub preview: BlockPreview,
    content: String,
    content_hash: String,
}

impl LocatedBlock {
    /// The text currently between the markers
    pub fn block(&self) -> &str {
        existing_block(&self.content, self.span)
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Load `path` and find the block between `markers` without changing anything
pub fn locate_in_file(path: impl AsRef<Path>, markers: &MarkerPair) -> SpliceResult<LocatedBlock> {
    let path = path.as_ref();
    let content = read_file_to_string(path)?;
    let span = locate(&content, markers)?;
    let preview = BlockPreview::new(existing_block(&content, span));
    let content_hash = calculate_string_hash(&content);

    debug!(
        "Located block in {} at bytes {}..{} ({} chars)",
        path.display(),
        span.start,
        span.end,
        preview.chars
    );

    Ok(LocatedBlock {
        path: path.to_path_buf(),
        span,
        preview,
        content,
        content_hash,
    })
}

/// What a splice did
#[derive(Debug, Clone)]
pub struct SpliceOutcome {
    pub path: PathBuf,
    pub span: BlockSpan,
    /// Preview of the block that was (or would be) replaced
    pub preview: BlockPreview,
    /// The new content differs from the old one
    pub changed: bool,
    /// The file on disk was rewritten
    pub written: bool,
    pub backup_path: Option<PathBuf>,
    /// Unified diff, only filled in for dry runs
    pub diff: Option<String>,
    pub stats: DiffStats,
}

/// One marker-delimited replacement in one file
#[derive(Debug, Clone)]
pub struct SpliceJob {
    pub path: PathBuf,
    pub markers: MarkerPair,
    pub replacement: String,
    pub options: SpliceOptions,
}

impl SpliceJob {
    pub fn new(path: impl Into<PathBuf>, markers: MarkerPair, replacement: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            markers,
            replacement: replacement.into(),
            options: SpliceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SpliceOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the read, locate, splice, write pass.
    ///
    /// Any error before the final write leaves the file untouched.
    pub fn run(&self) -> SpliceResult<SpliceOutcome> {
        let located = locate_in_file(&self.path, &self.markers)?;

        let new_content = splice(
            located.content(),
            located.span,
            &self.replacement,
            &self.options.separator,
        );
        let changed = new_content != located.content();
        let stats = diff_stats(located.content(), &new_content);

        let mut outcome = SpliceOutcome {
            path: self.path.clone(),
            span: located.span,
            preview: located.preview.clone(),
            changed,
            written: false,
            backup_path: None,
            diff: None,
            stats,
        };

        if !changed {
            info!("Block in {} already up to date", self.path.display());
            return Ok(outcome);
        }

        if self.options.dry_run {
            outcome.diff = Some(unified_diff(
                &self.path,
                located.content(),
                &new_content,
                self.options.diff_context,
            ));
            info!("Dry run for {}: {}", self.path.display(), stats);
            return Ok(outcome);
        }

        if self.options.backup {
            outcome.backup_path = Some(backup_file(&self.path)?);
        }

        let expected_hash = self
            .options
            .verify_unchanged
            .then_some(located.content_hash.as_str());
        write_file_atomic(&self.path, &new_content, expected_hash)?;
        outcome.written = true;

        info!("Replaced block in {} ({})", self.path.display(), stats);
        Ok(outcome)
    }
}
