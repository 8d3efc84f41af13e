use std::path::PathBuf;
use thiserror::Error;

/// Main error type for blocksplice
#[derive(Error, Debug)]
pub enum SpliceError {
    /// The file to be edited does not exist
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A job file or replacement file does not exist
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Start marker not found (end marker at byte {end})")]
    StartMarkerNotFound { end: usize },

    #[error("End marker not found (start marker at byte {start})")]
    EndMarkerNotFound { start: usize },

    #[error("Neither start nor end marker found")]
    MarkersNotFound,

    #[error("End marker at byte {end} does not follow start marker at byte {start}")]
    MarkersOutOfOrder { start: usize, end: usize },

    #[error("File was modified while the splice was in progress: {}", path.display())]
    ConcurrentModification { path: PathBuf },

    #[error("IO error: {source}")]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },
}

impl SpliceError {
    /// Create a new IO error with path context
    pub fn io_error(err: std::io::Error, path: Option<impl Into<PathBuf>>) -> Self {
        Self::Io {
            source: err,
            path: path.map(|p| p.into()),
        }
    }

    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new missing input (job or replacement file) error
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Whether this error came from the marker search
    pub fn is_marker_error(&self) -> bool {
        matches!(
            self,
            SpliceError::StartMarkerNotFound { .. }
                | SpliceError::EndMarkerNotFound { .. }
                | SpliceError::MarkersNotFound
                | SpliceError::MarkersOutOfOrder { .. }
        )
    }

    /// Byte offsets of the start and end markers as far as they were found.
    ///
    /// Only meaningful for marker errors, everything else yields `(None, None)`.
    pub fn marker_offsets(&self) -> (Option<usize>, Option<usize>) {
        match self {
            SpliceError::StartMarkerNotFound { end } => (None, Some(*end)),
            SpliceError::EndMarkerNotFound { start } => (Some(*start), None),
            SpliceError::MarkersOutOfOrder { start, end } => (Some(*start), Some(*end)),
            _ => (None, None),
        }
    }

    /// Process exit code for this error.
    ///
    /// 1 is reserved for a missing target file.
    pub fn exit_code(&self) -> u8 {
        match self {
            SpliceError::FileNotFound { .. } => 1,
            e if e.is_marker_error() => 2,
            _ => 3,
        }
    }
}

// Implement From for std::io::Error
impl From<std::io::Error> for SpliceError {
    fn from(error: std::io::Error) -> Self {
        SpliceError::io_error(error, None::<PathBuf>)
    }
}

impl From<serde_json::Error> for SpliceError {
    fn from(error: serde_json::Error) -> Self {
        SpliceError::parse_error(error.to_string())
    }
}

impl From<serde_yaml::Error> for SpliceError {
    fn from(error: serde_yaml::Error) -> Self {
        SpliceError::parse_error(error.to_string())
    }
}

impl From<toml::de::Error> for SpliceError {
    fn from(error: toml::de::Error) -> Self {
        SpliceError::parse_error(error.to_string())
    }
}

impl From<glob::PatternError> for SpliceError {
    fn from(error: glob::PatternError) -> Self {
        SpliceError::invalid_argument(format!("invalid glob pattern: {}", error))
    }
}

/// Result type alias using SpliceError
pub type SpliceResult<T> = Result<T, SpliceError>;

/// Contextual error mapping function
pub fn map_io_err<P: Into<PathBuf>>(path: P) -> impl FnOnce(std::io::Error) -> SpliceError {
    let path = path.into();
    move |err| SpliceError::io_error(err, Some(path))
}
