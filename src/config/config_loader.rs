use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::job_file::JobFile;
use crate::error::{SpliceError, SpliceResult};
use crate::utils::fs::read_file_to_string;

/// Job file used when none is given on the command line
pub const DEFAULT_JOB_FILE: &str = "blocksplice.toml";

/// Serialization format of a job file
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobFormat {
    Toml,
    Yaml,
    Json,
}

impl JobFormat {
    /// Pick a format from the file extension, TOML when unknown
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => JobFormat::Yaml,
            Some("json") => JobFormat::Json,
            _ => JobFormat::Toml,
        }
    }
}

/// The job file loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for `blocksplice.toml` in the current directory
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_JOB_FILE),
        }
    }

    /// Set a custom job file path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Directory that relative paths inside the job file are resolved against
    pub fn base_dir(&self) -> PathBuf {
        match self.config_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Load and parse the job file
    pub fn load(&self) -> SpliceResult<JobFile> {
        debug!("Loading job file: {}", self.config_path.display());
        if !self.config_path.exists() {
            return Err(SpliceError::input_not_found(&self.config_path));
        }
        let content = read_file_to_string(&self.config_path)?;
        let job_file = Self::parse(&content, JobFormat::from_path(&self.config_path))?;

        if job_file.jobs.is_empty() {
            return Err(SpliceError::parse_error(format!(
                "no jobs defined in {}",
                self.config_path.display()
            )));
        }

        debug!("Loaded {} job(s)", job_file.jobs.len());
        Ok(job_file)
    }

    /// Parse job file content in the given format
    pub fn parse(content: &str, format: JobFormat) -> SpliceResult<JobFile> {
        let job_file: JobFile = match format {
            JobFormat::Toml => toml::from_str(content)?,
            JobFormat::Yaml => serde_yaml::from_str(content)?,
            JobFormat::Json => serde_json::from_str(content)?,
        };
        Ok(job_file)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const TOML_JOBS: &str = r#"
[defaults]
backup = true

[[job]]
name = "getIssueLabels"
path = "src/__tests__/api.test.ts"
start_marker = '  describe("getIssueLabels", () => {'
end_marker = '  describe("removeIssueLabel", () => {'
replacement_file = "block.ts"

[[job]]
path = "other.ts"
start_marker = "A"
end_marker = "B"
replacement = "C"
separator = ""
"#;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(JobFormat::from_path(Path::new("jobs.toml")), JobFormat::Toml);
        assert_eq!(JobFormat::from_path(Path::new("jobs.YML")), JobFormat::Yaml);
        assert_eq!(JobFormat::from_path(Path::new("jobs.yaml")), JobFormat::Yaml);
        assert_eq!(JobFormat::from_path(Path::new("jobs.json")), JobFormat::Json);
        assert_eq!(JobFormat::from_path(Path::new("jobs")), JobFormat::Toml);
    }

    #[test]
    fn test_parse_toml() {
        let jobs = ConfigLoader::parse(TOML_JOBS, JobFormat::Toml).unwrap();
        assert!(jobs.defaults.backup);
        assert_eq!(jobs.defaults.separator, "\n\n");
        assert_eq!(jobs.jobs.len(), 2);
        assert_eq!(jobs.jobs[0].label(), "getIssueLabels");
        assert_eq!(jobs.jobs[0].start_marker, "  describe(\"getIssueLabels\", () => {");
        assert_eq!(jobs.jobs[1].label(), "other.ts");
        assert_eq!(jobs.jobs[1].separator.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
defaults:
  separator: "\n"
jobs:
  - path: a.ts
    start_marker: "<<"
    end_marker: ">>"
    replacement: "new"
"#;
        let jobs = ConfigLoader::parse(yaml, JobFormat::Yaml).unwrap();
        assert_eq!(jobs.defaults.separator, "\n");
        assert!(jobs.defaults.verify_unchanged);
        assert_eq!(jobs.jobs[0].replacement.as_deref(), Some("new"));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"job": [{"path": "a.ts", "start_marker": "x", "end_marker": "y", "replacement": "z"}]}"#;
        let jobs = ConfigLoader::parse(json, JobFormat::Json).unwrap();
        assert_eq!(jobs.jobs.len(), 1);
        assert!(!jobs.defaults.backup);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = ConfigLoader::parse("[[job]]\npath = ", JobFormat::Toml);
        assert!(matches!(result, Err(SpliceError::ParseError { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("jobs.toml");
        fs::write(&path, TOML_JOBS).unwrap();

        let loader = ConfigLoader::with_path(&path);
        assert_eq!(loader.base_dir(), dir.path());
        assert_eq!(loader.load().unwrap().jobs.len(), 2);
    }

    #[test]
    fn test_load_missing_and_empty() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::with_path(dir.path().join("missing.toml"));
        let err = loader.load().unwrap_err();
        assert!(matches!(err, SpliceError::InputNotFound { .. }));
        assert_eq!(err.exit_code(), 3);

        let empty = dir.path().join("empty.toml");
        fs::write(&empty, "").unwrap();
        let loader = ConfigLoader::with_path(&empty);
        assert!(matches!(loader.load(), Err(SpliceError::ParseError { .. })));
    }

    #[test]
    fn test_default_path() {
        assert_eq!(ConfigLoader::default().path(), Path::new(DEFAULT_JOB_FILE));
        assert_eq!(ConfigLoader::new().base_dir(), PathBuf::from("."));
    }
}
