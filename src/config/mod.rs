// Job files: a batch of splices described in TOML, YAML or JSON

pub mod config_loader;
pub mod job_file;

pub use config_loader::{ConfigLoader, JobFormat, DEFAULT_JOB_FILE};
pub use job_file::{JobDefaults, JobFile, JobSpec};
