use std::path::Path;
use tracing::{info, warn};

use crate::config::ConfigLoader;
use crate::error::{SpliceError, SpliceResult};
use crate::splice::SpliceOutcome;

/// Result of one target file in a batch
#[derive(Debug)]
pub struct JobReport {
    pub label: String,
    pub result: SpliceResult<SpliceOutcome>,
}

/// Results of every job in a job file, in file order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<JobReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.succeeded()
    }

    /// First error in file order, if any
    pub fn first_error(&self) -> Option<&SpliceError> {
        self.reports.iter().find_map(|r| r.result.as_ref().err())
    }
}

/// Run every job of a job file sequentially.
///
/// Loading the job file itself is fatal. Past that point each job stands on
/// its own: a failing entry is recorded and the rest still run.
pub fn run_job_file(loader: &ConfigLoader, root: &Path, dry_run: bool) -> SpliceResult<BatchReport> {
    let job_file = loader.load()?;
    let job_dir = loader.base_dir();
    let mut batch = BatchReport::default();

    for spec in &job_file.jobs {
        let jobs = match spec.to_jobs(&job_file.defaults, &job_dir, root, dry_run) {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!("Skipping job '{}': {}", spec.label(), e);
                batch.reports.push(JobReport {
                    label: spec.label().to_string(),
                    result: Err(e),
                });
                continue;
            }
        };

        for job in jobs {
            let label = if spec.name.is_some() {
                format!("{} ({})", spec.label(), job.path.display())
            } else {
                job.path.display().to_string()
            };

            let result = job.run();
            if let Err(e) = &result {
                warn!("Job '{}' failed: {}", label, e);
            }
            batch.reports.push(JobReport { label, result });
        }
    }

    info!(
        "Batch finished: {} succeeded, {} failed",
        batch.succeeded(),
        batch.failed()
    );
    Ok(batch)
}
