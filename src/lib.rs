// blocksplice - replace a marker-delimited block of text inside a file

pub mod batch;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod splice;
pub mod utils;

pub use error::{SpliceError, SpliceResult};
pub use logging::init_logging;
pub use splice::{MarkerPair, SpliceJob, SpliceOptions, SpliceOutcome};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
