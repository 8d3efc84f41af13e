pub mod preview;

pub use preview::{diff_stats, unified_diff, DiffStats, DEFAULT_CONTEXT};
