//! Locate a marker-delimited block of text and swap it for a new one.

pub mod edit;
pub mod locator;
pub mod splicer;

pub use edit::{locate_in_file, LocatedBlock, SpliceJob, SpliceOptions, SpliceOutcome};
pub use locator::{locate, BlockSpan, MarkerPair};
pub use splicer::{existing_block, splice, BlockPreview, DEFAULT_SEPARATOR, PREVIEW_CHARS};
