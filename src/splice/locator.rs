use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SpliceError, SpliceResult};

/// The two literal strings delimiting a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPair {
    /// First line (or fragment) of the block to replace
    pub start: String,
    /// First line of the text that follows the block; it is kept
    pub end: String,
}

impl MarkerPair {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Reject empty markers, which would match at offset 0 of any text
    pub fn validate(&self) -> SpliceResult<()> {
        if self.start.is_empty() {
            return Err(SpliceError::invalid_argument("start marker cannot be empty"));
        }
        if self.end.is_empty() {
            return Err(SpliceError::invalid_argument("end marker cannot be empty"));
        }
        Ok(())
    }
}

/// Byte range of a located block: `start` is where the start marker begins,
/// `end` is where the end marker begins.
///
/// Only `locate` builds spans outside the crate, so `start <= end` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl BlockSpan {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Locate the block delimited by `markers` in `text`.
///
/// Both markers are searched independently and the first occurrence of each
/// wins. The end marker must begin at or after the end of the start marker.
pub fn locate(text: &str, markers: &MarkerPair) -> SpliceResult<BlockSpan> {
    markers.validate()?;

    let start = text.find(&markers.start);
    let end = text.find(&markers.end);
    debug!("Marker offsets: start={:?}, end={:?}", start, end);

    match (start, end) {
        (Some(start), Some(end)) => {
            if end < start + markers.start.len() {
                return Err(SpliceError::MarkersOutOfOrder { start, end });
            }
            Ok(BlockSpan { start, end })
        }
        (None, Some(end)) => Err(SpliceError::StartMarkerNotFound { end }),
        (Some(start), None) => Err(SpliceError::EndMarkerNotFound { start }),
        (None, None) => Err(SpliceError::MarkersNotFound),
    }
}
