use std::fmt;

use super::locator::BlockSpan;

/// Number of characters shown on each side of a block preview
pub const PREVIEW_CHARS: usize = 50;

/// Separator written after the replacement block unless configured otherwise
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Rebuild `text` with the block at `span` swapped for `replacement` followed
/// by `separator`. Everything before `span.start` and from `span.end` on is
/// copied unchanged.
pub fn splice(text: &str, span: BlockSpan, replacement: &str, separator: &str) -> String {
    debug_assert!(span.start <= span.end && span.end <= text.len());
    let mut out = String::with_capacity(
        text.len() - span.len() + replacement.len() + separator.len(),
    );
    out.push_str(&text[..span.start]);
    out.push_str(replacement);
    out.push_str(separator);
    out.push_str(&text[span.end..]);
    out
}

/// The block currently sitting between the markers
pub fn existing_block(text: &str, span: BlockSpan) -> &str {
    debug_assert!(span.start <= span.end && span.end <= text.len());
    &text[span.start..span.end]
}

/// Short head/tail view of a block for console output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPreview {
    pub head: String,
    pub tail: String,
    /// Total characters in the block
    pub chars: usize,
}

impl BlockPreview {
    pub fn new(block: &str) -> Self {
        let chars = block.chars().count();
        let head = block.chars().take(PREVIEW_CHARS).collect();
        let mut tail: Vec<char> = block.chars().rev().take(PREVIEW_CHARS).collect();
        tail.reverse();

        Self {
            head,
            tail: tail.into_iter().collect(),
            chars,
        }
    }
}

impl fmt::Display for BlockPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}...{}", self.head, self.tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_keeps_outside_bytes() {
        let text = "before\nSTART old body\nEND after\n";
        let span = BlockSpan {
            start: text.find("START").unwrap(),
            end: text.find("END").unwrap(),
        };

        let result = splice(text, span, "START new body", DEFAULT_SEPARATOR);
        assert_eq!(result, "before\nSTART new body\n\nEND after\n");
        assert!(result.starts_with(&text[..span.start]));
        assert!(result.ends_with(&text[span.end..]));
    }

    #[test]
    fn test_splice_with_empty_separator() {
        let text = "aXXb";
        let span = BlockSpan { start: 1, end: 3 };
        assert_eq!(splice(text, span, "Y", ""), "aYb");
        assert_eq!(existing_block(text, span), "XX");
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic]
    fn test_inverted_span_is_caught() {
        let span = BlockSpan { start: 3, end: 1 };
        splice("abcdef", span, "Y", "");
    }

    #[test]
    fn test_span_accessors() {
        let span = locate_span("xxSTARTbodyEND");
        assert_eq!(span.start(), 2);
        assert_eq!(span.end(), 11);
        assert_eq!(span.len(), 9);
    }

    fn locate_span(text: &str) -> BlockSpan {
        use super::super::locator::{locate, MarkerPair};
        locate(text, &MarkerPair::new("START", "END")).unwrap()
    }

    #[test]
    fn test_preview_short_block() {
        let preview = BlockPreview::new("abc");
        assert_eq!(preview.to_string(), "abc...abc");
        assert_eq!(preview.chars, 3);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let block = format!("{}{}", "é".repeat(60), "ß".repeat(60));
        let preview = BlockPreview::new(&block);
        assert_eq!(preview.head, "é".repeat(PREVIEW_CHARS));
        assert_eq!(preview.tail, "ß".repeat(PREVIEW_CHARS));
        assert_eq!(preview.chars, 120);
    }
}
