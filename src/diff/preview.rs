use similar::{ChangeTag, TextDiff};
use std::fmt;
use std::path::Path;

/// Context lines shown around each hunk
pub const DEFAULT_CONTEXT: usize = 3;

/// Line counts of a text change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub insertions: usize,
    pub deletions: usize,
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} -{}", self.insertions, self.deletions)
    }
}

/// Render a unified diff between the old and new contents of `path`
pub fn unified_diff(path: &Path, old: &str, new: &str, context: usize) -> String {
    let display = path.display().to_string();
    let old_header = format!("a/{}", display);
    let new_header = format!("b/{}", display);

    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(context)
        .header(&old_header, &new_header)
        .to_string()
}

/// Count inserted and deleted lines
pub fn diff_stats(old: &str, new: &str) -> DiffStats {
    let diff = TextDiff::from_lines(old, new);
    let mut stats = DiffStats::default();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.insertions += 1,
            ChangeTag::Delete => stats.deletions += 1,
            ChangeTag::Equal => {}
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_diff_headers_and_lines() {
        let old = "one\ntwo\nthree\n";
        let new = "one\n2\nthree\n";
        let diff = unified_diff(Path::new("src/x.ts"), old, new, DEFAULT_CONTEXT);

        assert!(diff.contains("--- a/src/x.ts"));
        assert!(diff.contains("+++ b/src/x.ts"));
        assert!(diff.contains("-two"));
        assert!(diff.contains("+2"));
    }

    #[test]
    fn test_identical_texts_have_empty_diff() {
        assert_eq!(unified_diff(Path::new("f"), "a\n", "a\n", 3), "");
        assert_eq!(diff_stats("a\n", "a\n"), DiffStats::default());
    }

    #[test]
    fn test_diff_stats() {
        let stats = diff_stats("a\nb\nc\n", "a\nx\ny\nc\n");
        assert_eq!(stats.insertions, 2);
        assert_eq!(stats.deletions, 1);
        assert_eq!(stats.to_string(), "+2 -1");
    }
}
