use similar::TextDiff;
use tracing::debug;

use super::canonical::CanonicalText;
use super::outcome::DiffResult;

pub const EXPECTED_LABEL: &str = "expected";
pub const ACTUAL_LABEL: &str = "actual";

/// Line-diffs two canonical texts into a tri-state result
#[derive(Debug, Clone)]
pub struct DiffEngine {
    context_lines: usize,
}

impl DiffEngine {
    pub fn new(context_lines: usize) -> Self {
        Self { context_lines }
    }

    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    /// Compare two canonical texts, rendering a unified diff only when they differ
    pub fn diff(&self, expected: &CanonicalText, actual: &CanonicalText) -> DiffResult {
        if expected == actual {
            return DiffResult::Equal;
        }

        // The renderer terminates every line itself
        let old = unterminated(expected);
        let new = unterminated(actual);

        let diff = TextDiff::configure()
            .newline_terminated(false)
            .diff_slices(&old[..], &new[..]);
        let rendered = diff
            .unified_diff()
            .context_radius(self.context_lines)
            .header(EXPECTED_LABEL, ACTUAL_LABEL)
            .to_string();

        debug!(
            expected_lines = old.len(),
            actual_lines = new.len(),
            "Canonical texts differ"
        );

        DiffResult::Different(rendered)
    }
}

fn unterminated(text: &CanonicalText) -> Vec<&[u8]> {
    text.lines()
        .iter()
        .map(|line| line.strip_suffix(b"\n").unwrap_or(line.as_slice()))
        .collect()
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> CanonicalText {
        CanonicalText::from_lines(items)
    }

    #[test]
    fn test_equal_texts() {
        let engine = DiffEngine::default();
        assert_eq!(engine.diff(&lines(&["foo", "bar"]), &lines(&["foo", "bar"])), DiffResult::Equal);
    }

    #[test]
    fn test_both_empty() {
        let engine = DiffEngine::default();
        assert_eq!(engine.diff(&lines(&[]), &lines(&[])), DiffResult::Equal);
    }

    #[test]
    fn test_replaced_first_line() {
        let engine = DiffEngine::default();
        let result = engine.diff(&lines(&["foo", "bar"]), &lines(&["bar", "bar"]));
        assert_eq!(
            result.diff(),
            Some("--- expected\n+++ actual\n@@ -1,2 +1,2 @@\n-foo\n+bar\n bar\n")
        );
    }

    #[test]
    fn test_changed_last_line() {
        let engine = DiffEngine::default();
        let result = engine.diff(&lines(&["foo", "bar"]), &lines(&["foo", "baz"]));
        assert_eq!(
            result.to_string(),
            "--- expected\n+++ actual\n@@ -1,2 +1,2 @@\n foo\n-bar\n+baz\n"
        );
    }

    #[test]
    fn test_context_radius_limits_hunk() {
        let engine = DiffEngine::default();
        let expected = lines(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let actual = lines(&["a", "b", "c", "d", "e", "f", "g", "X"]);
        assert_eq!(
            engine.diff(&expected, &actual).to_string(),
            "--- expected\n+++ actual\n@@ -6,3 +6,3 @@\n f\n g\n-h\n+X\n"
        );
    }

    #[test]
    fn test_empty_against_lines() {
        let engine = DiffEngine::default();
        assert_eq!(
            engine.diff(&lines(&[]), &lines(&["only"])).to_string(),
            "--- expected\n+++ actual\n@@ -0,0 +1 @@\n+only\n"
        );
    }

    #[test]
    fn test_crlf_lines_render_once() {
        let engine = DiffEngine::default();
        let expected = CanonicalText::from_text("HTTP/1.1 200 OK\r\n\r\n");
        let actual = CanonicalText::from_text("HTTP/1.1 404 Not Found\r\n\r\n");
        assert_eq!(
            engine.diff(&expected, &actual).to_string(),
            "--- expected\n+++ actual\n@@ -1,2 +1,2 @@\n-HTTP/1.1 200 OK\r\n+HTTP/1.1 404 Not Found\r\n \r\n"
        );
    }

    #[test]
    fn test_bytes_differing_only_in_invalid_utf8() {
        let engine = DiffEngine::default();
        let expected = CanonicalText::from_bytes(&[b'a', 0xff]);
        let actual = CanonicalText::from_bytes(&[b'a', 0xfe]);
        assert!(engine.diff(&expected, &actual).is_different());
    }
}
