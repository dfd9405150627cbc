//! Helper functions for text processing.

use crate::error::TranscriptError;

/// Number of characters of offending input quoted back in a format error.
const SNIPPET_CHARS: usize = 24;

/// Return the decimal form of the smallest non-negative integer that does not
/// occur anywhere in `text`.
///
/// The result is used as a split delimiter, so it must never collide with
/// content already present in the text. An empty `text` is rejected since
/// every caller is expected to have checked for it first.
pub fn fresh_token(text: &str) -> Result<String, TranscriptError> {
    if text.is_empty() {
        return Err(TranscriptError::Invariant(
            "fresh_token requires non-empty text",
        ));
    }
    // Terminates: `text` cannot contain every decimal string.
    let mut candidate: u64 = 0;
    loop {
        let token = candidate.to_string();
        if !text.contains(token.as_str()) {
            return Ok(token);
        }
        candidate += 1;
    }
}

/// Leading characters of `text`, used to describe malformed input in errors.
pub(crate) fn snippet(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_skips_present_digits() {
        assert_eq!(fresh_token("0 1 2 and more").unwrap(), "3");
    }

    #[test]
    fn test_fresh_token_without_digits() {
        assert_eq!(fresh_token("hello").unwrap(), "0");
    }

    #[test]
    fn test_fresh_token_moves_to_two_digits() {
        assert_eq!(fresh_token("0123456789").unwrap(), "10");
        assert_eq!(fresh_token("0 1 2 3 4 5 6 7 8 9 10 11").unwrap(), "12");
    }

    #[test]
    fn test_fresh_token_rejects_empty_text() {
        assert!(matches!(
            fresh_token(""),
            Err(TranscriptError::Invariant(_))
        ));
    }

    #[test]
    fn test_snippet_truncates_long_text() {
        assert_eq!(snippet("chatbot: hi"), "chatbot: hi");
        let long = "x".repeat(40);
        assert_eq!(snippet(&long), format!("{}...", "x".repeat(SNIPPET_CHARS)));
    }
}
