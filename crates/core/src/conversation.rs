//! Conversion between dialog turn arrays and labeled transcripts.

use crate::error::TranscriptError;
use crate::helpers::{fresh_token, snippet};

/// Label that opens every initiator record in a transcript.
pub const HUMAN_LABEL: &str = "human: ";

/// Label that opens every responder record in a transcript.
pub const CHATBOT_LABEL: &str = "chatbot: ";

/// The two participants of a dialog.
///
/// A role is never stored alongside a message: it is always derived from the
/// message's position, with the human speaking first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Human,
    Chatbot,
}

impl Role {
    /// Role of the turn at `index` in a turn array.
    pub fn of_index(index: usize) -> Self {
        if index % 2 == 0 {
            Role::Human
        } else {
            Role::Chatbot
        }
    }

    /// The role that speaks after this one.
    pub fn toggle(self) -> Self {
        match self {
            Role::Human => Role::Chatbot,
            Role::Chatbot => Role::Human,
        }
    }

    /// Transcript label for this role, including the trailing space.
    pub fn label(self) -> &'static str {
        match self {
            Role::Human => HUMAN_LABEL,
            Role::Chatbot => CHATBOT_LABEL,
        }
    }
}

/// Append one `<label><message>\n` record to a transcript.
pub(crate) fn push_record(transcript: &mut String, role: Role, message: &str) {
    transcript.push_str(role.label());
    transcript.push_str(message.trim());
    transcript.push('\n');
}

/// Flatten a turn array into a transcript.
///
/// Each message is trimmed and written on its own record, prefixed with
/// `human: ` or `chatbot: ` depending on its position. Messages with
/// embedded newlines are written as-is.
pub fn turns_to_transcript<S: AsRef<str>>(turns: &[S]) -> String {
    let mut transcript = String::new();
    let mut role = Role::Human;
    for turn in turns {
        push_record(&mut transcript, role, turn.as_ref());
        role = role.toggle();
    }
    transcript
}

/// Split a transcript back into its turn array.
///
/// Only the leading `human: ` label is validated. Both labels are treated as
/// the same separator afterwards, so a transcript whose labels do not
/// alternate is accepted and re-read by position. Label text appearing inside
/// a message body is indistinguishable from a real label.
pub fn transcript_to_turns(transcript: &str) -> Result<Vec<String>, TranscriptError> {
    let trimmed = transcript.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if !trimmed.starts_with(HUMAN_LABEL) {
        return Err(TranscriptError::Format {
            expected: HUMAN_LABEL,
            found: snippet(trimmed),
        });
    }

    // Trailing whitespace stays: a final empty record ends in "chatbot: ".
    let body = &transcript.trim_start()[HUMAN_LABEL.len()..];

    // Non-empty: `trimmed` ends with a non-whitespace char past the label.
    let token = fresh_token(body)?;
    let delimited = body
        .replace(HUMAN_LABEL, &token)
        .replace(CHATBOT_LABEL, &token);

    Ok(delimited
        .split(token.as_str())
        .map(|field| field.trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_alternates_by_position() {
        assert_eq!(Role::of_index(0), Role::Human);
        assert_eq!(Role::of_index(1), Role::Chatbot);
        assert_eq!(Role::of_index(4), Role::Human);
        assert_eq!(Role::Human.toggle(), Role::Chatbot);
        assert_eq!(Role::Chatbot.toggle().label(), "human: ");
    }

    #[test]
    fn test_turns_to_transcript() {
        let transcript = turns_to_transcript(&["hi", "hello there", "how are you"]);
        assert_eq!(
            transcript,
            "human: hi\nchatbot: hello there\nhuman: how are you\n"
        );
    }

    #[test]
    fn test_turns_to_transcript_empty() {
        let turns: Vec<String> = Vec::new();
        assert_eq!(turns_to_transcript(&turns), "");
    }

    #[test]
    fn test_turns_to_transcript_ignores_outer_whitespace() {
        let plain = turns_to_transcript(&["hi", "hello"]);
        let padded = turns_to_transcript(&["  hi\n", "\thello  "]);
        assert_eq!(plain, padded);
    }

    #[test]
    fn test_turns_to_transcript_keeps_embedded_newlines() {
        let transcript = turns_to_transcript(&["line one\nline two", "ok"]);
        assert_eq!(transcript, "human: line one\nline two\nchatbot: ok\n");
    }

    #[test]
    fn test_transcript_to_turns_round_trip() {
        let cases: Vec<Vec<&str>> = vec![
            vec!["hi"],
            vec!["hi", "hello there", "what is 1 + 2?", "3"],
            vec!["hi", ""],
            vec!["hi", "x", ""],
            vec!["", "x"],
            vec!["", "", ""],
            vec!["1", "10", "0"],
            vec!["0123456789", "05", "9"],
            vec!["ends with 7", "7 starts", "12 34"],
        ];
        for turns in cases {
            let transcript = turns_to_transcript(&turns);
            assert_eq!(
                transcript_to_turns(&transcript).unwrap(),
                turns,
                "transcript: {:?}",
                transcript
            );
        }
    }

    #[test]
    fn test_transcript_to_turns_empty_final_reply() {
        let turns = transcript_to_turns("human: hi\nchatbot: \n").unwrap();
        assert_eq!(turns, vec!["hi", ""]);
    }

    #[test]
    fn test_transcript_to_turns_empty() {
        assert!(transcript_to_turns("").unwrap().is_empty());
        assert!(transcript_to_turns("   \n ").unwrap().is_empty());
    }

    #[test]
    fn test_transcript_to_turns_rejects_missing_human_label() {
        let err = transcript_to_turns("chatbot: hi\n").unwrap_err();
        assert_eq!(
            err,
            TranscriptError::Format {
                expected: HUMAN_LABEL,
                found: "chatbot: hi".to_string(),
            }
        );
        assert!(transcript_to_turns("human:hi").is_err());
        assert!(transcript_to_turns("human: ").is_err());
    }

    #[test]
    fn test_transcript_to_turns_allows_leading_whitespace() {
        let turns = transcript_to_turns("\n  human: hi\nchatbot: hey\n").unwrap();
        assert_eq!(turns, vec!["hi", "hey"]);
    }

    #[test]
    fn test_transcript_to_turns_multiline_message() {
        let turns = transcript_to_turns("human: line one\nline two\nchatbot: ok\n").unwrap();
        assert_eq!(turns, vec!["line one\nline two", "ok"]);
    }

    #[test]
    fn test_transcript_to_turns_does_not_check_alternation() {
        let turns = transcript_to_turns("human: a\nhuman: b\nchatbot: c\n").unwrap();
        assert_eq!(turns, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_transcript_to_turns_digits_in_messages() {
        let turns = transcript_to_turns("human: 0 1 2\nchatbot: 3 4\nhuman: 05").unwrap();
        assert_eq!(turns, vec!["0 1 2", "3 4", "05"]);
    }
}
