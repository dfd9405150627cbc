//! Derivation of supervised training pairs from a dialog.

use serde::{Deserialize, Serialize};

use crate::conversation::{push_record, transcript_to_turns, Role};
use crate::error::TranscriptError;

/// One supervised example: the transcript so far and the chatbot's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPair {
    pub context: String,
    pub response: String,
}

impl TrainingPair {
    pub fn new(context: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            response: response.into(),
        }
    }
}

/// Training pairs of a dialog plus its trailing unanswered human message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingData {
    pub training_pairs: Vec<TrainingPair>,
    /// Full transcript ending with the final human message, if that message
    /// has no reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl TrainingData {
    /// True when the dialog yielded neither pairs nor a query.
    pub fn is_empty(&self) -> bool {
        self.training_pairs.is_empty() && self.query.is_none()
    }
}

/// Build training pairs from a turn array.
///
/// Every chatbot turn with at least one turn before it yields a pair whose
/// context is the trimmed transcript of everything before it. When the last
/// turn belongs to the human, the trimmed transcript including it is returned
/// as the query instead of a pair.
pub fn turns_to_training_data<S: AsRef<str>>(turns: &[S]) -> TrainingData {
    let mut data = TrainingData::default();
    let mut transcript = String::new();
    let last = turns.len().checked_sub(1);

    for (idx, turn) in turns.iter().enumerate() {
        let role = Role::of_index(idx);
        let message = turn.as_ref().trim();

        if role == Role::Chatbot && !transcript.is_empty() {
            data.training_pairs
                .push(TrainingPair::new(transcript.trim(), message));
        }

        push_record(&mut transcript, role, message);

        if role == Role::Human && Some(idx) == last {
            data.query = Some(transcript.trim().to_string());
        }
    }

    data
}

/// Parse a transcript and build its training pairs.
pub fn transcript_to_training_data(transcript: &str) -> Result<TrainingData, TranscriptError> {
    let turns = transcript_to_turns(transcript)?;
    Ok(turns_to_training_data(&turns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_human_message_becomes_query() {
        let data = turns_to_training_data(&["hi", "hello there", "how are you"]);
        assert_eq!(
            data.training_pairs,
            vec![TrainingPair::new("human: hi", "hello there")]
        );
        assert_eq!(
            data.query.as_deref(),
            Some("human: hi\nchatbot: hello there\nhuman: how are you")
        );
    }

    #[test]
    fn test_answered_dialog_has_no_query() {
        let data = turns_to_training_data(&["hi", "hello"]);
        assert_eq!(data.training_pairs, vec![TrainingPair::new("human: hi", "hello")]);
        assert_eq!(data.query, None);
    }

    #[test]
    fn test_empty_dialog() {
        let turns: Vec<String> = Vec::new();
        let data = turns_to_training_data(&turns);
        assert!(data.is_empty());
        assert_eq!(data, TrainingData::default());
    }

    #[test]
    fn test_single_human_message() {
        let data = turns_to_training_data(&["  hi  "]);
        assert!(data.training_pairs.is_empty());
        assert_eq!(data.query.as_deref(), Some("human: hi"));
    }

    #[test]
    fn test_context_accumulates_over_turns() {
        let data = turns_to_training_data(&["a", " b ", "c", "d\n"]);
        assert_eq!(
            data.training_pairs,
            vec![
                TrainingPair::new("human: a", "b"),
                TrainingPair::new("human: a\nchatbot: b\nhuman: c", "d"),
            ]
        );
        assert_eq!(data.query, None);
    }

    #[test]
    fn test_transcript_to_training_data() {
        let data =
            transcript_to_training_data("human: hi\nchatbot: hello there\nhuman: how are you\n")
                .unwrap();
        assert_eq!(data, turns_to_training_data(&["hi", "hello there", "how are you"]));
    }

    #[test]
    fn test_transcript_to_training_data_empty_final_reply() {
        let data = transcript_to_training_data("human: hi\nchatbot: \n").unwrap();
        assert_eq!(data.training_pairs, vec![TrainingPair::new("human: hi", "")]);
        assert_eq!(data.query, None);
    }

    #[test]
    fn test_transcript_to_training_data_propagates_format_error() {
        let err = transcript_to_training_data("chatbot: hi\n").unwrap_err();
        assert!(matches!(err, TranscriptError::Format { .. }));
    }

    #[test]
    fn test_training_data_json_shape() {
        let answered = turns_to_training_data(&["hi", "hello"]);
        let json = serde_json::to_value(&answered).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "training_pairs": [{"context": "human: hi", "response": "hello"}]
            })
        );

        let open = turns_to_training_data(&["hi"]);
        let json = serde_json::to_value(&open).unwrap();
        assert_eq!(json["query"], "human: hi");
    }
}
