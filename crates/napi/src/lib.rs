//! Node.js bindings for the dialog transcript serializer.
//!
//! Exposes the four conversions of the core crate. Malformed transcripts are
//! thrown as JS errors.

use napi::bindgen_prelude::*;
use napi_derive::napi;

use dialog_transcript_core::{
    TrainingData as CoreTrainingData, TrainingPair as CoreTrainingPair, TranscriptError,
};

/// A (context, response) training example.
#[napi(object)]
pub struct TrainingPair {
    pub context: String,
    pub response: String,
}

impl From<CoreTrainingPair> for TrainingPair {
    fn from(pair: CoreTrainingPair) -> Self {
        Self {
            context: pair.context,
            response: pair.response,
        }
    }
}

/// Training pairs of a dialog and its trailing unanswered human message.
#[napi(object)]
pub struct TrainingData {
    pub training_pairs: Vec<TrainingPair>,
    pub query: Option<String>,
}

impl From<CoreTrainingData> for TrainingData {
    fn from(data: CoreTrainingData) -> Self {
        Self {
            training_pairs: data.training_pairs.into_iter().map(Into::into).collect(),
            query: data.query,
        }
    }
}

fn to_napi_error(err: TranscriptError) -> Error {
    Error::new(Status::InvalidArg, err.to_string())
}

/// Convert a chat array into a transcript.
///
/// @param turns - Messages, starting with the human and alternating.
#[napi]
pub fn turns_to_transcript(turns: Vec<String>) -> String {
    dialog_transcript_core::turns_to_transcript(&turns)
}

/// Convert a transcript into a chat array.
///
/// @param transcript - Records prefixed with `human: ` or `chatbot: `.
#[napi]
pub fn transcript_to_turns(transcript: String) -> Result<Vec<String>> {
    dialog_transcript_core::transcript_to_turns(&transcript).map_err(to_napi_error)
}

/// Build training pairs and the trailing query from a chat array.
#[napi]
pub fn turns_to_training_data(turns: Vec<String>) -> TrainingData {
    dialog_transcript_core::turns_to_training_data(&turns).into()
}

/// Build training pairs and the trailing query from a transcript.
#[napi]
pub fn transcript_to_training_data(transcript: String) -> Result<TrainingData> {
    dialog_transcript_core::transcript_to_training_data(&transcript)
        .map(Into::into)
        .map_err(to_napi_error)
}
