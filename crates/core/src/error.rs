//! Error types for transcript parsing and the batch pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by the transcript conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    /// A non-empty transcript did not open with the initiator label.
    #[error("malformed transcript: expected it to start with {expected:?}, found {found:?}")]
    Format {
        expected: &'static str,
        found: String,
    },
    /// An internal helper was called outside its contract.
    #[error("invariant violated: {0}")]
    Invariant(&'static str),
}

/// Failure raised while turning a directory of dialogs into JSONL files.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
    #[error("unsupported dialog file {0:?} (expected .txt or .json)")]
    UnsupportedInput(PathBuf),
    #[error("no dialog files found under {0:?}")]
    NoInputs(PathBuf),
}
