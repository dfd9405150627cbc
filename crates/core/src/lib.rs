//! Core serialization logic for two-party dialogs.
//!
//! A dialog is either a turn array, where the human speaks at even indices and
//! the chatbot at odd ones, or a transcript, where every message is written on
//! a record prefixed with `human: ` or `chatbot: `. This crate converts between
//! the two and derives (context, response) training pairs plus the trailing
//! open query from either form.

mod conversation;
mod error;
mod helpers;
pub mod pipeline;
mod training;

pub use conversation::{
    transcript_to_turns, turns_to_transcript, Role, CHATBOT_LABEL, HUMAN_LABEL,
};
pub use error::{PipelineError, TranscriptError};
pub use helpers::fresh_token;
pub use pipeline::{
    discover_dialog_files, load_dialog, process_all_dialogs, process_dialog, write_jsonl_output,
    DialogResult, PipelineConfig, PipelineResult,
};
pub use training::{
    transcript_to_training_data, turns_to_training_data, TrainingData, TrainingPair,
};
