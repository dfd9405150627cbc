//! Pipeline for turning a directory of dialogs into JSONL training files.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::conversation::transcript_to_turns;
use crate::error::PipelineError;
use crate::training::{transcript_to_training_data, turns_to_training_data, TrainingData};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fraction of dialogs routed to the validation file.
    pub val_ratio: f64,
    /// Write trailing unanswered human messages to `queries.jsonl`.
    pub include_queries: bool,
    /// Dialogs with fewer pairs are dropped unless they carry a kept query.
    pub min_pairs_per_dialog: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            val_ratio: 0.1,
            include_queries: true,
            min_pairs_per_dialog: 1,
        }
    }
}

/// Raw contents of a dialog file.
#[derive(Debug)]
enum DialogSource {
    /// A labeled transcript (`.txt`).
    Transcript(String),
    /// A JSON array of turn strings (`.json`).
    Turns(Vec<String>),
}

/// Result of processing a single dialog file.
#[derive(Debug)]
pub struct DialogResult {
    pub data: TrainingData,
    pub source_path: String,
}

/// Result of processing all dialogs.
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub total_dialogs: usize,
    pub total_pairs: usize,
    pub train_pairs: usize,
    pub val_pairs: usize,
    pub total_queries: usize,
}

/// A training pair as written to the JSONL files.
#[derive(Debug, Serialize)]
pub struct PairRecord {
    pub context: String,
    pub response: String,
    pub source: String,
}

/// An open query as written to `queries.jsonl`.
#[derive(Debug, Serialize)]
pub struct QueryRecord {
    pub query: String,
    pub source: String,
}

fn is_dialog_file(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext == "txt" || ext == "json")
}

/// Discover all dialog files (`.txt` transcripts and `.json` turn arrays).
pub fn discover_dialog_files(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_dialog_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();
    paths
}

fn read_dialog(path: &Path) -> Result<DialogSource, PipelineError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("txt") => Ok(DialogSource::Transcript(std::fs::read_to_string(path)?)),
        Some("json") => {
            let text = std::fs::read_to_string(path)?;
            Ok(DialogSource::Turns(serde_json::from_str(&text)?))
        }
        _ => Err(PipelineError::UnsupportedInput(path.to_path_buf())),
    }
}

/// Load a dialog file as a turn array.
pub fn load_dialog(path: &Path) -> Result<Vec<String>, PipelineError> {
    match read_dialog(path)? {
        DialogSource::Transcript(text) => Ok(transcript_to_turns(&text)?),
        DialogSource::Turns(turns) => Ok(turns),
    }
}

/// Build the training data of a single dialog file.
pub fn process_dialog(path: &Path) -> Result<TrainingData, PipelineError> {
    let data = match read_dialog(path)? {
        DialogSource::Transcript(text) => transcript_to_training_data(&text)?,
        DialogSource::Turns(turns) => turns_to_training_data(&turns),
    };
    log::debug!(
        "{:?}: {} pairs, query: {}",
        path,
        data.training_pairs.len(),
        data.query.is_some()
    );
    Ok(data)
}

fn keep_dialog(data: &TrainingData, config: &PipelineConfig) -> bool {
    data.training_pairs.len() >= config.min_pairs_per_dialog
        || (config.include_queries && data.query.is_some())
}

/// Process all dialog files in a directory in parallel.
///
/// Files that fail to load are logged and skipped; dialogs too short to be
/// useful under `config` are dropped.
pub fn process_all_dialogs(
    root: &Path,
    config: &PipelineConfig,
) -> Result<Vec<DialogResult>, PipelineError> {
    let dialog_files = discover_dialog_files(root);

    if dialog_files.is_empty() {
        return Err(PipelineError::NoInputs(root.to_path_buf()));
    }

    let total_files = dialog_files.len();
    let processed_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);
    let dropped_count = AtomicUsize::new(0);

    let results: Vec<DialogResult> = dialog_files
        .into_par_iter()
        .filter_map(|path| {
            let result = process_dialog(&path);
            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
            if count % 100 == 0 || count == total_files {
                log::info!("Processed {}/{} dialogs...", count, total_files);
            }

            match result {
                Ok(data) if keep_dialog(&data, config) => Some(DialogResult {
                    data,
                    source_path: path.to_string_lossy().to_string(),
                }),
                Ok(_) => {
                    dropped_count.fetch_add(1, Ordering::Relaxed);
                    log::debug!("Dropping {:?}: too few training pairs", path);
                    None
                }
                Err(e) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                    log::warn!("Error processing {:?}: {}", path, e);
                    None
                }
            }
        })
        .collect();

    let errors = error_count.load(Ordering::Relaxed);
    if errors > 0 {
        log::warn!("{} dialogs failed to process", errors);
    }
    let dropped = dropped_count.load(Ordering::Relaxed);
    if dropped > 0 {
        log::info!("{} dialogs dropped for having too few pairs", dropped);
    }

    Ok(results)
}

/// Write training pairs to JSONL files (training and validation), plus open
/// queries when `config.include_queries` is set.
pub fn write_jsonl_output(
    dialog_results: Vec<DialogResult>,
    output_dir: &Path,
    config: &PipelineConfig,
) -> Result<PipelineResult, PipelineError> {
    use std::fs::File;
    use std::io::{BufWriter, Write};

    std::fs::create_dir_all(output_dir)?;

    // Deterministic shuffle so the split does not follow directory order
    let mut dialogs: Vec<_> = dialog_results.into_iter().enumerate().collect();
    dialogs.sort_by(|(i, a), (j, b)| {
        let hash_a = (*i as u64).wrapping_mul(2654435761) % 1000;
        let hash_b = (*j as u64).wrapping_mul(2654435761) % 1000;
        hash_a.cmp(&hash_b).then_with(|| a.source_path.cmp(&b.source_path))
    });

    let total_dialogs = dialogs.len();
    let val_count = (total_dialogs as f64 * config.val_ratio).round() as usize;
    let train_count = total_dialogs.saturating_sub(val_count);

    let mut train_file = BufWriter::new(File::create(output_dir.join("training.jsonl"))?);
    let mut val_file = BufWriter::new(File::create(output_dir.join("validation.jsonl"))?);
    let mut query_file = if config.include_queries {
        Some(BufWriter::new(File::create(output_dir.join("queries.jsonl"))?))
    } else {
        None
    };

    let mut train_pairs = 0;
    let mut val_pairs = 0;
    let mut total_queries = 0;

    for (idx, (_, dialog)) in dialogs.into_iter().enumerate() {
        let is_validation = idx >= train_count;
        let DialogResult { data, source_path } = dialog;

        for pair in data.training_pairs {
            let record = PairRecord {
                context: pair.context,
                response: pair.response,
                source: source_path.clone(),
            };
            let json_line = serde_json::to_string(&record)?;

            if is_validation {
                writeln!(val_file, "{}", json_line)?;
                val_pairs += 1;
            } else {
                writeln!(train_file, "{}", json_line)?;
                train_pairs += 1;
            }
        }

        if let (Some(file), Some(query)) = (query_file.as_mut(), data.query) {
            let record = QueryRecord {
                query,
                source: source_path,
            };
            writeln!(file, "{}", serde_json::to_string(&record)?)?;
            total_queries += 1;
        }
    }

    train_file.flush()?;
    val_file.flush()?;
    if let Some(file) = query_file.as_mut() {
        file.flush()?;
    }

    Ok(PipelineResult {
        total_dialogs,
        total_pairs: train_pairs + val_pairs,
        train_pairs,
        val_pairs,
        total_queries,
    })
}
