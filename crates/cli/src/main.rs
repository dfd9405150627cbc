//! CLI tool for converting dialog transcripts into training data.
//!
//! The `dataset` command walks a directory of dialogs (`.txt` transcripts or
//! `.json` turn arrays) and writes JSONL training, validation and query files.
//! The remaining commands convert a single dialog and print the result.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use dialog_transcript_core::{
    load_dialog, process_all_dialogs, turns_to_training_data, turns_to_transcript,
    write_jsonl_output, PipelineConfig, PipelineResult,
};

/// Convert two-party dialogs between turn arrays, transcripts and training data.
#[derive(Parser, Debug)]
#[command(name = "dialog-transcript")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build JSONL training files from a directory of dialogs
    Dataset(DatasetArgs),
    /// Print the transcript of a dialog file
    Transcript {
        /// Dialog file (.txt transcript or .json turn array)
        path: PathBuf,
    },
    /// Print the turn array of a dialog file as JSON
    Turns {
        /// Dialog file (.txt transcript or .json turn array)
        path: PathBuf,
    },
    /// Print the training pairs and query of a dialog file as JSON
    TrainingData {
        /// Dialog file (.txt transcript or .json turn array)
        path: PathBuf,
    },
}

#[derive(Parser, Debug)]
struct DatasetArgs {
    /// Root directory containing dialog files
    #[arg(long)]
    input_dir: PathBuf,

    /// Output directory for JSONL files
    #[arg(long)]
    output_dir: PathBuf,

    /// Fraction of dialogs for validation (0.0-1.0)
    #[arg(long, default_value = "0.1")]
    val_ratio: f64,

    /// Minimum training pairs required to keep a dialog
    #[arg(long, default_value = "1")]
    min_pairs_per_dialog: usize,

    /// Do not write trailing unanswered messages to queries.jsonl
    #[arg(long)]
    no_queries: bool,
}

fn run_dataset(args: DatasetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig {
        val_ratio: args.val_ratio,
        include_queries: !args.no_queries,
        min_pairs_per_dialog: args.min_pairs_per_dialog,
    };

    log::info!("Processing dialogs from {:?}...", args.input_dir);
    let dialog_results = process_all_dialogs(&args.input_dir, &config)?;
    log::info!("Kept {} dialogs", dialog_results.len());

    log::info!("Writing output to {:?}...", args.output_dir);
    let result: PipelineResult = write_jsonl_output(dialog_results, &args.output_dir, &config)?;

    let metadata_path = args.output_dir.join("metadata.json");
    let metadata = serde_json::json!({
        "config": {
            "input_dir": args.input_dir.to_string_lossy(),
            "output_dir": args.output_dir.to_string_lossy(),
            "val_ratio": config.val_ratio,
            "include_queries": config.include_queries,
            "min_pairs_per_dialog": config.min_pairs_per_dialog,
        },
        "counts": {
            "total_dialogs": result.total_dialogs,
            "total_pairs": result.total_pairs,
            "train_pairs": result.train_pairs,
            "val_pairs": result.val_pairs,
            "total_queries": result.total_queries,
        },
        "stats": {
            "avg_pairs_per_dialog": if result.total_dialogs > 0 {
                result.total_pairs as f64 / result.total_dialogs as f64
            } else {
                0.0
            },
        },
        "files": {
            "train_path": args.output_dir.join("training.jsonl").to_string_lossy(),
            "val_path": args.output_dir.join("validation.jsonl").to_string_lossy(),
            "query_path": if config.include_queries {
                Some(args.output_dir.join("queries.jsonl").to_string_lossy().to_string())
            } else {
                None
            },
        },
    });
    std::fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;

    println!("[summary]");
    println!("  Total dialogs kept: {}", result.total_dialogs);
    println!("  Train pairs: {}", result.train_pairs);
    println!("  Val pairs: {}", result.val_pairs);
    println!("  Queries: {}", result.total_queries);
    println!("  Output: {:?}/{{training,validation}}.jsonl", args.output_dir);
    println!("  Metadata: {:?}", metadata_path);

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Dataset(args) => run_dataset(args)?,
        Commands::Transcript { path } => {
            let turns = load_dialog(&path)?;
            print!("{}", turns_to_transcript(&turns));
        }
        Commands::Turns { path } => {
            let turns = load_dialog(&path)?;
            println!("{}", serde_json::to_string_pretty(&turns)?);
        }
        Commands::TrainingData { path } => {
            let turns = load_dialog(&path)?;
            let data = turns_to_training_data(&turns);
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
    }

    Ok(())
}
