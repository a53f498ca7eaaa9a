//! CLI tool for building LoRA fine-tuning datasets from source trees.
//!
//! This tool walks one or more source directories, tokenizes every C, Java,
//! Scala, Python and plain-text file it recognises, and writes a single JSON
//! array of instruction/input/output records.

mod logging;

use std::path::PathBuf;

use clap::Parser;

use lora_dataset_core::{
    process_all_files, write_json_output, PipelineConfig, UnicodeSegmenter, WindowConfig,
    MAX_HEADER, MAX_WINDOW, MIN_HEADER, MIN_WINDOW,
};

use crate::logging::LogArgs;

/// Turn source trees into LoRA instruction/input/output records.
#[derive(Parser, Debug)]
#[command(name = "lora-dataset")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source project directory (repeatable)
    #[arg(long, required = true)]
    source: Vec<PathBuf>,

    /// Where to save the training dataset
    #[arg(long)]
    target: PathBuf,

    /// Base seed for window sizing; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum tokens per window
    #[arg(long, default_value_t = MIN_WINDOW)]
    min_window: usize,

    /// Window length upper bound (exclusive)
    #[arg(long, default_value_t = MAX_WINDOW)]
    max_window: usize,

    /// Minimum tokens in a record input
    #[arg(long, default_value_t = MIN_HEADER)]
    min_header: usize,

    /// Record input length upper bound (exclusive)
    #[arg(long, default_value_t = MAX_HEADER)]
    max_header: usize,

    #[command(flatten)]
    logging: LogArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.logging.setup_logging(3)?;

    let config = PipelineConfig {
        window: WindowConfig {
            min_window: args.min_window,
            max_window: args.max_window,
            min_header: args.min_header,
            max_header: args.max_header,
        },
        seed: args.seed,
    };

    println!("Processing source files from {:?}...", args.source);
    let outcome = process_all_files(&args.source, &UnicodeSegmenter, &config)?;

    println!("Writing output to {:?}...", args.target);
    write_json_output(&outcome.records, &args.target)?;

    println!("\n[summary]");
    println!("  Files processed: {}", outcome.files_processed);
    println!("  Files failed: {}", outcome.failures.len());
    println!("  Records: {}", outcome.records.len());
    println!("  Seed: {}", outcome.seed);
    println!("  Output: {:?}", args.target);

    Ok(())
}
