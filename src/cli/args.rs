//! Command line argument parsing for the nbayes CLI using clap.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::corpus::{DocumentId, decode_integer};

/// nbayes - Bernoulli Naive Bayes over sparse word-presence documents
#[derive(Parser, Debug, Clone)]
#[command(name = "nbayes")]
#[command(about = "Train and apply a Bernoulli Naive Bayes text classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct NBayesArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Classifier configuration file (JSON)
    #[arg(short, long, global = true, value_name = "CONFIG_FILE", env = "NBAYES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl NBayesArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Learn a model and print its summary
    Train(TrainArgs),

    /// Learn a model and predict documents of a word file
    Predict(PredictArgs),

    /// Learn a model and measure it against the category file
    Evaluate(EvaluateArgs),
}

/// Input files and training document selection shared by every command.
#[derive(Args, Debug, Clone)]
pub struct TrainingInput {
    /// Category file: `<document>\t<label>` per line
    #[arg(value_name = "CATEGORY_FILE")]
    pub categories: PathBuf,

    /// Word file: `<document>\t<word>:<weight> ...` per line
    #[arg(value_name = "WORD_FILE")]
    pub words: PathBuf,

    /// Inclusive range of training document ids, e.g. `0..=3000`
    #[arg(long, value_name = "RANGE", value_parser = parse_id_range, conflicts_with = "train_keys")]
    pub train_range: Option<RangeInclusive<DocumentId>>,

    /// File with one training document id per line
    #[arg(long, value_name = "KEY_FILE")]
    pub train_keys: Option<PathBuf>,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    #[command(flatten)]
    pub input: TrainingInput,

    /// Include every label's prior and class constant in the output
    #[arg(long)]
    pub show_labels: bool,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub input: TrainingInput,

    /// Word file to predict (defaults to the training word file)
    #[arg(long, value_name = "WORD_FILE")]
    pub predict_words: Option<PathBuf>,

    /// Inclusive range of document ids to predict (defaults to all)
    #[arg(long, value_name = "RANGE", value_parser = parse_id_range, conflicts_with = "predict_keys")]
    pub predict_range: Option<RangeInclusive<DocumentId>>,

    /// File with one document id to predict per line
    #[arg(long, value_name = "KEY_FILE")]
    pub predict_keys: Option<PathBuf>,

    /// Emit only the best label of each document
    #[arg(long)]
    pub best: bool,

    /// Write JSON lines records to this file instead of printing
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub input: TrainingInput,

    /// Inclusive range of document ids to evaluate (defaults to the training selection)
    #[arg(long, value_name = "RANGE", value_parser = parse_id_range)]
    pub eval_range: Option<RangeInclusive<DocumentId>>,

    /// Print the probability of the true label for every document
    #[arg(long)]
    pub per_document: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Parse an inclusive `START..=END` document id range.
pub fn parse_id_range(text: &str) -> std::result::Result<RangeInclusive<DocumentId>, String> {
    let (start, end) = text
        .split_once("..=")
        .ok_or_else(|| format!("expected START..=END, got '{text}'"))?;
    let start = decode_integer(start).map_err(|e| e.to_string())?;
    let end = decode_integer(end).map_err(|e| e.to_string())?;
    if start > end {
        return Err(format!("range start {start} is greater than end {end}"));
    }
    Ok(start..=end)
}
