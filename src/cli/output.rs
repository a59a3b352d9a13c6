//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classifier::{EvaluationReport, LabelDistribution, ModelSummary, TrainingReport};
use crate::cli::args::{NBayesArgs, OutputFormat};
use crate::corpus::{DocumentId, LabelId};
use crate::error::Result;

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub report: TrainingReport,
    pub model: Option<ModelSummary>,
    pub duration_ms: u64,
}

/// Result structure for printed predictions.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PredictionResults {
    /// Full label distribution per document.
    Probabilities(BTreeMap<DocumentId, LabelDistribution>),
    /// Best label per document.
    Labels(BTreeMap<DocumentId, LabelId>),
}

/// Result structure for predictions written to a file.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionExport {
    pub path: String,
    pub documents_scored: usize,
    pub records_written: usize,
    pub duration_ms: u64,
}

/// Result structure for a single document in an evaluation.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub document: DocumentId,
    pub true_label: LabelId,
    pub predicted_label: Option<LabelId>,
    pub true_probability: f64,
}

/// Result structure for evaluation.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub report: EvaluationReport,
    pub documents: Option<Vec<DocumentOutcome>>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &NBayesArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &NBayesArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    print_human(&value, 0);
    Ok(())
}

/// Print a JSON value as indented `key: value` lines.
fn print_human(value: &serde_json::Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    serde_json::Value::Object(_) => {
                        println!("{indent}{key}:");
                        print_human(val, depth + 1);
                    }
                    serde_json::Value::Array(arr) if arr.iter().any(|v| v.is_object()) => {
                        println!("{indent}{key}:");
                        for item in arr {
                            print_human(item, depth + 1);
                            println!();
                        }
                    }
                    _ => println!("{indent}{key}: {}", format_value(val)),
                }
            }
        }
        _ => println!("{indent}{}", format_value(value)),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &NBayesArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human output.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.6}"),
            _ => n.to_string(),
        },
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "-".to_string(),
    }
}
