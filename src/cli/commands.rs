//! Command implementations for the nbayes CLI.

use std::fs::File;
use std::io::BufWriter;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Instant;

use ahash::AHashSet;
use anyhow::{Context, Result};
use log::{debug, info};

use crate::classifier::{
    ClassifierConfig, JsonLinesSink, NaiveBayesClassifier, TrainingReport, evaluate, load_labels,
};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::corpus::{DocumentId, DocumentSet, FileSource, LineSource, decode_integer};

/// Documents selected on the command line.
#[derive(Debug, Clone)]
pub enum DocumentSelection {
    All,
    Range(RangeInclusive<DocumentId>),
    Keys(AHashSet<DocumentId>),
}

impl DocumentSet for DocumentSelection {
    fn contains_document(&self, document: DocumentId) -> bool {
        match self {
            DocumentSelection::All => true,
            DocumentSelection::Range(range) => range.contains(&document),
            DocumentSelection::Keys(keys) => keys.contains(&document),
        }
    }
}

impl DocumentSelection {
    fn from_args(
        range: &Option<RangeInclusive<DocumentId>>,
        keys: &Option<impl AsRef<Path>>,
    ) -> Result<Self> {
        match (range, keys) {
            (Some(range), _) => Ok(DocumentSelection::Range(range.clone())),
            (None, Some(path)) => Ok(DocumentSelection::Keys(load_keys(path.as_ref())?)),
            (None, None) => Ok(DocumentSelection::All),
        }
    }
}

/// Read one document id per line; blank lines are ignored.
fn load_keys(path: &Path) -> Result<AHashSet<DocumentId>> {
    let source = FileSource::new(path);
    let mut keys = AHashSet::new();
    for line in source.lines()? {
        let (line_number, line) = line?;
        if line.trim().is_empty() {
            continue;
        }
        let key = decode_integer(&line)
            .with_context(|| format!("{}:{}: invalid document id", path.display(), line_number))?;
        keys.insert(key);
    }
    debug!("Loaded {} keys from {}", keys.len(), path.display());
    Ok(keys)
}

/// Execute a CLI command.
pub fn execute_command(args: NBayesArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Predict(predict_args) => predict(predict_args, &args),
        Command::Evaluate(evaluate_args) => evaluate_model(evaluate_args, &args),
    }
}

fn load_config(args: &NBayesArgs) -> Result<ClassifierConfig> {
    match &args.config {
        Some(path) => ClassifierConfig::from_json_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(ClassifierConfig::default()),
    }
}

/// Learn a classifier from the shared training inputs.
fn learn(
    input: &TrainingInput,
    cli_args: &NBayesArgs,
) -> Result<(NaiveBayesClassifier, TrainingReport, DocumentSelection)> {
    let config = load_config(cli_args)?;
    let training_keys = DocumentSelection::from_args(&input.train_range, &input.train_keys)?;
    let categories = FileSource::new(&input.categories);
    let words = FileSource::new(&input.words);

    let mut classifier = NaiveBayesClassifier::new(config)?;
    let report = classifier
        .learn(&training_keys, &categories, &words)
        .with_context(|| {
            format!(
                "failed to learn from {} and {}",
                input.categories.display(),
                input.words.display()
            )
        })?;

    Ok((classifier, report, training_keys))
}

/// Learn a model and print its summary.
fn train(args: &TrainArgs, cli_args: &NBayesArgs) -> Result<()> {
    let start_time = Instant::now();
    let (classifier, report, _) = learn(&args.input, cli_args)?;

    let model = if args.show_labels {
        classifier.model().map(|model| model.summary())
    } else {
        None
    };

    output_result(
        "Training finished",
        &TrainingResult {
            report,
            model,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )?;

    Ok(())
}

/// Learn a model and predict the selected documents.
fn predict(args: &PredictArgs, cli_args: &NBayesArgs) -> Result<()> {
    let start_time = Instant::now();
    let (classifier, _, _) = learn(&args.input, cli_args)?;

    let words = FileSource::new(args.predict_words.as_ref().unwrap_or(&args.input.words));
    let documents = DocumentSelection::from_args(&args.predict_range, &args.predict_keys)?;

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut sink = JsonLinesSink::new(BufWriter::new(file));

        let documents_scored = if args.best {
            classifier.insert_all_predictions(&words, &documents, &mut sink)?
        } else {
            classifier.insert_all_probabilities(&words, &documents, &mut sink)?
        };
        info!("Wrote {} records to {}", sink.written(), path.display());

        output_result(
            "Predictions written",
            &PredictionExport {
                path: path.display().to_string(),
                documents_scored,
                records_written: sink.written(),
                duration_ms: start_time.elapsed().as_millis() as u64,
            },
            cli_args,
        )?;
    } else {
        let results = if args.best {
            PredictionResults::Labels(classifier.predict_all_best(&words, &documents)?)
        } else {
            PredictionResults::Probabilities(classifier.predict_all(&words, &documents)?)
        };
        output_result("Predictions", &results, cli_args)?;
    }

    Ok(())
}

/// Learn a model, predict the evaluation documents and compare with their labels.
fn evaluate_model(args: &EvaluateArgs, cli_args: &NBayesArgs) -> Result<()> {
    let (classifier, _, training_keys) = learn(&args.input, cli_args)?;

    let words = FileSource::new(&args.input.words);
    let categories = FileSource::new(&args.input.categories);
    let documents = match &args.eval_range {
        Some(range) => DocumentSelection::Range(range.clone()),
        None => training_keys,
    };

    let predictions = classifier.predict_all(&words, &documents)?;
    let truth = load_labels(&categories)
        .with_context(|| format!("failed to read {}", categories.name()))?;
    let label_count = classifier.model().map_or(0, |model| model.label_count());
    let report = evaluate(&truth, &predictions, label_count);

    let outcomes: Option<Vec<DocumentOutcome>> = args.per_document.then(|| {
        predictions
            .iter()
            .filter_map(|(document, distribution)| {
                let true_label = *truth.get(document)?;
                Some(DocumentOutcome {
                    document: *document,
                    true_label,
                    predicted_label: distribution.best().map(|(label, _)| label),
                    true_probability: distribution.probability(true_label).unwrap_or(0.0),
                })
            })
            .collect()
    });

    output_result(
        "Evaluation finished",
        &EvaluationResult {
            report,
            documents: outcomes,
        },
        cli_args,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn test_document_selection() {
        let selection = DocumentSelection::Range(1..=3);
        assert!(selection.contains_document(3));
        assert!(!selection.contains_document(4));
        assert!(DocumentSelection::All.contains_document(-1));
    }

    #[test]
    fn test_load_keys() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "keys.txt", &["1", "", "0x10", "3"]);
        let keys = load_keys(&path).unwrap();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&16));

        let bad = write_file(&dir, "bad.txt", &["1", "two"]);
        assert!(load_keys(&bad).is_err());
    }

    #[test]
    fn test_predict_writes_json_lines() {
        let dir = TempDir::new().unwrap();
        let categories = write_file(&dir, "labels.txt", &["1\t1", "2\t1", "3\t2"]);
        let words = write_file(&dir, "words.txt", &["1\t10:3 11:1", "2\t10:1", "3\t12:5"]);
        let output = dir.path().join("out.jsonl");

        let args = NBayesArgs::try_parse_from([
            "nbayes",
            "--quiet",
            "--format",
            "json",
            "predict",
            categories.to_str().unwrap(),
            words.to_str().unwrap(),
            "--best",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        execute_command(args).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 3);
    }

    #[test]
    fn test_evaluate_per_document() {
        let dir = TempDir::new().unwrap();
        let categories = write_file(&dir, "labels.txt", &["1\t1", "2\t1", "3\t2", "4\t2"]);
        let words = write_file(
            &dir,
            "words.txt",
            &["1\t10:3 11:1", "2\t10:1", "3\t12:5", "4\t12:1 13:1"],
        );

        let args = NBayesArgs::try_parse_from([
            "nbayes",
            "--quiet",
            "--format",
            "json",
            "evaluate",
            categories.to_str().unwrap(),
            words.to_str().unwrap(),
            "--train-range",
            "1..=3",
            "--eval-range",
            "1..=4",
            "--per-document",
        ])
        .unwrap();
        execute_command(args).unwrap();
    }

    #[test]
    fn test_evaluate_defaults_to_training_selection() {
        let dir = TempDir::new().unwrap();
        let categories = write_file(&dir, "labels.txt", &["1\t1", "2\t2"]);
        let words = write_file(&dir, "words.txt", &["1\t10:1", "2\t11:1"]);

        let args = NBayesArgs::try_parse_from([
            "nbayes",
            "--quiet",
            "evaluate",
            categories.to_str().unwrap(),
            words.to_str().unwrap(),
        ])
        .unwrap();
        if let Command::Evaluate(evaluate_args) = &args.command {
            assert!(evaluate_args.eval_range.is_none());
            assert!(!evaluate_args.per_document);
        } else {
            panic!("Expected Evaluate command");
        }
        execute_command(args).unwrap();
    }

    #[test]
    fn test_evaluate_without_labels_fails() {
        let dir = TempDir::new().unwrap();
        let categories = write_file(&dir, "labels.txt", &["not a label line"]);
        let words = write_file(&dir, "words.txt", &["1\t10:1"]);

        let args = NBayesArgs::try_parse_from([
            "nbayes",
            "--quiet",
            "evaluate",
            categories.to_str().unwrap(),
            words.to_str().unwrap(),
            "--per-document",
        ])
        .unwrap();
        assert!(execute_command(args).is_err());
    }

    #[test]
    fn test_train_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.txt");
        let missing = missing.to_str().unwrap();
        let args = NBayesArgs::try_parse_from(["nbayes", "--quiet", "train", missing, missing])
        .unwrap();

        assert!(execute_command(args).is_err());
    }
}
