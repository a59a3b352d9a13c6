//! Integration tests for batch prediction over word files.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::RangeInclusive;
use std::path::PathBuf;

use ahash::AHashSet;
use nbayes::classifier::{JsonLinesSink, ScoreRecord, TrainingAccuracy, evaluate, load_labels};
use nbayes::prelude::*;
use tempfile::TempDir;

fn write_lines(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}

fn ids(start: DocumentId, end: DocumentId) -> RangeInclusive<DocumentId> {
    start..=end
}

struct Corpus {
    dir: TempDir,
    categories: FileSource,
    words: FileSource,
}

/// Documents 1..=6 are labeled; 7 and 8 only appear in the word file.
fn corpus() -> Corpus {
    let dir = TempDir::new().unwrap();
    let categories = write_lines(
        &dir,
        "categories.txt",
        &["1\t0", "2\t0", "3\t0", "4\t1", "5\t1", "6\t1", "bogus line"],
    );
    let words = write_lines(
        &dir,
        "words.txt",
        &[
            "1\t100:1 101:2",
            "2\t100:4 102:1",
            "3\t101:1",
            "4\t200:1 201:1",
            "5\t201:3",
            "",
            "6\t200:2 202:1",
            "not a record",
            "7\t100:1 200:1",
            "8\t",
        ],
    );
    Corpus {
        categories: FileSource::new(categories),
        words: FileSource::new(words),
        dir,
    }
}

fn trained(corpus: &Corpus) -> NaiveBayesClassifier {
    let config = ClassifierConfig::default().with_training_accuracy(TrainingAccuracy::Always);
    let mut classifier = NaiveBayesClassifier::new(config).unwrap();
    let report = classifier
        .learn(&ids(1, 6), &corpus.categories, &corpus.words)
        .unwrap();

    assert_eq!(report.labels, 2);
    assert_eq!(report.training_documents, 6);
    assert_eq!(report.summary.malformed_category_lines, 1);
    assert_eq!(report.summary.malformed_word_lines, 1);
    assert_eq!(report.training_accuracy, Some(1.0));
    classifier
}

#[test]
fn test_batch_scores_match_single_document_scores() {
    let corpus = corpus();
    let classifier = trained(&corpus);

    let predictions = classifier.predict_all(&corpus.words, &AllDocuments).unwrap();
    assert_eq!(
        predictions.keys().copied().collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5, 6, 7, 8]
    );

    let document = SparseDocument::parse("100:1 200:1").unwrap();
    assert_eq!(predictions[&7], classifier.predict(&document).unwrap());
    assert_eq!(predictions[&8], classifier.predict(&SparseDocument::new()).unwrap());
}

#[test]
fn test_documents_are_scored_independently() {
    let corpus = corpus();
    let classifier = trained(&corpus);

    let everything = classifier.predict_all(&corpus.words, &AllDocuments).unwrap();
    let only_seven: AHashSet<DocumentId> = [7].into_iter().collect();
    let alone = classifier.predict_all(&corpus.words, &only_seven).unwrap();

    assert_eq!(alone.len(), 1);
    assert_eq!(alone[&7], everything[&7]);
}

#[test]
fn test_probability_sink_receives_every_label() {
    let corpus = corpus();
    let classifier = trained(&corpus);

    let mut records: Vec<ScoreRecord> = Vec::new();
    let scored = classifier
        .insert_all_probabilities(&corpus.words, &ids(4, 7), &mut records)
        .unwrap();

    assert_eq!(scored, 4);
    assert_eq!(records.len(), 8);

    let mut totals: BTreeMap<DocumentId, f64> = BTreeMap::new();
    for record in &records {
        assert!(record.value >= 0.0);
        *totals.entry(record.document).or_default() += record.value;
    }
    for total in totals.values() {
        assert!((total - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_prediction_sink_receives_best_labels() {
    let corpus = corpus();
    let classifier = trained(&corpus);

    let mut predictions: BTreeMap<(DocumentId, LabelId), f64> = BTreeMap::new();
    classifier
        .insert_all_predictions(&corpus.words, &ids(1, 6), &mut predictions)
        .unwrap();

    let expected: BTreeMap<(DocumentId, LabelId), f64> =
        [(1, 0), (2, 0), (3, 0), (4, 1), (5, 1), (6, 1)]
            .into_iter()
            .map(|key| (key, 1.0))
            .collect();
    assert_eq!(predictions, expected);
}

#[test]
fn test_json_lines_file_output() {
    let corpus = corpus();
    let classifier = trained(&corpus);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("predictions.jsonl");
    let mut sink = JsonLinesSink::new(BufWriter::new(File::create(&path).unwrap()));
    classifier
        .insert_all_predictions(&corpus.words, &AllDocuments, &mut sink)
        .unwrap();
    assert_eq!(sink.written(), 8);
    drop(sink);

    let records: Vec<ScoreRecord> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 8);
    assert_eq!(
        records[0],
        ScoreRecord {
            document: 1,
            label: 0,
            value: 1.0
        }
    );
}

#[test]
fn test_evaluation_against_category_file() {
    let corpus = corpus();
    let classifier = trained(&corpus);

    let predictions = classifier.predict_all(&corpus.words, &AllDocuments).unwrap();
    let truth = load_labels(&corpus.categories).unwrap();
    let report = evaluate(&truth, &predictions, 2);

    assert_eq!(report.documents, 6);
    assert_eq!(report.unlabeled_documents, 2);
    assert_eq!(report.accuracy, 1.0);
    assert!(report.mean_true_probability > report.baseline);
    assert_eq!(report.baseline, 0.5);
}

#[test]
fn test_missing_word_file_is_fatal() {
    let corpus = corpus();
    let classifier = trained(&corpus);

    let missing = FileSource::new(corpus.dir.path().join("missing.txt"));
    let result = classifier.predict_all(&missing, &AllDocuments);
    assert!(matches!(result, Err(NBayesError::SourceUnavailable { .. })));
}
