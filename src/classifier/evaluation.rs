//! Accuracy measurements for batch predictions.

use std::collections::BTreeMap;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::classifier::scorer::LabelDistribution;
use crate::corpus::{CategoryRecord, DocumentId, LabelId, LineSource};
use crate::error::Result;

/// Read every well-formed line of a category source.
///
/// Unlike training, no key filter is applied. Malformed lines are skipped and
/// a later line for the same document wins.
pub fn load_labels<C>(categories: &C) -> Result<BTreeMap<DocumentId, LabelId>>
where
    C: LineSource + ?Sized,
{
    let mut labels = BTreeMap::new();
    for line in categories.lines()? {
        let (line_number, line) = line?;
        match CategoryRecord::parse(&line) {
            Ok(record) => {
                labels.insert(record.document, record.label);
            }
            Err(e) if e.is_recoverable() => {
                trace!("Skipping {}:{}: {}", categories.name(), line_number, e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(labels)
}

/// How well a set of predicted distributions matches the true labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Documents that had both a prediction and a true label.
    pub documents: usize,
    /// Predicted documents without a true label.
    pub unlabeled_documents: usize,
    /// Mean probability assigned to the true label.
    pub mean_true_probability: f64,
    /// Fraction of documents whose most probable label is the true label.
    pub accuracy: f64,
    /// Probability a uniform guess would assign to the true label.
    pub baseline: f64,
}

/// Compare predicted distributions against true labels.
///
/// A true label the model never saw contributes probability zero and counts
/// as a miss.
pub fn evaluate(
    truth: &BTreeMap<DocumentId, LabelId>,
    predictions: &BTreeMap<DocumentId, LabelDistribution>,
    label_count: usize,
) -> EvaluationReport {
    let mut documents = 0usize;
    let mut unlabeled_documents = 0usize;
    let mut probability_sum = 0.0;
    let mut correct = 0usize;

    for (document, distribution) in predictions {
        let Some(&label) = truth.get(document) else {
            unlabeled_documents += 1;
            continue;
        };

        let probability = distribution.probability(label).unwrap_or(0.0);
        trace!("Document {document}, true {label}, predicted {probability}");
        probability_sum += probability;
        if distribution.best().map(|(best, _)| best) == Some(label) {
            correct += 1;
        }
        documents += 1;
    }

    let mean = |value: f64| {
        if documents == 0 {
            0.0
        } else {
            value / documents as f64
        }
    };

    EvaluationReport {
        documents,
        unlabeled_documents,
        mean_true_probability: mean(probability_sum),
        accuracy: mean(correct as f64),
        baseline: if label_count == 0 {
            0.0
        } else {
            1.0 / label_count as f64
        },
    }
}
