//! The learned Bernoulli Naive Bayes parameters.

use serde::{Deserialize, Serialize};

use crate::classifier::vocabulary::Vocabulary;
use crate::corpus::{LabelId, SparseDocument, WordId};

/// Parameters of a single label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelParameters {
    label: LabelId,
    document_count: u64,
    log_prior: f64,
    class_constant: f64,
    /// Indexed like the model vocabulary.
    log_odds: Vec<f64>,
}

impl LabelParameters {
    pub(crate) fn new(
        label: LabelId,
        document_count: u64,
        log_prior: f64,
        class_constant: f64,
        log_odds: Vec<f64>,
    ) -> Self {
        Self {
            label,
            document_count,
            log_prior,
            class_constant,
            log_odds,
        }
    }

    pub fn label(&self) -> LabelId {
        self.label
    }

    /// Training documents carrying this label.
    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    /// Smoothed log prior of the label.
    pub fn log_prior(&self) -> f64 {
        self.log_prior
    }

    /// Log-probability of a document containing no vocabulary word at all.
    pub fn class_constant(&self) -> f64 {
        self.class_constant
    }

    /// Log-odds of presence for the word at `index` in the vocabulary.
    pub fn log_odds_at(&self, index: usize) -> Option<f64> {
        self.log_odds.get(index).copied()
    }
}

/// A trained model: the vocabulary together with every label's parameters.
///
/// The two are owned as one unit because each label's class constant sums
/// over the entire vocabulary; swapping either half alone would leave the
/// other inconsistent. Labels are kept in ascending id order.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    vocabulary: Vocabulary,
    labels: Vec<LabelParameters>,
}

impl Model {
    pub(crate) fn new(vocabulary: Vocabulary, mut labels: Vec<LabelParameters>) -> Self {
        labels.sort_by_key(|params| params.label);
        Self { vocabulary, labels }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Per-label parameters in ascending label order.
    pub fn labels(&self) -> &[LabelParameters] {
        &self.labels
    }

    pub fn label_ids(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.labels.iter().map(|params| params.label)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn label(&self, label: LabelId) -> Option<&LabelParameters> {
        self.labels
            .binary_search_by_key(&label, |params| params.label)
            .ok()
            .map(|idx| &self.labels[idx])
    }

    pub fn log_prior(&self, label: LabelId) -> Option<f64> {
        self.label(label).map(|params| params.log_prior)
    }

    pub fn class_constant(&self, label: LabelId) -> Option<f64> {
        self.label(label).map(|params| params.class_constant)
    }

    /// Log-odds of `word` being present under `label`.
    ///
    /// `None` when either the label or the word is unknown to the model.
    pub fn log_odds(&self, label: LabelId, word: WordId) -> Option<f64> {
        let index = self.vocabulary.index_of(word)?;
        self.label(label)?.log_odds_at(index)
    }

    /// Unnormalized log-score of every label for `document`.
    ///
    /// Starts each label at its class constant (plus the weighted prior) and
    /// adds the log-odds of the document's in-vocabulary words; out of
    /// vocabulary words are dropped.
    pub fn log_scores(&self, document: &SparseDocument, prior_weight: f64) -> Vec<(LabelId, f64)> {
        let indices: Vec<usize> = document
            .iter()
            .filter_map(|word| self.vocabulary.index_of(word))
            .collect();

        self.labels
            .iter()
            .map(|params| {
                let mut score = prior_weight * params.log_prior + params.class_constant;
                for &index in &indices {
                    score += params.log_odds[index];
                }
                (params.label, score)
            })
            .collect()
    }

    /// Compact, serializable overview of the model.
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            vocabulary_size: self.vocabulary.len(),
            training_documents: self.labels.iter().map(|p| p.document_count).sum(),
            labels: self
                .labels
                .iter()
                .map(|params| LabelSummary {
                    label: params.label,
                    document_count: params.document_count,
                    log_prior: params.log_prior,
                    class_constant: params.class_constant,
                })
                .collect(),
        }
    }
}

/// Serializable view of a [`Model`] without the per-word tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub vocabulary_size: usize,
    pub training_documents: u64,
    pub labels: Vec<LabelSummary>,
}

/// Serializable view of a [`LabelParameters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSummary {
    pub label: LabelId,
    pub document_count: u64,
    pub log_prior: f64,
    pub class_constant: f64,
}
