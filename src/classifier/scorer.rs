//! Document scoring and log-sum-exp normalization.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::classifier::model::Model;
use crate::corpus::{LabelId, SparseDocument};
use crate::error::{NBayesError, Result};

/// Turn log-scores into probabilities in place.
///
/// Subtracts the maximum before exponentiating so that no finite input can
/// overflow or underflow the normalizer. Equal scores give a uniform
/// distribution; if every score is `-inf` the result is uniform as well.
pub fn normalize_log_scores(scores: &mut [f64]) {
    if scores.is_empty() {
        return;
    }

    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        let uniform = 1.0 / scores.len() as f64;
        scores.iter_mut().for_each(|s| *s = uniform);
        return;
    }

    let normalizer: f64 = scores.iter().map(|s| (s - max).exp()).sum();
    let log_normalizer = normalizer.ln();
    for score in scores.iter_mut() {
        *score = (*score - max - log_normalizer).exp();
    }
}

/// Index of the first strictly maximal value.
fn argmax(values: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// A probability distribution over labels, in ascending label order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelDistribution {
    entries: Vec<(LabelId, f64)>,
}

impl LabelDistribution {
    /// Build a distribution by normalizing per-label log-scores.
    pub fn from_log_scores(log_scores: Vec<(LabelId, f64)>) -> Self {
        let mut entries = log_scores;
        entries.sort_by_key(|(label, _)| *label);
        let mut values: Vec<f64> = entries.iter().map(|(_, score)| *score).collect();
        normalize_log_scores(&mut values);
        for (entry, value) in entries.iter_mut().zip(values) {
            entry.1 = value;
        }
        Self { entries }
    }

    /// Probability of `label`, or `None` when the label is unknown.
    pub fn probability(&self, label: LabelId) -> Option<f64> {
        self.entries
            .binary_search_by_key(&label, |(l, _)| *l)
            .ok()
            .map(|idx| self.entries[idx].1)
    }

    /// Label with the highest probability; ties keep the smallest label.
    pub fn best(&self) -> Option<(LabelId, f64)> {
        argmax(self.entries.iter().map(|(_, p)| *p)).map(|idx| self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (LabelId, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all probabilities, 1 up to rounding.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }
}

impl Serialize for LabelDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, probability) in &self.entries {
            map.serialize_entry(label, probability)?;
        }
        map.end()
    }
}

/// Scores documents against a borrowed [`Model`].
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    model: &'a Model,
    prior_weight: f64,
}

impl<'a> Scorer<'a> {
    /// Create a scorer that ignores label priors.
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            prior_weight: 0.0,
        }
    }

    pub fn with_prior_weight(mut self, prior_weight: f64) -> Self {
        self.prior_weight = prior_weight;
        self
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    /// Unnormalized per-label log-scores.
    pub fn log_scores(&self, document: &SparseDocument) -> Vec<(LabelId, f64)> {
        self.model.log_scores(document, self.prior_weight)
    }

    /// Probability of each label given the document.
    pub fn score(&self, document: &SparseDocument) -> LabelDistribution {
        LabelDistribution::from_log_scores(self.log_scores(document))
    }

    /// Label with the highest raw log-score; ties keep the smallest label.
    pub fn predict_best(&self, document: &SparseDocument) -> Result<LabelId> {
        let scores = self.log_scores(document);
        argmax(scores.iter().map(|(_, score)| *score))
            .map(|idx| scores[idx].0)
            .ok_or_else(|| NBayesError::empty_model("model has no labels"))
    }
}
