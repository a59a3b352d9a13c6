//! Smoothed log-domain parameter estimation.

use log::{debug, trace};

use crate::classifier::config::ClassifierConfig;
use crate::classifier::model::{LabelParameters, Model};
use crate::classifier::statistics::CorpusStatistics;
use crate::error::{NBayesError, Result};

/// Turns corpus counts into a [`Model`].
///
/// For a label with `n` training documents, `c` of which contain a word:
///
/// ```text
/// log_odds        = ln(prior + c) - ln(prior + n - c)
/// class_constant += ln(prior + n - c) - ln(2 * prior + n)   (every vocabulary word)
/// log_prior       = ln(n + category_prior) - ln(total training documents)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimator {
    prior: f64,
    category_prior: f64,
}

impl Default for Estimator {
    fn default() -> Self {
        Self {
            prior: 1.0,
            category_prior: 1.0,
        }
    }
}

impl Estimator {
    /// Create an estimator with explicit smoothing constants.
    pub fn new(prior: f64, category_prior: f64) -> Result<Self> {
        check_smoothing("prior", prior)?;
        check_smoothing("category_prior", category_prior)?;
        Ok(Self {
            prior,
            category_prior,
        })
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        Self::new(config.prior, config.category_prior)
    }

    pub fn prior(&self) -> f64 {
        self.prior
    }

    pub fn category_prior(&self) -> f64 {
        self.category_prior
    }

    /// Estimate a model from corpus statistics.
    ///
    /// Walks the full vocabulary for every label so that the class constant
    /// covers absent words too. Vocabulary and labels are visited in
    /// ascending order, which keeps the floating point sums reproducible.
    pub fn estimate(&self, statistics: &CorpusStatistics) -> Result<Model> {
        let total = statistics.total_documents();
        if total == 0 {
            return Err(NBayesError::insufficient_data(
                "no labeled training document was found",
            ));
        }
        let log_total = (total as f64).ln();
        let vocabulary = statistics.vocabulary();

        debug!("Computing log-likelihoods from counts");
        let mut labels = Vec::with_capacity(statistics.label_count());
        for label in statistics.labels() {
            let n = statistics.document_count(label) as f64;
            let log_prior = (n + self.category_prior).ln() - log_total;
            let denominator = (2.0 * self.prior + n).ln();

            let mut log_odds = Vec::with_capacity(vocabulary.len());
            let mut class_constant = 0.0;
            for word in vocabulary.iter() {
                let count = statistics.presence_count(label, word) as f64;
                let log_absent = (self.prior + n - count).ln();
                log_odds.push((self.prior + count).ln() - log_absent);
                class_constant += log_absent - denominator;
            }

            trace!(
                "Label {}: {} documents, log prior {}, class constant {}",
                label, n, log_prior, class_constant
            );
            labels.push(LabelParameters::new(
                label,
                statistics.document_count(label),
                log_prior,
                class_constant,
                log_odds,
            ));
        }

        debug!(
            "Label priors: {:?}",
            labels
                .iter()
                .map(|p| (p.label(), p.log_prior()))
                .collect::<Vec<_>>()
        );

        Ok(Model::new(vocabulary.clone(), labels))
    }
}

fn check_smoothing(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NBayesError::invalid_config(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}
