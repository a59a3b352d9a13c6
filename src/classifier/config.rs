//! Classifier configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::estimator::Estimator;
use crate::error::{NBayesError, Result};

/// When to measure accuracy on the training documents after learning.
///
/// The check costs a second full pass over the word source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingAccuracy {
    /// Only when debug logging is enabled.
    #[default]
    Auto,
    Always,
    Never,
}

impl TrainingAccuracy {
    pub fn is_enabled(&self) -> bool {
        match self {
            TrainingAccuracy::Auto => log::log_enabled!(log::Level::Debug),
            TrainingAccuracy::Always => true,
            TrainingAccuracy::Never => false,
        }
    }
}

/// Configuration for [`NaiveBayesClassifier`](crate::classifier::NaiveBayesClassifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Additive smoothing for word presence counts.
    pub prior: f64,
    /// Additive smoothing for label document counts.
    pub category_prior: f64,
    /// Weight of the label log-prior in the log-score.
    ///
    /// Defaults to `0.0`, which scores labels on word evidence alone and
    /// ignores how frequent each label was in training. `1.0` gives textbook
    /// Naive Bayes.
    pub prior_weight: f64,
    /// Training-accuracy self-check policy.
    pub training_accuracy: TrainingAccuracy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            prior: 1.0,
            category_prior: 1.0,
            prior_weight: 0.0,
            training_accuracy: TrainingAccuracy::Auto,
        }
    }
}

impl ClassifierConfig {
    pub fn with_prior(mut self, prior: f64) -> Self {
        self.prior = prior;
        self
    }

    pub fn with_category_prior(mut self, category_prior: f64) -> Self {
        self.category_prior = category_prior;
        self
    }

    pub fn with_prior_weight(mut self, prior_weight: f64) -> Self {
        self.prior_weight = prior_weight;
        self
    }

    pub fn with_training_accuracy(mut self, training_accuracy: TrainingAccuracy) -> Self {
        self.training_accuracy = training_accuracy;
        self
    }

    /// Check that smoothing constants are positive and the prior weight is finite.
    pub fn validate(&self) -> Result<()> {
        Estimator::from_config(self)?;
        if !self.prior_weight.is_finite() {
            return Err(NBayesError::invalid_config(format!(
                "prior_weight must be finite, got {}",
                self.prior_weight
            )));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NBayesError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: ClassifierConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.prior, 1.0);
        assert_eq!(config.category_prior, 1.0);
        assert_eq!(config.prior_weight, 0.0);
        assert_eq!(config.training_accuracy, TrainingAccuracy::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_constants() {
        assert!(ClassifierConfig::default().with_prior(0.0).validate().is_err());
        assert!(
            ClassifierConfig::default()
                .with_category_prior(f64::INFINITY)
                .validate()
                .is_err()
        );
        assert!(
            ClassifierConfig::default()
                .with_prior_weight(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            ClassifierConfig::default()
                .with_prior_weight(-2.0)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_validate_matches_estimator() {
        let config = ClassifierConfig::default().with_category_prior(-1.0);
        let from_config = config.validate().unwrap_err().to_string();
        let from_estimator = Estimator::new(1.0, -1.0).unwrap_err().to_string();
        assert_eq!(from_config, from_estimator);
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"prior_weight": 1.0, "training_accuracy": "never"}}"#).unwrap();
        file.flush().unwrap();

        let config = ClassifierConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.prior_weight, 1.0);
        assert_eq!(config.training_accuracy, TrainingAccuracy::Never);
        assert_eq!(config.prior, 1.0);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"prior": -1.0}}"#).unwrap();
        file.flush().unwrap();

        assert!(matches!(
            ClassifierConfig::from_json_file(file.path()),
            Err(NBayesError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_always_and_never() {
        assert!(TrainingAccuracy::Always.is_enabled());
        assert!(!TrainingAccuracy::Never.is_enabled());
    }
}
