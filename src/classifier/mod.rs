//! Bernoulli Naive Bayes classification over sparse word-presence documents.
//!
//! Each document is reduced to the set of words it contains. Training counts,
//! per label, how many documents contain each word; estimation turns those
//! counts into smoothed log-odds plus a per-label constant that accounts for
//! every vocabulary word being absent. Scoring a document then only touches
//! the words it actually contains.
//!
//! # Architecture
//!
//! - [`statistics`]: one pass over the category source and one over the word
//!   source, producing vocabulary and counts
//! - [`Estimator`]: counts to log-domain [`Model`] parameters
//! - [`Scorer`]: per-label log-scores and log-sum-exp normalization
//! - [`NaiveBayesClassifier`]: owns the model, batch prediction into a
//!   [`ScoreSink`]
//! - [`evaluation`]: accuracy of batch predictions against true labels

pub mod config;
pub mod estimator;
pub mod evaluation;
pub mod model;
pub mod naive_bayes;
pub mod scorer;
pub mod sink;
pub mod statistics;
pub mod vocabulary;

pub use config::{ClassifierConfig, TrainingAccuracy};
pub use estimator::Estimator;
pub use evaluation::{EvaluationReport, evaluate, load_labels};
pub use model::{LabelParameters, LabelSummary, Model, ModelSummary};
pub use naive_bayes::{NaiveBayesClassifier, TrainingReport};
pub use scorer::{LabelDistribution, Scorer, normalize_log_scores};
pub use sink::{JsonLinesSink, ScoreRecord, ScoreSink};
pub use statistics::{BuildSummary, CorpusStatistics};
pub use vocabulary::Vocabulary;
