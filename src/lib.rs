//! # nbayes
//!
//! A Bernoulli (presence-based) Naive Bayes classifier for documents given as
//! sparse sets of word ids.
//!
//! ## Features
//!
//! - Laplace-smoothed, log-domain parameter estimation
//! - Scoring that only touches the words present in a document
//! - Numerically stable log-sum-exp normalization
//! - Streaming batch prediction into pluggable sinks
//! - Line-oriented category and word file readers

pub mod classifier;
pub mod cli;
pub mod corpus;
pub mod error;

pub mod prelude {
    pub use crate::classifier::{
        ClassifierConfig, LabelDistribution, Model, NaiveBayesClassifier, ScoreSink,
        TrainingAccuracy,
    };
    pub use crate::corpus::{
        AllDocuments, DocumentId, DocumentSet, FileSource, LabelId, LineSource, MemorySource,
        SparseDocument, WordId,
    };
    pub use crate::error::{NBayesError, Result};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
