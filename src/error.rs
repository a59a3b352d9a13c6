//! Error types for the nbayes library.
//!
//! All errors are represented by the [`NBayesError`] enum. Some of them are
//! recoverable by design: a [`NBayesError::MalformedRecord`] coming out of a
//! record parser means "skip this line", while everything else aborts the
//! call that produced it.
//!
//! # Examples
//!
//! ```
//! use nbayes::error::{NBayesError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(NBayesError::invalid_config("prior must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for nbayes operations.
#[derive(Error, Debug)]
pub enum NBayesError {
    /// I/O errors not tied to a named source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A category or word line could not be parsed.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A category or word source could not be opened or read.
    #[error("Source unavailable: {source_name}: {error}")]
    SourceUnavailable {
        /// Human readable name of the source (usually a path).
        source_name: String,
        /// The underlying I/O failure.
        #[source]
        error: io::Error,
    },

    /// Prediction was requested before any model was learned.
    #[error("Empty model: {0}")]
    EmptyModel(String),

    /// Estimation was requested without any labeled training document.
    #[error("Insufficient training data: {0}")]
    InsufficientTrainingData(String),

    /// Invalid classifier configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A score sink rejected a value.
    #[error("Sink error: {0}")]
    Sink(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with NBayesError.
pub type Result<T> = std::result::Result<T, NBayesError>;

impl NBayesError {
    /// Create a new malformed record error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        NBayesError::MalformedRecord(msg.into())
    }

    /// Create a new source unavailable error.
    pub fn source_unavailable<S: Into<String>>(source_name: S, error: io::Error) -> Self {
        NBayesError::SourceUnavailable {
            source_name: source_name.into(),
            error,
        }
    }

    /// Create a new empty model error.
    pub fn empty_model<S: Into<String>>(msg: S) -> Self {
        NBayesError::EmptyModel(msg.into())
    }

    /// Create a new insufficient training data error.
    pub fn insufficient_data<S: Into<String>>(msg: S) -> Self {
        NBayesError::InsufficientTrainingData(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        NBayesError::InvalidConfig(msg.into())
    }

    /// Create a new sink error.
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        NBayesError::Sink(msg.into())
    }

    /// Whether a streaming reader may skip the offending line and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NBayesError::MalformedRecord(_))
    }
}
