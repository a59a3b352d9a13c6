//! Destinations for batch prediction output.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::corpus::{DocumentId, LabelId};
use crate::error::{NBayesError, Result};

/// Receives one value per (document, label) pair produced by a batch call.
///
/// Probability export emits one call per label of every document; hard
/// prediction export emits one call per document with value `1.0` for the
/// chosen label.
pub trait ScoreSink {
    /// Record `value` for `label` of `document`.
    fn insert_value(&mut self, value: f64, document: DocumentId, label: LabelId) -> Result<()>;

    /// Flush buffered output, if any.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: ScoreSink + ?Sized> ScoreSink for &mut S {
    fn insert_value(&mut self, value: f64, document: DocumentId, label: LabelId) -> Result<()> {
        (**self).insert_value(value, document, label)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// A single emitted value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub document: DocumentId,
    pub label: LabelId,
    pub value: f64,
}

impl ScoreSink for Vec<ScoreRecord> {
    fn insert_value(&mut self, value: f64, document: DocumentId, label: LabelId) -> Result<()> {
        self.push(ScoreRecord {
            document,
            label,
            value,
        });
        Ok(())
    }
}

impl ScoreSink for BTreeMap<(DocumentId, LabelId), f64> {
    fn insert_value(&mut self, value: f64, document: DocumentId, label: LabelId) -> Result<()> {
        self.insert((document, label), value);
        Ok(())
    }
}

/// Writes each record as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ScoreSink for JsonLinesSink<W> {
    fn insert_value(&mut self, value: f64, document: DocumentId, label: LabelId) -> Result<()> {
        let record = ScoreRecord {
            document,
            label,
            value,
        };
        serde_json::to_writer(&mut self.writer, &record)
            .map_err(|e| NBayesError::sink(format!("failed to write record: {e}")))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| NBayesError::sink(format!("failed to write record: {e}")))?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| NBayesError::sink(format!("failed to flush: {e}")))
    }
}
