//! The Bernoulli Naive Bayes classifier facade.

use std::collections::BTreeMap;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::classifier::config::ClassifierConfig;
use crate::classifier::estimator::Estimator;
use crate::classifier::model::Model;
use crate::classifier::scorer::{LabelDistribution, Scorer};
use crate::classifier::sink::ScoreSink;
use crate::classifier::statistics::{self, BuildSummary, CorpusStatistics};
use crate::corpus::{DocumentId, DocumentSet, LabelId, LineSource, SparseDocument, WordRecord};
use crate::error::{NBayesError, Result};

/// Outcome of a successful [`NaiveBayesClassifier::learn`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub labels: usize,
    pub training_documents: u64,
    pub vocabulary_size: usize,
    pub summary: BuildSummary,
    /// Fraction of training documents whose best label is their true label.
    pub training_accuracy: Option<f64>,
}

/// Learns a presence-based Naive Bayes model from labeled sparse documents
/// and scores new documents against it.
///
/// # Example
///
/// ```
/// use nbayes::classifier::{ClassifierConfig, NaiveBayesClassifier};
/// use nbayes::corpus::{AllDocuments, MemorySource, SparseDocument};
///
/// # fn main() -> nbayes::error::Result<()> {
/// let categories = MemorySource::from_lines(["1\t0", "2\t0", "3\t1"]);
/// let words = MemorySource::from_lines(["1\t10:3 11:1", "2\t10:1", "3\t12:5"]);
///
/// let mut classifier = NaiveBayesClassifier::new(ClassifierConfig::default())?;
/// classifier.learn(&AllDocuments, &categories, &words)?;
///
/// let document: SparseDocument = [10].into_iter().collect();
/// assert_eq!(classifier.predict_best(&document)?, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct NaiveBayesClassifier {
    config: ClassifierConfig,
    model: Option<Model>,
}

impl NaiveBayesClassifier {
    /// Create an untrained classifier.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            model: None,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// The trained model, if any.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Learn a model from the training documents of the given sources.
    ///
    /// Replaces any previous model. On error the classifier is left untrained.
    pub fn learn<K, C, W>(
        &mut self,
        training_keys: &K,
        categories: &C,
        words: &W,
    ) -> Result<TrainingReport>
    where
        K: DocumentSet + ?Sized,
        C: LineSource + ?Sized,
        W: LineSource + ?Sized,
    {
        self.model = None;

        let estimator = Estimator::from_config(&self.config)?;
        let statistics = statistics::build(training_keys, categories, words)?;
        let model = estimator.estimate(&statistics)?;

        let training_accuracy = if self.config.training_accuracy.is_enabled() {
            let accuracy = self.training_accuracy(&model, &statistics, words)?;
            if let Some(accuracy) = accuracy {
                debug!("Naive Bayes training accuracy: {accuracy}");
            }
            accuracy
        } else {
            None
        };

        let report = TrainingReport {
            labels: model.label_count(),
            training_documents: statistics.total_documents(),
            vocabulary_size: model.vocabulary().len(),
            summary: statistics.summary().clone(),
            training_accuracy,
        };
        info!(
            "Learned {} labels from {} documents over {} words",
            report.labels, report.training_documents, report.vocabulary_size
        );

        self.model = Some(model);
        Ok(report)
    }

    /// Second pass over the word source, predicting every training document.
    fn training_accuracy<W>(
        &self,
        model: &Model,
        statistics: &CorpusStatistics,
        words: &W,
    ) -> Result<Option<f64>>
    where
        W: LineSource + ?Sized,
    {
        let scorer = Scorer::new(model).with_prior_weight(self.config.prior_weight);
        let mut correct = 0usize;
        let mut total = 0usize;

        for_each_document(words, statistics.training_labels(), |document, words| {
            if let Some(label) = statistics.label_of(document) {
                let predicted = scorer.predict_best(words)?;
                trace!("Document {document}: predicted {predicted}, true {label}");
                if predicted == label {
                    correct += 1;
                }
                total += 1;
            }
            Ok(())
        })?;

        Ok((total > 0).then(|| correct as f64 / total as f64))
    }

    /// Drop the trained model.
    pub fn close(&mut self) {
        self.model = None;
    }

    fn scorer(&self) -> Result<Scorer<'_>> {
        let model = self.model.as_ref().ok_or_else(|| {
            NBayesError::empty_model("predict called before a successful learn")
        })?;
        Ok(Scorer::new(model).with_prior_weight(self.config.prior_weight))
    }

    /// Unnormalized per-label log-scores of a document.
    pub fn log_scores(&self, document: &SparseDocument) -> Result<Vec<(LabelId, f64)>> {
        Ok(self.scorer()?.log_scores(document))
    }

    /// Probability of every label for a document.
    pub fn predict(&self, document: &SparseDocument) -> Result<LabelDistribution> {
        Ok(self.scorer()?.score(document))
    }

    /// Most likely label for a document.
    pub fn predict_best(&self, document: &SparseDocument) -> Result<LabelId> {
        self.scorer()?.predict_best(document)
    }

    /// Score every selected document of a word source.
    pub fn predict_all<W, D>(
        &self,
        words: &W,
        documents: &D,
    ) -> Result<BTreeMap<DocumentId, LabelDistribution>>
    where
        W: LineSource + ?Sized,
        D: DocumentSet + ?Sized,
    {
        let scorer = self.scorer()?;
        let mut predictions = BTreeMap::new();

        trace!("Starting to load {} for prediction", words.name());
        for_each_document(words, documents, |document, words| {
            predictions.insert(document, scorer.score(words));
            Ok(())
        })?;
        trace!("Finished prediction on {}", words.name());

        Ok(predictions)
    }

    /// Best label of every selected document of a word source.
    pub fn predict_all_best<W, D>(
        &self,
        words: &W,
        documents: &D,
    ) -> Result<BTreeMap<DocumentId, LabelId>>
    where
        W: LineSource + ?Sized,
        D: DocumentSet + ?Sized,
    {
        let scorer = self.scorer()?;
        let mut predictions = BTreeMap::new();

        for_each_document(words, documents, |document, words| {
            predictions.insert(document, scorer.predict_best(words)?);
            Ok(())
        })?;

        Ok(predictions)
    }

    /// Send the probability of every label of every selected document to `sink`.
    ///
    /// Returns the number of documents scored.
    pub fn insert_all_probabilities<W, D, S>(
        &self,
        words: &W,
        documents: &D,
        sink: &mut S,
    ) -> Result<usize>
    where
        W: LineSource + ?Sized,
        D: DocumentSet + ?Sized,
        S: ScoreSink + ?Sized,
    {
        let scorer = self.scorer()?;

        debug!("Loading {} for Naive Bayes prediction", words.name());
        let scored = for_each_document(words, documents, |document, words| {
            for (label, probability) in scorer.score(words).iter() {
                trace!("NB predicts p={probability} for {label}");
                sink.insert_value(probability, document, label)?;
            }
            Ok(())
        })?;
        sink.flush()?;

        Ok(scored)
    }

    /// Send the best label of every selected document to `sink` with value `1.0`.
    ///
    /// Returns the number of documents scored.
    pub fn insert_all_predictions<W, D, S>(
        &self,
        words: &W,
        documents: &D,
        sink: &mut S,
    ) -> Result<usize>
    where
        W: LineSource + ?Sized,
        D: DocumentSet + ?Sized,
        S: ScoreSink + ?Sized,
    {
        let scorer = self.scorer()?;

        debug!("Loading {} for Naive Bayes prediction", words.name());
        let scored = for_each_document(words, documents, |document, words| {
            let label = scorer.predict_best(words)?;
            sink.insert_value(1.0, document, label)
        })?;
        sink.flush()?;

        Ok(scored)
    }
}

/// Stream a word source and call `f` for every well-formed line whose
/// document is selected. Returns the number of calls made.
fn for_each_document<W, D, F>(words: &W, documents: &D, mut f: F) -> Result<usize>
where
    W: LineSource + ?Sized,
    D: DocumentSet + ?Sized,
    F: FnMut(DocumentId, &SparseDocument) -> Result<()>,
{
    let mut visited = 0;
    for line in words.lines()? {
        let (line_number, line) = line?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed = WordRecord::split(&line).and_then(|(document, tokens)| {
            if documents.contains_document(document) {
                SparseDocument::parse(tokens).map(|words| Some((document, words)))
            } else {
                Ok(None)
            }
        });

        match parsed {
            Ok(Some((document, words))) => {
                f(document, &words)?;
                visited += 1;
            }
            Ok(None) => {}
            Err(e) if e.is_recoverable() => {
                trace!("Skipping {}:{}: {}", words.name(), line_number, e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(visited)
}
