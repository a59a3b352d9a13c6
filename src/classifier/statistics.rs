//! Vocabulary and per-label statistics gathered from the training sources.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use ahash::{AHashMap, AHashSet};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::classifier::vocabulary::Vocabulary;
use crate::corpus::{
    CategoryRecord, DocumentId, DocumentSet, LabelId, LineSource, WordId, WordRecord,
};
use crate::error::Result;

/// Counters describing one statistics build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Non-blank lines read from the category source.
    pub category_lines: usize,
    /// Category lines skipped as malformed.
    pub malformed_category_lines: usize,
    /// Non-blank lines read from the word source.
    pub word_lines: usize,
    /// Word lines skipped as malformed.
    pub malformed_word_lines: usize,
    /// Word lines that belonged to a labeled training document.
    pub training_word_lines: usize,
    /// Training word lines for a document already seen on an earlier line.
    /// Their words are merged into that document.
    pub repeated_training_lines: usize,
}

/// Counts accumulated over the training corpus.
///
/// Holds everything estimation needs: the global vocabulary, the number of
/// training documents per label, and for each label how many of those
/// documents contain each word.
#[derive(Debug, Clone, Default)]
pub struct CorpusStatistics {
    vocabulary: Vocabulary,
    document_counts: BTreeMap<LabelId, u64>,
    presence_counts: BTreeMap<LabelId, AHashMap<WordId, u64>>,
    training_labels: AHashMap<DocumentId, LabelId>,
    summary: BuildSummary,
}

impl CorpusStatistics {
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Labels with at least one training document, in ascending order.
    pub fn labels(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.document_counts.keys().copied()
    }

    pub fn label_count(&self) -> usize {
        self.document_counts.len()
    }

    /// Number of training documents carrying `label`.
    pub fn document_count(&self, label: LabelId) -> u64 {
        self.document_counts.get(&label).copied().unwrap_or(0)
    }

    /// Number of training documents of `label` that contain `word`.
    pub fn presence_count(&self, label: LabelId, word: WordId) -> u64 {
        self.presence_counts
            .get(&label)
            .and_then(|counts| counts.get(&word))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of labeled training documents.
    pub fn total_documents(&self) -> u64 {
        self.document_counts.values().sum()
    }

    /// Label of a training document.
    pub fn label_of(&self, document: DocumentId) -> Option<LabelId> {
        self.training_labels.get(&document).copied()
    }

    pub fn training_labels(&self) -> &AHashMap<DocumentId, LabelId> {
        &self.training_labels
    }

    pub fn summary(&self) -> &BuildSummary {
        &self.summary
    }
}

/// Build corpus statistics from a category source and a word source.
///
/// Only documents in `training_keys` that also appear in the category source
/// are counted. Every word of the word source, training or not, enters the
/// vocabulary. Malformed lines are skipped; a source that cannot be read
/// aborts the build.
pub fn build<K, C, W>(training_keys: &K, categories: &C, words: &W) -> Result<CorpusStatistics>
where
    K: DocumentSet + ?Sized,
    C: LineSource + ?Sized,
    W: LineSource + ?Sized,
{
    let mut summary = BuildSummary::default();

    debug!("Reading categories from {}", categories.name());
    let mut training_labels: AHashMap<DocumentId, LabelId> = AHashMap::new();
    for line in categories.lines()? {
        let (line_number, line) = line?;
        if line.trim().is_empty() {
            continue;
        }
        summary.category_lines += 1;

        match CategoryRecord::parse(&line) {
            Ok(record) => {
                if training_keys.contains_document(record.document) {
                    if let Some(previous) = training_labels.insert(record.document, record.label)
                    {
                        if previous != record.label {
                            warn!(
                                "Document {} relabeled from {} to {} at {}:{}",
                                record.document,
                                previous,
                                record.label,
                                categories.name(),
                                line_number
                            );
                        }
                    }
                }
            }
            Err(e) if e.is_recoverable() => {
                trace!("Skipping {}:{}: {}", categories.name(), line_number, e);
                summary.malformed_category_lines += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let mut document_counts: BTreeMap<LabelId, u64> = BTreeMap::new();
    for label in training_labels.values() {
        *document_counts.entry(*label).or_insert(0) += 1;
    }
    debug!(
        "{} training documents across {} labels",
        training_labels.len(),
        document_counts.len()
    );

    debug!("Starting word counts from {}", words.name());
    let mut vocabulary: BTreeSet<WordId> = BTreeSet::new();
    let mut presence_counts: BTreeMap<LabelId, AHashMap<WordId, u64>> = document_counts
        .keys()
        .map(|label| (*label, AHashMap::new()))
        .collect();
    let mut counted_words: AHashMap<DocumentId, AHashSet<WordId>> = AHashMap::new();

    for line in words.lines()? {
        let (line_number, line) = line?;
        if line.trim().is_empty() {
            continue;
        }
        summary.word_lines += 1;

        let record = match WordRecord::parse(&line) {
            Ok(record) => record,
            Err(e) if e.is_recoverable() => {
                trace!("Skipping {}:{}: {}", words.name(), line_number, e);
                summary.malformed_word_lines += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let counts = training_labels
            .get(&record.document)
            .and_then(|label| presence_counts.get_mut(label));
        match counts {
            Some(counts) => {
                summary.training_word_lines += 1;
                let seen = match counted_words.entry(record.document) {
                    Entry::Occupied(entry) => {
                        summary.repeated_training_lines += 1;
                        warn!(
                            "Document {} repeated at {}:{}, merging its words",
                            record.document,
                            words.name(),
                            line_number
                        );
                        entry.into_mut()
                    }
                    Entry::Vacant(entry) => entry.insert(AHashSet::new()),
                };
                for word in record.words.iter() {
                    // Presence is counted once per document, not per line.
                    if seen.insert(word) {
                        *counts.entry(word).or_insert(0) += 1;
                    }
                    vocabulary.insert(word);
                }
            }
            None => vocabulary.extend(record.words.iter()),
        }
    }
    debug!("Finished word counts: {} distinct words", vocabulary.len());

    if summary.malformed_category_lines + summary.malformed_word_lines > 0 {
        warn!(
            "Skipped {} malformed category lines and {} malformed word lines",
            summary.malformed_category_lines, summary.malformed_word_lines
        );
    }

    Ok(CorpusStatistics {
        vocabulary: Vocabulary::from_words(vocabulary),
        document_counts,
        presence_counts,
        training_labels,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{AllDocuments, FileSource, MemorySource};
    use crate::error::NBayesError;
    use ahash::AHashSet;

    fn categories() -> MemorySource {
        MemorySource::from_lines(["1\t100", "2\t100", "3\t200"])
    }

    fn words() -> MemorySource {
        MemorySource::from_lines(["1\t10:3 11:1", "2\t10:1", "3\t12:5"])
    }

    #[test]
    fn test_build_counts() {
        let keys: AHashSet<DocumentId> = [1, 2, 3].into_iter().collect();
        let stats = build(&keys, &categories(), &words()).unwrap();

        assert_eq!(stats.vocabulary().words(), &[10, 11, 12]);
        assert_eq!(stats.labels().collect::<Vec<_>>(), vec![100, 200]);
        assert_eq!(stats.total_documents(), 3);

        assert_eq!(stats.document_count(100), 2);
        assert_eq!(stats.presence_count(100, 10), 2);
        assert_eq!(stats.presence_count(100, 11), 1);
        assert_eq!(stats.presence_count(100, 12), 0);

        assert_eq!(stats.document_count(200), 1);
        assert_eq!(stats.presence_count(200, 12), 1);
        assert_eq!(stats.presence_count(200, 10), 0);
    }

    #[test]
    fn test_non_training_words_enter_vocabulary_only() {
        let keys: AHashSet<DocumentId> = [1, 2].into_iter().collect();
        let stats = build(&keys, &categories(), &words()).unwrap();

        // Document 3 is not a training document, but its word still counts
        // towards the vocabulary.
        assert_eq!(stats.vocabulary().words(), &[10, 11, 12]);
        assert_eq!(stats.labels().collect::<Vec<_>>(), vec![100]);
        assert_eq!(stats.document_count(200), 0);
        assert_eq!(stats.label_of(3), None);
        assert_eq!(stats.summary().training_word_lines, 2);
    }

    #[test]
    fn test_repeated_tokens_count_once() {
        let words = MemorySource::from_lines(["1\t10:1 10:2 10:3", "2\t10:1"]);
        let stats = build(&AllDocuments, &categories(), &words).unwrap();
        assert_eq!(stats.presence_count(100, 10), 2);
    }

    #[test]
    fn test_repeated_document_lines_count_once() {
        let categories = MemorySource::from_lines(["1\t100", "2\t200"]);
        let words = MemorySource::from_lines(["1\t10:1", "1\t10:1", "1\t10:1 11:2", "2\t11:1"]);
        let stats = build(&AllDocuments, &categories, &words).unwrap();

        assert_eq!(stats.document_count(100), 1);
        assert_eq!(stats.presence_count(100, 10), 1);
        assert_eq!(stats.presence_count(100, 11), 1);
        assert_eq!(stats.summary().training_word_lines, 4);
        assert_eq!(stats.summary().repeated_training_lines, 2);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let categories = MemorySource::from_lines([
            "1\t100",
            "garbage",
            "2\tsports",
            "3\t200\textra",
            "",
            "4\t200",
        ]);
        let words = MemorySource::from_lines(["1\t10:1", "no tab here", "4\tbad:1", "4\t12:1"]);
        let stats = build(&AllDocuments, &categories, &words).unwrap();

        assert_eq!(stats.summary().category_lines, 5);
        assert_eq!(stats.summary().malformed_category_lines, 3);
        assert_eq!(stats.summary().word_lines, 4);
        assert_eq!(stats.summary().malformed_word_lines, 2);

        assert_eq!(stats.total_documents(), 2);
        assert_eq!(stats.vocabulary().words(), &[10, 12]);
        assert_eq!(stats.presence_count(200, 12), 1);
    }

    #[test]
    fn test_relabeled_document_counts_once() {
        let categories = MemorySource::from_lines(["1\t100", "1\t200"]);
        let words = MemorySource::from_lines(["1\t10:1"]);
        let stats = build(&AllDocuments, &categories, &words).unwrap();

        assert_eq!(stats.total_documents(), 1);
        assert_eq!(stats.label_of(1), Some(200));
        assert_eq!(stats.presence_count(200, 10), 1);
        assert_eq!(stats.presence_count(100, 10), 0);
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = FileSource::new(dir.path().join("words.txt"));

        let result = build(&AllDocuments, &categories(), &missing);
        assert!(matches!(
            result,
            Err(NBayesError::SourceUnavailable { .. })
        ));
    }
}
