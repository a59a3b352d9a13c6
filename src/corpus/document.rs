//! Identifier types and the sparse, presence-only document representation.

use std::collections::BTreeSet;
use std::collections::btree_set;

use serde::{Deserialize, Serialize};

use crate::corpus::record::decode_integer;
use crate::error::{NBayesError, Result};

/// Identifier of a vocabulary term.
pub type WordId = i64;

/// Identifier of a class label.
pub type LabelId = i64;

/// Identifier of a document, unique within a corpus.
pub type DocumentId = i64;

/// A document reduced to the set of words it contains.
///
/// Token weights (term counts, tf-idf scores) are dropped on construction;
/// only presence survives. Word ids iterate in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseDocument {
    words: BTreeSet<WordId>,
}

impl SparseDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a space separated `word:weight` token list.
    ///
    /// Tokens of length one or less are ignored. A token whose word id is not
    /// an integer makes the whole list malformed.
    pub fn parse(tokens: &str) -> Result<Self> {
        let mut words = BTreeSet::new();
        for token in tokens.split(' ') {
            if token.chars().count() <= 1 {
                continue;
            }
            let word = token.split(':').next().unwrap_or(token);
            let word = decode_integer(word)
                .map_err(|e| NBayesError::malformed(format!("bad token '{token}': {e}")))?;
            words.insert(word);
        }
        Ok(Self { words })
    }

    /// Add a word; returns false when it was already present.
    pub fn insert(&mut self, word: WordId) -> bool {
        self.words.insert(word)
    }

    /// Check whether a word is present.
    pub fn contains(&self, word: WordId) -> bool {
        self.words.contains(&word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over word ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = WordId> + '_ {
        self.words.iter().copied()
    }
}

impl FromIterator<WordId> for SparseDocument {
    fn from_iter<I: IntoIterator<Item = WordId>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SparseDocument {
    type Item = &'a WordId;
    type IntoIter = btree_set::Iter<'a, WordId>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}
