//! Frozen vocabulary with a dense word index.

use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::corpus::WordId;

/// The set of word ids observed in the word source during training.
///
/// Words are stored in ascending order; `index_of` maps a word to its
/// position, which is also its position in every label's log-odds table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<WordId>,
    index: AHashMap<WordId, usize>,
}

impl Vocabulary {
    /// Freeze a set of words into a vocabulary.
    pub fn from_words(words: BTreeSet<WordId>) -> Self {
        let words: Vec<WordId> = words.into_iter().collect();
        let index = words
            .iter()
            .enumerate()
            .map(|(idx, &word)| (word, idx))
            .collect();
        Self { words, index }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: WordId) -> bool {
        self.index.contains_key(&word)
    }

    /// Position of a word, or `None` when it is out of vocabulary.
    pub fn index_of(&self, word: WordId) -> Option<usize> {
        self.index.get(&word).copied()
    }

    /// All words in ascending order.
    pub fn words(&self) -> &[WordId] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item = WordId> + '_ {
        self.words.iter().copied()
    }
}

impl FromIterator<WordId> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = WordId>>(iter: I) -> Self {
        Self::from_words(iter.into_iter().collect())
    }
}
