//! Document id filters used to select training and prediction documents.

use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;
use std::ops::RangeInclusive;

use ahash::{AHashMap, AHashSet};

use crate::corpus::document::{DocumentId, LabelId};

/// A set of document ids that can be queried for membership.
pub trait DocumentSet {
    fn contains_document(&self, document: DocumentId) -> bool;
}

impl<S: BuildHasher> DocumentSet for HashSet<DocumentId, S> {
    fn contains_document(&self, document: DocumentId) -> bool {
        self.contains(&document)
    }
}

impl DocumentSet for AHashSet<DocumentId> {
    fn contains_document(&self, document: DocumentId) -> bool {
        self.contains(&document)
    }
}

/// A document-to-label map selects its labeled documents.
impl DocumentSet for AHashMap<DocumentId, LabelId> {
    fn contains_document(&self, document: DocumentId) -> bool {
        self.contains_key(&document)
    }
}

impl DocumentSet for BTreeSet<DocumentId> {
    fn contains_document(&self, document: DocumentId) -> bool {
        self.contains(&document)
    }
}

impl DocumentSet for RangeInclusive<DocumentId> {
    fn contains_document(&self, document: DocumentId) -> bool {
        self.contains(&document)
    }
}

impl<T: DocumentSet + ?Sized> DocumentSet for &T {
    fn contains_document(&self, document: DocumentId) -> bool {
        (**self).contains_document(document)
    }
}

/// Accepts every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllDocuments;

impl DocumentSet for AllDocuments {
    fn contains_document(&self, _document: DocumentId) -> bool {
        true
    }
}
