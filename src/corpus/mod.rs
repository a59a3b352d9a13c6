//! Corpus input: identifiers, sparse documents, record parsers and line sources.

pub mod document;
pub mod keys;
pub mod record;
pub mod source;

pub use document::{DocumentId, LabelId, SparseDocument, WordId};
pub use keys::{AllDocuments, DocumentSet};
pub use record::{CategoryRecord, WordRecord, decode_integer};
pub use source::{FileSource, LineSource, MemorySource, SourceLines};
