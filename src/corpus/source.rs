//! Line-oriented input sources.
//!
//! Training streams the word source more than once (once for counting, once
//! more for the optional training-accuracy check), so a [`LineSource`] hands
//! out a fresh reader on every call to [`LineSource::open`] instead of being a
//! reader itself.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use crate::error::{NBayesError, Result};

/// A re-openable source of text lines.
pub trait LineSource {
    /// Name used in log messages and errors.
    fn name(&self) -> String;

    /// Open a new buffered reader positioned at the first line.
    fn open(&self) -> Result<Box<dyn BufRead + '_>>;

    /// Open the source and iterate over its lines.
    fn lines(&self) -> Result<SourceLines<'_>> {
        Ok(SourceLines {
            reader: self.open()?,
            name: self.name(),
            line_number: 0,
            buffer: String::new(),
        })
    }
}

impl<S: LineSource + ?Sized> LineSource for &S {
    fn name(&self) -> String {
        (**self).name()
    }

    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        (**self).open()
    }
}

/// Iterator over the lines of a [`LineSource`].
///
/// Yields `(line_number, line)` pairs with line numbers starting at 1 and the
/// line terminator removed. Read failures surface once as
/// [`NBayesError::SourceUnavailable`] and end the iteration.
pub struct SourceLines<'a> {
    reader: Box<dyn BufRead + 'a>,
    name: String,
    line_number: usize,
    buffer: String,
}

impl std::fmt::Debug for SourceLines<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceLines")
            .field("name", &self.name)
            .field("line_number", &self.line_number)
            .finish()
    }
}

impl Iterator for SourceLines<'_> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None, // EOF
            Ok(_) => {
                self.line_number += 1;
                let line = self.buffer.trim_end_matches(['\n', '\r']);
                Some(Ok((self.line_number, line.to_string())))
            }
            Err(e) => {
                // Stop after the first failure.
                self.reader = Box::new(Cursor::new(Vec::new()));
                Some(Err(NBayesError::source_unavailable(self.name.clone(), e)))
            }
        }
    }
}

/// A source backed by a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        let file = File::open(&self.path)
            .map_err(|e| NBayesError::source_unavailable(self.name(), e))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A source backed by an in-memory string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource {
    name: String,
    text: String,
}

impl MemorySource {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            name: "<memory>".to_string(),
            text: text.into(),
        }
    }

    /// Build a source from individual lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for line in lines {
            text.push_str(line.as_ref());
            text.push('\n');
        }
        Self::new(text)
    }

    /// Set the name reported in logs and errors.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }
}

impl LineSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn open(&self) -> Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(Cursor::new(self.text.as_bytes())))
    }
}
