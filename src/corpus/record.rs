//! Parsers for single lines of the category and word sources.
//!
//! Category lines look like `<document>\t<label>`, word lines like
//! `<document>\t<word>:<weight> <word>:<weight> ...`. Every parse failure is a
//! [`NBayesError::MalformedRecord`], which streaming callers skip.

use crate::corpus::document::{DocumentId, LabelId, SparseDocument};
use crate::error::{NBayesError, Result};

/// Decode a signed integer literal.
///
/// Accepts an optional sign followed by a decimal number, a hexadecimal number
/// prefixed with `0x`, `0X` or `#`, or an octal number with a leading `0`.
pub fn decode_integer(text: &str) -> Result<i64> {
    let text = text.trim();
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = if let Some(rest) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
        .or_else(|| body.strip_prefix('#'))
    {
        (16, rest)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };

    // from_str_radix would accept a second sign
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(NBayesError::malformed(format!("not an integer: '{text}'")));
    }

    // Re-attach the sign so that i64::MIN still parses.
    let parsed = if negative {
        i64::from_str_radix(&format!("-{digits}"), radix)
    } else {
        i64::from_str_radix(digits, radix)
    };
    parsed.map_err(|e| NBayesError::malformed(format!("not an integer: '{text}': {e}")))
}

/// One line of the category source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRecord {
    pub document: DocumentId,
    pub label: LabelId,
}

impl CategoryRecord {
    /// Parse a `<document>\t<label>` line.
    pub fn parse(line: &str) -> Result<Self> {
        let mut fields: Vec<&str> = line.split('\t').collect();
        while fields.last().is_some_and(|field| field.is_empty()) {
            fields.pop();
        }
        if fields.len() != 2 {
            return Err(NBayesError::malformed(format!(
                "expected 2 tab separated fields, found {}",
                fields.len()
            )));
        }

        Ok(Self {
            document: decode_integer(fields[0])?,
            label: decode_integer(fields[1])?,
        })
    }
}

/// One line of the word source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub document: DocumentId,
    pub words: SparseDocument,
}

impl WordRecord {
    /// Parse a full word line.
    pub fn parse(line: &str) -> Result<Self> {
        let (document, tokens) = Self::split(line)?;
        Ok(Self {
            document,
            words: SparseDocument::parse(tokens)?,
        })
    }

    /// Split a word line into its document id and the raw token list.
    ///
    /// Lets batch readers filter on the document id before paying for token
    /// parsing. Fields after the second tab are ignored.
    pub fn split(line: &str) -> Result<(DocumentId, &str)> {
        let mut fields = line.split('\t');
        let document = fields.next().unwrap_or_default();
        let tokens = fields
            .next()
            .ok_or_else(|| NBayesError::malformed("word line has no tab separator"))?;
        Ok((decode_integer(document)?, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integer_forms() {
        assert_eq!(decode_integer("42").unwrap(), 42);
        assert_eq!(decode_integer("-42").unwrap(), -42);
        assert_eq!(decode_integer("+7").unwrap(), 7);
        assert_eq!(decode_integer("0").unwrap(), 0);
        assert_eq!(decode_integer("0x1F").unwrap(), 31);
        assert_eq!(decode_integer("0X1f").unwrap(), 31);
        assert_eq!(decode_integer("#10").unwrap(), 16);
        assert_eq!(decode_integer("010").unwrap(), 8);
        assert_eq!(decode_integer("-0x10").unwrap(), -16);
        assert_eq!(decode_integer("-9223372036854775808").unwrap(), i64::MIN);
    }

    #[test]
    fn test_decode_integer_rejects_garbage() {
        for bad in ["", "-", "abc", "1.5", "0x", "--1", "+-1", "09", "0x-1"] {
            assert!(decode_integer(bad).is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn test_category_record() {
        let record = CategoryRecord::parse("12\t3").unwrap();
        assert_eq!(record.document, 12);
        assert_eq!(record.label, 3);

        // Trailing empty fields do not count.
        assert!(CategoryRecord::parse("12\t3\t").is_ok());
    }

    #[test]
    fn test_category_record_wrong_token_count() {
        assert!(CategoryRecord::parse("12").is_err());
        assert!(CategoryRecord::parse("12\t3\t4").is_err());
        assert!(CategoryRecord::parse("12\tsports").is_err());
    }

    #[test]
    fn test_word_record() {
        let record = WordRecord::parse("1\t10:3 11:1").unwrap();
        assert_eq!(record.document, 1);
        assert_eq!(record.words.iter().collect::<Vec<_>>(), vec![10, 11]);
    }

    #[test]
    fn test_word_record_empty_document() {
        let record = WordRecord::parse("9\t").unwrap();
        assert_eq!(record.document, 9);
        assert!(record.words.is_empty());
    }

    #[test]
    fn test_word_record_malformed() {
        assert!(WordRecord::parse("9").is_err());
        assert!(WordRecord::parse("nine\t1:1").is_err());
        assert!(WordRecord::parse("9\t1:1 x2:1").is_err());
    }

    #[test]
    fn test_split_leaves_tokens_unparsed() {
        let (document, tokens) = WordRecord::split("5\tgarbage here").unwrap();
        assert_eq!(document, 5);
        assert_eq!(tokens, "garbage here");
    }
}
