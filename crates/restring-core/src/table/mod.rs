//! Translation table loading
//!
//! The strings file is line-oriented: one `key:=value` pair per line, `#`
//! comments, blank lines ignored. A `!` in front of the key marks the entry
//! as allowed to spill past its original footprint when the tail behind it
//! is free. Keys and values are encoded to the target encoding at load
//! time, so the engine only ever sees raw bytes.

mod escape;

pub use escape::{escape, unescape};

use std::fs;
use std::io::Read;
use std::path::Path;

use encoding_rs::Encoding;
use tracing::warn;

use crate::error::{Error, Result};

/// One parsed `key := value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Original string bytes as they appear in the image.
    pub key: Vec<u8>,
    /// Replacement bytes, already in the target encoding.
    pub value: Vec<u8>,
    /// Whether a longer value may overwrite free space past the footprint.
    pub inplace: bool,
}

/// Ordered set of translation entries with unique keys.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: Vec<TranslationEntry>,
}

impl TranslationTable {
    /// Build a table from pre-encoded entries. Callers are expected to keep
    /// keys unique; [`TranslationTable::parse`] does this for file input.
    pub fn from_entries(entries: Vec<TranslationEntry>) -> Self {
        Self { entries }
    }

    /// Parse strings-file text, warning about and skipping bad lines.
    ///
    /// Entries keep first-seen order; a later duplicate of a key is dropped
    /// whole, in-place marker included.
    pub fn parse(text: &str, encoding: &'static Encoding) -> Self {
        let mut entries: Vec<TranslationEntry> = Vec::new();
        for raw in text.lines() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = unescape(line);
            let Some((left, right)) = line.split_once(":=") else {
                warn!("cannot parse line (no ':=' separator): {:?}", raw);
                continue;
            };
            if right.is_empty() {
                warn!("empty translation for {:?}, ignoring", left);
                continue;
            }
            if right.contains(":=") {
                warn!("ambiguous line (more than one ':='): {:?}", raw);
                continue;
            }
            let (key, inplace) = match left.strip_prefix('!') {
                Some(stripped) => (stripped, true),
                None => (left, false),
            };
            if key.is_empty() {
                warn!("empty key in line {:?}, ignoring", raw);
                continue;
            }
            let key = encode(key, encoding);
            if entries.iter().any(|e| e.key == key) {
                warn!("duplicate key in line {:?}, ignoring", raw);
                continue;
            }
            entries.push(TranslationEntry {
                key,
                value: encode(right, encoding),
                inplace,
            });
        }
        Self { entries }
    }

    /// Load a strings file from disk.
    pub fn load<P: AsRef<Path>>(path: P, encoding: &'static Encoding) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text, encoding))
    }

    /// Read a strings file from an arbitrary reader.
    pub fn from_reader<R: Read>(mut reader: R, encoding: &'static Encoding) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::parse(&text, encoding))
    }

    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Look up an encoding by WHATWG label, e.g. `"windows-1251"`.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
}

fn encode(text: &str, encoding: &'static Encoding) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        warn!(
            "some characters of {:?} are not representable in {}",
            text,
            encoding.name()
        );
    }
    bytes.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_8;

    #[test]
    fn test_parse_plain_and_inplace_entries() {
        let table = TranslationTable::parse(
            "# comment\n\nHello:=Bonjour\n!World:=Monde entier\n",
            UTF_8,
        );
        let entries = table.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, b"Hello");
        assert_eq!(entries[0].value, b"Bonjour");
        assert!(!entries[0].inplace);
        assert_eq!(entries[1].key, b"World");
        assert_eq!(entries[1].value, b"Monde entier");
        assert!(entries[1].inplace);
    }

    #[test]
    fn test_parse_unescapes_multiline_values() {
        let table = TranslationTable::parse("line\\nbreak:=left\\nright", UTF_8);
        assert_eq!(table.entries()[0].key, b"line\nbreak");
        assert_eq!(table.entries()[0].value, b"left\nright");
    }

    #[test]
    fn test_parse_escaped_hash_is_not_a_comment() {
        let table = TranslationTable::parse("\\#1:=No. 1", UTF_8);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].key, b"#1");
    }

    #[test]
    fn test_parse_strips_crlf_line_endings() {
        let table = TranslationTable::parse("Hello:=Bonjour\r\nWorld:=Monde\r\n", UTF_8);
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].value, b"Bonjour");
    }

    #[test]
    fn test_parse_keeps_escaped_trailing_cr() {
        // A raw CR at the end of the line would be taken for a CRLF
        // ending; the escaped form `escape` emits survives.
        let table = TranslationTable::parse("ends\\r:=fin\\r\n", UTF_8);
        assert_eq!(table.entries()[0].key, b"ends\r");
        assert_eq!(table.entries()[0].value, b"fin\r");
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        let text = "no separator here\n\
                    empty value:=\n\
                    ambiguous:=a:=b\n\
                    !:=value for empty key\n\
                    good:=entry\n";
        let table = TranslationTable::parse(text, UTF_8);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].key, b"good");
    }

    #[test]
    fn test_parse_keeps_first_duplicate_only() {
        let table = TranslationTable::parse("Hi:=Salut\n!Hi:=Bonjour\n", UTF_8);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].value, b"Salut");
        assert!(!table.entries()[0].inplace);
    }

    #[test]
    fn test_parse_encodes_to_target_encoding() {
        let encoding = resolve_encoding("windows-1251").unwrap();
        let table = TranslationTable::parse("Hello:=Привет", encoding);
        assert_eq!(
            table.entries()[0].value,
            [0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]
        );
    }

    #[test]
    fn test_resolve_encoding_rejects_unknown_labels() {
        assert!(resolve_encoding("windows-1251").is_ok());
        assert!(resolve_encoding("utf-8").is_ok());
        let err = resolve_encoding("no-such-charset").unwrap_err();
        assert!(matches!(err, Error::UnknownEncoding(_)));
    }

    #[test]
    fn test_load_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strings.txt");
        fs::write(&path, "Hello:=Bonjour\n").unwrap();

        let table = TranslationTable::load(&path, UTF_8).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].value, b"Bonjour");
    }
}
