//! Synset label files.
//!
//! Each line holds a synset id followed by the human-readable label, e.g.
//! `n01440764 tench, Tinca tinca`. The id is dropped and the rest of the
//! line becomes the label for the class at that line's index.

use crate::core::errors::{PredError, PredResult};
use std::path::Path;

/// Ordered class labels, indexed by class id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Reads a synset file.
    ///
    /// # Errors
    ///
    /// `PredError::FileNotFound` if the file does not exist, `PredError::Io`
    /// for any other read failure. Bytes that are not valid UTF-8 are
    /// replaced with U+FFFD.
    pub fn load(path: impl AsRef<Path>) -> PredResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| PredError::from_io(path, e))?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Parses synset text. Every line yields one entry; lines without a
    /// label yield an empty string so class ids stay aligned with lines.
    /// Whitespace after the label is kept.
    pub fn parse(content: &str) -> Self {
        let labels = content
            .lines()
            .map(|line| {
                let line = line.trim_start();
                match line.find(char::is_whitespace) {
                    Some(pos) => line[pos..].trim_start().to_string(),
                    None => String::new(),
                }
            })
            .collect();
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

impl From<Vec<String>> for LabelTable {
    fn from(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_strips_first_token() {
        let table = LabelTable::parse(
            "n01440764 tench, Tinca tinca\nn01443537 goldfish, Carassius auratus\n",
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0), Some("tench, Tinca tinca"));
        assert_eq!(table.get(1), Some("goldfish, Carassius auratus"));
        assert_eq!(table.get(2), None);
    }

    #[test]
    fn test_malformed_lines_become_empty_labels() {
        let table = LabelTable::parse("a first\nonly_token\n\nb\tsecond label\n");
        let labels: Vec<&str> = table.iter().collect();
        assert_eq!(labels, vec!["first", "", "", "second label"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let table = LabelTable::parse("0 zero\r\n1 one\r\n");
        assert_eq!(table.as_slice(), &["zero".to_string(), "one".to_string()]);
    }

    #[test]
    fn test_trailing_whitespace_kept() {
        let table = LabelTable::parse("n0 a \nn1   b\t\n");
        assert_eq!(table.get(0), Some("a "));
        assert_eq!(table.get(1), Some("b\t"));
    }

    #[test]
    fn test_load_non_utf8_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"n0 caf\xe9\nn1 b\n").unwrap();

        let table = LabelTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0), Some("caf\u{FFFD}"));
        assert_eq!(table.get(1), Some("b"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id0 cat").unwrap();
        writeln!(file, "id1 dog").unwrap();
        writeln!(file, "id2 bird").unwrap();

        let table = LabelTable::load(file.path()).unwrap();
        assert_eq!(table.iter().collect::<Vec<_>>(), vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = LabelTable::load("/nonexistent/synset.txt");
        assert!(matches!(result, Err(PredError::FileNotFound { .. })));
    }
}
