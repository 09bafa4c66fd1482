// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Field separator for both data lines and the pattern list of a header.
pub const FIELD_DELIMITER: char = ',';
/// A line containing this character introduces a new root group.
pub const HEADER_DELIMITER: char = '|';

/// One data line of the word list, split into its fields.
/// Field 0 is the headword, field 1 the phonetic annotation, field 2 the
/// definition. Short lines are kept as-is; extra fields are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordEntry {
    pub fields: Vec<String>,
}

impl WordEntry {
    pub fn from_line(line: &str) -> Self {
        Self {
            fields: line.split(FIELD_DELIMITER).map(str::to_string).collect(),
        }
    }

    fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn headword(&self) -> &str {
        self.field(0)
    }

    pub fn phonetic(&self) -> &str {
        self.field(1)
    }

    pub fn definition(&self) -> &str {
        self.field(2)
    }
}

/// A block of entries sharing one header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootGroup {
    /// The raw header line, `<patterns>|<description>`.
    pub header: String,
    /// Every literal form produced by expanding the header's patterns.
    pub base_words: BTreeSet<String>,
    pub entries: Vec<WordEntry>,
}

impl RootGroup {
    /// Header as shown to the user: the first `|` becomes a space.
    pub fn display_header(&self) -> String {
        self.header.replacen(HEADER_DELIMITER, " ", 1)
    }

    /// Headwords in entry order, duplicates included.
    pub fn headwords(&self) -> Vec<&str> {
        self.entries.iter().map(WordEntry::headword).collect()
    }
}

/// The part of a header line before the first `|`.
pub(crate) fn pattern_segment(header: &str) -> &str {
    header
        .split_once(HEADER_DELIMITER)
        .map(|(patterns, _)| patterns)
        .unwrap_or(header)
}
