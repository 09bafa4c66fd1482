// File: src/core/session.rs
use crate::core::types::{RootGroup, WordEntry};
use serde::{Deserialize, Serialize};

/// Everything the drill remembers between runs.
///
/// Stored as one flat camelCase JSON object. `current_word_index` is `None`
/// before any word of the current group has been selected and is written as
/// `-1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub dark_mode: bool,
    pub groups: Vec<RootGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    pub current_group_index: usize,
    #[serde(with = "word_index")]
    pub current_word_index: Option<usize>,
    pub mask_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            dark_mode: false,
            groups: Vec::new(),
            source_hash: None,
            current_group_index: 0,
            current_word_index: Some(0),
            mask_enabled: false,
        }
    }
}

/// A persisted record as read back from the store. Any key may be missing;
/// keys this version does not know about are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialSession {
    pub dark_mode: Option<bool>,
    pub groups: Option<Vec<RootGroup>>,
    pub source_hash: Option<String>,
    pub current_group_index: Option<usize>,
    pub current_word_index: Option<i64>,
    pub mask_enabled: Option<bool>,
}

impl Session {
    /// Merges a loaded record onto the defaults. Indices are not checked here,
    /// see [`Session::normalize`].
    pub fn from_partial(partial: PartialSession) -> Self {
        let defaults = Self::default();
        Self {
            dark_mode: partial.dark_mode.unwrap_or(defaults.dark_mode),
            groups: partial.groups.unwrap_or(defaults.groups),
            source_hash: partial.source_hash,
            current_group_index: partial.current_group_index.unwrap_or(defaults.current_group_index),
            current_word_index: partial
                .current_word_index
                .map_or(defaults.current_word_index, word_index::from_raw),
            mask_enabled: partial.mask_enabled.unwrap_or(defaults.mask_enabled),
        }
    }

    /// Pulls the indices back into range after the group list changed under
    /// them (a reparse, or a hand-edited record).
    pub fn normalize(&mut self) {
        if self.groups.is_empty() {
            self.current_group_index = 0;
            self.current_word_index = None;
            return;
        }
        self.current_group_index = self.current_group_index.min(self.groups.len() - 1);
        let entries = self.groups[self.current_group_index].entries.len();
        if self.current_word_index.is_some_and(|i| i >= entries) {
            self.current_word_index = None;
        }
    }

    pub fn current_group(&self) -> Option<&RootGroup> {
        self.groups.get(self.current_group_index)
    }

    /// Entry count of the current group, zero when there is none.
    pub fn current_group_len(&self) -> usize {
        self.current_group().map_or(0, |g| g.entries.len())
    }

    /// The row effects act on: the selected word, or the first one when
    /// nothing is selected yet.
    pub fn effective_word_index(&self) -> usize {
        self.current_word_index.unwrap_or(0)
    }

    pub fn current_entry(&self) -> Option<&WordEntry> {
        self.current_group()?.entries.get(self.effective_word_index())
    }
}

mod word_index {
    use serde::{Deserialize, Deserializer, Serializer};

    const UNSELECTED: i64 = -1;

    pub fn from_raw(raw: i64) -> Option<usize> {
        usize::try_from(raw).ok()
    }

    pub fn serialize<S: Serializer>(index: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        match index {
            Some(i) => serializer.serialize_u64(*i as u64),
            None => serializer.serialize_i64(UNSELECTED),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        i64::deserialize(deserializer).map(from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ingest::parse_groups;

    fn session_with(counts: &[usize]) -> Session {
        let mut text = String::new();
        for (g, count) in counts.iter().enumerate() {
            text.push_str(&format!("root{g}|group {g}\n"));
            for w in 0..*count {
                text.push_str(&format!("w{g}_{w},p,d\n"));
            }
        }
        Session {
            groups: parse_groups(&text),
            ..Session::default()
        }
    }

    #[test]
    fn test_defaults_for_empty_record() {
        let session = Session::from_partial(PartialSession::default());
        assert_eq!(session, Session::default());
        assert_eq!(session.current_word_index, Some(0));
        assert!(session.source_hash.is_none());
    }

    #[test]
    fn test_partial_record_merges_and_ignores_unknown_keys() {
        let partial: PartialSession = serde_json::from_str(
            r#"{"darkMode":true,"currentWordIndex":-1,"wordMask":true,"dataMd5":"x"}"#,
        )
        .unwrap();
        let session = Session::from_partial(partial);
        assert!(session.dark_mode);
        assert_eq!(session.current_word_index, None);
        assert!(!session.mask_enabled);
        assert_eq!(session.current_group_index, 0);
    }

    #[test]
    fn test_serialized_layout_is_flat_camel_case() {
        let mut session = session_with(&[1]);
        session.current_word_index = None;
        session.source_hash = Some("abc".into());
        let value = serde_json::to_value(&session).unwrap();

        assert_eq!(value["currentWordIndex"], -1);
        assert_eq!(value["sourceHash"], "abc");
        assert_eq!(value["maskEnabled"], false);
        assert_eq!(value["groups"][0]["header"], "root0|group 0");
        assert_eq!(value["groups"][0]["entries"][0][0], "w0_0");

        let back: Session = serde_json::from_value(value).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_normalize_clamps_stale_indices() {
        let mut session = session_with(&[3, 2]);
        session.current_group_index = 7;
        session.current_word_index = Some(4);
        session.normalize();
        assert_eq!(session.current_group_index, 1);
        assert_eq!(session.current_word_index, None);

        let mut empty = Session {
            current_group_index: 3,
            ..Session::default()
        };
        empty.normalize();
        assert_eq!(empty.current_group_index, 0);
        assert_eq!(empty.current_word_index, None);
        assert!(empty.current_entry().is_none());
    }

    #[test]
    fn test_effective_word_falls_back_to_first() {
        let mut session = session_with(&[2]);
        session.current_word_index = None;
        assert_eq!(session.current_entry().unwrap().headword(), "w0_0");
        session.current_word_index = Some(1);
        assert_eq!(session.current_entry().unwrap().headword(), "w0_1");
    }
}
