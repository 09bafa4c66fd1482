// File: src/core/ingest.rs
use crate::core::pattern;
use crate::core::types::{pattern_segment, RootGroup, WordEntry, HEADER_DELIMITER};
use crate::persistence::content_hash;
use std::collections::HashMap;

/// Result of running the ingestor over a fetched word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingested {
    pub groups: Vec<RootGroup>,
    /// Content hash of the source text that `groups` corresponds to.
    pub hash: String,
    /// False when the cached groups were handed back untouched.
    pub reparsed: bool,
}

/// Turns raw word-list text into root groups, reusing `cached_groups` when
/// `cached_hash` matches the text's content hash.
pub fn ingest(
    source: &str,
    cached_hash: Option<&str>,
    cached_groups: Option<Vec<RootGroup>>,
) -> Ingested {
    let hash = content_hash(source);

    if let (Some(cached), Some(groups)) = (cached_hash, cached_groups) {
        if cached == hash {
            tracing::info!(groups = groups.len(), "Word list unchanged, reusing cached groups");
            return Ingested { groups, hash, reparsed: false };
        }
    }

    let groups = parse_groups(source);
    tracing::info!(
        groups = groups.len(),
        entries = groups.iter().map(|g| g.entries.len()).sum::<usize>(),
        "Parsed word list"
    );
    Ingested { groups, hash, reparsed: true }
}

/// Parses the line grammar: header lines contain `|`, every other non-empty
/// line is a data line belonging to the latest header.
///
/// Data lines before the first header have no group and are dropped. A header
/// line that repeats an earlier one restarts that group in its original slot.
pub fn parse_groups(source: &str) -> Vec<RootGroup> {
    let mut groups: Vec<RootGroup> = Vec::new();
    let mut slot_by_header: HashMap<&str, usize> = HashMap::new();
    let mut current: Option<usize> = None;
    let mut orphaned = 0usize;

    for line in source.lines() {
        if line.is_empty() {
            continue;
        }

        if line.contains(HEADER_DELIMITER) {
            let slot = match slot_by_header.get(line) {
                Some(&slot) => {
                    tracing::warn!(header = line, "Repeated header restarts its group");
                    groups[slot].entries.clear();
                    slot
                }
                None => {
                    groups.push(new_group(line));
                    slot_by_header.insert(line, groups.len() - 1);
                    groups.len() - 1
                }
            };
            current = Some(slot);
        } else if let Some(slot) = current {
            groups[slot].entries.push(WordEntry::from_line(line));
        } else {
            orphaned += 1;
        }
    }

    if orphaned > 0 {
        tracing::warn!(lines = orphaned, "Dropped data lines preceding the first header");
    }
    groups
}

fn new_group(header: &str) -> RootGroup {
    let segment = pattern_segment(header);
    if !pattern::is_balanced(segment) {
        tracing::warn!(header, "Header pattern has unbalanced parentheses");
    }
    RootGroup {
        header: header.to_string(),
        base_words: pattern::expand_all(segment),
        entries: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "r1|desc\na,1,x\nb,2,y\nr2|d2\nc,3,z";

    #[test]
    fn test_groups_follow_headers() {
        let groups = parse_groups(SAMPLE);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].header, "r1|desc");
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[1].header, "r2|d2");
        assert_eq!(groups[1].entries.len(), 1);
        assert_eq!(groups[1].entries[0].fields, vec!["c", "3", "z"]);
    }

    #[test]
    fn test_leading_data_lines_are_dropped() {
        let groups = parse_groups("orphan,0,nothing\n\nr1|desc\na,1,x\n");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].headwords(), vec!["a"]);
    }

    #[test]
    fn test_blank_lines_and_crlf_are_skipped() {
        let groups = parse_groups("r1|desc\r\n\r\na,1,x\r\n\nb\r\n");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].entries[0].definition(), "x");
        assert_eq!(groups[0].entries[1].phonetic(), "");
    }

    #[test]
    fn test_base_words_come_from_expanded_patterns() {
        let groups = parse_groups("spec(t),spic|to look\nspectator,,\n");
        let bases: Vec<&str> = groups[0].base_words.iter().map(String::as_str).collect();
        assert_eq!(bases, vec!["spec", "spect", "spic"]);
        assert_eq!(groups[0].display_header(), "spec(t),spic to look");
    }

    #[test]
    fn test_repeated_header_restarts_group_in_place() {
        let groups = parse_groups("a|1\nx\nb|2\ny\na|1\nz\n");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].header, "a|1");
        assert_eq!(groups[0].headwords(), vec!["z"]);
        assert_eq!(groups[1].headwords(), vec!["y"]);
    }

    #[test]
    fn test_matching_hash_returns_cached_groups() {
        let hash = content_hash(SAMPLE);
        let sentinel = vec![RootGroup {
            header: "sentinel|never parsed".into(),
            base_words: Default::default(),
            entries: Vec::new(),
        }];

        let ingested = ingest(SAMPLE, Some(&hash), Some(sentinel.clone()));
        assert!(!ingested.reparsed);
        assert_eq!(ingested.groups, sentinel);
        assert_eq!(ingested.hash, hash);
    }

    #[test]
    fn test_changed_text_forces_reparse() {
        let old_hash = content_hash(SAMPLE);
        let stale = parse_groups(SAMPLE);
        let changed = format!("{SAMPLE}\nr3|d3\nd,4,w");

        let ingested = ingest(&changed, Some(&old_hash), Some(stale));
        assert!(ingested.reparsed);
        assert_ne!(ingested.hash, old_hash);
        assert_eq!(ingested.groups.len(), 3);
    }

    #[test]
    fn test_missing_cache_parses() {
        let hash = content_hash(SAMPLE);
        let ingested = ingest(SAMPLE, Some(&hash), None);
        assert!(ingested.reparsed);
        assert_eq!(ingested.groups.len(), 2);
    }
}
