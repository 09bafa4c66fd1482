// File: src/core/highlight.rs
//! Layered highlighting of a headword.
//!
//! Two passes run over the same text. The sibling pass marks other headwords
//! of the group, the base pass then marks the group's base forms, reaching
//! into sibling spans as well. Within one pass candidates are tried longest
//! first, and a range claimed by a candidate is never touched again by a
//! shorter candidate of the same pass.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightTag {
    Sibling,
    Base,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightNode {
    Text(String),
    Span {
        tag: HighlightTag,
        /// The matched candidate, equal to the concatenation of `children`.
        text: String,
        children: Vec<HighlightNode>,
    },
}

impl HighlightNode {
    fn span(tag: HighlightTag, text: &str) -> Self {
        Self::Span {
            tag,
            text: text.to_string(),
            children: vec![Self::Text(text.to_string())],
        }
    }

    fn push_leaves(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Span { children, .. } => {
                for child in children {
                    child.push_leaves(out);
                }
            }
        }
    }
}

/// Highlights `target` against the headwords of its group and the group's
/// base words. `target` itself is never a sibling candidate.
///
/// The returned fragments, read leaf by leaf, spell `target` exactly.
pub fn highlight(
    target: &str,
    siblings: &[&str],
    base_words: &BTreeSet<String>,
) -> Vec<HighlightNode> {
    let sibling_candidates =
        by_descending_length(siblings.iter().copied().filter(|w| *w != target));
    // Set order is lexical, so equal-length base words are tried alphabetically
    // rather than in header order.
    let base_candidates = by_descending_length(base_words.iter().map(String::as_str));

    let nodes = vec![HighlightNode::Text(target.to_string())];
    let nodes = apply_pass(nodes, &sibling_candidates, HighlightTag::Sibling);
    apply_pass(nodes, &base_candidates, HighlightTag::Base)
}

/// Distinct non-empty candidates, longest first. The sort is stable so equal
/// lengths keep their first-seen order.
fn by_descending_length<'a>(words: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut candidates: Vec<&str> = Vec::new();
    for word in words {
        if !word.is_empty() && !candidates.contains(&word) {
            candidates.push(word);
        }
    }
    candidates.sort_by_key(|w| Reverse(w.chars().count()));
    candidates
}

fn apply_pass(
    mut nodes: Vec<HighlightNode>,
    candidates: &[&str],
    tag: HighlightTag,
) -> Vec<HighlightNode> {
    for candidate in candidates {
        nodes = nodes
            .into_iter()
            .flat_map(|node| mark(node, candidate, tag))
            .collect();
    }
    nodes
}

fn mark(node: HighlightNode, candidate: &str, tag: HighlightTag) -> Vec<HighlightNode> {
    match node {
        HighlightNode::Text(text) => split_on_matches(&text, candidate, tag),
        // Already claimed by this pass.
        HighlightNode::Span { tag: own, .. } if own == tag => vec![node],
        HighlightNode::Span { tag: own, text, children } => vec![HighlightNode::Span {
            tag: own,
            text,
            children: children
                .into_iter()
                .flat_map(|child| mark(child, candidate, tag))
                .collect(),
        }],
    }
}

/// Non-overlapping, left-to-right occurrences of `candidate` become spans;
/// the text between them stays as plain leaves.
fn split_on_matches(text: &str, candidate: &str, tag: HighlightTag) -> Vec<HighlightNode> {
    let mut pieces = Vec::new();
    let mut cursor = 0;
    for (start, matched) in text.match_indices(candidate) {
        if start > cursor {
            pieces.push(HighlightNode::Text(text[cursor..start].to_string()));
        }
        pieces.push(HighlightNode::span(tag, matched));
        cursor = start + matched.len();
    }
    if cursor < text.len() || pieces.is_empty() {
        pieces.push(HighlightNode::Text(text[cursor..].to_string()));
    }
    pieces
}

/// Concatenation of every leaf, in document order.
pub fn plain_text(nodes: &[HighlightNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.push_leaves(&mut out);
    }
    out
}

/// Byte ranges of all spans carrying `tag`, in document order.
pub fn span_ranges(nodes: &[HighlightNode], tag: HighlightTag) -> Vec<Range<usize>> {
    fn walk(
        nodes: &[HighlightNode],
        tag: HighlightTag,
        offset: &mut usize,
        out: &mut Vec<Range<usize>>,
    ) {
        for node in nodes {
            match node {
                HighlightNode::Text(text) => *offset += text.len(),
                HighlightNode::Span { tag: own, text, children } => {
                    if *own == tag {
                        out.push(*offset..*offset + text.len());
                    }
                    walk(children, tag, offset, out);
                }
            }
        }
    }

    let mut ranges = Vec::new();
    walk(nodes, tag, &mut 0, &mut ranges);
    ranges
}

/// Compact textual form: sibling spans in `[...]`, base spans in `<...>`.
/// Used by the line protocol and in tests.
pub fn render_markup(nodes: &[HighlightNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            HighlightNode::Text(text) => out.push_str(text),
            HighlightNode::Span { tag, children, .. } => {
                let (open, close) = match tag {
                    HighlightTag::Sibling => ('[', ']'),
                    HighlightTag::Base => ('<', '>'),
                };
                out.push(open);
                out.push_str(&render_markup(children));
                out.push(close);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bases(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    fn markup(target: &str, siblings: &[&str], base_words: &[&str]) -> String {
        render_markup(&highlight(target, siblings, &bases(base_words)))
    }

    #[test]
    fn test_no_candidates_yields_single_leaf() {
        let nodes = highlight("word", &[], &BTreeSet::new());
        assert_eq!(nodes, vec![HighlightNode::Text("word".into())]);
    }

    #[test]
    fn test_target_is_not_its_own_sibling() {
        assert_eq!(markup("spect", &["spect", "spectator"], &[]), "spect");
    }

    #[test]
    fn test_longer_sibling_claims_range_first() {
        assert_eq!(markup("believer", &["lie", "believe", "believer"], &[]), "[believe]r");
        // "believe" does not occur, so the shorter candidate gets its chance.
        assert_eq!(markup("unbelievable", &["believe", "lie"], &[]), "unbe[lie]vable");
    }

    #[test]
    fn test_every_occurrence_is_marked() {
        assert_eq!(markup("abcab", &["ab"], &[]), "[ab]c[ab]");
        assert_eq!(markup("aaa", &["aa"], &[]), "[aa]a");
    }

    #[test]
    fn test_base_pass_reaches_into_sibling_spans() {
        assert_eq!(markup("inspecting", &["inspect"], &["spec", "spect"]), "[in<spect>]ing");
    }

    #[test]
    fn test_base_pass_marks_plain_text() {
        assert_eq!(markup("respect", &["inspect"], &["spec", "spect"]), "re<spect>");
    }

    #[test]
    fn test_equal_length_bases_are_tried_alphabetically() {
        // "bc" and "cd" overlap in "abcd"; the lexically first one wins.
        assert_eq!(markup("abcd", &[], &["cd", "bc"]), "a<bc>d");
    }

    #[test]
    fn test_span_ranges_track_byte_offsets() {
        let nodes = highlight("xinspectx", &["inspect"], &bases(&["spec"]));
        assert_eq!(span_ranges(&nodes, HighlightTag::Sibling), vec![1..8]);
        assert_eq!(span_ranges(&nodes, HighlightTag::Base), vec![3..7]);
    }

    fn assert_disjoint(ranges: &[Range<usize>]) -> Result<(), TestCaseError> {
        for pair in ranges.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start, "overlap: {:?}", pair);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_leaves_reproduce_target(
            target in "[abé]{0,16}",
            siblings in prop::collection::vec("[abé]{0,4}", 0..5),
            base_words in prop::collection::btree_set("[abé]{1,3}", 0..4),
        ) {
            let siblings: Vec<&str> = siblings.iter().map(String::as_str).collect();
            let nodes = highlight(&target, &siblings, &base_words);
            prop_assert_eq!(plain_text(&nodes), target);
        }

        #[test]
        fn prop_same_tag_spans_never_overlap(
            target in "[ab]{0,16}",
            siblings in prop::collection::vec("[ab]{1,4}", 0..5),
            base_words in prop::collection::btree_set("[ab]{1,3}", 0..4),
        ) {
            let siblings: Vec<&str> = siblings.iter().map(String::as_str).collect();
            let nodes = highlight(&target, &siblings, &base_words);
            assert_disjoint(&span_ranges(&nodes, HighlightTag::Sibling))?;
            assert_disjoint(&span_ranges(&nodes, HighlightTag::Base))?;
        }
    }
}
