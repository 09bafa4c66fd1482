// File: src/core/pattern.rs
use crate::core::types::FIELD_DELIMITER;
use std::collections::BTreeSet;

const OPEN: char = '(';
const CLOSE: char = ')';

/// Expands an alternation pattern into every literal string it denotes.
///
/// Each call removes exactly one innermost parenthesised group, once with its
/// contents dropped and once with them kept, and recurses on both results.
/// `k` independent groups therefore yield up to `2^k` literals.
///
/// Unbalanced parentheses are the caller's problem: a `(` with no closing
/// partner, or a `)` with no opener, is left in the output as a literal.
pub fn expand(pattern: &str) -> BTreeSet<String> {
    let mut literals = BTreeSet::new();
    expand_into(pattern, &mut literals);
    literals
}

/// Expands every comma-separated pattern of a header segment and unions the
/// results. Pieces are trimmed; empty pieces contribute nothing.
pub fn expand_all(segment: &str) -> BTreeSet<String> {
    let mut literals = BTreeSet::new();
    for piece in segment.split(FIELD_DELIMITER) {
        let piece = piece.trim();
        if !piece.is_empty() {
            expand_into(piece, &mut literals);
        }
    }
    literals
}

/// True when every `(` has a matching `)` and no `)` appears unopened.
pub fn is_balanced(pattern: &str) -> bool {
    let mut depth = 0usize;
    for c in pattern.chars() {
        match c {
            OPEN => depth += 1,
            CLOSE => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn expand_into(pattern: &str, literals: &mut BTreeSet<String>) {
    let Some((open, close)) = first_innermost_group(pattern) else {
        literals.insert(pattern.to_string());
        return;
    };

    let prefix = &pattern[..open];
    let inside = &pattern[open + OPEN.len_utf8()..close];
    let suffix = &pattern[close + CLOSE.len_utf8()..];

    expand_into(&[prefix, suffix].concat(), literals);
    expand_into(&[prefix, inside, suffix].concat(), literals);
}

/// Byte offsets of the first `)` and the nearest `(` before it. That pair
/// can contain no other parenthesis.
fn first_innermost_group(pattern: &str) -> Option<(usize, usize)> {
    let mut last_open = None;
    for (i, c) in pattern.char_indices() {
        match c {
            OPEN => last_open = Some(i),
            CLOSE => {
                if let Some(open) = last_open {
                    return Some((open, i));
                }
            }
            _ => {}
        }
    }
    None
}
