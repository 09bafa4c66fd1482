// File: src/core/navigation.rs
use crate::core::session::Session;
use rand::seq::SliceRandom;
use rand::Rng;

/// Every user action that can change a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectWord(usize),
    AdvanceWord,
    NextGroup,
    PrevGroup,
    Reset,
    ToggleMask,
    ToggleDarkMode,
}

/// What the caller must do after an action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action was refused; nothing changed and nothing is saved.
    Rejected,
    /// Save the session.
    Persist,
    /// Save the session, then play and scroll to the current word.
    PersistAndFocus,
}

/// Applies one action to the session in place.
///
/// `rng` is only consulted by [`Action::Reset`].
pub fn update<R: Rng + ?Sized>(session: &mut Session, action: Action, rng: &mut R) -> Outcome {
    match action {
        Action::SelectWord(index) => {
            if index >= session.current_group_len() {
                return Outcome::Rejected;
            }
            session.current_word_index = Some(index);
            Outcome::PersistAndFocus
        }
        Action::AdvanceWord => {
            let len = session.current_group_len();
            let next = session.current_word_index.map_or(0, |i| i + 1);
            // Wraps inside the current group only.
            session.current_word_index = match len {
                0 => None,
                _ if next < len => Some(next),
                _ => Some(0),
            };
            Outcome::PersistAndFocus
        }
        Action::NextGroup => {
            let last = session.groups.len().saturating_sub(1);
            session.current_group_index = (session.current_group_index + 1).min(last);
            enter_group(session);
            Outcome::PersistAndFocus
        }
        Action::PrevGroup => {
            session.current_group_index = session.current_group_index.saturating_sub(1);
            enter_group(session);
            Outcome::PersistAndFocus
        }
        Action::Reset => {
            session.groups.shuffle(rng);
            session.current_group_index = 0;
            enter_group(session);
            Outcome::Persist
        }
        Action::ToggleMask => {
            session.mask_enabled = !session.mask_enabled;
            Outcome::Persist
        }
        Action::ToggleDarkMode => {
            session.dark_mode = !session.dark_mode;
            Outcome::Persist
        }
    }
}

fn enter_group(session: &mut Session) {
    session.current_word_index = None;
    session.mask_enabled = false;
}

/// Words drilled so far and words in total, counted over the live group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

pub fn progress(session: &Session) -> Progress {
    let total = session.groups.iter().map(|g| g.entries.len()).sum();
    let before: usize = session
        .groups
        .iter()
        .take(session.current_group_index)
        .map(|g| g.entries.len())
        .sum();
    Progress {
        current: before + session.current_word_index.unwrap_or(0),
        total,
    }
}
