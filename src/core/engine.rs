// File: src/core/engine.rs
use crate::collab::{AudioPlayer, Scroller, SourceFetcher};
use crate::core::highlight::{highlight, HighlightNode};
use crate::core::ingest::ingest;
use crate::core::navigation::{self, Action, Outcome, Progress};
use crate::core::session::Session;
use crate::error::Result;
use crate::persistence::PersistenceStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Shuffle RNG: fixed when a seed is given, entropy-seeded otherwise.
pub fn shuffle_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// One row of the current group, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub index: usize,
    pub headword: Vec<HighlightNode>,
    pub phonetic: String,
    pub definition: String,
    pub selected: bool,
}

/// The drill owns the session and is the only thing that mutates it. Every
/// mutation is saved before the call returns.
pub struct DrillEngine<S, A, V> {
    session: Session,
    store: S,
    audio: A,
    scroller: V,
    rng: StdRng,
}

impl<S, A, V> DrillEngine<S, A, V>
where
    S: PersistenceStore,
    A: AudioPlayer,
    V: Scroller,
{
    /// Restores the saved session and brings its groups up to date with the
    /// fetched word list. A fetch failure aborts startup.
    pub fn start(
        fetcher: &dyn SourceFetcher,
        mut store: S,
        audio: A,
        scroller: V,
        rng: StdRng,
    ) -> Result<Self> {
        let mut partial = store.load();
        let text = fetcher.fetch_text()?;

        let ingested = ingest(&text, partial.source_hash.as_deref(), partial.groups.take());
        let mut session = Session::from_partial(partial);
        session.groups = ingested.groups;
        session.source_hash = Some(ingested.hash);
        session.normalize();

        if ingested.reparsed {
            store.save(&session)?;
        }

        tracing::info!(
            groups = session.groups.len(),
            group = session.current_group_index,
            "Drill session ready"
        );
        Ok(Self {
            session,
            store,
            audio,
            scroller,
            rng,
        })
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        let outcome = navigation::update(&mut self.session, action, &mut self.rng);
        tracing::debug!(?action, ?outcome, "Dispatched action");

        match outcome {
            Outcome::Rejected => {}
            Outcome::Persist => self.store.save(&self.session)?,
            Outcome::PersistAndFocus => {
                let saved = self.store.save(&self.session);
                self.focus_current();
                saved?;
            }
        }
        Ok(outcome)
    }

    pub fn select_word(&mut self, index: usize) -> Result<Outcome> {
        self.dispatch(Action::SelectWord(index))
    }

    pub fn advance_word(&mut self) -> Result<Outcome> {
        self.dispatch(Action::AdvanceWord)
    }

    pub fn next_group(&mut self) -> Result<Outcome> {
        self.dispatch(Action::NextGroup)
    }

    pub fn prev_group(&mut self) -> Result<Outcome> {
        self.dispatch(Action::PrevGroup)
    }

    pub fn reset(&mut self) -> Result<Outcome> {
        self.dispatch(Action::Reset)
    }

    pub fn toggle_mask(&mut self) -> Result<Outcome> {
        self.dispatch(Action::ToggleMask)
    }

    pub fn toggle_dark_mode(&mut self) -> Result<Outcome> {
        self.dispatch(Action::ToggleDarkMode)
    }

    /// Pronounces the current word again. Nothing is saved.
    pub fn play_current(&mut self) {
        if let Some(entry) = self.session.current_entry() {
            self.audio.play(entry.headword());
        }
    }

    /// Scrolls the current row into view without playing or saving. Renderers
    /// call this before drawing, since reset and startup send no focus.
    pub fn reveal_current(&mut self) {
        if self.session.current_group().is_none() {
            return;
        }
        self.scroller
            .ensure_visible(self.session.current_group_index, self.session.effective_word_index());
    }

    fn focus_current(&mut self) {
        if self.session.current_group().is_none() {
            return;
        }
        self.play_current();
        self.reveal_current();
    }

    pub fn progress(&self) -> Progress {
        navigation::progress(&self.session)
    }

    /// Rows of the current group with their headwords highlighted against the
    /// group's other headwords and base words.
    pub fn rows(&self) -> Vec<RowView> {
        let Some(group) = self.session.current_group() else {
            return Vec::new();
        };
        let siblings = group.headwords();
        group
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| RowView {
                index,
                headword: highlight(entry.headword(), &siblings, &group.base_words),
                phonetic: entry.phonetic().to_string(),
                definition: entry.definition().to_string(),
                selected: self.session.current_word_index == Some(index),
            })
            .collect()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn scroller(&self) -> &V {
        &self.scroller
    }
}
