// src/collab/mod.rs
//! Side-effect collaborators of the drill engine: where the word list comes
//! from, how a word is pronounced, and how the current row is kept in view.

pub mod audio;
pub mod fetch;
pub mod scroll;

pub use audio::{pronunciation_url, AudioPlayer, CommandPlayer, SilentPlayer};
pub use fetch::{fetcher_for, FileFetcher, HttpFetcher, SourceFetcher};
pub use scroll::{NullScroller, Scroller, ViewportScroller};
