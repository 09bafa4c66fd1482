// src/lib.rs

pub mod collab;
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;

pub use crate::core::engine::{shuffle_rng, DrillEngine, RowView};
pub use crate::core::navigation::{Action, Outcome, Progress};
pub use crate::core::session::Session;
pub use crate::error::{DrillError, FetchError, PersistenceError};
