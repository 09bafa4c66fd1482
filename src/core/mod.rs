// src/core/mod.rs
pub mod engine;
pub mod highlight;
pub mod ingest;
pub mod navigation;
pub mod pattern;
pub mod session;
pub mod types;
