//! cluesmith - cryptic crossword clue generation backed by Gemini
//!
//! Remote calls go through a retry wrapper that classifies each failure
//! against an ordered table, backs off exponentially with jitter on rate
//! limits, and turns the final failure into a user-facing message. History,
//! presets and saved clues live in a small JSON key-value store.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod model;
pub mod parse;
pub mod prompts;
pub mod retry;
pub mod service;
pub mod store;
pub mod util;
