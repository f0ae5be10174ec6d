//! Prompt Scenarios
//!
//! Pure prompt-building steps: nothing here performs I/O.

pub mod history;
pub mod lexicon;
pub mod persona;
