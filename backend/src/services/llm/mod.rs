//! LLM Service Module
//!
//! Relays learner messages to a generative-language provider.
//!
//! # Architecture
//! ```text
//! ┌──────────────┐   compose    ┌──────────────┐
//! │ ChatRequest  │ ───────────▶ │   persona    │
//! └──────┬───────┘              └──────┬───────┘
//!        │ normalize + anchor          │
//!        ▼                             ▼
//! ┌──────────────┐   generate   ┌──────────────────┐
//! │ TutorService │ ───────────▶ │ GenerationClient │ ← Trait (Gemini today)
//! └──────┬───────┘              └──────────────────┘
//!        ▼
//!   ReplyEnvelope (always)
//! ```
//!
//! # Scenarios
//! - Chat (persona + history)
//! - Vision (prompt + inline image)
//! - Define / Translate (fixed one-shot templates)

mod client;
mod image;
mod models;
mod service;

pub mod scenarios;

// Re-exports for external use
pub use client::{GeminiClient, GenerationClient};
pub use self::image::ImagePayload;
pub use models::{Content, Part};
pub use service::{TutorService, failure};

#[cfg(test)]
pub(crate) use self::image::encode_test_image;
