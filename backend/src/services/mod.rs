pub mod llm;

pub use llm::{GeminiClient, GenerationClient, TutorService};
