//! Gemini-backed vocabulary, illustration and speech generation

pub mod api;
mod contract;
pub mod models;
mod prompts;

pub use api::*;
pub use contract::VocabularyService;
pub use prompts::{image_prompt, vocabulary_prompt};
