use crate::gemini::api::GeminiError;
use crate::vocab::{ImageRef, Language, VocabularyItem};
use async_trait::async_trait;

/// The generative service the session core talks to.
///
/// Only `fetch_vocabulary` can fail. Image and speech lookups absorb their own
/// errors: an image lookup may substitute a placeholder, and a speech lookup
/// reports `None` when no audio is available.
#[async_trait]
pub trait VocabularyService: Send + Sync {
    /// Returns the vocabulary list for a scenario, in display order.
    async fn fetch_vocabulary(&self, scenario_name: &str, language: Language) -> Result<Vec<VocabularyItem>, GeminiError>;

    async fn fetch_image(&self, word: &str, scenario_name: &str) -> Option<ImageRef>;

    /// Returns raw S16LE mono PCM for `text`.
    async fn fetch_speech(&self, text: &str, language: Language) -> Option<Vec<u8>>;
}
