//! Integration tests for the Gemini client
//!
//! These tests exercise the service contract against an unreachable
//! endpoint; the live test needs a real key and is ignored by default.

use std::error::Error;
use std::time::Duration;
use trilingual_scenes::gemini::{GeminiClient, GeminiError, VocabularyService, FALLBACK_IMAGE_URL};
use trilingual_scenes::vocab::{ImageRef, Language};

#[cfg(test)]
mod gemini_integration_tests {
    use super::*;

    fn offline_client() -> GeminiClient {
        GeminiClient::with_timeout("test-key", Duration::from_secs(2)).with_base_url("http://127.0.0.1:9/v1beta")
    }

    #[tokio::test]
    async fn test_offline_vocabulary_fails() {
        let client = offline_client();
        let result = client.fetch_vocabulary("Cafe & Ordering", Language::Japanese).await;
        assert!(matches!(result, Err(GeminiError::Network(_))));
    }

    #[tokio::test]
    async fn test_offline_image_falls_back_to_placeholder() {
        let client = offline_client();
        let image = client.fetch_image("coffee", "Cafe & Ordering").await;
        match image {
            Some(ImageRef::Url(url)) => assert!(url.starts_with(FALLBACK_IMAGE_URL)),
            other => panic!("expected placeholder url, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_offline_speech_is_absent() {
        let client = offline_client();
        assert!(client.fetch_speech("coffee", Language::English).await.is_none());
    }

    /// Requires GEMINI_API_KEY and network access
    #[tokio::test]
    #[ignore]
    async fn test_live_vocabulary() -> Result<(), Box<dyn Error>> {
        let key = std::env::var("GEMINI_API_KEY")?;
        let client = GeminiClient::new(&key).with_vocabulary_count(3);
        let items = client.fetch_vocabulary("Cafe & Ordering", Language::Japanese).await?;
        assert!(!items.is_empty());
        assert!(items.iter().all(|item| !item.word.is_empty()));
        Ok(())
    }
}
