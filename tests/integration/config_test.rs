//! Integration tests for configuration management
//!
//! These tests verify that the configuration system works correctly
//! across module boundaries.

use std::error::Error;
use tempfile::tempdir;
use trilingual_scenes::config::Settings;
use trilingual_scenes::gemini::GeminiClient;
use trilingual_scenes::vocab::{Language, Scenario};

#[cfg(test)]
mod config_integration_tests {
    use super::*;

    /// Test complete configuration workflow
    #[test]
    fn test_config_lifecycle() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let config_path = dir.path().join("nested").join("config.json");

        let mut settings = Settings::default();
        settings.api_key = Some("integration-test-api-key".to_string());
        settings.default_language = Language::Chinese;
        settings.vocabulary_count = 8;
        settings.alsa_device = "test-audio-device".to_string();

        settings.validate()?;
        settings.save(&config_path)?;

        let loaded_settings = Settings::load(&config_path)?;
        assert_eq!(loaded_settings, settings);

        let mut updated_settings = loaded_settings;
        updated_settings.reference_language = "English".to_string();
        updated_settings.save(&config_path)?;

        let reloaded_settings = Settings::load(&config_path)?;
        assert_eq!(reloaded_settings.reference_language, "English");
        assert_eq!(reloaded_settings.default_language, Language::Chinese);

        Ok(())
    }

    /// Settings drive both the client and the scenario list
    #[test]
    fn test_settings_feed_client_and_catalogue() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{
                "api_key": "from-file",
                "api_base_url": "http://localhost:8080/v1beta/",
                "vocabulary_count": 3,
                "scenarios": [
                    {"id": "garden", "name": "Gardening", "icon": "🌱", "description": "Plants and tools."}
                ]
            }"#,
        )?;

        let settings = Settings::load(&config_path)?;
        settings.validate()?;

        let client = GeminiClient::from_settings(&settings)?;
        assert_eq!(client.api_base_url(), "http://localhost:8080/v1beta");
        assert_eq!(client.vocabulary_count(), 3);
        assert_eq!(
            client.endpoint(&settings.text_model),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );

        assert_eq!(
            settings.scenario_catalogue(),
            vec![Scenario::new("garden", "Gardening", "🌱", "Plants and tools.")]
        );
        Ok(())
    }

    /// Test invalid configuration handling
    #[test]
    fn test_invalid_config_validation() {
        let no_key = Settings::default();
        let result = no_key.validate();
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("API key"));
        }
        assert!(GeminiClient::from_settings(&no_key).is_err());

        let empty_url = Settings {
            api_key: Some("test-key".to_string()),
            api_base_url: String::new(),
            ..Settings::default()
        };
        assert!(empty_url.validate().is_err());

        let no_words = Settings {
            api_key: Some("test-key".to_string()),
            vocabulary_count: 0,
            ..Settings::default()
        };
        assert!(no_words.validate().is_err());
    }
}
