//! Application settings and configuration management

use crate::audio::DEFAULT_SAMPLE_RATE;
use crate::vocab::{builtin_scenarios, Language, Scenario};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_REFERENCE_LANGUAGE: &str = "Chinese (Simplified)";
pub const DEFAULT_VOCABULARY_COUNT: usize = 5;

/// Application settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Gemini API key
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_speech_model")]
    pub speech_model: String,
    /// Target language selected when the app starts
    #[serde(default)]
    pub default_language: Language,
    /// Language used for meanings and example translations
    #[serde(default = "default_reference_language")]
    pub reference_language: String,
    /// Number of words requested per list
    #[serde(default = "default_vocabulary_count")]
    pub vocabulary_count: usize,
    /// ALSA device to use for audio playback
    #[serde(default = "default_alsa_device")]
    pub alsa_device: String,
    /// Sample rate of the raw PCM returned by the speech model
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Replaces the built-in scenario list when non-empty
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

fn default_speech_model() -> String {
    DEFAULT_SPEECH_MODEL.to_string()
}

fn default_reference_language() -> String {
    DEFAULT_REFERENCE_LANGUAGE.to_string()
}

fn default_vocabulary_count() -> usize {
    DEFAULT_VOCABULARY_COUNT
}

fn default_alsa_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_request_timeout_secs() -> u64 {
    60
}

/// Error types for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    IoError(io::Error),
    ParseError(String),
    ValidationError(String),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigError::ParseError(s) => write!(f, "Parse error: {}", s),
            ConfigError::ValidationError(s) => write!(f, "Validation error: {}", s),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: None,
            api_base_url: default_api_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            speech_model: default_speech_model(),
            default_language: Language::default(),
            reference_language: default_reference_language(),
            vocabulary_count: default_vocabulary_count(),
            alsa_device: default_alsa_device(),
            sample_rate: default_sample_rate(),
            request_timeout_secs: default_request_timeout_secs(),
            scenarios: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from a file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the config file and the log file
    pub fn config_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("trilingual-scenes")
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Get the default log file path
    pub fn default_log_path() -> PathBuf {
        Self::config_dir().join("trilingual-scenes.log")
    }

    /// Scenarios offered on the selection screen.
    pub fn scenario_catalogue(&self) -> Vec<Scenario> {
        if self.scenarios.is_empty() {
            builtin_scenarios()
        } else {
            self.scenarios.clone()
        }
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.api_key {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(ConfigError::ValidationError(
                    "A Gemini API key must be provided (--api-key, GEMINI_API_KEY or config file)".to_string(),
                ))
            }
        }

        if self.api_base_url.is_empty() {
            return Err(ConfigError::ValidationError("API base URL cannot be empty".to_string()));
        }

        if self.vocabulary_count == 0 {
            return Err(ConfigError::ValidationError("Vocabulary count must be at least 1".to_string()));
        }

        if self.sample_rate == 0 {
            return Err(ConfigError::ValidationError("Sample rate cannot be zero".to_string()));
        }

        Ok(())
    }
}
