//! Gemini REST client implementation

use crate::config::{Settings, DEFAULT_REFERENCE_LANGUAGE, DEFAULT_VOCABULARY_COUNT};
use crate::config::{DEFAULT_API_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_SPEECH_MODEL, DEFAULT_TEXT_MODEL};
use crate::gemini::contract::VocabularyService;
use crate::gemini::models::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::gemini::prompts::{image_prompt, vocabulary_prompt};
use crate::vocab::{ImageRef, Language, VocabularyItem};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use reqwest::{Client, Error as ReqwestError, StatusCode};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace, warn};

const LOG_TARGET: &str = "trilingual_scenes::gemini::api";

/// Image shown when illustration generation fails outright.
pub const FALLBACK_IMAGE_URL: &str = "https://picsum.photos/400/400";

/// Error types for Gemini API operations
#[derive(Debug)]
pub enum GeminiError {
    Network(ReqwestError),
    Api { status: StatusCode, message: String },
    InvalidResponse(String),
    MissingApiKey,
}

impl fmt::Display for GeminiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeminiError::Network(e) => write!(f, "Network error: {}", e),
            GeminiError::Api { status, message } => write!(f, "API error ({}): {}", status, message),
            GeminiError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            GeminiError::MissingApiKey => write!(f, "No Gemini API key configured"),
        }
    }
}

impl Error for GeminiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GeminiError::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReqwestError> for GeminiError {
    fn from(err: ReqwestError) -> Self {
        GeminiError::Network(err)
    }
}

/// Client for the Gemini `generateContent` API
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
    speech_model: String,
    reference_language: String,
    vocabulary_count: usize,
}

impl GeminiClient {
    /// Create a client with default models and endpoint
    pub fn new(api_key: &str) -> Self {
        Self::with_timeout(api_key, Duration::from_secs(60))
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(api_key: &str, timeout: Duration) -> Self {
        let client = match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                warn!(target: LOG_TARGET, "Error creating HTTP client with timeout: {:?}. Falling back to default.", e);
                Client::new()
            }
        };

        GeminiClient {
            client,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            speech_model: DEFAULT_SPEECH_MODEL.to_string(),
            reference_language: DEFAULT_REFERENCE_LANGUAGE.to_string(),
            vocabulary_count: DEFAULT_VOCABULARY_COUNT,
        }
    }

    /// Create a client from validated settings
    pub fn from_settings(settings: &Settings) -> Result<Self, GeminiError> {
        let api_key = settings.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or(GeminiError::MissingApiKey)?;
        let mut client = Self::with_timeout(api_key, Duration::from_secs(settings.request_timeout_secs))
            .with_base_url(&settings.api_base_url)
            .with_reference_language(&settings.reference_language)
            .with_vocabulary_count(settings.vocabulary_count);
        client.text_model = settings.text_model.clone();
        client.image_model = settings.image_model.clone();
        client.speech_model = settings.speech_model.clone();
        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_reference_language(mut self, reference_language: &str) -> Self {
        self.reference_language = reference_language.to_string();
        self
    }

    pub fn with_vocabulary_count(mut self, count: usize) -> Self {
        self.vocabulary_count = count;
        self
    }

    /// Builds the `generateContent` URL for a model.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, model)
    }

    /// Sends one request/response call and decodes the JSON body.
    async fn generate(&self, model: &str, request: &GenerateContentRequest) -> Result<GenerateContentResponse, GeminiError> {
        let url = self.endpoint(model);
        debug!(target: LOG_TARGET, "Sending generateContent request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        trace!(target: LOG_TARGET, "Response status: {}, body length: {} bytes", status, body.len());

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            error!(target: LOG_TARGET, "Request to {} failed. Status: {}, Message: {}", model, status, message);
            return Err(GeminiError::Api { status, message });
        }

        serde_json::from_str::<GenerateContentResponse>(&body)
            .map_err(|e| GeminiError::InvalidResponse(format!("Failed to parse generateContent response: {}", e)))
    }

    /// Generate the vocabulary list for a scenario
    #[instrument(skip(self), fields(model = %self.text_model))]
    pub async fn generate_vocabulary_list(&self, scenario: &str, language: Language) -> Result<Vec<VocabularyItem>, GeminiError> {
        info!(target: LOG_TARGET, "Generating {} words for '{}' in {}", self.vocabulary_count, scenario, language);
        let prompt = vocabulary_prompt(scenario, language, self.vocabulary_count, &self.reference_language);
        let request = GenerateContentRequest::from_text(&prompt).with_config(GenerationConfig::vocabulary_json());
        let response = self.generate(&self.text_model, &request).await?;
        parse_vocabulary(&response)
    }

    /// Generate an illustration for a word. `Ok(None)` means the model answered without an image.
    #[instrument(skip(self), fields(model = %self.image_model))]
    pub async fn generate_scene_image(&self, word: &str, scenario: &str) -> Result<Option<ImageRef>, GeminiError> {
        let request = GenerateContentRequest::from_text(&image_prompt(word, scenario)).with_config(GenerationConfig::square_image());
        let response = self.generate(&self.image_model, &request).await?;
        Ok(extract_image(&response))
    }

    /// Synthesize speech. Returns raw S16LE mono PCM when the model produced audio.
    #[instrument(skip(self, text), fields(model = %self.speech_model, chars = text.chars().count()))]
    pub async fn generate_speech(&self, text: &str, language: Language) -> Result<Option<Vec<u8>>, GeminiError> {
        let request = GenerateContentRequest::from_text(text).with_config(GenerationConfig::speech(language.voice_name()));
        let response = self.generate(&self.speech_model, &request).await?;
        extract_speech(&response)
    }

    // --- Getter methods (primarily for testing/debugging) ---
    pub fn api_base_url(&self) -> &str { &self.api_base_url }
    pub fn vocabulary_count(&self) -> usize { self.vocabulary_count }
    pub fn reference_language(&self) -> &str { &self.reference_language }
}

/// Decodes the structured vocabulary answer. A response without text yields an empty list.
pub fn parse_vocabulary(response: &GenerateContentResponse) -> Result<Vec<VocabularyItem>, GeminiError> {
    match response.text() {
        Some(text) => serde_json::from_str::<Vec<VocabularyItem>>(text.trim()).map_err(|e| {
            error!(target: LOG_TARGET, "Vocabulary JSON parsing error: {}. Text:\n{}", e, text);
            GeminiError::InvalidResponse(format!("Failed to parse vocabulary list: {}", e))
        }),
        None => {
            warn!(target: LOG_TARGET, "Vocabulary response carried no text, returning an empty list.");
            Ok(Vec::new())
        }
    }
}

/// Picks the first inline image of the first candidate.
pub fn extract_image(response: &GenerateContentResponse) -> Option<ImageRef> {
    response.first_inline_data().map(|inline| ImageRef::Inline {
        mime_type: if inline.mime_type.is_empty() { "image/png".to_string() } else { inline.mime_type.clone() },
        data: inline.data.clone(),
    })
}

/// Decodes the base64 audio carried by the first part of the first candidate.
pub fn extract_speech(response: &GenerateContentResponse) -> Result<Option<Vec<u8>>, GeminiError> {
    match response.leading_inline_data() {
        Some(inline) if !inline.data.is_empty() => general_purpose::STANDARD
            .decode(&inline.data)
            .map(Some)
            .map_err(|e| GeminiError::InvalidResponse(format!("Invalid base64 audio: {}", e))),
        _ => Ok(None),
    }
}

#[async_trait]
impl VocabularyService for GeminiClient {
    async fn fetch_vocabulary(&self, scenario_name: &str, language: Language) -> Result<Vec<VocabularyItem>, GeminiError> {
        self.generate_vocabulary_list(scenario_name, language).await
    }

    async fn fetch_image(&self, word: &str, scenario_name: &str) -> Option<ImageRef> {
        match self.generate_scene_image(word, scenario_name).await {
            Ok(image) => image,
            Err(e) => {
                warn!(target: LOG_TARGET, "Image generation failed for '{}': {}", word, e);
                Some(ImageRef::Url(FALLBACK_IMAGE_URL.to_string()))
            }
        }
    }

    async fn fetch_speech(&self, text: &str, language: Language) -> Option<Vec<u8>> {
        match self.generate_speech(text, language).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!(target: LOG_TARGET, "Audio generation failed: {}", e);
                None
            }
        }
    }
}
