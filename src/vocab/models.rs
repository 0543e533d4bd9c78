//! Data models shared by the session core and the vocabulary service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The language being learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Japanese,
    Chinese,
}

impl Language {
    /// All supported target languages, in display order.
    pub const ALL: [Language; 3] = [Language::English, Language::Japanese, Language::Chinese];

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Japanese => "Japanese",
            Language::Chinese => "Chinese",
        }
    }

    /// How the `pronunciation` field is written for this language.
    pub fn pronunciation_guide(&self) -> &'static str {
        match self {
            Language::English => "IPA",
            Language::Japanese => "Romaji (e.g. \"arigatou\")",
            Language::Chinese => "Pinyin",
        }
    }

    /// Describes the script used for the `word` field.
    pub fn word_script(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Japanese => "Kanji/Kana",
            Language::Chinese => "Hanzi",
        }
    }

    /// Prebuilt TTS voice used when speaking text in this language.
    pub fn voice_name(&self) -> &'static str {
        match self {
            Language::Japanese => "Puck",
            _ => "Kore",
        }
    }

    /// The language following this one, wrapping around.
    pub fn cycle(&self) -> Language {
        match self {
            Language::English => Language::Japanese,
            Language::Japanese => Language::Chinese,
            Language::Chinese => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a language name cannot be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown language '{}' (expected English, Japanese or Chinese)", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "japanese" | "ja" | "jp" => Ok(Language::Japanese),
            "chinese" | "zh" | "cn" => Ok(Language::Chinese),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// A named learning context used to bias vocabulary generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
}

impl Scenario {
    pub fn new(id: &str, name: &str, icon: &str, description: &str) -> Self {
        Scenario {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
        }
    }
}

/// One flashcard's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub word: String,
    /// IPA, Romaji or Pinyin depending on the target language
    pub pronunciation: String,
    /// Meaning in the reference language
    pub meaning: String,
    pub example_sentence: String,
    pub example_translation: String,
}

/// Reference to an illustration for a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Url(String),
    /// Base64 payload returned inline by the image model
    Inline { mime_type: String, data: String },
}

impl ImageRef {
    /// Renders the reference as something a browser can load.
    pub fn to_uri(&self) -> String {
        match self {
            ImageRef::Url(url) => url.clone(),
            ImageRef::Inline { mime_type, data } => format!("data:{};base64,{}", mime_type, data),
        }
    }

    /// Short human-readable description for the terminal.
    pub fn describe(&self) -> String {
        match self {
            ImageRef::Url(url) => url.clone(),
            ImageRef::Inline { mime_type, data } => {
                // Base64 expands 3 bytes into 4 characters
                let approx_bytes = data.len() / 4 * 3;
                format!("{} image ({} KB)", mime_type, approx_bytes / 1024)
            }
        }
    }
}
