//! Command-line interface implementation

use crate::config::Settings;
use crate::vocab::Language;
use clap::Parser;

/// Command-line arguments for trilingual-scenes
#[derive(Parser, Debug)]
#[command(author, version, about = "Scenario-based vocabulary flashcards in the terminal", long_about = None)]
pub struct Args {
    /// Gemini API key
    #[arg(short = 'k', long, env = "GEMINI_API_KEY")]
    pub api_key: Option<String>,

    /// Target language to start with (English, Japanese, Chinese)
    #[arg(short, long, env = "TRILINGUAL_LANGUAGE")]
    pub language: Option<Language>,

    /// Number of words per list
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// ALSA device to use (overrides the config file)
    #[arg(short = 'd', long, env = "TRILINGUAL_ALSA_DEVICE")]
    pub alsa_device: Option<String>,

    /// Config file path
    #[arg(short, long, env = "TRILINGUAL_CONFIG")]
    pub config: Option<String>,

    /// Log file path
    #[arg(long, env = "TRILINGUAL_LOG_FILE")]
    pub log_file: Option<String>,

    /// Write logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Overrides file settings with whatever was given on the command line or
    /// through the environment.
    pub fn apply_to(&self, settings: &mut Settings) {
        settings.api_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var("API_KEY").ok())
            .or_else(|| settings.api_key.take());

        if let Some(language) = self.language {
            settings.default_language = language;
        }

        if let Some(count) = self.count {
            settings.vocabulary_count = count;
        }

        if let Some(device) = &self.alsa_device {
            settings.alsa_device = device.clone();
        }
    }
}

/// CLI entry point holding the parsed arguments
pub struct Cli {
    pub args: Args,
}

impl Cli {
    /// Create a new CLI instance
    pub fn new() -> Self {
        Cli { args: Args::parse() }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}
