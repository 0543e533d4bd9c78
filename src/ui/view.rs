//! Plain-text rendering of each screen.

use crate::session::{App, AudioKind, ImageState, Screen};
use std::fmt::Write;

pub const APP_TITLE: &str = "TriLingual Scenes";

/// Renders the current screen as text.
pub fn render_screen(app: &App) -> String {
    let mut out = String::new();
    let state = app.state();

    match state.screen() {
        Screen::Selecting => {
            let _ = writeln!(out, "{}   Language: {}", APP_TITLE, language_bar(app));
            let _ = writeln!(out);
            if let Some(message) = state.last_error() {
                let _ = writeln!(out, "! {}", message);
                let _ = writeln!(out);
            }
            let _ = writeln!(out, "Choose a Scene");
            let _ = writeln!(out, "Pick a context to start generating useful vocabulary in {}.", state.language());
            let _ = writeln!(out);
            for (i, scenario) in app.scenarios().iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {} {:<22} {}", i + 1, scenario.icon, scenario.name, scenario.description);
            }
        }
        Screen::Loading { scenario, .. } => {
            let _ = writeln!(out, "{}   {} {}", APP_TITLE, scenario.icon, scenario.name);
            let _ = writeln!(out);
            let _ = writeln!(out, "Consulting Gemini...");
            let _ = writeln!(out, "Generating vocabulary list for {}", scenario.name);
        }
        Screen::Learning { scenario, deck } => {
            let item = deck.current();
            let card = app.card();
            let _ = writeln!(out, "{}   {} {}   [x] Exit", APP_TITLE, scenario.icon, scenario.name);
            let _ = writeln!(out);

            let word_audio = if card.audio_in_flight() == Some(AudioKind::Word) { "(loading audio...)" } else { "[w] 🔊" };
            let _ = writeln!(out, "  {}  {}", item.word, word_audio);
            let _ = writeln!(out, "  {}  {}", item.pronunciation, item.meaning);
            let _ = writeln!(out);
            let _ = writeln!(out, "  Image: {}", image_line(card.image()));
            let _ = writeln!(out);
            let _ = writeln!(out, "  Example / 例句");
            let _ = writeln!(out, "  {}", item.example_sentence);
            let _ = writeln!(out, "  {}", item.example_translation);
            let sentence_audio = if card.audio_in_flight() == Some(AudioKind::Sentence) { "Loading audio..." } else { "[s] ▶ Play Sentence" };
            let _ = writeln!(out, "  {}", sentence_audio);
            let _ = writeln!(out);

            let prev = if deck.index() == 0 { "       " } else { "[p] Prev" };
            let next = if deck.is_last() { "[r] Load New Words" } else { "[n] Next" };
            let _ = writeln!(out, "{}    {} / {}    {}", prev, deck.index() + 1, deck.len(), next);
        }
        Screen::Empty { scenario } => {
            let _ = writeln!(out, "{}   {} {}", APP_TITLE, scenario.icon, scenario.name);
            let _ = writeln!(out);
            let _ = writeln!(out, "No words found.");
            let _ = writeln!(out, "[x] Go Back");
        }
    }

    out
}

fn language_bar(app: &App) -> String {
    crate::vocab::Language::ALL
        .iter()
        .map(|lang| {
            if *lang == app.state().language() {
                format!("[{}]", lang)
            } else {
                lang.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn image_line(image: &ImageState) -> String {
    match image {
        ImageState::Loading => "Generating Scene...".to_string(),
        ImageState::Ready(image) => image.describe(),
        ImageState::Unavailable => "Image unavailable".to_string(),
    }
}
