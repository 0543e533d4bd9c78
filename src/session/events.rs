use crate::gemini::GeminiError;
use crate::session::card::{AudioKind, AudioOutcome};
use crate::vocab::{ImageRef, Language, VocabularyItem};

/// User intents, parsed from terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Zero-based index into the scenario catalogue
    ChooseScenario(usize),
    SelectLanguage(Language),
    CycleLanguage,
    Next,
    Prev,
    Refresh,
    PlayWord,
    PlaySentence,
    Exit,
    Help,
    Quit,
}

/// Completions reported back to the session loop by fetch tasks.
#[derive(Debug)]
pub enum AppEvent {
    VocabularyLoaded {
        generation: u64,
        result: Result<Vec<VocabularyItem>, GeminiError>,
    },
    ImageLoaded {
        generation: u64,
        image: Option<ImageRef>,
    },
    AudioFinished {
        kind: AudioKind,
        outcome: AudioOutcome,
    },
}
