//! Per-card side effects: the illustration and single-flight speech playback.

use crate::audio::SharedAudioSink;
use crate::session::state::CardKey;
use crate::vocab::{ImageRef, Language, VocabularyItem};
use tracing::{debug, info, trace};

const LOG_TARGET: &str = "trilingual_scenes::session::card";

/// Which text a playback action speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    Word,
    Sentence,
}

/// Illustration state of the displayed card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Loading,
    Ready(ImageRef),
    /// The service answered without an image
    Unavailable,
}

/// An image fetch the driver should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub generation: u64,
    pub word: String,
    pub scenario_name: String,
}

/// A speech fetch the driver should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub kind: AudioKind,
    pub text: String,
    pub language: Language,
}

/// How a playback action ended. Every variant clears the in-flight flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutcome {
    Played,
    /// The service had no audio for the text
    NoAudio,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
struct DisplayedCard {
    key: CardKey,
    scenario_name: String,
}

pub struct CardController {
    output: SharedAudioSink,
    displayed: Option<DisplayedCard>,
    current_item: Option<VocabularyItem>,
    image: ImageState,
    image_generation: u64,
    audio_in_flight: Option<AudioKind>,
}

impl CardController {
    /// Creates a controller that plays speech on `output`. The sink is
    /// released together with the controller.
    pub fn new(output: SharedAudioSink) -> Self {
        CardController {
            output,
            displayed: None,
            current_item: None,
            image: ImageState::Unavailable,
            image_generation: 0,
            audio_in_flight: None,
        }
    }

    pub fn output(&self) -> SharedAudioSink {
        self.output.clone()
    }

    pub fn image(&self) -> &ImageState {
        &self.image
    }

    pub fn image_loading(&self) -> bool {
        self.image == ImageState::Loading
    }

    pub fn audio_in_flight(&self) -> Option<AudioKind> {
        self.audio_in_flight
    }

    pub fn is_showing(&self) -> bool {
        self.displayed.is_some()
    }

    /// Displays a card. Returns an image request when the card differs from
    /// the one already shown.
    pub fn show(&mut self, key: CardKey, item: &VocabularyItem, scenario_name: &str) -> Option<ImageRequest> {
        let next = DisplayedCard {
            key,
            scenario_name: scenario_name.to_string(),
        };
        if self.displayed.as_ref() == Some(&next) {
            trace!(target: LOG_TARGET, "Card {:?} already displayed.", key);
            return None;
        }

        self.image_generation += 1;
        self.image = ImageState::Loading;
        self.displayed = Some(next);
        self.current_item = Some(item.clone());
        debug!(target: LOG_TARGET, "Showing '{}' (image generation {}).", item.word, self.image_generation);

        Some(ImageRequest {
            generation: self.image_generation,
            word: item.word.clone(),
            scenario_name: scenario_name.to_string(),
        })
    }

    /// Applies an image result if it belongs to the card still on display.
    pub fn apply_image(&mut self, generation: u64, image: Option<ImageRef>) -> bool {
        if generation != self.image_generation || self.displayed.is_none() {
            debug!(target: LOG_TARGET, "Dropping stale image (generation {}, current {}).", generation, self.image_generation);
            return false;
        }
        self.image = match image {
            Some(image) => ImageState::Ready(image),
            None => ImageState::Unavailable,
        };
        true
    }

    /// Tears down the displayed card; pending image results become stale.
    pub fn hide(&mut self) {
        if self.displayed.take().is_some() {
            debug!(target: LOG_TARGET, "Card view torn down.");
        }
        self.current_item = None;
        self.image_generation += 1;
        self.image = ImageState::Unavailable;
    }

    /// Starts a playback action unless one is already in flight.
    pub fn begin_audio(&mut self, kind: AudioKind, language: Language) -> Option<SpeechRequest> {
        if let Some(active) = self.audio_in_flight {
            debug!(target: LOG_TARGET, "Rejecting {:?} playback: {:?} already in flight.", kind, active);
            return None;
        }
        let item = self.current_item.as_ref()?;
        let text = match kind {
            AudioKind::Word => item.word.clone(),
            AudioKind::Sentence => item.example_sentence.clone(),
        };
        self.audio_in_flight = Some(kind);
        info!(target: LOG_TARGET, "Requesting {:?} audio.", kind);
        Some(SpeechRequest { kind, text, language })
    }

    pub fn finish_audio(&mut self, kind: AudioKind, outcome: &AudioOutcome) {
        match outcome {
            AudioOutcome::Played => debug!(target: LOG_TARGET, "{:?} audio played.", kind),
            AudioOutcome::NoAudio => debug!(target: LOG_TARGET, "No {:?} audio available.", kind),
            AudioOutcome::Failed(reason) => debug!(target: LOG_TARGET, "{:?} audio failed silently: {}", kind, reason),
        }
        if self.audio_in_flight == Some(kind) {
            self.audio_in_flight = None;
        }
    }
}
