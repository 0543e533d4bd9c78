//! Common utilities for testing trilingual-scenes
//!
//! Provides an in-memory vocabulary service, a recording audio sink and a
//! renderer that captures every screen.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trilingual_scenes::audio::{AudioError, AudioSink, PcmBuffer};
use trilingual_scenes::gemini::{GeminiError, VocabularyService};
use trilingual_scenes::session::{App, Mode, Notification, Renderer};
use trilingual_scenes::vocab::{ImageRef, Language, VocabularyItem};

/// Builds `count` distinct items whose words start with `prefix`.
pub fn sample_items(prefix: &str, count: usize) -> Vec<VocabularyItem> {
    (0..count)
        .map(|i| VocabularyItem {
            word: format!("{} {}", prefix, i),
            pronunciation: format!("pron {}", i),
            meaning: format!("meaning {}", i),
            example_sentence: format!("Sentence about {} {}.", prefix, i),
            example_translation: format!("Translation {}", i),
        })
        .collect()
}

/// Vocabulary service backed by canned responses.
#[allow(dead_code)]
pub struct MockVocabularyService {
    pub items_per_list: usize,
    pub fail_vocabulary: bool,
    pub speech: Option<Vec<u8>>,
    /// Per-scenario delay before the vocabulary response
    pub delays: HashMap<String, Duration>,
    pub vocabulary_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub speech_calls: AtomicUsize,
    pub spoken: Mutex<Vec<(String, Language)>>,
}

#[allow(dead_code)]
impl MockVocabularyService {
    pub fn new(items_per_list: usize) -> Self {
        MockVocabularyService {
            items_per_list,
            fail_vocabulary: false,
            speech: Some(vec![0x00, 0x40, 0x00, 0xC0, 0x00, 0x00]),
            delays: HashMap::new(),
            vocabulary_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            speech_calls: AtomicUsize::new(0),
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        MockVocabularyService {
            fail_vocabulary: true,
            ..Self::new(0)
        }
    }

    pub fn with_delay(mut self, scenario_name: &str, delay: Duration) -> Self {
        self.delays.insert(scenario_name.to_string(), delay);
        self
    }

    pub fn vocabulary_calls(&self) -> usize {
        self.vocabulary_calls.load(Ordering::SeqCst)
    }

    pub fn speech_calls(&self) -> usize {
        self.speech_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VocabularyService for MockVocabularyService {
    async fn fetch_vocabulary(&self, scenario_name: &str, _language: Language) -> Result<Vec<VocabularyItem>, GeminiError> {
        let call = self.vocabulary_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(scenario_name) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_vocabulary {
            return Err(GeminiError::InvalidResponse("simulated outage".to_string()));
        }
        Ok(sample_items(&format!("{} #{}", scenario_name, call), self.items_per_list))
    }

    async fn fetch_image(&self, word: &str, _scenario_name: &str) -> Option<ImageRef> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        Some(ImageRef::Url(format!("https://images.test/{}", word.replace(' ', "_"))))
    }

    async fn fetch_speech(&self, text: &str, language: Language) -> Option<Vec<u8>> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        self.spoken.lock().unwrap().push((text.to_string(), language));
        self.speech.clone()
    }
}

/// Audio sink that remembers the sample count of every buffer played.
pub struct RecordingSink {
    pub played: Arc<Mutex<Vec<usize>>>,
}

impl AudioSink for RecordingSink {
    fn play(&mut self, buffer: &PcmBuffer) -> Result<(), AudioError> {
        self.played.lock().unwrap().push(buffer.samples.len());
        Ok(())
    }
}

/// What a renderer saw on one redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub mode: Mode,
    pub index: Option<usize>,
    pub word: Option<String>,
}

/// Renderer that records frames instead of drawing them.
#[derive(Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Frame>,
    pub notifications: Vec<String>,
    pub help_shown: usize,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, app: &App) {
        let state = app.state();
        self.frames.push(Frame {
            mode: state.mode(),
            index: state.current_index(),
            word: state.current_item().map(|item| item.word.clone()),
        });
    }

    fn show_help(&mut self, _app: &App) {
        self.help_shown += 1;
    }

    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.message.clone());
    }
}
