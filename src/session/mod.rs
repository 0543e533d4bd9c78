//! Learning session: state machine, card controller and the async driver

mod card;
mod events;
mod run_loop;
mod state;

pub use card::{AudioKind, AudioOutcome, CardController, ImageRequest, ImageState, SpeechRequest};
pub use events::{AppEvent, Command};
pub use run_loop::{run_session_loop, Renderer};
pub use state::*;

use crate::audio::{decode_pcm16le, play_on_shared, SharedAudioSink};
use crate::gemini::VocabularyService;
use crate::vocab::{Language, Scenario};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument, trace, warn};

pub(crate) const SESSION_LOG_TARGET: &str = "trilingual_scenes::session";

/// Owns the session state and the card controller, and is the only place
/// either is mutated. Fetches run as spawned tasks that report back through
/// an event channel.
pub struct App {
    state: SessionState,
    card: CardController,
    service: Arc<dyn VocabularyService>,
    scenarios: Vec<Scenario>,
    sample_rate: u32,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    quit_requested: bool,
}

impl App {
    pub fn new(
        service: Arc<dyn VocabularyService>,
        output: SharedAudioSink,
        scenarios: Vec<Scenario>,
        language: Language,
        sample_rate: u32,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        App {
            state: SessionState::new(language),
            card: CardController::new(output),
            service,
            scenarios,
            sample_rate,
            event_tx,
            event_rx,
            quit_requested: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn card(&self) -> &CardController {
        &self.card
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Applies a user command. Returns whether anything changed.
    #[instrument(skip(self))]
    pub fn handle_command(&mut self, command: Command) -> bool {
        let changed = match command {
            Command::ChooseScenario(index) => match self.scenarios.get(index).cloned() {
                Some(scenario) => match self.state.select_scenario(&scenario) {
                    Some(request) => {
                        self.spawn_vocabulary_fetch(request);
                        true
                    }
                    None => false,
                },
                None => {
                    debug!(target: SESSION_LOG_TARGET, "No scenario at index {}.", index);
                    false
                }
            },
            Command::SelectLanguage(language) => self.state.select_language(language),
            Command::CycleLanguage => {
                let next = self.state.language().cycle();
                self.state.select_language(next)
            }
            Command::Next => self.state.next(),
            Command::Prev => self.state.prev(),
            Command::Refresh => match self.state.refresh() {
                Some(request) => {
                    self.spawn_vocabulary_fetch(request);
                    true
                }
                None => false,
            },
            Command::PlayWord => self.play(AudioKind::Word),
            Command::PlaySentence => self.play(AudioKind::Sentence),
            Command::Exit => self.state.exit_to_menu(),
            Command::Help => false,
            Command::Quit => {
                self.quit_requested = true;
                true
            }
        };
        self.sync_card();
        changed
    }

    /// Waits for the next fetch completion.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_rx.recv().await
    }

    /// Applies a fetch completion. Returns whether anything changed.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        trace!(target: SESSION_LOG_TARGET, "Handling event: {:?}", event);
        let changed = match event {
            AppEvent::VocabularyLoaded { generation, result } => {
                self.state.complete_fetch(generation, result) != FetchOutcome::Stale
            }
            AppEvent::ImageLoaded { generation, image } => self.card.apply_image(generation, image),
            AppEvent::AudioFinished { kind, outcome } => {
                self.card.finish_audio(kind, &outcome);
                true
            }
        };
        self.sync_card();
        changed
    }

    /// Keeps the card view in line with the state machine: shows the current
    /// card (fetching its image on change) or tears the view down.
    fn sync_card(&mut self) {
        let current = self.state.current_card().map(|(key, item)| (key, item.clone()));
        let scenario_name = self.state.active_scenario().map(|s| s.name.clone()).unwrap_or_default();
        match current {
            Some((key, item)) => {
                if let Some(request) = self.card.show(key, &item, &scenario_name) {
                    self.spawn_image_fetch(request);
                }
            }
            None => {
                if self.card.is_showing() {
                    self.card.hide();
                }
            }
        }
    }

    fn play(&mut self, kind: AudioKind) -> bool {
        match self.card.begin_audio(kind, self.state.language()) {
            Some(request) => {
                self.spawn_speech(request);
                true
            }
            None => false,
        }
    }

    fn spawn_vocabulary_fetch(&self, request: FetchRequest) {
        let service = self.service.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = service.fetch_vocabulary(&request.scenario_name, request.language).await;
            if tx
                .send(AppEvent::VocabularyLoaded {
                    generation: request.generation,
                    result,
                })
                .is_err()
            {
                debug!(target: SESSION_LOG_TARGET, "Session closed before vocabulary arrived.");
            }
        });
    }

    fn spawn_image_fetch(&self, request: ImageRequest) {
        let service = self.service.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let image = service.fetch_image(&request.word, &request.scenario_name).await;
            if tx
                .send(AppEvent::ImageLoaded {
                    generation: request.generation,
                    image,
                })
                .is_err()
            {
                debug!(target: SESSION_LOG_TARGET, "Session closed before image arrived.");
            }
        });
    }

    fn spawn_speech(&self, request: SpeechRequest) {
        let service = self.service.clone();
        let tx = self.event_tx.clone();
        let output = self.card.output();
        let sample_rate = self.sample_rate;
        tokio::spawn(async move {
            let outcome = match service.fetch_speech(&request.text, request.language).await {
                Some(bytes) => {
                    let buffer = decode_pcm16le(&bytes, sample_rate);
                    match play_on_shared(output, buffer).await {
                        Ok(()) => AudioOutcome::Played,
                        Err(e) => {
                            warn!(target: SESSION_LOG_TARGET, "Error playing audio: {}", e);
                            AudioOutcome::Failed(e.to_string())
                        }
                    }
                }
                None => AudioOutcome::NoAudio,
            };
            if tx
                .send(AppEvent::AudioFinished {
                    kind: request.kind,
                    outcome,
                })
                .is_err()
            {
                debug!(target: SESSION_LOG_TARGET, "Session closed before audio finished.");
            }
        });
    }
}
