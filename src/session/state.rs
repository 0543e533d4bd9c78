//! Screen state machine for a learning session.
//!
//! Every transition is synchronous and invalid transitions are no-ops. Fetches
//! are described by [`FetchRequest`]s that the driver executes; their results
//! come back through [`SessionState::complete_fetch`] and are applied only if
//! their generation is still the one being waited for.

use crate::vocab::{Language, Scenario, VocabularyItem};
use std::fmt::Display;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "trilingual_scenes::session::state";

/// Message shown when a vocabulary list cannot be generated.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to generate vocabulary. Please try again.";

/// Discriminant of [`Screen`], for callers that only need the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Selecting,
    Loading,
    Learning,
    Empty,
}

/// The fetched list together with the position in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    items: Vec<VocabularyItem>,
    index: usize,
    generation: u64,
}

impl Deck {
    fn new(items: Vec<VocabularyItem>, generation: u64) -> Self {
        Deck { items, index: 0, generation }
    }

    pub fn items(&self) -> &[VocabularyItem] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> &VocabularyItem {
        &self.items[self.index]
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.items.len()
    }
}

/// The active screen. Exactly one variant is current at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Selecting,
    Loading { scenario: Scenario, generation: u64 },
    /// Always holds a non-empty deck
    Learning { scenario: Scenario, deck: Deck },
    /// A fetch succeeded with zero items
    Empty { scenario: Scenario },
}

/// Identifies the card on display: which list, which position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardKey {
    pub list_generation: u64,
    pub index: usize,
}

/// A vocabulary fetch the driver should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub scenario_name: String,
    pub language: Language,
}

/// What happened to a fetch result handed to [`SessionState::complete_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The list was installed; `count` may be zero
    Applied { count: usize },
    /// The fetch failed; the session is back on the selection screen
    Failed { message: String },
    /// The result belonged to a superseded fetch and was dropped
    Stale,
}

/// A user-visible notification, e.g. a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    screen: Screen,
    language: Language,
    last_generation: u64,
    notifications: Vec<Notification>,
    /// Failure shown on the selection screen until the next selection
    last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl SessionState {
    pub fn new(language: Language) -> Self {
        SessionState {
            screen: Screen::Selecting,
            language,
            last_generation: 0,
            notifications: Vec::new(),
            last_error: None,
        }
    }

    // --- Accessors ---

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn mode(&self) -> Mode {
        match self.screen {
            Screen::Selecting => Mode::Selecting,
            Screen::Loading { .. } => Mode::Loading,
            Screen::Learning { .. } => Mode::Learning,
            Screen::Empty { .. } => Mode::Empty,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn active_scenario(&self) -> Option<&Scenario> {
        match &self.screen {
            Screen::Selecting => None,
            Screen::Loading { scenario, .. } | Screen::Learning { scenario, .. } | Screen::Empty { scenario } => Some(scenario),
        }
    }

    /// The current list; empty unless learning.
    pub fn vocabulary(&self) -> &[VocabularyItem] {
        match &self.screen {
            Screen::Learning { deck, .. } => deck.items(),
            _ => &[],
        }
    }

    pub fn deck(&self) -> Option<&Deck> {
        match &self.screen {
            Screen::Learning { deck, .. } => Some(deck),
            _ => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.deck().map(Deck::index)
    }

    pub fn current_item(&self) -> Option<&VocabularyItem> {
        self.deck().map(Deck::current)
    }

    pub fn current_card(&self) -> Option<(CardKey, &VocabularyItem)> {
        self.deck().map(|deck| {
            let key = CardKey {
                list_generation: deck.generation,
                index: deck.index,
            };
            (key, deck.current())
        })
    }

    pub fn is_last_card(&self) -> bool {
        self.deck().map_or(false, Deck::is_last)
    }

    /// Generation of the fetch currently awaited, if any.
    pub fn pending_generation(&self) -> Option<u64> {
        match self.screen {
            Screen::Loading { generation, .. } => Some(generation),
            _ => None,
        }
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Message of the last failed fetch, kept until the user selects again.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // --- Transitions ---

    /// Takes effect on the next scenario selection.
    pub fn select_language(&mut self, language: Language) -> bool {
        if self.mode() != Mode::Selecting {
            debug!(target: LOG_TARGET, "Ignoring language change outside the selection screen.");
            return false;
        }
        info!(target: LOG_TARGET, "Target language set to {}", language);
        self.language = language;
        self.last_error = None;
        true
    }

    pub fn select_scenario(&mut self, scenario: &Scenario) -> Option<FetchRequest> {
        if self.mode() != Mode::Selecting {
            debug!(target: LOG_TARGET, "Ignoring scenario selection outside the selection screen.");
            return None;
        }
        Some(self.begin_fetch(scenario.clone()))
    }

    /// Re-rolls the whole list for the active scenario. Only from the last card.
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        let scenario = match &self.screen {
            Screen::Learning { scenario, deck } if deck.is_last() => scenario.clone(),
            _ => {
                debug!(target: LOG_TARGET, "Ignoring refresh: not on the last card.");
                return None;
            }
        };
        Some(self.begin_fetch(scenario))
    }

    fn begin_fetch(&mut self, scenario: Scenario) -> FetchRequest {
        self.last_generation += 1;
        let generation = self.last_generation;
        self.last_error = None;
        info!(target: LOG_TARGET, "Loading vocabulary for '{}' in {} (generation {})", scenario.name, self.language, generation);
        let request = FetchRequest {
            generation,
            scenario_name: scenario.name.clone(),
            language: self.language,
        };
        self.screen = Screen::Loading { scenario, generation };
        request
    }

    /// Applies the result of the fetch stamped with `generation`.
    pub fn complete_fetch<E: Display>(&mut self, generation: u64, result: Result<Vec<VocabularyItem>, E>) -> FetchOutcome {
        let scenario = match &self.screen {
            Screen::Loading { scenario, generation: pending } if *pending == generation => scenario.clone(),
            _ => {
                debug!(target: LOG_TARGET, "Discarding stale vocabulary result (generation {}).", generation);
                return FetchOutcome::Stale;
            }
        };

        match result {
            Ok(items) if items.is_empty() => {
                info!(target: LOG_TARGET, "Vocabulary fetch for '{}' returned no items.", scenario.name);
                self.screen = Screen::Empty { scenario };
                FetchOutcome::Applied { count: 0 }
            }
            Ok(items) => {
                let count = items.len();
                info!(target: LOG_TARGET, "Loaded {} words for '{}'.", count, scenario.name);
                self.screen = Screen::Learning {
                    scenario,
                    deck: Deck::new(items, generation),
                };
                FetchOutcome::Applied { count }
            }
            Err(e) => {
                warn!(target: LOG_TARGET, "Failed to load vocabulary for '{}': {}", scenario.name, e);
                self.screen = Screen::Selecting;
                self.last_error = Some(FETCH_FAILED_MESSAGE.to_string());
                self.notifications.push(Notification {
                    message: FETCH_FAILED_MESSAGE.to_string(),
                });
                FetchOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    pub fn next(&mut self) -> bool {
        match &mut self.screen {
            Screen::Learning { deck, .. } if !deck.is_last() => {
                deck.index += 1;
                true
            }
            _ => false,
        }
    }

    pub fn prev(&mut self) -> bool {
        match &mut self.screen {
            Screen::Learning { deck, .. } if deck.index > 0 => {
                deck.index -= 1;
                true
            }
            _ => false,
        }
    }

    /// Abandons the session. A fetch still in flight is discarded when it lands.
    pub fn exit_to_menu(&mut self) -> bool {
        if self.mode() == Mode::Selecting {
            return false;
        }
        info!(target: LOG_TARGET, "Returning to scenario selection.");
        self.screen = Screen::Selecting;
        true
    }
}
