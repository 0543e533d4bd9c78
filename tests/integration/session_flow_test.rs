//! Integration tests for the learning session
//!
//! These tests drive the session through its public surface with an
//! in-memory vocabulary service.

use crate::test_utils::{MockVocabularyService, RecordingRenderer, RecordingSink};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use trilingual_scenes::audio::shared;
use trilingual_scenes::session::{run_session_loop, App, AudioKind, Command, ImageState, Mode, FETCH_FAILED_MESSAGE};
use trilingual_scenes::vocab::{builtin_scenarios, Language};

#[cfg(test)]
mod session_integration_tests {
    use super::*;

    fn new_app(service: Arc<MockVocabularyService>) -> (App, Arc<Mutex<Vec<usize>>>) {
        let played = Arc::new(Mutex::new(Vec::new()));
        let sink = shared(Box::new(RecordingSink { played: played.clone() }));
        let app = App::new(service, sink, builtin_scenarios(), Language::English, 24000);
        (app, played)
    }

    async fn pump_until<F: Fn(&App) -> bool>(app: &mut App, done: F) -> Result<(), Box<dyn Error>> {
        let wait = async {
            while !done(&*app) {
                match app.next_event().await {
                    Some(event) => {
                        app.handle_event(event);
                    }
                    None => break,
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait).await?;
        Ok(())
    }

    async fn drain(app: &mut App, quiet: Duration) {
        while let Ok(Some(event)) = tokio::time::timeout(quiet, app.next_event()).await {
            app.handle_event(event);
        }
    }

    /// Pick a scene, walk to the last card, then re-roll the list
    #[tokio::test]
    async fn test_learning_walkthrough() -> Result<(), Box<dyn Error>> {
        let service = Arc::new(MockVocabularyService::new(5));
        let (mut app, _) = new_app(service.clone());

        assert!(app.handle_command(Command::ChooseScenario(0)));
        assert_eq!(app.state().active_scenario().unwrap().name, "Cafe & Ordering");
        pump_until(&mut app, |app| app.state().mode() == Mode::Learning).await?;

        assert_eq!(app.state().vocabulary().len(), 5);
        assert_eq!(app.state().current_index(), Some(0));
        assert!(!app.handle_command(Command::Refresh));

        for expected in 1..5 {
            assert!(app.handle_command(Command::Next));
            assert_eq!(app.state().current_index(), Some(expected));
        }
        assert!(app.state().is_last_card());
        assert!(!app.handle_command(Command::Next));

        let first_words: Vec<String> = app.state().vocabulary().iter().map(|item| item.word.clone()).collect();
        assert!(app.handle_command(Command::Refresh));
        assert_eq!(app.state().mode(), Mode::Loading);
        pump_until(&mut app, |app| app.state().mode() == Mode::Learning).await?;

        assert_eq!(app.state().current_index(), Some(0));
        assert_eq!(app.state().vocabulary().len(), 5);
        assert_ne!(app.state().current_item().unwrap().word, first_words[0]);
        assert_eq!(service.vocabulary_calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_images_follow_navigation() -> Result<(), Box<dyn Error>> {
        let service = Arc::new(MockVocabularyService::new(3));
        let (mut app, _) = new_app(service.clone());

        app.handle_command(Command::ChooseScenario(1));
        pump_until(&mut app, |app| matches!(app.card().image(), ImageState::Ready(_))).await?;

        app.handle_command(Command::Next);
        assert_eq!(app.card().image(), &ImageState::Loading);
        pump_until(&mut app, |app| matches!(app.card().image(), ImageState::Ready(_))).await?;

        let word = app.state().current_item().unwrap().word.replace(' ', "_");
        match app.card().image() {
            ImageState::Ready(image) => assert!(image.to_uri().ends_with(&word)),
            other => panic!("unexpected image state {:?}", other),
        }
        assert_eq!(service.image_calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_to_menu() -> Result<(), Box<dyn Error>> {
        let (mut app, _) = new_app(Arc::new(MockVocabularyService::failing()));

        app.handle_command(Command::ChooseScenario(3));
        pump_until(&mut app, |app| app.state().mode() != Mode::Loading).await?;

        assert_eq!(app.state().mode(), Mode::Selecting);
        assert!(app.state().vocabulary().is_empty());
        let notifications = app.state_mut().take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].message, FETCH_FAILED_MESSAGE);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_list_shows_empty_screen() -> Result<(), Box<dyn Error>> {
        let (mut app, _) = new_app(Arc::new(MockVocabularyService::new(0)));

        app.handle_command(Command::ChooseScenario(0));
        pump_until(&mut app, |app| app.state().mode() != Mode::Loading).await?;

        assert_eq!(app.state().mode(), Mode::Empty);
        assert!(!app.card().is_showing());
        assert!(app.handle_command(Command::Exit));
        assert_eq!(app.state().mode(), Mode::Selecting);
        Ok(())
    }

    #[tokio::test]
    async fn test_only_one_playback_at_a_time() -> Result<(), Box<dyn Error>> {
        let service = Arc::new(MockVocabularyService::new(2));
        let (mut app, played) = new_app(service.clone());

        assert!(app.handle_command(Command::SelectLanguage(Language::Japanese)));
        app.handle_command(Command::ChooseScenario(0));
        pump_until(&mut app, |app| app.state().mode() == Mode::Learning).await?;

        assert!(app.handle_command(Command::PlayWord));
        assert!(!app.handle_command(Command::PlaySentence));
        assert_eq!(app.card().audio_in_flight(), Some(AudioKind::Word));
        pump_until(&mut app, |app| app.card().audio_in_flight().is_none()).await?;

        assert_eq!(service.speech_calls(), 1);
        let word = app.state().current_item().unwrap().word.clone();
        assert_eq!(*service.spoken.lock().unwrap(), vec![(word, Language::Japanese)]);
        assert_eq!(*played.lock().unwrap(), vec![3]);

        // A second action is accepted once the first has finished
        assert!(app.handle_command(Command::PlaySentence));
        pump_until(&mut app, |app| app.card().audio_in_flight().is_none()).await?;
        assert_eq!(service.speech_calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_audio_clears_loading_flag() -> Result<(), Box<dyn Error>> {
        let mut service = MockVocabularyService::new(1);
        service.speech = None;
        let (mut app, played) = new_app(Arc::new(service));

        app.handle_command(Command::ChooseScenario(0));
        pump_until(&mut app, |app| app.state().mode() == Mode::Learning).await?;
        assert!(app.handle_command(Command::PlaySentence));
        pump_until(&mut app, |app| app.card().audio_in_flight().is_none()).await?;

        assert!(played.lock().unwrap().is_empty());
        Ok(())
    }

    /// A slow list for an abandoned scene must not replace the new one
    #[tokio::test]
    async fn test_abandoned_fetch_is_discarded() -> Result<(), Box<dyn Error>> {
        let service = Arc::new(MockVocabularyService::new(2).with_delay("Cafe & Ordering", Duration::from_millis(200)));
        let (mut app, _) = new_app(service.clone());
        let second = app.scenarios()[1].name.clone();

        app.handle_command(Command::ChooseScenario(0));
        assert!(app.handle_command(Command::Exit));
        app.handle_command(Command::ChooseScenario(1));

        pump_until(&mut app, |app| app.state().mode() == Mode::Learning).await?;
        drain(&mut app, Duration::from_millis(400)).await;

        assert_eq!(service.vocabulary_calls(), 2);
        assert_eq!(app.state().active_scenario().unwrap().name, second);
        assert!(app.state().vocabulary().iter().all(|item| item.word.starts_with(&second)));
        Ok(())
    }

    #[tokio::test]
    async fn test_result_after_exit_leaves_menu_untouched() -> Result<(), Box<dyn Error>> {
        let service = Arc::new(MockVocabularyService::new(2).with_delay("Cafe & Ordering", Duration::from_millis(50)));
        let (mut app, _) = new_app(service);

        app.handle_command(Command::ChooseScenario(0));
        app.handle_command(Command::Exit);
        drain(&mut app, Duration::from_millis(300)).await;

        assert_eq!(app.state().mode(), Mode::Selecting);
        assert!(!app.card().is_showing());
        Ok(())
    }

    /// Drive the whole loop from scripted terminal input
    #[tokio::test]
    async fn test_session_loop_with_scripted_input() -> Result<(), Box<dyn Error>> {
        let service = Arc::new(MockVocabularyService::new(3));
        let (mut app, _) = new_app(service);
        let (mut keyboard, terminal) = tokio::io::duplex(256);
        let mut renderer = RecordingRenderer::default();

        let typist = tokio::spawn(async move {
            let script: [(&[u8], u64); 4] = [(b"1\n", 200), (b"n\n", 50), (b"dance\n", 50), (b"q\n", 0)];
            for (line, pause) in script {
                if keyboard.write_all(line).await.is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(pause)).await;
            }
            keyboard
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            run_session_loop(&mut app, tokio::io::BufReader::new(terminal), &mut renderer),
        )
        .await??;
        drop(typist.await?);

        assert!(app.quit_requested());
        assert_eq!(renderer.frames.first().map(|f| f.mode), Some(Mode::Selecting));
        assert!(renderer.frames.iter().any(|f| f.mode == Mode::Loading));
        assert!(renderer.frames.iter().any(|f| f.mode == Mode::Learning && f.index == Some(1)));
        assert_eq!(renderer.help_shown, 1);
        assert!(renderer.notifications.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_session_loop_reports_failures() -> Result<(), Box<dyn Error>> {
        let (mut app, _) = new_app(Arc::new(MockVocabularyService::failing()));
        let (mut keyboard, terminal) = tokio::io::duplex(256);
        let mut renderer = RecordingRenderer::default();

        let typist = tokio::spawn(async move {
            let _ = keyboard.write_all(b"2\n").await;
            tokio::time::sleep(Duration::from_millis(200)).await;
            // Closing the input ends the loop
            drop(keyboard);
        });

        tokio::time::timeout(
            Duration::from_secs(5),
            run_session_loop(&mut app, tokio::io::BufReader::new(terminal), &mut renderer),
        )
        .await??;
        typist.await?;

        assert_eq!(renderer.notifications, vec![FETCH_FAILED_MESSAGE.to_string()]);
        // The last frame is drawn after the notification and still carries it
        assert_eq!(app.state().last_error(), Some(FETCH_FAILED_MESSAGE));
        assert_eq!(renderer.frames.last().map(|f| f.mode), Some(Mode::Selecting));
        Ok(())
    }
}
