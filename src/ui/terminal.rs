//! Renders the session to the terminal.

use crate::session::{App, Mode, Notification, Renderer};
use crate::ui::input::HELP_TEXT;
use crate::ui::view::render_screen;
use crossterm::style::Stylize;
use crossterm::{cursor, execute, terminal};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, warn};

const LOG_TARGET: &str = "trilingual_scenes::ui::terminal";

/// Clears and redraws the screen on every change, with a spinner while loading.
pub struct TerminalRenderer {
    spinner: Option<ProgressBar>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        TerminalRenderer { spinner: None }
    }

    fn clear(&self) {
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0)) {
            warn!(target: LOG_TARGET, "Failed to clear terminal: {}", e);
        }
    }

    fn start_spinner(&mut self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Loading...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    pub fn spinner_active(&self) -> bool {
        self.spinner.is_some()
    }

    fn prompt(&self) {
        print!("{} ", ">".bold());
        let _ = io::stdout().flush();
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, app: &App) {
        self.stop_spinner();
        self.clear();
        let frame = render_screen(app);
        match app.state().last_error() {
            // Errors stand out in red
            Some(message) => println!("{}", frame.replace(message, &message.red().bold().to_string())),
            None => println!("{}", frame),
        }
        if app.state().mode() == Mode::Loading {
            self.start_spinner();
        } else {
            self.prompt();
        }
    }

    fn show_help(&mut self, _app: &App) {
        println!("{}", HELP_TEXT.dark_grey());
        self.prompt();
    }

    /// The message itself is part of the next frame; this only rings the bell.
    fn notify(&mut self, notification: &Notification) {
        debug!(target: LOG_TARGET, "Notification: {}", notification.message);
        print!("\x07");
        let _ = io::stdout().flush();
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}
