use super::{App, Command, Notification, SESSION_LOG_TARGET};
use crate::ui::input::parse_command;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// Presents the session to the user.
pub trait Renderer {
    fn render(&mut self, app: &App);
    fn show_help(&mut self, app: &App);
    fn notify(&mut self, notification: &Notification);
}

/// Drives the session until the user quits or input closes.
pub async fn run_session_loop<R, V>(app: &mut App, input: R, renderer: &mut V) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    V: Renderer,
{
    info!(target: SESSION_LOG_TARGET, "Session loop started.");
    let mut lines = input.lines();
    renderer.render(app);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!(target: SESSION_LOG_TARGET, "Input closed. Exiting session loop.");
                    break;
                };
                match parse_command(&line) {
                    Some(Command::Help) | None => renderer.show_help(app),
                    Some(command) => {
                        debug!(target: SESSION_LOG_TARGET, "Command: {:?}", command);
                        app.handle_command(command);
                        if app.quit_requested() {
                            break;
                        }
                        renderer.render(app);
                    }
                }
            }

            Some(event) = app.next_event() => {
                if app.handle_event(event) {
                    for notification in app.state_mut().take_notifications() {
                        renderer.notify(&notification);
                    }
                    renderer.render(app);
                }
            }
        }
    }

    info!(target: SESSION_LOG_TARGET, "Session loop finished.");
    Ok(())
}
