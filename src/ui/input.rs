use crate::session::Command;
use crate::vocab::Language;

/// One-line summary of the interactive commands.
pub const HELP_TEXT: &str = "[1-9] choose scene  [l <lang>] language  [n]ext  [p]rev  [r] new words  [w] play word  [s] play sentence  [x] exit  [q] quit";

/// Parses one line of user input. Returns `None` for anything unrecognised.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    if let Ok(number) = head.parse::<usize>() {
        return number.checked_sub(1).map(Command::ChooseScenario);
    }

    match head.to_lowercase().as_str() {
        "l" | "lang" | "language" => {
            if rest.is_empty() {
                Some(Command::CycleLanguage)
            } else {
                rest.parse::<Language>().ok().map(Command::SelectLanguage)
            }
        }
        "n" | "next" => Some(Command::Next),
        "p" | "prev" => Some(Command::Prev),
        "r" | "refresh" => Some(Command::Refresh),
        "w" | "word" => Some(Command::PlayWord),
        "s" | "sentence" => Some(Command::PlaySentence),
        "x" | "exit" | "b" | "back" => Some(Command::Exit),
        "h" | "help" | "?" => Some(Command::Help),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}
