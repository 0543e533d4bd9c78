//! Terminal user interface

pub mod cli;
pub mod input;
pub mod terminal;
pub mod view;

pub use cli::{Args, Cli};
pub use terminal::TerminalRenderer;
