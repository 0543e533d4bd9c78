//! Vocabulary domain types and the built-in scenario catalogue

pub mod models;
pub mod scenarios;

pub use models::*;
pub use scenarios::builtin_scenarios;
