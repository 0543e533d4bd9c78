//! Configuration loading, overriding and validation

mod settings;

pub use settings::*;
