//! Main integration test entry point for trilingual-scenes
//!
//! This file serves as the entry point for all integration tests.

// Import the individual test modules
mod integration;

// Re-export the test utilities for use in integration tests
pub mod test_utils;
