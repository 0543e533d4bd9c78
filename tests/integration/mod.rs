//! Integration tests module
//!
//! This module organizes all integration tests for the trilingual-scenes application.

pub mod config_test;
pub mod gemini_client_test;
pub mod session_flow_test;
