//! Unit tests - fast tests of individual components through the public API
//!
//! These tests need no metadata backend and run without external services.

mod parser_robustness_tests;
mod projection_tests;
