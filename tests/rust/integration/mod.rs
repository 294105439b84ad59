//! Integration tests - end-to-end translation and partition rewriting
//!
//! These tests drive the public entry points with in-memory and YAML
//! metadata stores. No ClickHouse server is required.

mod rewrite_tests;
mod translate_tests;
