//! Integration tests for Fyvio
//!
//! Tests are organized by component:
//! - catalog_test: backend client (details, similar, seasons, errors)
//! - page_test: series page driven through the loader against a mock backend
//! - ui_test: rendering into a TestBackend
//! - cli_test: argument parsing and command exit codes

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
