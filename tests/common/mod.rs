//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `assertions`: assertion helpers with descriptive failure messages
//! - `fixtures`: call spec documents and temp-file helpers

pub mod assertions;
pub mod fixtures;

pub use assertions::{assert_report_layout, parse_json_lines};
pub use fixtures::{write_spec, SUM_SPEC};
