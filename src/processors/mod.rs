//! Schedule processors.
//!
//! This module contains the report writers. Each of them is selected by a
//! different `--format` value.

pub mod json_report;
pub mod text_report;
