//! Utility functions for string formatting and manipulation.

pub mod format;

pub use format::{contains_ignore_case, format_date, format_optional, truncate};
