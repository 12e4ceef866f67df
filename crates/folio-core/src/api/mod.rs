//! REST API client module for the certificate service.
//!
//! This module provides the `AdminClient` for logging in and managing
//! certificate records, the `ApiError` taxonomy every call fails with,
//! and the normalization that turns arbitrary error bodies into a single
//! display string.
//!
//! The API uses bearer token authentication obtained from `/api/token`.

pub mod client;
pub mod error;
pub mod payload;

pub use client::AdminClient;
pub use error::{ApiError, Operation};
pub use payload::{normalize_error, ErrorPayload, UNKNOWN_ERROR_MESSAGE};
