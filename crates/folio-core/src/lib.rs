//! Core library for the folio certificate portfolio.
//!
//! - `api`: HTTP client for the certificate service and its error taxonomy
//! - `auth`: bearer-token session and the stores that persist it
//! - `config`: application configuration and API base resolution
//! - `models`: certificate, token and user records
//! - `presentation`: timer and scroll driven display state (typewriter,
//!   navigation, menu, lazy images, toasts, rate limiting)
//! - `utils`: string formatting helpers

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod presentation;
pub mod utils;

pub use api::{AdminClient, ApiError};
pub use auth::{Session, SessionState, SharedSession};
pub use config::Config;
