//! Data models for the certificate service.
//!
//! - `Certificate`, `CertificateFilter`, `CertificateUpdate`, `NewCertificate`:
//!   records and the shapes used to query, create and edit them
//! - `TokenResponse`, `CurrentUser`, `HealthStatus`, `DeleteResponse`:
//!   account and housekeeping responses

pub mod account;
pub mod certificate;

pub use account::{CurrentUser, DeleteResponse, HealthStatus, TokenResponse};
pub use certificate::{
    Certificate, CertificateFilter, CertificateUpdate, NewCertificate, DEFAULT_PAGE_SIZE,
};
