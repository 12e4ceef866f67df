use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Page size the service uses when no limit is sent
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// A certificate record as returned by the service.
///
/// Only `id` is required; everything else is displayed as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: i64,
    pub title: Option<String>,
    pub issuer: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub verify_url: Option<String>,
    /// Comma separated, e.g. "AWS, Cloud, DevOps"
    pub tags: Option<String>,
    pub image_path: Option<String>,
    pub created_at: Option<String>,
}

impl Certificate {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Untitled")
    }

    pub fn display_issuer(&self) -> &str {
        self.issuer.as_deref().unwrap_or("Unknown issuer")
    }

    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Absolute URL of the attached file under the given API base
    pub fn image_url(&self, api_base: &str) -> Option<String> {
        let path = self.image_path.as_deref().filter(|p| !p.is_empty())?;
        if path.starts_with("http://") || path.starts_with("https://") {
            return Some(path.to_string());
        }
        Some(format!(
            "{}/{}",
            api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    /// Whether the expiry date lies before `today`. Records without a
    /// parseable expiry date never expire.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date
            .as_deref()
            .and_then(parse_date_prefix)
            .map(|expiry| expiry < today)
            .unwrap_or(false)
    }
}

/// Parse the `YYYY-MM-DD` prefix of a date or datetime string
fn parse_date_prefix(value: &str) -> Option<NaiveDate> {
    let prefix: String = value.chars().take(10).collect();
    NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").ok()
}

/// Query for listing certificates.
///
/// Zero and empty values are treated as unset and left out of the query
/// string, so the default filter sends no parameters and the service
/// applies its own defaults (skip 0, limit 50).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateFilter {
    pub skip: u32,
    pub limit: Option<u32>,
    pub issuer: String,
    pub tag: String,
    /// Free-text search, sent as `q`
    pub query: String,
}

impl CertificateFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.skip > 0 {
            pairs.push(("skip", self.skip.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if !self.issuer.is_empty() {
            pairs.push(("issuer", self.issuer.clone()));
        }
        if !self.tag.is_empty() {
            pairs.push(("tag", self.tag.clone()));
        }
        if !self.query.is_empty() {
            pairs.push(("q", self.query.clone()));
        }
        pairs
    }

    pub fn page_size(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn next_page(&self) -> Self {
        Self {
            skip: self.skip.saturating_add(self.page_size()),
            ..self.clone()
        }
    }

    pub fn prev_page(&self) -> Self {
        Self {
            skip: self.skip.saturating_sub(self.page_size()),
            ..self.clone()
        }
    }

    /// 1-based page number for display
    pub fn page_number(&self) -> u32 {
        self.skip / self.page_size() + 1
    }

    pub fn has_search_terms(&self) -> bool {
        !(self.issuer.is_empty() && self.tag.is_empty() && self.query.is_empty())
    }
}

/// Partial update sent as JSON. Unset fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl CertificateUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fields for a new certificate plus the local file to attach.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCertificate {
    pub title: String,
    pub issuer: String,
    /// `YYYY-MM-DD` or an ISO datetime
    pub issue_date: String,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub verify_url: Option<String>,
    pub tags: Option<String>,
    pub file: PathBuf,
}

impl NewCertificate {
    /// Text parts of the multipart body, empty optional fields omitted
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("issuer", self.issuer.clone()),
            ("issue_date", self.issue_date.clone()),
        ];
        let optional = [
            ("expiry_date", &self.expiry_date),
            ("credential_id", &self.credential_id),
            ("verify_url", &self.verify_url),
            ("tags", &self.tags),
        ];
        for (name, value) in optional {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                fields.push((name, v.to_string()));
            }
        }
        fields
    }
}
