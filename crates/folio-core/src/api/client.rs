//! API client for the certificate service.
//!
//! This module provides the `AdminClient` struct for logging in and for
//! listing, creating, editing and deleting certificate records.

use std::path::Path;
use std::time::Duration;

use reqwest::{header, multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::auth::SharedSession;
use crate::models::{
    Certificate, CertificateFilter, CertificateUpdate, CurrentUser, DeleteResponse, HealthStatus,
    NewCertificate, TokenResponse,
};

use super::{ApiError, ErrorPayload, Operation};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Covers slow uploads while still failing fast enough for an interactive client.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Multipart field carrying the file on create
const CREATE_FILE_FIELD: &str = "image";

/// Multipart field carrying the file on replace
const REPLACE_FILE_FIELD: &str = "new_file";

/// API client for the certificate service.
/// Clone is cheap - reqwest::Client uses Arc internally and the session is shared.
#[derive(Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    session: SharedSession,
}

impl AdminClient {
    /// Create a client with the default 30 second timeout
    pub fn new(base_url: &str, session: SharedSession) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, session, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: &str,
        session: SharedSession,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_authenticated()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Bearer header for the current session, along with the token it carries
    fn auth_headers(&self) -> (header::HeaderMap, Option<String>) {
        let mut headers = header::HeaderMap::new();
        let session = self.session.read().unwrap_or_else(|e| e.into_inner());
        let Some(token) = session.token() else {
            return (headers, None);
        };
        match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => {
                headers.insert(header::AUTHORIZATION, value);
                (headers, Some(token.to_string()))
            }
            Err(_) => {
                warn!("Stored token is not a valid header value, sending without it");
                (headers, None)
            }
        }
    }

    /// Drop the token the service rejected, unless the session has moved on
    /// to another one since the request was sent.
    fn expire_session(&self, sent_token: Option<&str>) {
        let Some(token) = sent_token else {
            debug!("Rejected request carried no token, session kept");
            return;
        };
        let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
        match session.clear_if_current(token) {
            Ok(true) => info!("Session expired, token cleared"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to clear expired session"),
        }
    }

    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
        sent_token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            let err = ApiError::from(e);
            warn!(?operation, error = %err, "Request failed");
            err
        })?;
        self.check_response(operation, response, sent_token).await
    }

    /// Check if response is successful, converting the body into an error if not.
    async fn check_response(
        &self,
        operation: Operation,
        response: Response,
        sent_token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) if e.is_timeout() => return Err(ApiError::RequestTimeout),
            Err(_) => Vec::new(),
        };
        debug!(
            ?operation,
            status = %status,
            body = %ApiError::truncate_body(&String::from_utf8_lossy(&body)),
            "Error response"
        );

        let payload = ErrorPayload::from_body(&body, operation.fallback_message());
        let err = ApiError::from_status(operation, status, &payload);
        if err.is_session_expired() {
            self.expire_session(sent_token);
        }
        warn!(?operation, status = %status, error = %err, "Request rejected");
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(operation: Operation, response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(?operation, error = %e, "Failed to parse response");
            ApiError::InvalidResponse(format!("{:?}: {}", operation, e))
        })
    }

    async fn file_part(path: &Path) -> Result<multipart::Part, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        debug!(file = %file_name, mime = %mime, size = bytes.len(), "Prepared upload");

        Ok(multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.essence_str())?)
    }

    // ===== Session =====

    /// Exchange credentials for a bearer token and start the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = self.url("/api/token");
        debug!(url = %url, username, "Logging in");

        let request = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)]);
        let response = self.send(Operation::Login, request, None).await?;
        let token: TokenResponse = Self::read_json(Operation::Login, response).await?;

        {
            let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
            if let Err(e) = session.start(token.access_token.clone()) {
                warn!(error = %e, "Failed to persist token");
            }
        }

        info!(username, "Login successful");
        Ok(token)
    }

    /// End the session locally. The service keeps no session state to revoke.
    pub fn logout(&self) -> anyhow::Result<()> {
        let mut session = self.session.write().unwrap_or_else(|e| e.into_inner());
        session.clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Fetch the account the current token belongs to
    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        let (headers, token) = self.auth_headers();
        let request = self.client.get(self.url("/api/me")).headers(headers);
        let response = self.send(Operation::CurrentUser, request, token.as_deref()).await?;
        Self::read_json(Operation::CurrentUser, response).await
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let request = self.client.get(self.url("/health"));
        let response = self.send(Operation::Health, request, None).await?;
        Self::read_json(Operation::Health, response).await
    }

    // ===== Certificates =====

    /// List certificates matching the filter, newest first
    pub async fn list_certificates(&self, filter: &CertificateFilter) -> Result<Vec<Certificate>, ApiError> {
        let url = self.url("/api/certificates");
        let pairs = filter.query_pairs();
        debug!(url = %url, params = pairs.len(), "Listing certificates");

        let request = self.client.get(&url).query(&pairs);
        let response = self.send(Operation::ListCertificates, request, None).await?;
        let certificates: Vec<Certificate> =
            Self::read_json(Operation::ListCertificates, response).await?;

        debug!(count = certificates.len(), "Certificates loaded");
        Ok(certificates)
    }

    /// Create a certificate with its attached file
    pub async fn create_certificate(&self, new: &NewCertificate) -> Result<Certificate, ApiError> {
        let mut form = multipart::Form::new();
        for (name, value) in new.text_fields() {
            form = form.text(name, value);
        }
        form = form.part(CREATE_FILE_FIELD, Self::file_part(&new.file).await?);

        let (headers, token) = self.auth_headers();
        let request = self
            .client
            .post(self.url("/api/certificates"))
            .headers(headers)
            .multipart(form);
        let response = self.send(Operation::CreateCertificate, request, token.as_deref()).await?;
        let created: Certificate = Self::read_json(Operation::CreateCertificate, response).await?;

        info!(id = created.id, title = %created.display_title(), "Certificate created");
        Ok(created)
    }

    pub async fn update_certificate(&self, id: i64, update: &CertificateUpdate) -> Result<Certificate, ApiError> {
        let (headers, token) = self.auth_headers();
        let request = self
            .client
            .patch(self.url(&format!("/api/certificates/{}", id)))
            .headers(headers)
            .json(update);
        let response = self.send(Operation::UpdateCertificate, request, token.as_deref()).await?;
        let updated: Certificate = Self::read_json(Operation::UpdateCertificate, response).await?;

        info!(id, "Certificate updated");
        Ok(updated)
    }

    /// Replace the attached file, sent as the `new_file` multipart field
    pub async fn replace_certificate_file(&self, id: i64, file: &Path) -> Result<Certificate, ApiError> {
        let form = multipart::Form::new().part(REPLACE_FILE_FIELD, Self::file_part(file).await?);

        let (headers, token) = self.auth_headers();
        let request = self
            .client
            .put(self.url(&format!("/api/certificates/{}/file", id)))
            .headers(headers)
            .multipart(form);
        let response = self.send(Operation::ReplaceFile, request, token.as_deref()).await?;
        let updated: Certificate = Self::read_json(Operation::ReplaceFile, response).await?;

        info!(id, "Certificate file replaced");
        Ok(updated)
    }

    pub async fn delete_certificate(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        let (headers, token) = self.auth_headers();
        let request = self
            .client
            .delete(self.url(&format!("/api/certificates/{}", id)))
            .headers(headers);
        let response = self.send(Operation::DeleteCertificate, request, token.as_deref()).await?;
        let deleted: DeleteResponse = Self::read_json(Operation::DeleteCertificate, response).await?;

        info!(id, "Certificate deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = AdminClient::new("http://127.0.0.1:8000/", Session::in_memory().into_shared())
            .expect("client");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.url("/api/token"), "http://127.0.0.1:8000/api/token");
    }

    #[test]
    fn test_auth_headers_follow_session() {
        let session = Session::in_memory().into_shared();
        let client = AdminClient::new("http://localhost", session.clone()).expect("client");
        let (headers, token) = client.auth_headers();
        assert!(headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(token, None);

        session.write().unwrap().start("tok".to_string()).unwrap();
        let (headers, token) = client.auth_headers();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer tok");
        assert_eq!(token.as_deref(), Some("tok"));
        assert!(client.is_authenticated());

        client.logout().unwrap();
        let (headers, token) = client.auth_headers();
        assert!(headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(token, None);
    }
}
