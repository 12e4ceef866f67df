use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use super::payload::ErrorPayload;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Session expired - please login again")]
    SessionExpired,

    #[error("File too large - maximum size is {}MB", MAX_UPLOAD_MB)]
    PayloadTooLarge,

    #[error("Request timeout - please try again")]
    RequestTimeout,

    #[error("Server error - please try again later")]
    ServerUnavailable,

    #[error("{0}")]
    RequestRejected(String),

    #[error("Network error: {0}")]
    NetworkFailure(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Could not read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Upload size limit enforced by the service, in megabytes
pub const MAX_UPLOAD_MB: u64 = 10;

/// Maximum length for error response bodies in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The call a failure came from. Each call maps HTTP statuses onto the
/// taxonomy a little differently, and has its own message for bodies that
/// cannot be read at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    ListCertificates,
    CreateCertificate,
    UpdateCertificate,
    ReplaceFile,
    DeleteCertificate,
    CurrentUser,
    Health,
}

impl Operation {
    /// Message used when the error body is neither JSON nor text
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::Login => "Login failed",
            Operation::ListCertificates => "Failed to load certificates",
            Operation::CreateCertificate => "Failed to create certificate",
            Operation::UpdateCertificate => "Failed to update certificate",
            Operation::ReplaceFile => "Failed to replace file",
            Operation::DeleteCertificate => "Failed to delete certificate",
            Operation::CurrentUser => "Failed to load account",
            Operation::Health => "Health check failed",
        }
    }

    fn uploads_file(&self) -> bool {
        matches!(self, Operation::CreateCertificate | Operation::ReplaceFile)
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    /// Classify a non-success response for the given operation.
    pub fn from_status(operation: Operation, status: StatusCode, payload: &ErrorPayload) -> Self {
        match (operation, status.as_u16()) {
            (Operation::Login, 401) => ApiError::InvalidCredentials,
            (Operation::Login, 500..=599) => ApiError::ServerUnavailable,
            (Operation::Health, _) => ApiError::RequestRejected(payload.message()),
            (_, 401) => ApiError::SessionExpired,
            (op, 413) if op.uploads_file() => ApiError::PayloadTooLarge,
            _ => ApiError::RequestRejected(payload.message()),
        }
    }

    /// Whether this failure means the stored token is no longer accepted
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::RequestTimeout
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::NetworkFailure(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> ErrorPayload {
        ErrorPayload::from(json!({"detail": "Certificate not found"}))
    }

    #[test]
    fn test_login_status_mapping() {
        let body = ErrorPayload::from(json!({"detail": "Incorrect username or password"}));
        assert!(matches!(
            ApiError::from_status(Operation::Login, StatusCode::UNAUTHORIZED, &body),
            ApiError::InvalidCredentials
        ));
        assert!(matches!(
            ApiError::from_status(Operation::Login, StatusCode::BAD_GATEWAY, &body),
            ApiError::ServerUnavailable
        ));
        match ApiError::from_status(Operation::Login, StatusCode::UNPROCESSABLE_ENTITY, &body) {
            ApiError::RequestRejected(msg) => assert_eq!(msg, "Incorrect username or password"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_credentials_message_ignores_body() {
        let err = ApiError::from_status(
            Operation::Login,
            StatusCode::UNAUTHORIZED,
            &ErrorPayload::Text("anything at all".to_string()),
        );
        assert_eq!(err.to_string(), "Invalid username or password");
    }

    #[test]
    fn test_authenticated_calls_map_401_to_session_expired() {
        for op in [
            Operation::ListCertificates,
            Operation::CreateCertificate,
            Operation::UpdateCertificate,
            Operation::ReplaceFile,
            Operation::DeleteCertificate,
            Operation::CurrentUser,
        ] {
            let err = ApiError::from_status(op, StatusCode::UNAUTHORIZED, &payload());
            assert!(err.is_session_expired(), "{:?}", op);
        }
    }

    #[test]
    fn test_413_only_for_uploads() {
        assert!(matches!(
            ApiError::from_status(Operation::CreateCertificate, StatusCode::PAYLOAD_TOO_LARGE, &payload()),
            ApiError::PayloadTooLarge
        ));
        assert!(matches!(
            ApiError::from_status(Operation::ReplaceFile, StatusCode::PAYLOAD_TOO_LARGE, &payload()),
            ApiError::PayloadTooLarge
        ));
        assert!(matches!(
            ApiError::from_status(Operation::UpdateCertificate, StatusCode::PAYLOAD_TOO_LARGE, &payload()),
            ApiError::RequestRejected(_)
        ));
        assert_eq!(
            ApiError::PayloadTooLarge.to_string(),
            "File too large - maximum size is 10MB"
        );
    }

    #[test]
    fn test_server_errors_outside_login_are_rejections() {
        match ApiError::from_status(Operation::DeleteCertificate, StatusCode::INTERNAL_SERVER_ERROR, &payload()) {
            ApiError::RequestRejected(msg) => assert_eq!(msg, "Certificate not found"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(ApiError::truncate_body("short"), "short");
        let long = "é".repeat(400);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.ends_with("(truncated, 800 total bytes)"));
    }
}
