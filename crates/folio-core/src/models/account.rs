use serde::{Deserialize, Serialize};

/// Response from `/api/token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Response from `/api/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub created_at: Option<String>,
}

/// Response from `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Response from deleting a certificate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.token_type, "bearer");
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(health.is_ok());
        assert!(!HealthStatus { status: "degraded".into() }.is_ok());
    }
}
