//! Auth types
//!
//! Client credentials, cached access tokens and the on-disk token file.

use crate::types::JsonObject;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Format older token files use for `expired_at` (local time)
pub const LEGACY_EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client ID and secret issued by the developer console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}

/// Contents of the token file (`access.json`).
///
/// Unknown keys are carried through untouched when the file is rewritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenFile {
    /// Client ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Client secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Last issued access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Expiry of `access_token`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<String>,
    /// Anything else found in the file
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl TokenFile {
    /// Credentials stored in the file, if both halves are present
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some(Credentials::new(id, secret)),
            _ => None,
        }
    }

    /// Stored token, if it has both a value and a readable expiry
    pub fn cached_token(&self) -> Option<CachedToken> {
        let token = self.access_token.as_ref()?;
        let expires_at = parse_expiry(self.expired_at.as_deref()?)?;
        Some(CachedToken::new(token.clone(), Some(expires_at)))
    }

    /// Record a freshly issued token
    pub fn set_token(&mut self, token: &CachedToken) {
        self.access_token = Some(token.token.clone());
        self.expired_at = token.expires_at.map(|t| t.to_rfc3339());
    }
}

/// Parse an expiry timestamp: RFC 3339, or the legacy local-time format
pub fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, LEGACY_EXPIRY_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod type_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cached_token_not_expired() {
        let token = CachedToken::expires_in("test".to_string(), 3600);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_cached_token_expired() {
        let token = CachedToken::expires_in("test".to_string(), -100);
        assert!(token.is_expired());
    }

    #[test]
    fn test_cached_token_inside_buffer_is_expired() {
        let token = CachedToken::expires_in("test".to_string(), 10);
        assert!(token.is_expired());
    }

    #[test]
    fn test_cached_token_no_expiration() {
        let token = CachedToken::new("test".to_string(), None);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_parse_expiry_formats() {
        let rfc = parse_expiry("2025-03-23T15:48:37+08:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2025-03-23T07:48:37+00:00");

        assert!(parse_expiry("2025-03-23 15:48:37").is_some());
        assert!(parse_expiry("next tuesday").is_none());
    }

    #[test]
    fn test_token_file_keeps_unknown_keys() {
        let file: TokenFile = serde_json::from_value(json!({
            "client_id": "id",
            "client_secret": "secret",
            "note": "keep me"
        }))
        .unwrap();

        assert_eq!(file.credentials(), Some(Credentials::new("id", "secret")));
        assert!(file.cached_token().is_none());

        let written = serde_json::to_value(&file).unwrap();
        assert_eq!(written["note"], "keep me");
        assert!(written.get("access_token").is_none());
    }

    #[test]
    fn test_token_file_set_token() {
        let mut file = TokenFile::default();
        file.set_token(&CachedToken::expires_in("tok".to_string(), 3600));

        let cached = file.cached_token().unwrap();
        assert_eq!(cached.token, "tok");
        assert!(!cached.is_expired());
    }
}
