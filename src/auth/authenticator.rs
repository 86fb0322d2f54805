//! Authenticator implementation
//!
//! Hands out access tokens, fetching a new one from the token endpoint when
//! the cached one is missing or expired, and keeps the token file in sync.

use super::types::{parse_expiry, CachedToken, Credentials, TokenFile};
use crate::config::{ClientConfig, PLATFORM_HEADER};
use crate::error::{Error, Result};
use crate::types::ApiResponse;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Path of the token endpoint
pub const ACCESS_TOKEN_PATH: &str = "/api/v1/access_token";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    #[serde(rename = "clientID")]
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenData {
    access_token: String,
    expired_at: Option<String>,
}

/// Authenticator handles applying the access token to API requests
pub struct Authenticator {
    /// Where tokens are persisted; `None` keeps them in memory only
    token_file: Option<PathBuf>,
    /// Client credentials for fetching new tokens
    credentials: Option<Credentials>,
    /// Cached token
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// Token endpoint
    token_url: Url,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Build an authenticator from the client config.
    ///
    /// Reads the token file if it exists. Credentials from the config win over
    /// those stored in the file.
    pub fn from_config(config: &ClientConfig, http_client: Client) -> Result<Self> {
        let stored = read_token_file(&config.token_file);

        let credentials = match (&config.client_id, &config.client_secret) {
            (Some(id), Some(secret)) => Some(Credentials::new(id, secret)),
            _ => stored.credentials(),
        };

        let cached = stored.cached_token().filter(|t| !t.is_expired());
        if cached.is_some() {
            debug!("Loaded valid access token from {}", config.token_file.display());
        } else if stored.access_token.is_some() {
            info!("Stored access token expired or incomplete, a new one will be requested");
        }

        Ok(Self {
            token_file: Some(config.token_file.clone()),
            credentials,
            cached_token: Arc::new(RwLock::new(cached)),
            token_url: config.endpoint(ACCESS_TOKEN_PATH)?,
            http_client,
        })
    }

    /// Authenticator that always uses a fixed token and never persists anything
    pub fn with_static_token(token: impl Into<String>, token_url: Url) -> Self {
        Self {
            token_file: None,
            credentials: None,
            cached_token: Arc::new(RwLock::new(Some(CachedToken::new(token.into(), None)))),
            token_url,
            http_client: Client::new(),
        }
    }

    /// Apply the access token and platform header to a request
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(req
            .header("Authorization", token)
            .header("Platform", PLATFORM_HEADER))
    }

    /// Get a valid token, refreshing if necessary
    pub async fn access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_new_token().await?;
        if let Err(e) = self.persist(&new_token) {
            warn!("Failed to save access token: {e}");
        }
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Request a new token with the client credentials
    async fn fetch_new_token(&self) -> Result<CachedToken> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            Error::credentials("no client_id/client_secret in config, environment or token file")
        })?;

        let body = TokenRequest {
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
        };

        let response = self
            .http_client
            .post(self.token_url.clone())
            .header("Platform", PLATFORM_HEADER)
            .json(&body)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenExpired {
                message: format!("Token request failed with status {status}: {body}"),
            });
        }

        let envelope: ApiResponse<TokenData> = response
            .json()
            .await
            .map_err(|e| Error::decode(format!("invalid token response: {e}")))?;

        if !envelope.is_success() {
            return Err(Error::api(envelope.code, envelope.message));
        }

        let data = envelope
            .data
            .ok_or_else(|| Error::decode("token response has no data"))?;
        let expires_at = data.expired_at.as_deref().and_then(parse_expiry);
        info!("Obtained new access token");

        Ok(CachedToken::new(data.access_token, expires_at))
    }

    /// Merge the token into the token file
    fn persist(&self, token: &CachedToken) -> Result<()> {
        let Some(path) = &self.token_file else {
            return Ok(());
        };

        let mut stored = read_token_file(path);
        stored.set_token(token);
        if let Some(credentials) = &self.credentials {
            stored.client_id = Some(credentials.client_id.clone());
            stored.client_secret = Some(credentials.client_secret.clone());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename for atomicity
        let contents = serde_json::to_string_pretty(&stored)?;
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, contents)?;
        std::fs::rename(&temp_path, path)?;

        debug!("Access token saved to {}", path.display());
        Ok(())
    }
}

/// Read the token file, treating a missing or unreadable file as empty
fn read_token_file(path: &Path) -> TokenFile {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!("No token file at {}: {e}", path.display());
            return TokenFile::default();
        }
    };

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        warn!("Ignoring malformed token file {}: {e}", path.display());
        TokenFile::default()
    })
}
