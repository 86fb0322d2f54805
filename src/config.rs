//! Client configuration
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! environment variables, then command-line flags (applied by the CLI).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

// ============================================================================
// Defaults
// ============================================================================

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://open-api.123pan.com";

/// Value of the `Platform` header the API requires
pub const PLATFORM_HEADER: &str = "open_platform";

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where access tokens and client credentials are kept
pub const DEFAULT_TOKEN_FILE: &str = "access.json";

/// Items requested per page
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Largest page the API accepts
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Smallest meaningful page
pub const MIN_PAGE_LIMIT: u32 = 1;

/// Folder ID of the drive root
pub const ROOT_DIRECTORY_ID: i64 = 0;

/// Environment variable overriding the API host
pub const ENV_BASE_URL: &str = "PAN_BASE_URL";

/// Environment variable holding the client ID
pub const ENV_CLIENT_ID: &str = "PAN_CLIENT_ID";

/// Environment variable holding the client secret
pub const ENV_CLIENT_SECRET: &str = "PAN_CLIENT_SECRET";

/// Clamp a requested page size into the range the API accepts
pub fn clamp_page_limit(limit: u32) -> u32 {
    limit.clamp(MIN_PAGE_LIMIT, MAX_PAGE_LIMIT)
}

// ============================================================================
// ClientConfig
// ============================================================================

/// Runtime configuration for the API client and CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API host, without the `/api` prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Token file path
    pub token_file: PathBuf,
    /// Items per page
    pub page_limit: u32,
    /// Client ID (falls back to the token file)
    pub client_id: Option<String>,
    /// Client secret (falls back to the token file)
    pub client_secret: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            page_limit: DEFAULT_PAGE_LIMIT,
            client_id: None,
            client_secret: None,
        }
    }
}

impl ClientConfig {
    /// Parse a YAML config document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(id) = lookup(ENV_CLIENT_ID) {
            self.client_id = Some(id);
        }
        if let Some(secret) = lookup(ENV_CLIENT_SECRET) {
            self.client_secret = Some(secret);
        }
        self
    }

    /// Check the config and normalize the page size
    pub fn validate(mut self) -> Result<Self> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be positive"));
        }
        self.page_limit = clamp_page_limit(self.page_limit);
        Ok(self)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve an API path such as `/api/v2/file/list` against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(path)?)
    }
}
