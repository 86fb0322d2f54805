//! Common types used throughout pan-cli
//!
//! This module contains the API data model shared by the client, the CLI
//! and the pagination tests.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// API Envelope
// ============================================================================

/// Status code the API uses for success
pub const SUCCESS_CODE: i64 = 0;

/// Envelope wrapping every API response: `{code, message, data}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Application status code, 0 on success
    pub code: i64,
    /// Human-readable status
    #[serde(default)]
    pub message: String,
    /// Payload
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check if the API reported success
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

// ============================================================================
// Files
// ============================================================================

/// Kind of entry in a file listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum FileType {
    /// Regular file
    #[default]
    File,
    /// Folder
    Folder,
}

impl From<u8> for FileType {
    fn from(value: u8) -> Self {
        if value == 1 {
            Self::Folder
        } else {
            Self::File
        }
    }
}

impl From<FileType> for u8 {
    fn from(value: FileType) -> Self {
        match value {
            FileType::File => 0,
            FileType::Folder => 1,
        }
    }
}

/// One entry of a file listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// File ID
    #[serde(alias = "fileID")]
    pub file_id: i64,
    /// File name
    pub filename: String,
    /// File or folder
    #[serde(rename = "type", default)]
    pub file_type: FileType,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Content hash
    #[serde(default)]
    pub etag: String,
    /// Parent folder ID
    #[serde(default, rename = "parentFileId", alias = "parentFileID")]
    pub parent_file_id: Option<i64>,
    /// Whether the entry sits in the trash (0/1)
    #[serde(default)]
    pub trashed: Option<u8>,
    /// Creation time, only reported by the detail endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,
}

impl FileInfo {
    /// Check if this entry is a folder
    pub fn is_folder(&self) -> bool {
        self.file_type == FileType::Folder
    }

    /// Check if this entry is in the trash
    pub fn is_trashed(&self) -> bool {
        self.trashed == Some(1)
    }
}

// ============================================================================
// Shares
// ============================================================================

/// One share link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareInfo {
    /// Share ID
    pub share_id: i64,
    /// Display name
    #[serde(default)]
    pub share_name: String,
    /// Key used in the share URL
    #[serde(default)]
    pub share_key: String,
    /// Expiration timestamp as reported by the API
    #[serde(default)]
    pub expiration: Option<String>,
    /// 1 when the link has expired
    #[serde(default)]
    pub expired: u8,
    /// Extraction code, empty when the link is public
    #[serde(default)]
    pub share_pwd: Option<String>,
}

impl ShareInfo {
    /// Check if the link has expired
    pub fn is_expired(&self) -> bool {
        self.expired == 1
    }

    /// Extraction code, if one is set
    pub fn password(&self) -> Option<&str> {
        self.share_pwd.as_deref().filter(|p| !p.is_empty())
    }
}

/// Validity periods, in days, a share link can be created with (0 = permanent)
pub const SHARE_EXPIRE_DAYS: [u32; 4] = [0, 1, 7, 30];

/// Share link returned by the create endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedShare {
    /// Share ID
    #[serde(rename = "shareID", alias = "shareId")]
    pub share_id: i64,
    /// Key used in the share URL
    #[serde(default)]
    pub share_key: String,
    /// Full share URL, when the API includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    /// Extraction code, if one was set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_pwd: Option<String>,
}

/// Download traffic settings for a share link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficOptions {
    /// Whether downloads through the link consume the owner's traffic
    pub enabled: bool,
    /// Traffic cap in bytes; only meaningful when `enabled`
    pub limit_bytes: Option<u64>,
}

// ============================================================================
// Direct links
// ============================================================================

/// Direct download link of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectLink {
    /// Link URL
    pub url: String,
}
