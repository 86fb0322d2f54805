//! File management, direct link and share endpoints
//!
//! Every call goes through the same envelope handling as the list endpoints.
//! Mutating calls resolve to `()` once the API reports success.

use super::client::PanClient;
use crate::error::{Error, Result};
use crate::types::{
    CreatedShare, DirectLink, FileInfo, JsonValue, TrafficOptions, SHARE_EXPIRE_DAYS,
};
use serde::Serialize;
use tracing::info;

/// File detail endpoint
pub const FILE_INFO_PATH: &str = "/api/v1/file/info";
/// Move endpoint
pub const FILE_MOVE_PATH: &str = "/api/v1/file/move";
/// Rename endpoint
pub const FILE_RENAME_PATH: &str = "/api/v1/file/rename";
/// Move-to-trash endpoint
pub const FILE_TRASH_PATH: &str = "/api/v1/file/trash";
/// Permanent delete endpoint (trashed files only)
pub const FILE_DELETE_PATH: &str = "/api/v1/file/delete";
/// Restore-from-trash endpoint
pub const FILE_RECOVER_PATH: &str = "/api/v1/file/recover";
/// Direct link enable endpoint
pub const DIRECT_LINK_ENABLE_PATH: &str = "/api/v1/direct-link/enable";
/// Direct link disable endpoint
pub const DIRECT_LINK_DISABLE_PATH: &str = "/api/v1/direct-link/disable";
/// Direct link lookup endpoint
pub const DIRECT_LINK_GET_PATH: &str = "/api/v1/direct-link/get";
/// Share creation endpoint
pub const SHARE_CREATE_PATH: &str = "/api/v1/share/create";
/// Share update endpoint
pub const SHARE_UPDATE_PATH: &str = "/api/v1/share/update";

/// Switch value the API uses for "off"
const SWITCH_OFF: u8 = 1;
/// Switch value the API uses for "on"
const SWITCH_ON: u8 = 2;

#[derive(Serialize)]
struct FileIdsRequest<'a> {
    #[serde(rename = "fileIDs")]
    file_ids: &'a [i64],
}

#[derive(Serialize)]
struct MoveRequest<'a> {
    #[serde(rename = "fileIDs")]
    file_ids: &'a [i64],
    #[serde(rename = "parentFileID")]
    parent_file_id: i64,
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    #[serde(rename = "fileID")]
    file_id: i64,
    filename: &'a str,
}

#[derive(Serialize)]
struct FileIdRequest {
    #[serde(rename = "fileID")]
    file_id: i64,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrafficFields {
    traffic_switch: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    traffic_limit_switch: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    traffic_limit: Option<u64>,
}

impl From<TrafficOptions> for TrafficFields {
    fn from(options: TrafficOptions) -> Self {
        if !options.enabled {
            return Self {
                traffic_switch: SWITCH_OFF,
                traffic_limit_switch: None,
                traffic_limit: None,
            };
        }
        let limit_switch = if options.limit_bytes.is_some() {
            SWITCH_ON
        } else {
            SWITCH_OFF
        };
        Self {
            traffic_switch: SWITCH_ON,
            traffic_limit_switch: Some(limit_switch),
            traffic_limit: options.limit_bytes,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareCreateRequest<'a> {
    #[serde(rename = "fileIDs")]
    file_ids: &'a [i64],
    share_name: &'a str,
    share_expire: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_pwd: Option<&'a str>,
    #[serde(flatten)]
    traffic: TrafficFields,
}

#[derive(Serialize)]
struct ShareUpdateRequest<'a> {
    #[serde(rename = "shareIDs")]
    share_ids: &'a [i64],
    #[serde(flatten)]
    traffic: TrafficFields,
}

/// Parameters for a new share link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewShare {
    /// Display name
    pub name: String,
    /// Validity in days: 1, 7, 30, or 0 for permanent
    pub expire_days: u32,
    /// Extraction code
    pub password: Option<String>,
    /// Traffic settings
    pub traffic: TrafficOptions,
}

impl PanClient {
    /// Fetch the details of one file
    pub async fn file_detail(&self, file_id: i64) -> Result<FileInfo> {
        let file: FileInfo = self
            .get(FILE_INFO_PATH, &[("fileID", file_id.to_string())])
            .await?;
        info!("Fetched details of {}", file.filename);
        Ok(file)
    }

    /// Move files into another folder
    pub async fn move_files(&self, file_ids: &[i64], parent_file_id: i64) -> Result<()> {
        require_ids("file_ids", file_ids)?;
        let body = MoveRequest {
            file_ids,
            parent_file_id,
        };
        self.post::<_, JsonValue>(FILE_MOVE_PATH, &body).await?;
        info!("Moved {} files to {parent_file_id}", file_ids.len());
        Ok(())
    }

    /// Rename one file
    pub async fn rename_file(&self, file_id: i64, filename: &str) -> Result<()> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(Error::invalid_value("filename", "must not be empty"));
        }
        let body = RenameRequest { file_id, filename };
        self.post::<_, JsonValue>(FILE_RENAME_PATH, &body).await?;
        info!("Renamed {file_id} to {filename}");
        Ok(())
    }

    /// Move files to the trash
    pub async fn trash_files(&self, file_ids: &[i64]) -> Result<()> {
        self.post_file_ids(FILE_TRASH_PATH, file_ids).await?;
        info!("Moved {} files to the trash", file_ids.len());
        Ok(())
    }

    /// Permanently delete files that are already in the trash
    pub async fn delete_files(&self, file_ids: &[i64]) -> Result<()> {
        self.post_file_ids(FILE_DELETE_PATH, file_ids).await?;
        info!("Permanently deleted {} files", file_ids.len());
        Ok(())
    }

    /// Restore files from the trash
    pub async fn recover_files(&self, file_ids: &[i64]) -> Result<()> {
        self.post_file_ids(FILE_RECOVER_PATH, file_ids).await?;
        info!("Recovered {} files", file_ids.len());
        Ok(())
    }

    /// Enable direct-link access for `file_id`
    pub async fn enable_direct_link(&self, file_id: i64) -> Result<()> {
        let body = FileIdRequest { file_id };
        self.post::<_, JsonValue>(DIRECT_LINK_ENABLE_PATH, &body).await?;
        info!("Enabled direct link for {file_id}");
        Ok(())
    }

    /// Disable direct-link access for `file_id`
    pub async fn disable_direct_link(&self, file_id: i64) -> Result<()> {
        let body = FileIdRequest { file_id };
        self.post::<_, JsonValue>(DIRECT_LINK_DISABLE_PATH, &body).await?;
        info!("Disabled direct link for {file_id}");
        Ok(())
    }

    /// Look up the direct link of a file
    pub async fn direct_link(&self, file_id: i64) -> Result<DirectLink> {
        self.get(DIRECT_LINK_GET_PATH, &[("fileID", file_id.to_string())]).await
    }

    /// Create a share link for a set of files
    pub async fn create_share(&self, file_ids: &[i64], share: &NewShare) -> Result<CreatedShare> {
        require_ids("file_ids", file_ids)?;
        let name = share.name.trim();
        if name.is_empty() {
            return Err(Error::invalid_value("share_name", "must not be empty"));
        }
        if !SHARE_EXPIRE_DAYS.contains(&share.expire_days) {
            return Err(Error::invalid_value(
                "share_expire",
                format!("{} days is not one of {SHARE_EXPIRE_DAYS:?}", share.expire_days),
            ));
        }

        let body = ShareCreateRequest {
            file_ids,
            share_name: name,
            share_expire: share.expire_days,
            share_pwd: share.password.as_deref().filter(|p| !p.is_empty()),
            traffic: share.traffic.into(),
        };
        let created: CreatedShare = self
            .post(SHARE_CREATE_PATH, &body)
            .await?
            .ok_or_else(|| Error::decode("share creation returned no data"))?;
        info!("Created share {}", created.share_id);
        Ok(created)
    }

    /// Change the traffic settings of existing share links
    pub async fn update_shares(&self, share_ids: &[i64], traffic: TrafficOptions) -> Result<()> {
        require_ids("share_ids", share_ids)?;
        let body = ShareUpdateRequest {
            share_ids,
            traffic: traffic.into(),
        };
        self.post::<_, JsonValue>(SHARE_UPDATE_PATH, &body).await?;
        info!("Updated {} shares", share_ids.len());
        Ok(())
    }

    async fn post_file_ids(&self, path: &str, file_ids: &[i64]) -> Result<()> {
        require_ids("file_ids", file_ids)?;
        self.post::<_, JsonValue>(path, &FileIdsRequest { file_ids }).await?;
        Ok(())
    }
}

fn require_ids(field: &str, ids: &[i64]) -> Result<()> {
    if ids.is_empty() {
        return Err(Error::invalid_value(field, "at least one ID is required"));
    }
    Ok(())
}

#[cfg(test)]
mod operation_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_traffic_off() {
        let fields = TrafficFields::from(TrafficOptions::default());
        assert_eq!(serde_json::to_value(&fields).unwrap(), json!({"trafficSwitch": 1}));
    }

    #[test]
    fn test_traffic_on_without_limit() {
        let fields = TrafficFields::from(TrafficOptions {
            enabled: true,
            limit_bytes: None,
        });
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!({"trafficSwitch": 2, "trafficLimitSwitch": 1})
        );
    }

    #[test]
    fn test_traffic_on_with_limit() {
        let fields = TrafficFields::from(TrafficOptions {
            enabled: true,
            limit_bytes: Some(1_048_576),
        });
        assert_eq!(
            serde_json::to_value(&fields).unwrap(),
            json!({"trafficSwitch": 2, "trafficLimitSwitch": 2, "trafficLimit": 1_048_576})
        );
    }
}
