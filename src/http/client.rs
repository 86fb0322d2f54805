//! API client for the paginated list endpoints
//!
//! Handles:
//! - Attaching the access token and platform header
//! - Unwrapping the `{code, message, data}` envelope
//! - Error classification (transport, HTTP status, API code, bad payload)
//! - Adapting pagination parameters to each endpoint's query string

use crate::auth::Authenticator;
use crate::config::{clamp_page_limit, ClientConfig, DEFAULT_PAGE_LIMIT, ROOT_DIRECTORY_ID};
use crate::error::{Error, Result};
use crate::pagination::{PageResponse, Params, FILE_CURSOR_PARAM, SHARE_CURSOR_PARAM};
use crate::types::{ApiResponse, FileInfo, JsonValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// File listing endpoint
pub const FILE_LIST_PATH: &str = "/api/v2/file/list";

/// Share listing endpoint
pub const SHARE_LIST_PATH: &str = "/api/v1/share/list";

/// Query for one page of a folder listing
#[derive(Debug, Clone, PartialEq)]
pub struct FileListQuery {
    /// Folder to list
    pub parent_file_id: i64,
    /// Items per page
    pub limit: u32,
    /// Search keyword
    pub search_data: Option<String>,
    /// Search mode
    pub search_mode: Option<String>,
    /// Cursor from the previous page
    pub last_file_id: Option<i64>,
}

impl Default for FileListQuery {
    fn default() -> Self {
        Self {
            parent_file_id: ROOT_DIRECTORY_ID,
            limit: DEFAULT_PAGE_LIMIT,
            search_data: None,
            search_mode: None,
            last_file_id: None,
        }
    }
}

impl FileListQuery {
    /// Build a query from pagination parameters.
    ///
    /// Recognized keys: `parent_file_id`, `limit`, `search_data`,
    /// `search_mode`, `last_file_id`. Missing or `null` keys keep defaults.
    pub fn from_params(params: &Params) -> Result<Self> {
        let mut query = Self::default();
        if let Some(id) = int_param(params, "parent_file_id")? {
            query.parent_file_id = id;
        }
        if let Some(limit) = int_param(params, "limit")? {
            query.limit = limit_from(limit);
        }
        query.search_data = string_param(params, "search_data")?;
        query.search_mode = string_param(params, "search_mode")?;
        query.last_file_id = int_param(params, FILE_CURSOR_PARAM)?;
        Ok(query)
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("parentFileID", self.parent_file_id.to_string()),
            ("limit", clamp_page_limit(self.limit).to_string()),
        ];
        if let Some(search) = &self.search_data {
            pairs.push(("searchData", search.clone()));
        }
        if let Some(mode) = &self.search_mode {
            pairs.push(("searchMode", mode.clone()));
        }
        if let Some(last) = self.last_file_id {
            pairs.push(("lastFileID", last.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListData {
    #[serde(default)]
    file_list: Vec<FileInfo>,
    #[serde(rename = "lastFileID", default)]
    last_file_id: Option<i64>,
}

/// Client for the 123Pan open API
pub struct PanClient {
    client: Client,
    config: ClientConfig,
    authenticator: Authenticator,
}

impl PanClient {
    /// Create a client; tokens come from the token file or the token endpoint
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = build_http_client(config.timeout())?;
        let authenticator = Authenticator::from_config(&config, client.clone())?;
        Ok(Self {
            client,
            config,
            authenticator,
        })
    }

    /// Create a client with an explicit authenticator
    pub fn with_authenticator(config: ClientConfig, authenticator: Authenticator) -> Result<Self> {
        let client = build_http_client(config.timeout())?;
        Ok(Self {
            client,
            config,
            authenticator,
        })
    }

    /// The client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch one page of a folder listing as `(files, next_cursor)`.
    ///
    /// The cursor is `-1` on the last page.
    pub async fn file_list(&self, query: &FileListQuery) -> Result<(Vec<FileInfo>, Option<i64>)> {
        let data: FileListData = self.get(FILE_LIST_PATH, &query.to_query()).await?;
        info!("Fetched file list: {} files", data.file_list.len());
        Ok((data.file_list, data.last_file_id))
    }

    /// Fetch one page of share links as the raw `data` object
    /// (`shareList`, `lastShareId`).
    pub async fn share_list(&self, limit: u32, last_share_id: Option<i64>) -> Result<JsonValue> {
        let mut query = vec![("limit", clamp_page_limit(limit).to_string())];
        // 0 means "first page" to the share endpoint, so it is left out like an absent cursor
        if let Some(last) = last_share_id.filter(|id| *id != 0) {
            query.push(("lastShareId", last.to_string()));
        }
        let data: JsonValue = self.get(SHARE_LIST_PATH, &query).await?;
        info!("Fetched share list");
        Ok(data)
    }

    /// [`file_list`](Self::file_list) driven by pagination parameters
    pub async fn file_list_page(&self, params: &Params) -> Result<Option<PageResponse<FileInfo>>> {
        let query = FileListQuery::from_params(params)?;
        let (files, cursor) = self.file_list(&query).await?;
        Ok(Some(PageResponse::tuple(files, cursor.map(JsonValue::from))))
    }

    /// [`share_list`](Self::share_list) driven by pagination parameters
    pub async fn share_list_page<T>(&self, params: &Params) -> Result<Option<PageResponse<T>>> {
        let limit = int_param(params, "limit")?.map_or(DEFAULT_PAGE_LIMIT, limit_from);
        let last_share_id = int_param(params, SHARE_CURSOR_PARAM)?;
        let data = self.share_list(limit, last_share_id).await?;
        PageResponse::from_value(data)
    }

    /// GET an API path and unwrap the envelope's `data`
    pub(super) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.config.endpoint(path)?;
        let req = self.client.get(url).query(query);
        self.send(req, path)
            .await?
            .ok_or_else(|| Error::decode(format!("response from {path} has no data")))
    }

    /// POST a JSON body to an API path; `data` may legitimately be absent
    pub(super) async fn post<B, T>(&self, path: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path)?;
        let req = self.client.post(url).json(body);
        self.send(req, path).await
    }

    /// Authenticate, send, and unwrap the `{code, message, data}` envelope
    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        path: &str,
    ) -> Result<Option<T>> {
        let req = self.authenticator.apply(req).await?;

        let response = req.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)
            .map_err(|e| Error::decode(format!("unexpected response from {path}: {e}")))?;

        if !envelope.is_success() {
            return Err(Error::api(envelope.code, envelope.message));
        }

        debug!("Request succeeded: {path}");
        Ok(envelope.data)
    }

    fn classify(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout {
                timeout_ms: self.config.timeout().as_millis() as u64,
            }
        } else {
            Error::Http(error)
        }
    }
}

fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(format!("pan-cli/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::Http)
}

fn limit_from(value: i64) -> u32 {
    clamp_page_limit(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}

/// Integer parameter; `null` counts as absent
fn int_param(params: &Params, key: &str) -> Result<Option<i64>> {
    match params.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| Error::invalid_value(key, format!("expected an integer, got {value}"))),
    }
}

/// String parameter; `null` counts as absent
fn string_param(params: &Params, key: &str) -> Result<Option<String>> {
    match params.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(value) => Err(Error::invalid_value(
            key,
            format!("expected a string, got {value}"),
        )),
    }
}
