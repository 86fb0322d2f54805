//! Pagination types and traits
//!
//! Defines the response shapes, the fetch collaborator trait and the
//! configuration shared by every paginated listing.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Request parameters handed to the fetch collaborator on every call
pub type Params = Map<String, Value>;

/// Cursor value the backend uses to say "no more pages"
pub const TERMINAL_CURSOR: i64 = -1;

/// Parameter carrying the cursor for file listings
pub const FILE_CURSOR_PARAM: &str = "last_file_id";

/// Parameter carrying the cursor for share listings
pub const SHARE_CURSOR_PARAM: &str = "last_share_id";

/// One page as returned by a fetch collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum PageResponse<T> {
    /// `(items, next_cursor)` pair. `None` items means "no data".
    Tuple(Option<Vec<T>>, Option<Value>),
    /// Map holding the item list and the cursor under named keys
    Map(Map<String, Value>),
}

impl<T> PageResponse<T> {
    /// Build a tuple-shaped page
    pub fn tuple(items: Vec<T>, next_cursor: Option<Value>) -> Self {
        Self::Tuple(Some(items), next_cursor)
    }

    /// Wrap a JSON payload. Objects become map-shaped pages, `null` means no data.
    pub fn from_value(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Object(map) => Ok(Some(Self::Map(map))),
            other => Err(Error::decode(format!(
                "expected an object for a map-shaped page, got {other}"
            ))),
        }
    }
}

impl<T: DeserializeOwned> PageResponse<T> {
    /// Reduce either shape to a canonical [`Page`].
    ///
    /// Returns `Ok(None)` for a tuple whose item slot is empty. Missing keys in
    /// a map-shaped page default to no items and no cursor; a JSON `null`
    /// cursor is treated as absent.
    pub fn normalize(self, items_field: &str, cursor_field: &str) -> Result<Option<Page<T>>> {
        match self {
            Self::Tuple(None, _) => Ok(None),
            Self::Tuple(Some(items), next_cursor) => Ok(Some(Page {
                items,
                next_cursor: next_cursor.filter(|c| !c.is_null()),
            })),
            Self::Map(mut map) => {
                let items = match map.remove(items_field) {
                    None | Some(Value::Null) => Vec::new(),
                    Some(raw) => serde_json::from_value(raw).map_err(|e| {
                        Error::decode(format!("invalid '{items_field}' in page: {e}"))
                    })?,
                };
                let next_cursor = map.remove(cursor_field).filter(|c| !c.is_null());
                Ok(Some(Page { items, next_cursor }))
            }
        }
    }
}

/// A normalized page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in backend order
    pub items: Vec<T>,
    /// Cursor for the following page, if any
    pub next_cursor: Option<Value>,
}

/// Check whether a cursor ends pagination.
///
/// `null` and `-1` are terminal. `0` is a valid cursor.
pub fn is_terminal_cursor(cursor: &Value) -> bool {
    match cursor {
        Value::Null => true,
        Value::Number(n) => {
            n.as_i64() == Some(TERMINAL_CURSOR) || n.as_f64() == Some(TERMINAL_CURSOR as f64)
        }
        _ => false,
    }
}

/// Pick the request parameter that carries the cursor for `cursor_field`.
///
/// Matches by substring, case-insensitively: anything mentioning "file" maps
/// to [`FILE_CURSOR_PARAM`], then "share" maps to [`SHARE_CURSOR_PARAM`].
/// Any other field name is used verbatim as the parameter key.
pub fn infer_cursor_param(cursor_field: &str) -> String {
    let lowered = cursor_field.to_lowercase();
    if lowered.contains("file") {
        FILE_CURSOR_PARAM.to_string()
    } else if lowered.contains("share") {
        SHARE_CURSOR_PARAM.to_string()
    } else {
        cursor_field.to_string()
    }
}

/// Configuration for a paginated listing
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Parameters sent with the first request
    pub initial_params: Params,
    /// Response key holding the next-page cursor
    pub cursor_field: String,
    /// Response key holding the item list (map-shaped pages only)
    pub items_field: String,
    /// Explicit cursor parameter name, bypassing inference
    pub cursor_param: Option<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            initial_params: Params::new(),
            cursor_field: "lastFileID".to_string(),
            items_field: "fileList".to_string(),
            cursor_param: None,
        }
    }
}

impl PaginationConfig {
    /// Create a config with the given initial parameters
    pub fn new(initial_params: Params) -> Self {
        Self {
            initial_params,
            ..Default::default()
        }
    }

    /// Config for listing the files of a folder
    pub fn file_list(parent_file_id: i64, limit: u32) -> Self {
        Self::default()
            .param("parent_file_id", parent_file_id)
            .param("limit", limit)
    }

    /// Config for listing share links
    pub fn share_list(limit: u32) -> Self {
        Self::default()
            .with_fields("lastShareId", "shareList")
            .param("limit", limit)
    }

    /// Set the cursor and items keys
    #[must_use]
    pub fn with_fields(
        mut self,
        cursor_field: impl Into<String>,
        items_field: impl Into<String>,
    ) -> Self {
        self.cursor_field = cursor_field.into();
        self.items_field = items_field.into();
        self
    }

    /// Force the parameter name used to send the cursor
    #[must_use]
    pub fn with_cursor_param(mut self, param: impl Into<String>) -> Self {
        self.cursor_param = Some(param.into());
        self
    }

    /// Add an initial parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.initial_params.insert(key.into(), value.into());
        self
    }

    /// Parameter name the next cursor is written to
    pub fn resolved_cursor_param(&self) -> String {
        self.cursor_param
            .clone()
            .unwrap_or_else(|| infer_cursor_param(&self.cursor_field))
    }
}

/// Fetches one page for the given parameters.
///
/// Returning `Ok(None)` means the backend had no data. Errors are surfaced
/// to whoever is pulling items; the iterator never retries.
pub trait FetchPage<T> {
    /// Fetch the page described by `params`
    fn fetch_page(&mut self, params: &Params) -> Result<Option<PageResponse<T>>>;
}

impl<T, F> FetchPage<T> for F
where
    F: FnMut(&Params) -> Result<Option<PageResponse<T>>>,
{
    fn fetch_page(&mut self, params: &Params) -> Result<Option<PageResponse<T>>> {
        self(params)
    }
}
