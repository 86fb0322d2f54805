//! HTTP client module
//!
//! Thin async client for the 123Pan open API: listings, file management,
//! direct links and share links.
//!
//! # Features
//!
//! - **Authentication**: Access token from the auth module on every request
//! - **Envelope handling**: `{code, message, data}` unwrapped, non-zero codes become errors
//! - **Pagination adapters**: `*_page` methods accept pagination parameters and
//!   return pages ready for `PaginationIterator`

mod client;
mod operations;

pub use client::{FileListQuery, PanClient, FILE_LIST_PATH, SHARE_LIST_PATH};
pub use operations::{
    NewShare, DIRECT_LINK_DISABLE_PATH, DIRECT_LINK_ENABLE_PATH, DIRECT_LINK_GET_PATH,
    FILE_DELETE_PATH, FILE_INFO_PATH, FILE_MOVE_PATH, FILE_RECOVER_PATH, FILE_RENAME_PATH,
    FILE_TRASH_PATH, SHARE_CREATE_PATH, SHARE_UPDATE_PATH,
};

#[cfg(test)]
mod tests;
