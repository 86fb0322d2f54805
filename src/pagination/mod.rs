//! Pagination module
//!
//! Lazily walks cursor-paginated list endpoints (file lists, share lists).
//!
//! # Overview
//!
//! A [`PaginationIterator`] wraps a page-fetch collaborator and yields the
//! items of every page in order, fetching the next page only once the
//! current one has been consumed. Responses may come back either as an
//! `(items, cursor)` pair or as a map holding the item list and the cursor
//! under configurable keys; both are normalized to a [`Page`] before the
//! iterator looks at them.

mod iterator;
mod types;

pub use iterator::{PageCallback, PaginationIterator};
pub use types::{
    infer_cursor_param, is_terminal_cursor, FetchPage, Page, PageResponse, PaginationConfig,
    Params, FILE_CURSOR_PARAM, SHARE_CURSOR_PARAM, TERMINAL_CURSOR,
};
