//! Lazy cursor-based pagination
//!
//! [`PaginationIterator`] pulls one page at a time from a [`FetchPage`]
//! collaborator and hands out its items one by one.

use super::types::{is_terminal_cursor, FetchPage, Page, PaginationConfig, Params};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::vec;
use tracing::{debug, warn, Span};

/// Hook invoked with every non-empty page right after it is fetched
pub type PageCallback<'a, T> = Box<dyn FnMut(&[T]) -> Result<()> + 'a>;

/// Iterator over every item of a cursor-paginated listing.
///
/// Pages are fetched on demand: page N+1 is requested only after every item
/// of page N has been handed out. Once the backend reports no further cursor
/// (absent, `null` or `-1`) the iterator is exhausted and never fetches again
/// until [`begin_iteration`](Self::begin_iteration) is called.
///
/// The working parameters survive `begin_iteration`, so restarting a used
/// iterator continues from the last cursor it saw. Build a new iterator to
/// start over from the first page.
pub struct PaginationIterator<'a, T, F> {
    fetcher: F,
    config: PaginationConfig,
    params: Params,
    on_page: Option<PageCallback<'a, T>>,
    span: Span,
    /// Items of the buffered page not handed out yet
    current_page: vec::IntoIter<T>,
    /// Length of the buffered page as fetched
    page_len: usize,
    index_into_page: usize,
    exhausted: bool,
    total_yielded: usize,
}

impl<'a, T, F> PaginationIterator<'a, T, F>
where
    T: DeserializeOwned,
    F: FetchPage<T>,
{
    /// Create an iterator over the listing served by `fetcher`
    pub fn new(fetcher: F, config: PaginationConfig) -> Self {
        let span = tracing::debug_span!(
            "paginate",
            cursor_field = %config.cursor_field,
            items_field = %config.items_field
        );
        Self {
            fetcher,
            params: config.initial_params.clone(),
            config,
            on_page: None,
            span,
            current_page: Vec::new().into_iter(),
            page_len: 0,
            index_into_page: 0,
            exhausted: false,
            total_yielded: 0,
        }
    }

    /// Register a hook that receives each non-empty page
    #[must_use]
    pub fn on_page(mut self, callback: impl FnMut(&[T]) -> Result<()> + 'a) -> Self {
        self.on_page = Some(Box::new(callback));
        self
    }

    /// Log fetches under the given span instead of the default one
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Start a fresh traversal.
    ///
    /// Clears the buffered page, the exhaustion flag and the yield counter.
    /// The request parameters are kept.
    pub fn begin_iteration(&mut self) -> &mut Self {
        self.current_page = Vec::new().into_iter();
        self.page_len = 0;
        self.index_into_page = 0;
        self.exhausted = false;
        self.total_yielded = 0;
        self
    }

    /// Return the next item, fetching a new page when the current one is used up.
    ///
    /// `Ok(None)` marks the end of the sequence. Errors from the fetcher or the
    /// page hook are returned as-is; calling again retries the fetch.
    pub fn next_item(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.current_page.next() {
                self.index_into_page += 1;
                self.total_yielded += 1;
                return Ok(Some(item));
            }

            if self.exhausted {
                return Ok(None);
            }

            if !self.fetch_next_page()? {
                return Ok(None);
            }
        }
    }

    /// Collect every item of a fresh traversal
    pub fn drain_all(&mut self) -> Result<Vec<T>> {
        self.begin_iteration();
        let mut items = Vec::new();
        while let Some(item) = self.next_item()? {
            items.push(item);
        }
        Ok(items)
    }

    /// Number of items handed out in the current traversal
    pub fn total_yielded_count(&self) -> usize {
        self.total_yielded
    }

    /// Whether the backend has signalled the last page
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Position inside the buffered page, never past [`current_page_len`](Self::current_page_len)
    pub fn index_into_page(&self) -> usize {
        self.index_into_page
    }

    /// Number of items in the buffered page, including those already handed out
    pub fn current_page_len(&self) -> usize {
        self.page_len
    }

    /// Parameters the next fetch will be made with
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Overwrite a request parameter, e.g. to switch folders
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(key.into(), value.into());
    }

    /// The listing configuration
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Fetch and buffer the next page. Returns whether it held any items.
    fn fetch_next_page(&mut self) -> Result<bool> {
        let _enter = self.span.enter();

        let response = self.fetcher.fetch_page(&self.params).inspect_err(|e| {
            warn!(error = %e, "Error fetching page");
        })?;
        let page = match response {
            Some(response) => response
                .normalize(&self.config.items_field, &self.config.cursor_field)
                .inspect_err(|e| warn!(error = %e, "Malformed page"))?,
            None => None,
        };

        let Some(Page { items, next_cursor }) = page else {
            debug!("Fetcher returned no data, marking exhausted");
            self.exhausted = true;
            return Ok(false);
        };

        let count = items.len();
        self.current_page = items.into_iter();
        self.page_len = count;
        self.index_into_page = 0;

        // Page state is already replaced when the hook runs; a failing hook leaves it in place.
        if count > 0 {
            if let Some(callback) = self.on_page.as_mut() {
                callback(self.current_page.as_slice()).inspect_err(|e| {
                    warn!(error = %e, items = count, "Page callback failed");
                })?;
            }
        }

        match next_cursor {
            Some(cursor) if !is_terminal_cursor(&cursor) => {
                let param = self.config.resolved_cursor_param();
                debug!(items = count, %param, %cursor, "Fetched page");
                self.params.insert(param, cursor);
            }
            _ => {
                debug!(items = count, "Fetched last page");
                self.exhausted = true;
            }
        }

        Ok(count > 0)
    }
}

impl<T, F> Iterator for PaginationIterator<'_, T, F>
where
    T: DeserializeOwned,
    F: FetchPage<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item().transpose()
    }
}
