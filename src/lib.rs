// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # pan-cli
//!
//! Command-line client for 123Pan cloud storage, built around a lazy,
//! cursor-driven pagination iterator.
//!
//! ## Features
//!
//! - **Lazy Pagination**: Pages are fetched only when the current one runs out
//! - **Two Response Shapes**: `(items, cursor)` tuples and `{items, cursor}` maps
//! - **Page Callbacks**: Observe every page before its items are handed out
//! - **Token Caching**: Access tokens are cached on disk and refreshed on expiry
//! - **File Management**: Move, rename, trash, restore and share files by ID list
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pan_cli::http::PanClient;
//! use pan_cli::pagination::{PaginationConfig, PaginationIterator, Params};
//! use pan_cli::config::ClientConfig;
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let client = PanClient::new(ClientConfig::default().with_env().validate()?)?;
//!
//! let fetch = |params: &Params| runtime.block_on(client.file_list_page(params));
//! for file in PaginationIterator::new(fetch, PaginationConfig::file_list(0, 100)) {
//!     println!("{}", file?.filename);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │          CLI (listings and file/share actions)           │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────────────────────────────────────────────────┐
//! │   PaginationIterator: buffer page → yield → fetch next   │
//! │   cursor → params[last_file_id | last_share_id | field]  │
//! └──────────────────────────────────────────────────────────┘
//!                              │ fetch(params)
//! ┌──────────────┬─────────────┴─────────────┬───────────────┐
//! │     Auth     │           HTTP            │    Config     │
//! ├──────────────┼───────────────────────────┼───────────────┤
//! │ Token file   │ /api/v2/file/list         │ YAML          │
//! │ Token fetch  │ /api/v1/share/list        │ Environment   │
//! │ Expiry cache │ Envelope + error mapping  │ Flags         │
//! │              │ File, link, share actions │               │
//! └──────────────┴───────────────────────────┴───────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Token file and access token handling
pub mod auth;

/// API client for the list endpoints
pub mod http;

/// Lazy cursor pagination
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use pagination::{PageResponse, PaginationConfig, PaginationIterator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
