//! Authentication module
//!
//! Access tokens are obtained with the client ID/secret pair and cached in
//! a JSON token file between runs.
//!
//! The `Authenticator` attaches the token to every API request and fetches
//! a new one once the cached token expires.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, ACCESS_TOKEN_PATH};
pub use types::{parse_expiry, CachedToken, Credentials, TokenFile};
