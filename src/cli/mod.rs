//! CLI module
//!
//! Command-line interface over the 123Pan open API.
//!
//! # Commands
//!
//! - `files` - List a folder, following every page
//! - `shares` - List share links, following every page
//! - `info` - Show the details of one file
//! - `move`, `rename` - Reorganize files
//! - `trash`, `delete`, `recover` - Manage the trash
//! - `direct-link` - Enable, disable or look up a file's direct link
//! - `share-create`, `share-update` - Manage share links

mod commands;
mod input;
mod runner;

pub use commands::{Cli, Commands, DirectLinkAction, OutputFormat, TrafficArgs};
pub use input::{IdList, MAX_IDS};
pub use runner::{Runner, Summary};
