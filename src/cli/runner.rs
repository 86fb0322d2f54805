//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, DirectLinkAction, OutputFormat};
use crate::config::{clamp_page_limit, ClientConfig};
use crate::error::{Error, Result};
use crate::http::{NewShare, PanClient};
use crate::pagination::{PaginationConfig, PaginationIterator, Params};
use crate::types::{CreatedShare, DirectLink, FileInfo, ShareInfo};
use serde::Serialize;
use std::io::Write;
use tokio::runtime::Runtime;
use tracing::info_span;

/// What a command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// A listing finished
    Listed {
        /// Kind of item, for messages
        noun: &'static str,
        /// Items printed
        total: usize,
    },
    /// An action succeeded
    Done(String),
}

impl Summary {
    /// One-line human summary
    pub fn message(&self) -> String {
        match self {
            Self::Listed { noun, total: 0 } => format!("No {noun} found"),
            Self::Listed { noun, total } => format!("Fetched {total} {noun}"),
            Self::Done(message) => message.clone(),
        }
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, printing results to stdout and the summary to stderr
    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let summary = self.run_with_output(&mut out)?;
        out.flush()?;
        eprintln!("{}", summary.message());
        Ok(())
    }

    /// Run the CLI command, printing results to `out`
    pub fn run_with_output<W: Write>(&self, out: &mut W) -> Result<Summary> {
        if let Commands::Delete { yes: false, .. } = &self.cli.command {
            return Err(Error::invalid_value(
                "yes",
                "permanent deletion must be confirmed with --yes",
            ));
        }

        let config = self.load_config()?;
        let page_limit = config.page_limit;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let client = PanClient::new(config)?;
        let format = self.cli.format;

        match &self.cli.command {
            Commands::Files {
                parent,
                limit,
                search,
                search_mode,
            } => {
                let limit = clamp_page_limit(limit.unwrap_or(page_limit));
                let mut listing = PaginationConfig::file_list(*parent, limit);
                if let Some(search) = search {
                    listing = listing.param("search_data", search.as_str());
                }
                if let Some(mode) = search_mode {
                    listing = listing.param("search_mode", mode.as_str());
                }
                let total = list_files(&runtime, &client, listing, format, out)?;
                Ok(Summary::Listed {
                    noun: "files",
                    total,
                })
            }
            Commands::Shares { limit } => {
                let limit = clamp_page_limit(limit.unwrap_or(page_limit));
                let listing = PaginationConfig::share_list(limit);
                let total = list_shares(&runtime, &client, listing, format, out)?;
                Ok(Summary::Listed {
                    noun: "shares",
                    total,
                })
            }
            Commands::Info { id } => {
                let file = runtime.block_on(client.file_detail(*id))?;
                print_page(out, format, std::slice::from_ref(&file), format_file)?;
                Ok(Summary::Done(format!("Fetched details of file {id}")))
            }
            Commands::Move { ids, to } => {
                runtime.block_on(client.move_files(ids.as_slice(), *to))?;
                Ok(Summary::Done(format!(
                    "Moved {} file(s) to folder {to}",
                    ids.len()
                )))
            }
            Commands::Rename { id, name } => {
                runtime.block_on(client.rename_file(*id, name))?;
                Ok(Summary::Done(format!("Renamed file {id} to {}", name.trim())))
            }
            Commands::Trash { ids } => {
                runtime.block_on(client.trash_files(ids.as_slice()))?;
                Ok(Summary::Done(format!("Moved {} file(s) to the trash", ids.len())))
            }
            Commands::Delete { ids, .. } => {
                runtime.block_on(client.delete_files(ids.as_slice()))?;
                Ok(Summary::Done(format!("Permanently deleted {} file(s)", ids.len())))
            }
            Commands::Recover { ids } => {
                runtime.block_on(client.recover_files(ids.as_slice()))?;
                Ok(Summary::Done(format!("Recovered {} file(s)", ids.len())))
            }
            Commands::DirectLink { action } => match action {
                DirectLinkAction::Enable { id } => {
                    runtime.block_on(client.enable_direct_link(*id))?;
                    Ok(Summary::Done(format!("Enabled direct link for {id}")))
                }
                DirectLinkAction::Disable { id } => {
                    runtime.block_on(client.disable_direct_link(*id))?;
                    Ok(Summary::Done(format!("Disabled direct link for {id}")))
                }
                DirectLinkAction::Get { id } => {
                    let link = runtime.block_on(client.direct_link(*id))?;
                    print_page(out, format, std::slice::from_ref(&link), format_link)?;
                    Ok(Summary::Done(format!("Fetched direct link for {id}")))
                }
            },
            Commands::ShareCreate {
                ids,
                name,
                expire,
                password,
                traffic,
            } => {
                let share = NewShare {
                    name: name.clone(),
                    expire_days: *expire,
                    password: password.clone(),
                    traffic: (*traffic).into(),
                };
                let created = runtime.block_on(client.create_share(ids.as_slice(), &share))?;
                print_page(out, format, std::slice::from_ref(&created), format_created)?;
                Ok(Summary::Done(format!("Created share {}", created.share_id)))
            }
            Commands::ShareUpdate { ids, traffic } => {
                runtime.block_on(client.update_shares(ids.as_slice(), (*traffic).into()))?;
                Ok(Summary::Done(format!("Updated {} share(s)", ids.len())))
            }
        }
    }

    /// Layer config file, environment and flags
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        }
        .with_env();

        if let Some(token_file) = &self.cli.token_file {
            config.token_file.clone_from(token_file);
        }
        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }

        config.validate()
    }
}

/// Page through a folder, printing each page as it arrives
fn list_files<W: Write>(
    runtime: &Runtime,
    client: &PanClient,
    listing: PaginationConfig,
    format: OutputFormat,
    out: &mut W,
) -> Result<usize> {
    let fetch = |params: &Params| runtime.block_on(client.file_list_page(params));
    let mut pager = PaginationIterator::new(fetch, listing)
        .with_span(info_span!("files"))
        .on_page(|files: &[FileInfo]| {
            print_page(&mut *out, format, files, format_file)
                .map_err(|e| Error::callback(e.to_string()))
        });

    while pager.next_item()?.is_some() {}
    Ok(pager.total_yielded_count())
}

/// Page through share links, printing each page as it arrives
fn list_shares<W: Write>(
    runtime: &Runtime,
    client: &PanClient,
    listing: PaginationConfig,
    format: OutputFormat,
    out: &mut W,
) -> Result<usize> {
    let fetch = |params: &Params| runtime.block_on(client.share_list_page::<ShareInfo>(params));
    let mut pager = PaginationIterator::new(fetch, listing)
        .with_span(info_span!("shares"))
        .on_page(|shares: &[ShareInfo]| {
            print_page(&mut *out, format, shares, format_share)
                .map_err(|e| Error::callback(e.to_string()))
        });

    while pager.next_item()?.is_some() {}
    Ok(pager.total_yielded_count())
}

fn print_page<W: Write, T: Serialize>(
    out: &mut W,
    format: OutputFormat,
    items: &[T],
    pretty: fn(&T) -> String,
) -> Result<()> {
    for item in items {
        match format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, item)?;
                writeln!(out)?;
            }
            OutputFormat::Pretty => writeln!(out, "{}", pretty(item))?,
        }
    }
    Ok(())
}

fn format_file(file: &FileInfo) -> String {
    let kind = if file.is_folder() { "dir " } else { "file" };
    let trashed = if file.is_trashed() { "  [trashed]" } else { "" };
    format!(
        "{kind}  {:>12}  {:>12} B  {}{trashed}",
        file.file_id, file.size, file.filename
    )
}

fn format_link(link: &DirectLink) -> String {
    link.url.clone()
}

fn format_created(share: &CreatedShare) -> String {
    let location = share.share_url.as_deref().unwrap_or(&share.share_key);
    let password = share.share_pwd.as_deref().filter(|p| !p.is_empty()).unwrap_or("-");
    format!("{:>10}  {location}  pwd={password}", share.share_id)
}

fn format_share(share: &ShareInfo) -> String {
    let status = if share.is_expired() { "expired" } else { "active" };
    format!(
        "{:>10}  {:<7}  {}  key={}  pwd={}  expires={}",
        share.share_id,
        status,
        share.share_name,
        share.share_key,
        share.password().unwrap_or("-"),
        share.expiration.as_deref().unwrap_or("never"),
    )
}
