//! Command tree and dispatch.
//!
//! Each subcommand lives in its own module with an `Args` struct and a
//! `handle` function. Handlers return the commit message of the change they
//! made, or `None` when nothing was written.

use std::path::PathBuf;

use anchor_core::Label;
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use crate::config::SyncMode;
use crate::context::{blocking, Context};

mod add;
mod delete;
mod edit;
mod import;
mod init;
mod sync;
mod tree;
mod view;

pub use add::AddArgs;
pub use delete::DeleteArgs;
pub use edit::{Assignment, EditArgs};
pub use import::{Format, ImportArgs};
pub use view::ViewArgs;

// ============================================================================
// Entry + global options
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "anchor",
    version,
    about = "Bookmarks organized by labels, stored as plain text",
    infer_subcommands = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/anchor/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory (and repository for the git backend).
    Init,

    /// Bookmark a URL.
    Add(AddArgs),

    /// List the bookmarks of a label.
    #[command(alias = "ls")]
    View(ViewArgs),

    /// Change, reorder or delete bookmarks of a label.
    Edit(EditArgs),

    /// Delete a label and every label below it.
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// List every label.
    Tree,

    /// Import a browser bookmark export.
    Import(ImportArgs),

    /// Pull and commit the data directory now, regardless of `sync_mode`.
    Sync,
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run `command`, synchronizing the storage backend around it when
/// `storage.sync_mode` is "always". `init` and `sync` manage the backend
/// themselves.
pub async fn run(ctx: &Context, command: Command) -> Result<()> {
    let sync = ctx.config.storage.sync_mode == SyncMode::Always
        && !matches!(command, Command::Init | Command::Sync);

    if sync {
        update(ctx).await?;
    }

    let change = match command {
        Command::Init => init::handle(ctx).await?,
        Command::Add(args) => add::handle(ctx, args).await?,
        Command::View(args) => view::handle(ctx, args).await?,
        Command::Edit(args) => edit::handle(ctx, args).await?,
        Command::Delete(args) => delete::handle(ctx, args).await?,
        Command::Tree => tree::handle(ctx).await?,
        Command::Import(args) => import::handle(ctx, args).await?,
        Command::Sync => sync::handle(ctx).await?,
    };

    if let (true, Some(message)) = (sync, change) {
        let storage = ctx.storage.clone();
        blocking(move || storage.store(&message))
            .await
            .context("Failed to store changes")?;
    }

    Ok(())
}

async fn update(ctx: &Context) -> Result<()> {
    let storage = ctx.storage.clone();
    let prompt = ctx.prompt.clone();

    blocking(move || match storage.update() {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!("Sync failed: {:#}", e);
            if prompt.ask("Could not sync bookmarks. Continue anyway?") {
                Ok(())
            } else {
                Err(e.context("Sync aborted"))
            }
        }
    })
    .await
}

/// Label segments from command line values; dotted values are split.
fn segments(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| Label::parse(value).segments().to_vec())
        .collect()
}
