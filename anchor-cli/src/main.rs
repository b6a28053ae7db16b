//! # anchor
//!
//! Bookmarks organized by labels and stored as plain text files.
//!
//! ```text
//! <data_dir>/
//! ├── root/root                  default label
//! ├── programming/
//! │   ├── programming            label "programming"
//! │   └── go/go                  label "programming.go"
//! └── .archive/<id>.html         saved page snapshots
//! ```
//!
//! ## Configuration
//!
//! Read from `$XDG_CONFIG_HOME/anchor/config.toml`, created with defaults on
//! first run. `--config PATH` points at another file.
//!
//! ## Running
//!
//! ```bash
//! anchor add -l programming -l go https://gobyexample.com/
//! anchor view prog
//!
//! # With debug logging
//! RUST_LOG=debug anchor tree
//! ```

use std::process::ExitCode;
use std::time::Duration;

use anchor_cli::{commands, Cli, Config, Context};
use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// How long shutdown waits for blocking work, such as a prompt abandoned by
/// Ctrl-C that is still reading stdin.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = tokio::runtime::Runtime::new()
        .context("Failed to start async runtime")
        .and_then(|runtime| {
            let result = runtime.block_on(run(cli));
            runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
            result
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (config, created) = match &cli.config {
        Some(path) => (Config::load(path)?, None),
        None => {
            let path = Config::default_config_path()?;
            let (config, created) = Config::load_or_create(&path)?;
            (config, created.then_some(path))
        }
    };

    // RUST_LOG wins over the configured level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting anchor v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = created {
        eprintln!("Created default configuration file at: {}", path.display());
    }

    let ctx = Context::new(config, cli.yes)?;

    tokio::select! {
        result = commands::run(&ctx, cli.command) => result,
        _ = tokio::signal::ctrl_c() => {
            ctx.cancel();
            Err(anyhow!("operation cancelled"))
        }
    }
}
