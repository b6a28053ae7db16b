//! State shared by every command.

use anchor_core::Store;
use anyhow::{Context as _, Result};

use crate::config::Config;
use crate::confirm::Prompt;
use crate::fetch::Fetcher;
use crate::storage::Storage;

pub struct Context {
    pub config: Config,
    pub storage: Storage,
    pub store: Store,
    pub fetcher: Fetcher,
    pub prompt: Prompt,
}

impl Context {
    pub fn new(config: Config, assume_yes: bool) -> Result<Self> {
        let storage = Storage::from_config(&config)?;
        let store = Store::new(storage.data_dir(), config.archive_dir()?);
        let fetcher = Fetcher::new(config.http_timeout())?;

        Ok(Self {
            config,
            storage,
            store,
            fetcher,
            prompt: Prompt::new(assume_yes),
        })
    }

    /// Abandon the running command: pending and future confirmations are
    /// declined.
    pub fn cancel(&self) {
        self.prompt.cancel();
    }
}

/// Run blocking filesystem or process work off the async runtime.
pub async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .context("Blocking task panicked or was cancelled")?
}
