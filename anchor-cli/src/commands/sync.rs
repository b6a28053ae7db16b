use anyhow::{Context as _, Result};

use crate::context::{blocking, Context};

/// Commit message for changes recorded by an explicit sync.
const SYNC_MESSAGE: &str = "Sync bookmarks";

/// Pull then record the data directory, whatever `storage.sync_mode` says.
pub(crate) async fn handle(ctx: &Context) -> Result<Option<String>> {
    let storage = ctx.storage.clone();

    blocking(move || {
        storage.update().context("Failed to update bookmarks")?;
        storage.store(SYNC_MESSAGE).context("Failed to store bookmarks")
    })
    .await?;

    println!("Synchronized {}", ctx.storage.data_dir().display());
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::create_test_context;

    #[tokio::test]
    async fn test_sync_local_storage() {
        let (ctx, temp_dir) = create_test_context();
        ctx.storage.init().unwrap();

        assert_eq!(handle(&ctx).await.unwrap(), None);
        assert!(!temp_dir.path().join("data/.git").exists());
    }
}
