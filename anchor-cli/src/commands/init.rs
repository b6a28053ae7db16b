use anyhow::Result;

use crate::context::{blocking, Context};

pub(crate) async fn handle(ctx: &Context) -> Result<Option<String>> {
    let storage = ctx.storage.clone();
    blocking(move || storage.init()).await?;

    println!("Initialized anchor in {}", ctx.storage.data_dir().display());
    Ok(None)
}
