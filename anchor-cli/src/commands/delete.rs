use anchor_core::Label;
use anyhow::{Context as _, Result};
use clap::Args;

use super::segments;
use crate::context::{blocking, Context};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Exact label to delete, including everything below it.
    #[arg(value_name = "LABEL", required = true)]
    pub labels: Vec<String>,
}

pub(crate) async fn handle(ctx: &Context, args: DeleteArgs) -> Result<Option<String>> {
    let labels = segments(&args.labels);
    let label = Label::new(labels.clone());
    let store = ctx.store.clone();
    let prompt = ctx.prompt.clone();

    let question = format!("Delete label {label} and every label below it?");
    let removed = blocking(move || {
        store
            .remove_label(&labels, || prompt.ask(&question))
            .with_context(|| format!("Failed to delete label {}", Label::new(labels.clone())))
    })
    .await?;

    if !removed {
        println!("Kept {label}");
        return Ok(None);
    }

    println!("Deleted {label}");
    Ok(Some(format!("delete {label}")))
}
