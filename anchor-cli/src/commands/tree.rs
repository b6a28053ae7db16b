use anchor_core::Label;
use anyhow::{Context as _, Result};

use crate::context::{blocking, Context};

pub(crate) async fn handle(ctx: &Context) -> Result<Option<String>> {
    let store = ctx.store.clone();
    let labels = blocking(move || store.labels().context("Failed to list labels")).await?;

    print!("{}", render(&labels));
    Ok(None)
}

/// One label per line, indented by depth.
pub(crate) fn render(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|label| {
            let indent = "  ".repeat(label.depth().saturating_sub(1));
            format!("{indent}{label}\n")
        })
        .collect()
}
