use std::fmt::Write as _;

use anchor_core::{Bookmark, Label};
use anyhow::{Context as _, Result};
use clap::Args;

use super::segments;
use crate::context::{blocking, Context};

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Label, or the beginning of one (default: the root label).
    #[arg(value_name = "LABEL")]
    pub labels: Vec<String>,
}

pub(crate) async fn handle(ctx: &Context, args: ViewArgs) -> Result<Option<String>> {
    let labels = segments(&args.labels);
    let store = ctx.store.clone();

    let (label, bookmarks) = blocking(move || {
        store
            .load(&labels)
            .with_context(|| format!("Failed to load label {}", Label::new(labels.clone())))
    })
    .await?;

    print!("{}", render(&label, &bookmarks));
    Ok(None)
}

/// Numbered listing, as referenced by `edit`.
pub(crate) fn render(label: &Label, bookmarks: &[Bookmark]) -> String {
    let mut out = format!("{label}\n");

    if bookmarks.is_empty() {
        out.push_str("  (empty)\n");
    }

    for (number, bookmark) in bookmarks.iter().enumerate().map(|(i, b)| (i + 1, b)) {
        let _ = writeln!(out, "{number:>3}. {}", bookmark.title());
        let _ = writeln!(out, "     {}", bookmark.description());
    }

    out
}
