use anchor_core::{Bookmark, BookmarkOptions, Label};
use anyhow::{anyhow, Context as _, Result};
use clap::Args;

use super::segments;
use crate::context::{blocking, Context};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Label to file the bookmark under; repeat for nested labels.
    #[arg(short, long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Title (default: the page title, or the URL).
    #[arg(short, long)]
    pub title: Option<String>,

    /// Free-form comment.
    #[arg(short, long)]
    pub comment: Option<String>,

    /// Save a snapshot of the page.
    #[arg(short, long)]
    pub archive: bool,

    pub url: String,
}

pub(crate) async fn handle(ctx: &Context, args: AddArgs) -> Result<Option<String>> {
    let options = BookmarkOptions {
        title: args.title.clone(),
        comment: args.comment,
        id: None,
    };
    let mut bookmark = Bookmark::new(&args.url, options)?;

    let page = if args.archive || args.title.is_none() {
        match ctx.fetcher.page(bookmark.url()).await {
            Ok(page) => Some(page),
            Err(e) if args.archive => return Err(e.context("Cannot archive page")),
            Err(e) => {
                tracing::warn!("Could not fetch title: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    if args.title.is_none() {
        if let Some(title) = page.as_ref().and_then(|p| p.title.clone()) {
            bookmark.set_title(title);
        }
    }

    let snapshot = page.filter(|_| args.archive).map(|p| p.content());
    let labels = segments(&args.labels);
    let label = Label::new(labels.clone());
    let store = ctx.store.clone();

    let bookmark = blocking(move || {
        store.add(&labels, &bookmark).map_err(|e| {
            if e.is_duplicate() {
                anyhow!("{} is already bookmarked", bookmark.url())
            } else {
                anyhow::Error::new(e).context("Failed to add bookmark")
            }
        })?;

        if let Some(content) = snapshot {
            store
                .archive()
                .write(bookmark.id(), bookmark.title(), &content)
                .context("Failed to archive page")?;
        }

        Ok(bookmark)
    })
    .await?;

    println!("Added \"{}\" to {}", bookmark.title(), label);
    Ok(Some(format!("add {} to {}", bookmark.url(), label)))
}
