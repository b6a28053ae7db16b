use std::str::FromStr;

use anchor_core::{Bookmark, BookmarkId, Outcome};
use anyhow::{Context as _, Result};
use clap::Args;

use super::segments;
use crate::context::{blocking, Context};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Label, or the beginning of one (default: the root label).
    #[arg(value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Delete bookmark N, as numbered by `view`.
    #[arg(long = "delete", value_name = "N")]
    pub deletes: Vec<usize>,

    /// Set the title of bookmark N.
    #[arg(long = "title", value_name = "N=TEXT")]
    pub titles: Vec<Assignment>,

    /// Set the comment of bookmark N.
    #[arg(long = "comment", value_name = "N=TEXT")]
    pub comments: Vec<Assignment>,

    /// Move bookmark N to position M.
    #[arg(long = "move", value_name = "N=M")]
    pub moves: Vec<Assignment>,
}

/// `N=TEXT` on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub index: usize,
    pub text: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (index, text) = s
            .split_once('=')
            .ok_or_else(|| format!("expected N=TEXT, got {s:?}"))?;
        let index = index
            .trim()
            .parse()
            .map_err(|_| format!("invalid bookmark number {index:?}"))?;

        Ok(Self {
            index,
            text: text.to_string(),
        })
    }
}

pub(crate) async fn handle(ctx: &Context, args: EditArgs) -> Result<Option<String>> {
    let labels = segments(&args.labels);
    let store = ctx.store.clone();
    let prompt = ctx.prompt.clone();

    let (label, outcome) = blocking(move || {
        let session = store.open_session(&labels).context("Failed to open label")?;
        let label = session.label().clone();
        let ids: Vec<BookmarkId> = session.bookmarks().iter().map(Bookmark::id).collect();

        let id_at = |number: usize| {
            number
                .checked_sub(1)
                .and_then(|i| ids.get(i))
                .copied()
                .with_context(|| format!("No bookmark number {number} in {label}"))
        };

        let mut editor = session.editor();
        for assignment in &args.titles {
            editor.retitle(id_at(assignment.index)?, &assignment.text);
        }
        for assignment in &args.comments {
            editor.recomment(id_at(assignment.index)?, &assignment.text);
        }
        for assignment in &args.moves {
            let position: usize = assignment
                .text
                .trim()
                .parse()
                .with_context(|| format!("Invalid position {:?}", assignment.text))?;
            editor.move_to(id_at(assignment.index)?, position.saturating_sub(1));
        }
        for &number in &args.deletes {
            editor.delete(id_at(number)?);
        }

        let question = format!("Save changes to {label}?");
        let outcome = store.reconcile(session, editor.finish(), || prompt.ask(&question))?;
        Ok((label, outcome))
    })
    .await?;

    match outcome {
        Outcome::Unchanged => {
            println!("No changes to {label}");
            Ok(None)
        }
        Outcome::Declined => {
            println!("Discarded changes to {label}");
            Ok(None)
        }
        Outcome::Committed {
            written,
            archives_removed,
        } => {
            println!("Saved {label}: {written} bookmark(s), {archives_removed} archive(s) removed");
            Ok(Some(format!("edit {label}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::create_test_context;
    use anchor_core::BookmarkOptions;

    fn args(labels: &[&str]) -> EditArgs {
        EditArgs {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            deletes: vec![],
            titles: vec![],
            comments: vec![],
            moves: vec![],
        }
    }

    fn seed(ctx: &Context, urls: &[&str]) -> Vec<Bookmark> {
        urls.iter()
            .map(|url| {
                let b = Bookmark::new(url, BookmarkOptions::default()).unwrap();
                ctx.store.add(&["news"], &b).unwrap();
                b
            })
            .collect()
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            "2=a = b".parse::<Assignment>().unwrap(),
            Assignment {
                index: 2,
                text: "a = b".to_string()
            }
        );
        assert!("x=1".parse::<Assignment>().is_err());
        assert!("no separator".parse::<Assignment>().is_err());
    }

    #[tokio::test]
    async fn test_edit_delete_and_retitle() {
        let (ctx, _temp_dir) = create_test_context();
        let seeded = seed(&ctx, &["https://a.example", "https://b.example", "https://c.example"]);
        ctx.store
            .archive()
            .write(seeded[1].id(), "b", "<p>b</p>")
            .unwrap();

        let mut edit = args(&["news"]);
        edit.deletes = vec![2];
        edit.titles = vec!["3=Charlie".parse().unwrap()];
        edit.moves = vec!["3=1".parse().unwrap()];

        let message = handle(&ctx, edit).await.unwrap();
        assert_eq!(message.as_deref(), Some("edit news"));

        let (_, bookmarks) = ctx.store.load(&["news"]).unwrap();
        let titles: Vec<&str> = bookmarks.iter().map(Bookmark::title).collect();
        assert_eq!(titles, vec!["Charlie", "https://a.example"]);
        assert!(!ctx.store.archive().exists(seeded[1].id()));
    }

    #[tokio::test]
    async fn test_edit_without_changes() {
        let (ctx, _temp_dir) = create_test_context();
        seed(&ctx, &["https://a.example"]);

        assert_eq!(handle(&ctx, args(&["news"])).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_edit_after_cancel_discards_changes() {
        let (ctx, _temp_dir) = create_test_context();
        seed(&ctx, &["https://a.example", "https://b.example"]);

        let mut edit = args(&["news"]);
        edit.deletes = vec![1];

        ctx.cancel();
        assert_eq!(handle(&ctx, edit).await.unwrap(), None);

        let (_, bookmarks) = ctx.store.load(&["news"]).unwrap();
        assert_eq!(bookmarks.len(), 2);
    }

    #[tokio::test]
    async fn test_edit_out_of_range() {
        let (ctx, _temp_dir) = create_test_context();
        seed(&ctx, &["https://a.example"]);

        let mut edit = args(&["news"]);
        edit.deletes = vec![5];

        let err = handle(&ctx, edit).await.unwrap_err();
        assert_eq!(err.to_string(), "No bookmark number 5 in news");
    }
}
