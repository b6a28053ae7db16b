use std::fs;
use std::path::PathBuf;

use anchor_core::import::{browser, netscape};
use anchor_core::Label;
use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};

use super::segments;
use crate::context::{blocking, Context};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Netscape bookmark HTML, as exported by every major browser
    #[default]
    Netscape,
    /// Chrome `Bookmarks` JSON file
    Chrome,
    /// Firefox JSON backup
    Firefox,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Label to import below; repeat for nested labels.
    #[arg(short, long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = Format::Netscape)]
    pub format: Format,

    pub file: PathBuf,
}

pub(crate) async fn handle(ctx: &Context, args: ImportArgs) -> Result<Option<String>> {
    let labels = segments(&args.labels);
    let store = ctx.store.clone();
    let file = args.file.clone();
    let format = args.format;

    let report = blocking(move || {
        let content = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;

        let folder = match format {
            Format::Netscape => netscape::parse(&content),
            Format::Chrome => browser::from_chrome_json(&content)?,
            Format::Firefox => browser::from_firefox_json(&content)?,
        };

        store
            .import(&labels, &folder)
            .with_context(|| format!("Failed to import {}", file.display()))
    })
    .await?;

    println!(
        "Imported {} bookmark(s) into {} label(s), {} duplicate(s) skipped",
        report.imported,
        report.labels.len(),
        report.duplicates
    );
    for label in &report.labels {
        println!("  {label}");
    }

    if report.imported == 0 {
        return Ok(None);
    }

    let target = Label::new(segments(&args.labels));
    Ok(Some(format!("import {} into {}", args.file.display(), target)))
}
