//! Importing a folder tree of bookmarks into label files.
//!
//! Every folder becomes a label one level below its parent's label and every
//! bookmark entry is appended to its folder's label file. The document
//! formats that produce the tree live in [`netscape`] and [`browser`].

pub mod browser;
pub mod netscape;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bookmark::{Bookmark, BookmarkOptions};
use crate::error::Result;
use crate::label::{self, Label, LabelFile};
use crate::store;

// ============================================================================
// Import tree
// ============================================================================

/// A bookmark entry of an imported document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Entry {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            comment: None,
        }
    }

    /// Build a record with a fresh identifier.
    pub fn to_bookmark(&self) -> Result<Bookmark> {
        Bookmark::new(
            &self.url,
            BookmarkOptions {
                title: Some(self.title.clone()),
                comment: self.comment.clone(),
                id: None,
            },
        )
    }
}

/// A folder of an imported document. The name of the top-level folder is
/// not used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub bookmarks: Vec<Entry>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Number of bookmark entries in this folder and all below it.
    pub fn count(&self) -> usize {
        self.bookmarks.len() + self.folders.iter().map(Folder::count).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Summary of a finished import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Bookmarks written.
    pub imported: usize,
    /// Bookmarks skipped because their label already held the URL.
    pub duplicates: usize,
    /// Labels written to, in traversal order.
    pub labels: Vec<Label>,
}

// ============================================================================
// Traversal
// ============================================================================

/// Write every bookmark of `folder` below the label `prefix`.
///
/// Bookmarks go to the label file of `prefix`, sub-folders recurse with their
/// name appended. A folder's entries are all converted before its label file
/// is opened, so an invalid entry aborts without touching that label; labels
/// written earlier in the traversal stay as they are.
pub fn traverse<S: AsRef<str>>(root: &Path, prefix: &[S], folder: &Folder) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let prefix = Label::new(prefix.iter().map(AsRef::<str>::as_ref));

    visit(root, &prefix, folder, &mut report)?;
    Ok(report)
}

fn visit(root: &Path, label: &Label, folder: &Folder, report: &mut ImportReport) -> Result<()> {
    if !folder.bookmarks.is_empty() {
        let bookmarks = folder
            .bookmarks
            .iter()
            .map(Entry::to_bookmark)
            .collect::<Result<Vec<_>>>()?;

        let mut file = label::open(root, label.segments(), &label::append_mode())?;
        let written = write_all(&mut file, &bookmarks, report);
        file.close_after(written)?;

        report.labels.push(label.clone());
    }

    for child in &folder.folders {
        visit(root, &label.child(child.name.as_str()), child, report)?;
    }

    Ok(())
}

fn write_all(file: &mut LabelFile, bookmarks: &[Bookmark], report: &mut ImportReport) -> Result<()> {
    for bookmark in bookmarks {
        match store::append(file, bookmark) {
            Ok(()) => report.imported += 1,
            Err(e) if e.is_duplicate() => {
                tracing::debug!(label = %file.name(), url = bookmark.url(), "skipping duplicate");
                report.duplicates += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
