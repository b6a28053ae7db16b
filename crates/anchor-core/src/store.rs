//! Label file storage.
//!
//! [`append`] and [`load`] work on any reader/writer so they can be tested
//! against in-memory buffers; [`Store`] ties them to a data directory.

use std::fs;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::archive::Archive;
use crate::bookmark::{self, Bookmark};
use crate::error::{Result, StoreError};
use crate::import::{self, Folder, ImportReport};
use crate::label::{self, Label};
use crate::reconcile::{Outcome, Session, SessionResult};

// ============================================================================
// Label file operations
// ============================================================================

/// Append `bookmark` unless its URL is already stored in `file`.
///
/// The whole file is read before anything is written, so a duplicate leaves
/// the content untouched.
pub fn append<F: Read + Write + Seek>(file: &mut F, bookmark: &Bookmark) -> Result<()> {
    file.seek(SeekFrom::Start(0))?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;

    if contains_url(&content, bookmark.url()) {
        return Err(StoreError::DuplicateBookmark(bookmark.url().to_string()));
    }

    let mut line = bookmark.to_line();
    if !content.is_empty() && !content.ends_with('\n') {
        line.insert(0, '\n');
    }

    file.seek(SeekFrom::End(0))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Whether any line of `content` has `url` as its URL field.
pub fn contains_url(content: &str, url: &str) -> bool {
    content.lines().any(|line| {
        bookmark::tokenize(line.trim())
            .get(1)
            .is_some_and(|field| bookmark::unquote(field) == url)
    })
}

/// Parse every record of a label file, in order.
///
/// Blank lines are skipped; any other malformed line fails the whole load.
pub fn load<R: Read>(reader: R) -> Result<Vec<Bookmark>> {
    let mut bookmarks = Vec::new();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let bookmark = Bookmark::from_line(&line).map_err(|e| match e {
            StoreError::InvalidBookmark(msg) => {
                StoreError::InvalidBookmark(format!("line {}: {msg}", index + 1))
            }
            other => other,
        })?;
        bookmarks.push(bookmark);
    }

    Ok(bookmarks)
}

// ============================================================================
// Store
// ============================================================================

/// Bookmark store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    archive: Archive,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            archive: Archive::new(archive_dir),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }

    /// Add a bookmark to the label named exactly by `labels`.
    ///
    /// Returns the path of the label file written to.
    pub fn add<S: AsRef<str>>(&self, labels: &[S], bookmark: &Bookmark) -> Result<PathBuf> {
        let mut file = label::open(&self.root, labels, &label::append_mode())?;
        let path = file.path().to_path_buf();

        let written = append(&mut file, bookmark);
        file.close_after(written)?;

        tracing::debug!(label = %path.display(), url = bookmark.url(), "bookmark appended");
        Ok(path)
    }

    /// Read the bookmarks of the label matched by a possibly incomplete label path.
    pub fn load<S: AsRef<str>>(&self, labels: &[S]) -> Result<(Label, Vec<Bookmark>)> {
        let mut file = label::open_fuzzy(&self.root, labels, &label::read_mode())?;
        let bookmarks = load(&mut file)?;
        Ok((file.label().clone(), bookmarks))
    }

    /// Start an editing session on the label matched by `labels`.
    pub fn open_session<S: AsRef<str>>(&self, labels: &[S]) -> Result<Session> {
        let file = label::open_fuzzy(&self.root, labels, &label::edit_mode())?;
        Session::load(file)
    }

    /// Apply the result of an editing session.
    pub fn reconcile(
        &self,
        session: Session,
        result: SessionResult,
        confirm: impl FnOnce() -> bool,
    ) -> Result<Outcome> {
        session.reconcile(result, confirm, &self.archive)
    }

    /// Delete a label, its sub-labels and the archives of their bookmarks.
    ///
    /// Returns `false` when `confirm` declines. Archive cleanup is best-effort.
    pub fn remove_label<S: AsRef<str>>(
        &self,
        labels: &[S],
        confirm: impl FnOnce() -> bool,
    ) -> Result<bool> {
        if !confirm() {
            return Ok(false);
        }

        let doomed = self.ids_under(&label::label_dir(&self.root, labels));
        label::remove(&self.root, labels)?;

        let removed = doomed.into_iter().filter(|id| self.archive.remove(*id)).count();
        tracing::debug!(archives_removed = removed, "label removed");
        Ok(true)
    }

    /// Every label with a label file.
    pub fn labels(&self) -> Result<Vec<Label>> {
        label::tree(&self.root)
    }

    /// Import a folder tree below the label `labels`.
    pub fn import<S: AsRef<str>>(&self, labels: &[S], folder: &Folder) -> Result<ImportReport> {
        import::traverse(&self.root, labels, folder)
    }

    fn ids_under(&self, dir: &Path) -> Vec<bookmark::BookmarkId> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| fs::File::open(e.path()).ok())
            .filter_map(|file| load(file).ok())
            .flatten()
            .map(|b| b.id())
            .collect()
    }
}
