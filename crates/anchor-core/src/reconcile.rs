//! Applying an editing session back to a label file.
//!
//! A [`Session`] loads every record of a label file. The editor (an
//! interactive UI, or [`EditLog`] driven from the command line) works on its
//! own copy and hands back a [`SessionResult`]: the final ordered list, the
//! actions taken and whether anything changed. [`Session::reconcile`] then
//! rewrites the file and removes the archives of deleted bookmarks.
//!
//! The rewrite truncates the file in place. A crash while writing can leave
//! fewer records than before.

use std::io::{Seek, SeekFrom, Write};

use serde::{Deserialize, Serialize};

use crate::archive::Archive;
use crate::bookmark::{Bookmark, BookmarkId};
use crate::error::Result;
use crate::label::{Label, LabelFile};
use crate::store;

// ============================================================================
// Session result
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Changed in place; covered by the rewrite.
    Edit,
    /// Removed; its archive must go too.
    Delete,
}

/// One discrete change made during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub operation: Operation,
    pub target: BookmarkId,
}

/// What an editor hands back when its session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionResult {
    pub bookmarks: Vec<Bookmark>,
    pub actions: Vec<Action>,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was modified; no writes happened.
    Unchanged,
    /// The confirmation was declined; no writes happened.
    Declined,
    Committed {
        written: usize,
        archives_removed: usize,
    },
}

// ============================================================================
// Session
// ============================================================================

/// A label file loaded for editing.
#[derive(Debug)]
pub struct Session {
    file: LabelFile,
    bookmarks: Vec<Bookmark>,
}

impl Session {
    /// Parse every line of `file`. One malformed line fails the session.
    pub fn load(mut file: LabelFile) -> Result<Self> {
        file.seek(SeekFrom::Start(0))?;
        let bookmarks = store::load(&mut file)?;
        Ok(Self { file, bookmarks })
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn label(&self) -> &Label {
        self.file.label()
    }

    /// An [`EditLog`] over a copy of the loaded records.
    pub fn editor(&self) -> EditLog {
        EditLog::new(self.bookmarks.clone())
    }

    /// Write `result` back to the label file.
    ///
    /// Does nothing unless `result.dirty` is set and `confirm` agrees. Archive
    /// removal for deleted bookmarks is best-effort and never fails the call.
    pub fn reconcile(
        self,
        result: SessionResult,
        confirm: impl FnOnce() -> bool,
        archive: &Archive,
    ) -> Result<Outcome> {
        if !result.dirty {
            return Ok(Outcome::Unchanged);
        }

        if !confirm() {
            return Ok(Outcome::Declined);
        }

        let content: String = result.bookmarks.iter().map(Bookmark::to_line).collect();

        let mut file = self.file;
        let written = rewrite(&mut file, content.as_bytes());
        file.close_after(written)?;

        let archives_removed = result
            .actions
            .iter()
            .filter(|action| action.operation == Operation::Delete)
            .filter(|action| archive.remove(action.target))
            .count();

        Ok(Outcome::Committed {
            written: result.bookmarks.len(),
            archives_removed,
        })
    }
}

fn rewrite(file: &mut LabelFile, content: &[u8]) -> Result<()> {
    file.file_mut().set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(content)?;
    Ok(())
}

// ============================================================================
// Edit log
// ============================================================================

/// List-editing model that records the actions an editor performs.
#[derive(Debug, Clone, Default)]
pub struct EditLog {
    bookmarks: Vec<Bookmark>,
    actions: Vec<Action>,
}

impl EditLog {
    pub fn new(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            bookmarks,
            actions: Vec::new(),
        }
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn is_dirty(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn position(&self, id: BookmarkId) -> Option<usize> {
        self.bookmarks.iter().position(|b| b.id() == id)
    }

    /// Remove a bookmark. Returns it if it was present.
    pub fn delete(&mut self, id: BookmarkId) -> Option<Bookmark> {
        let index = self.position(id)?;
        let removed = self.bookmarks.remove(index);
        self.record(Operation::Delete, id);
        Some(removed)
    }

    /// Change a title. Returns `false` if the bookmark is unknown.
    pub fn retitle(&mut self, id: BookmarkId, title: &str) -> bool {
        self.update(id, |b| b.set_title(title))
    }

    /// Change a comment. Returns `false` if the bookmark is unknown.
    pub fn recomment(&mut self, id: BookmarkId, comment: &str) -> bool {
        self.update(id, |b| b.set_comment(comment))
    }

    /// Move a bookmark to `index`, clamped to the end of the list.
    pub fn move_to(&mut self, id: BookmarkId, index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };

        let to = index.min(self.bookmarks.len() - 1);
        if from != to {
            let bookmark = self.bookmarks.remove(from);
            self.bookmarks.insert(to, bookmark);
            self.record(Operation::Edit, id);
        }
        true
    }

    pub fn finish(self) -> SessionResult {
        SessionResult {
            dirty: self.is_dirty(),
            bookmarks: self.bookmarks,
            actions: self.actions,
        }
    }

    fn update(&mut self, id: BookmarkId, change: impl FnOnce(&mut Bookmark)) -> bool {
        let Some(bookmark) = self.bookmarks.iter_mut().find(|b| b.id() == id) else {
            return false;
        };

        let before = bookmark.clone();
        change(bookmark);
        if *bookmark != before {
            self.record(Operation::Edit, id);
        }
        true
    }

    fn record(&mut self, operation: Operation, target: BookmarkId) {
        self.actions.push(Action { operation, target });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::BookmarkOptions;
    use crate::label;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        archive: Archive,
        bookmarks: Vec<Bookmark>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let archive = Archive::new(dir.path().join(".archive"));
            let mut file = label::open(dir.path(), &["news"], &label::append_mode()).unwrap();

            let bookmarks: Vec<Bookmark> = ["https://a.example", "https://b.example", "https://c.example"]
                .iter()
                .map(|url| Bookmark::new(url, BookmarkOptions::default()).unwrap())
                .collect();
            for b in &bookmarks {
                store::append(&mut file, b).unwrap();
            }
            file.close_after(Ok(())).unwrap();

            Self {
                dir,
                archive,
                bookmarks,
            }
        }

        fn path(&self) -> std::path::PathBuf {
            self.dir.path().join("news/news")
        }

        fn session(&self) -> Session {
            let file = label::open(self.dir.path(), &["news"], &label::edit_mode()).unwrap();
            Session::load(file).unwrap()
        }
    }

    #[test]
    fn test_load_keeps_order() {
        let fixture = Fixture::new();
        let session = fixture.session();

        assert_eq!(session.bookmarks(), fixture.bookmarks.as_slice());
        assert_eq!(session.label().to_string(), "news");
    }

    #[test]
    fn test_load_fails_on_corruption() {
        let fixture = Fixture::new();
        fs::write(fixture.path(), "not a bookmark\n").unwrap();

        let file = label::open(fixture.dir.path(), &["news"], &label::edit_mode()).unwrap();
        assert!(Session::load(file).is_err());
    }

    #[test]
    fn test_unchanged_session_writes_nothing() {
        let fixture = Fixture::new();
        let before = fs::read(fixture.path()).unwrap();
        let session = fixture.session();
        let result = session.editor().finish();

        let outcome = session
            .reconcile(result, || panic!("must not prompt"), &fixture.archive)
            .unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(fs::read(fixture.path()).unwrap(), before);
        assert!(!fixture.archive.dir().exists());
    }

    #[test]
    fn test_declined_session_writes_nothing() {
        let fixture = Fixture::new();
        let before = fs::read(fixture.path()).unwrap();
        let session = fixture.session();
        let mut editor = session.editor();
        editor.delete(fixture.bookmarks[0].id());

        let outcome = session
            .reconcile(editor.finish(), || false, &fixture.archive)
            .unwrap();

        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(fs::read(fixture.path()).unwrap(), before);
    }

    #[test]
    fn test_commit_rewrites_in_edited_order() {
        let fixture = Fixture::new();
        let session = fixture.session();
        let mut editor = session.editor();
        let [a, b, c] = [0, 1, 2].map(|i| fixture.bookmarks[i].id());

        assert!(editor.move_to(c, 0));
        assert!(editor.retitle(a, "Alpha"));

        let outcome = session
            .reconcile(editor.finish(), || true, &fixture.archive)
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Committed {
                written: 3,
                archives_removed: 0
            }
        );

        let written = store::load(fs::File::open(fixture.path()).unwrap()).unwrap();
        let ids: Vec<_> = written.iter().map(Bookmark::id).collect();
        assert_eq!(ids, vec![c, a, b]);
        assert_eq!(written[1].title(), "Alpha");
    }

    #[test]
    fn test_delete_removes_archive() {
        let fixture = Fixture::new();
        let target = fixture.bookmarks[1].id();
        let kept = fixture.bookmarks[2].id();
        fixture.archive.write(target, "b", "<p>b</p>").unwrap();
        fixture.archive.write(kept, "c", "<p>c</p>").unwrap();

        let session = fixture.session();
        let mut editor = session.editor();
        assert!(editor.delete(target).is_some());

        let outcome = session
            .reconcile(editor.finish(), || true, &fixture.archive)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Committed {
                written: 2,
                archives_removed: 1
            }
        );
        assert!(!fixture.archive.exists(target));
        assert!(fixture.archive.exists(kept));

        let content = fs::read_to_string(fixture.path()).unwrap();
        assert!(!content.contains("https://b.example"));
    }

    #[test]
    fn test_delete_without_archive_is_not_an_error() {
        let fixture = Fixture::new();
        let session = fixture.session();
        let mut editor = session.editor();
        editor.delete(fixture.bookmarks[0].id());

        let outcome = session
            .reconcile(editor.finish(), || true, &fixture.archive)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Committed {
                written: 2,
                archives_removed: 0
            }
        );
    }

    #[test]
    fn test_delete_everything_leaves_empty_file() {
        let fixture = Fixture::new();
        let session = fixture.session();
        let mut editor = session.editor();
        for b in &fixture.bookmarks {
            editor.delete(b.id());
        }

        session
            .reconcile(editor.finish(), || true, &fixture.archive)
            .unwrap();

        assert!(fixture.path().is_file());
        assert_eq!(fs::read(fixture.path()).unwrap().len(), 0);
    }

    #[test]
    fn test_edit_log_records_actions() {
        let fixture = Fixture::new();
        let mut editor = EditLog::new(fixture.bookmarks.clone());
        let [a, b, _] = [0, 1, 2].map(|i| fixture.bookmarks[i].id());

        assert!(!editor.is_dirty());

        // Same value, no change.
        assert!(editor.retitle(a, fixture.bookmarks[0].title()));
        assert!(!editor.is_dirty());

        assert!(editor.recomment(a, "first"));
        assert!(editor.delete(b).is_some());
        assert!(editor.delete(b).is_none());
        assert!(!editor.retitle(b, "gone"));

        let result = editor.finish();
        assert!(result.dirty);
        assert_eq!(
            result.actions,
            vec![
                Action {
                    operation: Operation::Edit,
                    target: a
                },
                Action {
                    operation: Operation::Delete,
                    target: b
                },
            ]
        );
        assert_eq!(result.bookmarks.len(), 2);
        assert_eq!(result.bookmarks[0].comment(), "first");
    }

    #[test]
    fn test_move_to_clamps() {
        let fixture = Fixture::new();
        let mut editor = EditLog::new(fixture.bookmarks.clone());
        let a = fixture.bookmarks[0].id();

        assert!(editor.move_to(a, 99));
        assert_eq!(editor.position(a), Some(2));
        assert!(!editor.move_to(BookmarkId::generate(), 0));
    }
}
