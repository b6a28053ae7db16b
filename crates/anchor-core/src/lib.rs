//! # anchor-core
//!
//! Label-addressed bookmark store.
//!
//! Bookmarks are grouped under hierarchical labels (`programming.go`) and kept
//! as plain text, one file per label, in a directory tree that mirrors the
//! label hierarchy:
//!
//! ```text
//! <data dir>/
//! ├── root/root                      # default label
//! └── programming/
//!     ├── programming                # label "programming"
//!     └── go/go                      # label "programming.go"
//! ```
//!
//! Each line of a label file is one bookmark:
//!
//! ```text
//! "<title>" "<url>" "<comment>" "<identifier>"
//! ```
//!
//! ## Components
//!
//! - [`bookmark`] - the record type and its line codec
//! - [`label`] - label path resolution (exact and fuzzy), removal and listing
//! - [`store`] - duplicate-checked append and loading of label files
//! - [`reconcile`] - applying an editing session back to a label file
//! - [`import`] - mapping an external folder tree onto label files
//! - [`archive`] - per-bookmark page snapshots keyed by identifier
//! - [`scrape`] - pure HTML extraction helpers
//!
//! ## Example
//!
//! ```rust,no_run
//! use anchor_core::prelude::*;
//!
//! # fn example() -> anchor_core::Result<()> {
//! let store = Store::new("/tmp/anchor", "/tmp/anchor/.archive");
//! let bookmark = Bookmark::new("https://go.dev/ref/spec", BookmarkOptions::default())?;
//! store.add(&["programming", "go"], &bookmark)?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod bookmark;
pub mod error;
pub mod import;
pub mod label;
pub mod reconcile;
pub mod scrape;
pub mod store;

pub use archive::Archive;
pub use bookmark::{Bookmark, BookmarkId, BookmarkOptions};
pub use error::{Result, StoreError};
pub use import::{Entry, Folder, ImportReport};
pub use label::{Label, LabelFile};
pub use reconcile::{Action, EditLog, Operation, Outcome, Session, SessionResult};
pub use store::Store;

/// Reserved label used when no label is given.
pub const DEFAULT_LABEL: &str = "root";

/// Separator used when a label path is written as a single string.
pub const LABEL_SEPARATOR: char = '.';

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::archive::Archive;
    pub use crate::bookmark::{Bookmark, BookmarkId, BookmarkOptions};
    pub use crate::error::{Result, StoreError};
    pub use crate::import::{Entry, Folder, ImportReport};
    pub use crate::label::{Label, LabelFile};
    pub use crate::reconcile::{Action, EditLog, Operation, Outcome, Session, SessionResult};
    pub use crate::store::Store;
}
