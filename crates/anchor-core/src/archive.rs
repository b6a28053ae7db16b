//! Saved page snapshots, one HTML file per bookmark identifier.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::bookmark::BookmarkId;
use crate::error::Result;
use crate::scrape;

const PAGE_STYLE: &[&str] = &[
    "max-width: 40em",
    "margin-right: 10%",
    "margin-left: 10%",
    "margin-top: 7%",
    "margin-bottom: 7%",
];

/// Directory of archived pages keyed by [`BookmarkId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    dir: PathBuf,
}

impl Archive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<id>.html`
    pub fn path_for(&self, id: BookmarkId) -> PathBuf {
        self.dir.join(format!("{id}.html"))
    }

    pub fn exists(&self, id: BookmarkId) -> bool {
        self.path_for(id).is_file()
    }

    /// Store `content` (an HTML fragment) as the snapshot for `id`.
    pub fn write(&self, id: BookmarkId, title: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(id);
        fs::write(&path, render(title, content, Utc::now()))?;
        Ok(path)
    }

    /// Remove the snapshot for `id`. Returns whether a file was removed.
    pub fn remove(&self, id: BookmarkId) -> bool {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ignoring archive removal failure");
                false
            }
        }
    }
}

fn render(title: &str, content: &str, archived_at: DateTime<Utc>) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <meta name=\"archived-at\" content=\"{archived_at}\">\n</head>\n<body>\n\
         <div style=\"{style};\">{content}</div>\n</body>\n</html>\n",
        title = scrape::escape(title),
        archived_at = archived_at.to_rfc3339(),
        style = PAGE_STYLE.join(";"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_for_uses_id() {
        let archive = Archive::new("/archive");
        let id: BookmarkId = "01890a5d-ac96-774b-bcce-b302099a8057".parse().unwrap();

        assert_eq!(
            archive.path_for(id),
            PathBuf::from("/archive/01890a5d-ac96-774b-bcce-b302099a8057.html")
        );
    }

    #[test]
    fn test_write_and_remove() {
        let dir = TempDir::new().unwrap();
        let archive = Archive::new(dir.path().join("nested/archive"));
        let id = BookmarkId::generate();

        let path = archive.write(id, "A <b>title</b>", "<p>body</p>").unwrap();
        let html = fs::read_to_string(&path).unwrap();

        assert!(html.contains("<title>A &lt;b&gt;title&lt;/b&gt;</title>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("max-width: 40em"));
        assert!(archive.exists(id));

        assert!(archive.remove(id));
        assert!(!archive.exists(id));
        assert!(!archive.remove(id));
    }
}
