//! Label path resolution.
//!
//! A label path `[s1, s2, ..., sn]` lives at `<root>/s1/s2/.../sn/sn`: every
//! segment is a directory and the label's own file repeats the last segment
//! inside its directory, so sub-labels can nest beside it. The empty label
//! path maps to the reserved default label.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Result, StoreError};
use crate::{DEFAULT_LABEL, LABEL_SEPARATOR};

#[cfg(unix)]
const DIR_MODE: u32 = 0o777;
#[cfg(unix)]
const FILE_MODE: u32 = 0o666;

// ============================================================================
// Label
// ============================================================================

/// An ordered list of label segments; the first segment is the top-level parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label(Vec<String>);

impl Label {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a dotted label such as `programming.go`.
    pub fn parse(dotted: &str) -> Self {
        Self::new(
            dotted
                .split(LABEL_SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The label one level below this one.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// Last segment, or the default label name.
    pub fn name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or(DEFAULT_LABEL)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(DEFAULT_LABEL);
        }

        f.write_str(&self.0.join(&LABEL_SEPARATOR.to_string()))
    }
}

// ============================================================================
// Label file handle
// ============================================================================

/// An open label file together with where it lives.
#[derive(Debug)]
pub struct LabelFile {
    file: File,
    path: PathBuf,
    label: Label,
}

impl LabelFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Dotted label name, e.g. `programming.go`.
    pub fn name(&self) -> String {
        self.label.to_string()
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Flush file contents to disk after a write so close-time errors surface
    /// before the handle drops. A failed close is reported together with a
    /// failed write rather than in place of it.
    pub fn close_after(self, written: Result<()>) -> Result<()> {
        combine(written, self.file.sync_all())
    }
}

fn combine(written: Result<()>, closed: io::Result<()>) -> Result<()> {
    match (written, closed) {
        (Ok(()), closed) => Ok(closed?),
        (Err(error), Ok(())) => Err(error),
        (Err(error), Err(close)) => Err(StoreError::Close {
            error: Box::new(error),
            close,
        }),
    }
}

impl Read for LabelFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for LabelFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for LabelFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

// ============================================================================
// Open modes
// ============================================================================

/// Read plus append, creating the file when missing.
pub fn append_mode() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).append(true).create(true);
    with_file_mode(&mut options);
    options
}

/// Read plus write on an existing file.
pub fn edit_mode() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true);
    options
}

/// Read only on an existing file.
pub fn read_mode() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true);
    options
}

fn with_file_mode(options: &mut OpenOptions) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    #[cfg(not(unix))]
    let _ = options;
}

// ============================================================================
// Resolution
// ============================================================================

fn effective<S: AsRef<str>>(segments: &[S]) -> Vec<&str> {
    if segments.is_empty() {
        vec![DEFAULT_LABEL]
    } else {
        segments.iter().map(AsRef::<str>::as_ref).collect()
    }
}

fn validate<S: AsRef<str>>(segments: &[S]) -> io::Result<()> {
    for segment in segments.iter().map(AsRef::<str>::as_ref) {
        let invalid = segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains('/')
            || segment.contains(std::path::MAIN_SEPARATOR)
            || segment.contains('\0');

        if invalid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid label segment {segment:?}"),
            ));
        }
    }

    Ok(())
}

/// Directory owning the label: `<root>/s1/.../sn`.
pub fn label_dir<S: AsRef<str>>(root: &Path, segments: &[S]) -> PathBuf {
    effective(segments)
        .into_iter()
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Path of the label file: `<root>/s1/.../sn/sn`.
pub fn resolve<S: AsRef<str>>(root: &Path, segments: &[S]) -> PathBuf {
    let segments = effective(segments);
    let name = segments.last().copied().unwrap_or(DEFAULT_LABEL);
    segments
        .iter()
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
        .join(name)
}

fn create_dirs(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir)
}

/// Open the label file named exactly by `segments`, creating parent
/// directories as needed.
pub fn open<S: AsRef<str>>(root: &Path, segments: &[S], options: &OpenOptions) -> Result<LabelFile> {
    validate(segments)?;

    let path = resolve(root, segments);
    if let Some(parent) = path.parent() {
        create_dirs(parent)?;
    }

    let file = options.open(&path)?;
    Ok(LabelFile {
        file,
        path,
        label: Label::new(segments.iter().map(AsRef::<str>::as_ref)),
    })
}

/// Open the label file matched by a possibly incomplete label path.
///
/// See [`find_fuzzy`] for the matching rules.
pub fn open_fuzzy<S: AsRef<str>>(
    root: &Path,
    segments: &[S],
    options: &OpenOptions,
) -> Result<LabelFile> {
    let path = find_fuzzy(root, segments)?;
    let label = label_of(root, &path);
    let file = options.open(&path)?;

    Ok(LabelFile { file, path, label })
}

/// Locate a label file from a prefix of its label path.
///
/// In order: the exact label file; the first label file found by a
/// depth-first, name-sorted walk of the prefix directory; the same walk over
/// sibling directories whose name starts with the last segment.
pub fn find_fuzzy<S: AsRef<str>>(root: &Path, segments: &[S]) -> Result<PathBuf> {
    validate(segments)?;

    let exact = resolve(root, segments);
    if exact.is_file() {
        return Ok(exact);
    }

    let prefix = if segments.is_empty() {
        root.to_path_buf()
    } else {
        label_dir(root, segments)
    };

    if prefix.is_dir() {
        if let Some(found) = first_label_file(&prefix)? {
            tracing::debug!(prefix = %prefix.display(), found = %found.display(), "fuzzy label match");
            return Ok(found);
        }
    } else if let Some((last, parents)) = segments.split_last() {
        let parent = parents
            .iter()
            .fold(root.to_path_buf(), |dir, segment| dir.join(AsRef::<str>::as_ref(segment)));
        let last: &str = last.as_ref();

        for sibling in sorted_subdirs(&parent)? {
            let matches = sibling
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(last));

            if matches {
                if let Some(found) = first_label_file(&sibling)? {
                    tracing::debug!(found = %found.display(), "fuzzy label match by name prefix");
                    return Ok(found);
                }
            }
        }
    }

    Err(StoreError::LabelNotFound(
        Label::new(segments.iter().map(AsRef::<str>::as_ref)).to_string(),
    ))
}

/// Delete a label with every sub-label below it.
pub fn remove<S: AsRef<str>>(root: &Path, segments: &[S]) -> Result<()> {
    validate(segments)?;
    fs::remove_dir_all(label_dir(root, segments))?;
    Ok(())
}

/// Every label holding a label file, sorted so parents precede children.
pub fn tree(root: &Path) -> Result<Vec<Label>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut labels = Vec::new();
    for entry in walk(root) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && is_label_file(entry.path()) {
            labels.push(label_of(root, entry.path()));
        }
    }

    labels.sort();
    Ok(labels)
}

fn walk(dir: &Path) -> impl Iterator<Item = walkdir::Result<walkdir::DirEntry>> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_label_file(path: &Path) -> bool {
    match (path.file_name(), path.parent().and_then(Path::file_name)) {
        (Some(name), Some(dir)) => name == dir,
        _ => false,
    }
}

fn first_label_file(dir: &Path) -> Result<Option<PathBuf>> {
    for entry in walk(dir) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() && is_label_file(entry.path()) {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() && !entry.file_name().to_string_lossy().starts_with('.') {
            dirs.push(entry.path());
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Label of a label file path relative to `root`.
fn label_of(root: &Path, path: &Path) -> Label {
    let dir = path.parent().unwrap_or(path);
    let relative = dir.strip_prefix(root).unwrap_or(dir);

    Label::new(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    )
}
