//! Test fixtures for integration tests.
//!
//! Helpers for building a store in a temporary directory and reading the
//! checked-in bookmark exports under `tests/testdata`.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anchor_core::{Bookmark, BookmarkOptions, Store};
use tempfile::TempDir;

/// Creates a store whose data and archive directories live in a fresh temp dir.
pub fn create_test_store() -> (Store, TempDir) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let store = Store::new(temp_dir.path(), temp_dir.path().join(".archive"));
    (store, temp_dir)
}

/// Creates a bookmark with a generated identifier.
pub fn create_test_bookmark(url: &str, title: &str) -> Bookmark {
    Bookmark::new(url, BookmarkOptions::default().with_title(title)).expect("valid test bookmark")
}

/// Path of a file under `tests/testdata`.
pub fn testdata(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(name)
}

/// Contents of a file under `tests/testdata`.
pub fn read_testdata(name: &str) -> String {
    fs::read_to_string(testdata(name)).expect("read testdata")
}

/// Raw lines of a label file.
pub fn label_lines(root: &Path, relative: &str) -> Vec<String> {
    fs::read_to_string(root.join(relative))
        .expect("read label file")
        .lines()
        .map(str::to_string)
        .collect()
}
