//! Integration tests for importing bookmark exports into label files.

mod fixtures;

use anchor_core::import::netscape;
use anchor_core::{Label, StoreError};
use fixtures::{create_test_store, label_lines, read_testdata};

#[test]
fn test_import_netscape_export() {
    let (store, temp_dir) = create_test_store();
    let tree = netscape::parse(&read_testdata("bookmarks.html"));

    let report = store.import::<&str>(&[], &tree).unwrap();

    assert_eq!(report.imported, 3);
    assert_eq!(report.duplicates, 0);
    assert_eq!(report.labels, vec![Label::default(), Label::new(["gan"])]);

    let root = label_lines(temp_dir.path(), "root/root");
    assert_eq!(root.len(), 1);
    assert!(root[0].starts_with(r#""YouTube" "https://youtube.com/" """#));

    let gan = label_lines(temp_dir.path(), "gan/gan");
    assert_eq!(gan.len(), 2);
    assert!(gan[0].starts_with(
        r#""GitHub - soumith/ganhacks: starter from \"How to Train a GAN?\" at NIPS2016" "https://github.com/soumith/ganhacks""#
    ));
    assert!(gan[1].starts_with(
        r#""GAN - 2014 paper" "https://arxiv.org/pdf/1406.2661.pdf" "Goodfellow et al.""#
    ));
}

#[test]
fn test_imported_labels_load_back() {
    let (store, _temp_dir) = create_test_store();
    let tree = netscape::parse(&read_testdata("bookmarks.html"));
    store.import::<&str>(&[], &tree).unwrap();

    let (label, bookmarks) = store.load(&["gan"]).unwrap();
    assert_eq!(label, Label::new(["gan"]));
    assert_eq!(bookmarks[1].comment(), "Goodfellow et al.");

    assert_eq!(
        store.labels().unwrap(),
        vec![Label::new(["gan"]), Label::new(["root"])]
    );
}

#[test]
fn test_import_under_label() {
    let (store, temp_dir) = create_test_store();
    let tree = netscape::parse(&read_testdata("bookmarks.html"));

    store.import(&["ml"], &tree).unwrap();

    assert!(temp_dir.path().join("ml/ml").is_file());
    assert!(temp_dir.path().join("ml/gan/gan").is_file());
    assert!(!temp_dir.path().join("root").exists());
}

#[test]
fn test_import_twice_skips_duplicates() {
    let (store, temp_dir) = create_test_store();
    let tree = netscape::parse(&read_testdata("bookmarks.html"));

    store.import::<&str>(&[], &tree).unwrap();
    let report = store.import::<&str>(&[], &tree).unwrap();

    assert_eq!(report.imported, 0);
    assert_eq!(report.duplicates, 3);
    assert_eq!(label_lines(temp_dir.path(), "gan/gan").len(), 2);
}

#[test]
fn test_import_empty_tree_creates_nothing() {
    let (store, temp_dir) = create_test_store();
    let tree = netscape::parse(&read_testdata("empty.html"));

    let report = store.import::<&str>(&[], &tree).unwrap();

    assert_eq!(report.imported, 0);
    assert!(report.labels.is_empty());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_import_missing_url_fails() {
    let (store, temp_dir) = create_test_store();
    let tree = netscape::parse(&read_testdata("missing_url.html"));

    let err = store.import::<&str>(&[], &tree).unwrap_err();

    assert!(matches!(err, StoreError::InvalidUrl { .. }));
    assert!(!temp_dir.path().join("invalid").exists());
}
