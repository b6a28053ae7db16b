//! Chrome and Firefox JSON bookmark exports.

use serde::Deserialize;

use super::{Entry, Folder};
use crate::error::Result;

// ============================================================================
// Chrome
// ============================================================================

/// Chrome bookmark export format.
#[derive(Debug, Deserialize)]
struct ChromeBookmarkRoot {
    roots: ChromeBookmarkRoots,
}

#[derive(Debug, Deserialize)]
struct ChromeBookmarkRoots {
    bookmark_bar: ChromeBookmarkNode,
    #[serde(default)]
    other: Option<ChromeBookmarkNode>,
    #[serde(default)]
    synced: Option<ChromeBookmarkNode>,
}

#[derive(Debug, Deserialize)]
struct ChromeBookmarkNode {
    #[serde(default)]
    children: Vec<ChromeBookmarkNode>,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    url: Option<String>,
}

/// Parse a Chrome `Bookmarks` file.
///
/// The bookmark bar becomes the root folder; "Other bookmarks" and synced
/// mobile bookmarks become child folders when they hold anything.
pub fn from_chrome_json(json: &str) -> Result<Folder> {
    let chrome_data: ChromeBookmarkRoot = serde_json::from_str(json)?;

    let mut root = chrome_folder(&chrome_data.roots.bookmark_bar);
    root.name = String::new();

    for extra in [&chrome_data.roots.other, &chrome_data.roots.synced]
        .into_iter()
        .flatten()
    {
        let folder = chrome_folder(extra);
        if !folder.is_empty() {
            root.folders.push(folder);
        }
    }

    Ok(root)
}

fn chrome_folder(node: &ChromeBookmarkNode) -> Folder {
    let mut folder = Folder::new(node.name.trim());

    for child in &node.children {
        match child.node_type.as_str() {
            "folder" => folder.folders.push(chrome_folder(child)),
            "url" => folder.bookmarks.push(Entry::new(
                child.name.clone(),
                child.url.clone().unwrap_or_default(),
            )),
            _ => {}
        }
    }

    folder
}

// ============================================================================
// Firefox
// ============================================================================

/// Firefox bookmark backup format (simplified).
#[derive(Debug, Deserialize)]
struct FirefoxBookmark {
    #[serde(default)]
    title: String,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    children: Vec<FirefoxBookmark>,
    #[serde(rename = "type")]
    #[serde(default)]
    bookmark_type: String,
}

const FIREFOX_CONTAINER: &str = "text/x-moz-place-container";
const FIREFOX_PLACE: &str = "text/x-moz-place";

/// Parse a Firefox JSON bookmark backup.
pub fn from_firefox_json(json: &str) -> Result<Folder> {
    let firefox_data: FirefoxBookmark = serde_json::from_str(json)?;

    let mut root = firefox_folder(&firefox_data);
    root.name = String::new();
    Ok(root)
}

fn firefox_folder(node: &FirefoxBookmark) -> Folder {
    let mut folder = Folder::new(node.title.trim());
    collect_firefox_children(node, &mut folder);
    folder
}

fn collect_firefox_children(node: &FirefoxBookmark, folder: &mut Folder) {
    for child in &node.children {
        match child.bookmark_type.as_str() {
            FIREFOX_CONTAINER => folder.folders.push(firefox_folder(child)),
            FIREFOX_PLACE => folder.bookmarks.push(Entry::new(
                child.title.clone(),
                child.uri.clone().unwrap_or_default(),
            )),
            // Separators carry nothing; unknown nodes may still hold places.
            _ => collect_firefox_children(child, folder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_import_chrome_bookmarks() {
        let chrome_json = r#"{
            "roots": {
                "bookmark_bar": {
                    "type": "folder",
                    "name": "Bookmarks Bar",
                    "children": [
                        {
                            "type": "url",
                            "name": "Example",
                            "url": "https://example.com"
                        },
                        {
                            "type": "folder",
                            "name": "Tech",
                            "children": [
                                {
                                    "type": "url",
                                    "name": "Rust",
                                    "url": "https://rust-lang.org"
                                }
                            ]
                        }
                    ]
                },
                "other": {
                    "type": "folder",
                    "name": "Other Bookmarks",
                    "children": []
                }
            }
        }"#;

        let root = from_chrome_json(chrome_json).unwrap();

        assert_eq!(root.name, "");
        assert_eq!(root.count(), 2);
        assert_eq!(root.bookmarks, vec![Entry::new("Example", "https://example.com")]);
        assert_eq!(root.folders.len(), 1);
        assert_eq!(root.folders[0].name, "Tech");
        assert_eq!(root.folders[0].bookmarks[0].url, "https://rust-lang.org");
    }

    #[test]
    fn test_import_chrome_other_folder() {
        let chrome_json = r#"{
            "roots": {
                "bookmark_bar": { "type": "folder", "name": "Bookmarks Bar", "children": [] },
                "other": {
                    "type": "folder",
                    "name": "Other Bookmarks",
                    "children": [
                        { "type": "url", "name": "Docs", "url": "https://docs.rs" }
                    ]
                }
            }
        }"#;

        let root = from_chrome_json(chrome_json).unwrap();

        assert!(root.bookmarks.is_empty());
        assert_eq!(root.folders[0].name, "Other Bookmarks");
        assert_eq!(root.folders[0].bookmarks[0].title, "Docs");
    }

    #[test]
    fn test_import_firefox_bookmarks() {
        let firefox_json = r#"{
            "type": "text/x-moz-place-container",
            "title": "root",
            "children": [
                {
                    "type": "text/x-moz-place",
                    "title": "Mozilla",
                    "uri": "https://mozilla.org"
                },
                {
                    "type": "text/x-moz-place-separator"
                },
                {
                    "type": "text/x-moz-place-container",
                    "title": "Development",
                    "children": [
                        {
                            "type": "text/x-moz-place",
                            "title": "MDN",
                            "uri": "https://developer.mozilla.org"
                        }
                    ]
                }
            ]
        }"#;

        let root = from_firefox_json(firefox_json).unwrap();

        assert_eq!(root.name, "");
        assert_eq!(root.bookmarks, vec![Entry::new("Mozilla", "https://mozilla.org")]);
        assert_eq!(root.folders[0].name, "Development");
        assert_eq!(root.folders[0].bookmarks[0].title, "MDN");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            from_chrome_json("{ not json"),
            Err(StoreError::Json(_))
        ));
        assert!(matches!(from_firefox_json("[]"), Err(StoreError::Json(_))));
    }
}
