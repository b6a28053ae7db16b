//! Netscape bookmark file parsing.
//!
//! Every major browser exports this format:
//!
//! ```html
//! <!DOCTYPE NETSCAPE-Bookmark-file-1>
//! <DL><p>
//!     <DT><A HREF="https://youtube.com/" ADD_DATE="1680872862">YouTube</A>
//!     <DT><H3>gan</H3>
//!     <DL><p>
//!         <DT><A HREF="https://arxiv.org/pdf/1406.2661.pdf">GAN - 2014 paper</A>
//!         <DD>Original paper
//!     </DL><p>
//! </DL><p>
//! ```
//!
//! The document is scanned tag by tag rather than line by line, so exports
//! that put several elements on one line parse the same way.

use std::sync::OnceLock;

use regex::Regex;

use super::{Entry, Folder};
use crate::scrape;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(
            r#"(?is)<DT>\s*<H3[^>]*>(?P<folder>.*?)</H3>|<DT>\s*<A(?P<attrs>\s[^>]*)?>(?P<title>.*?)</A>|<DD>(?P<desc>[^<]*)|(?P<open><DL[\s>])|(?P<close></DL\s*>)"#,
        )
        .expect("valid netscape token regex")
    })
}

fn href_regex() -> &'static Regex {
    static HREF: OnceLock<Regex> = OnceLock::new();
    HREF.get_or_init(|| Regex::new(r#"(?i)\bHREF\s*=\s*"([^"]*)""#).expect("valid href regex"))
}

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

fn text(fragment: &str) -> String {
    scrape::unescape(tag_regex().replace_all(fragment, "").trim())
}

/// Parse a Netscape bookmark document into a folder tree.
///
/// The returned root folder is unnamed. Unterminated folders are closed at
/// the end of the document. Anchors without an `HREF` produce entries with an
/// empty URL, which the importer rejects.
pub fn parse(html: &str) -> Folder {
    // stack[0] is the unnamed root; every pushed folder is awaiting its </DL>.
    let mut stack = vec![Folder::default()];
    // One flag per open <DL>: whether it opened a named folder.
    let mut lists: Vec<bool> = Vec::new();
    let mut pending: Option<Folder> = None;
    let mut last_was_entry = false;

    for caps in token_regex().captures_iter(html) {
        if let Some(name) = caps.name("folder") {
            pending = Some(Folder::new(text(name.as_str())));
            last_was_entry = false;
        } else if caps.name("title").is_some() {
            let url = caps
                .name("attrs")
                .and_then(|attrs| href_regex().captures(attrs.as_str()))
                .and_then(|href| href.get(1))
                .map(|href| scrape::unescape(href.as_str().trim()))
                .unwrap_or_default();
            let title = caps.name("title").map(|t| text(t.as_str())).unwrap_or_default();

            if let Some(current) = stack.last_mut() {
                current.bookmarks.push(Entry {
                    title,
                    url,
                    comment: None,
                });
            }
            last_was_entry = true;
        } else if let Some(desc) = caps.name("desc") {
            let desc = text(desc.as_str());
            if last_was_entry && !desc.is_empty() {
                if let Some(entry) = stack.last_mut().and_then(|f| f.bookmarks.last_mut()) {
                    entry.comment = Some(desc);
                }
            }
            last_was_entry = false;
        } else if caps.name("open").is_some() {
            match pending.take() {
                Some(folder) => {
                    stack.push(folder);
                    lists.push(true);
                }
                None => lists.push(false),
            }
            last_was_entry = false;
        } else if caps.name("close").is_some() {
            if lists.pop() == Some(true) {
                close_folder(&mut stack);
            }
            last_was_entry = false;
        }
    }

    while stack.len() > 1 {
        close_folder(&mut stack);
    }

    stack.pop().unwrap_or_default()
}

fn close_folder(stack: &mut Vec<Folder>) {
    if stack.len() < 2 {
        return;
    }

    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.folders.push(done);
        }
    }
}
