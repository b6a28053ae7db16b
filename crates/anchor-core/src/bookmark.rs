//! Bookmark record and its single-line text codec.
//!
//! A bookmark is stored as four space separated, double quoted fields:
//!
//! ```text
//! "<title>" "<url>" "<comment>" "<identifier>"
//! ```
//!
//! Quotes, backslashes and control characters inside a field are escaped with
//! a backslash. When parsing, only the title and URL are required; a missing
//! comment is empty and a missing or empty identifier is regenerated.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{Result, StoreError};

// ============================================================================
// Identifier
// ============================================================================

/// Time-ordered unique identifier of a bookmark.
///
/// Only used to name archived content; it never acts as a user facing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookmarkId(Uuid);

impl BookmarkId {
    /// Generate a fresh UUID v7 identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for BookmarkId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| StoreError::InvalidBookmark(format!("invalid identifier {s:?}: {e}")))
    }
}

// ============================================================================
// Construction options
// ============================================================================

/// Optional overrides applied when a bookmark is constructed.
///
/// Empty or whitespace-only values count as absent. An absent title falls
/// back to the URL and an absent id is generated.
#[derive(Debug, Clone, Default)]
pub struct BookmarkOptions {
    pub title: Option<String>,
    pub comment: Option<String>,
    pub id: Option<BookmarkId>,
}

impl BookmarkOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_id(mut self, id: BookmarkId) -> Self {
        self.id = Some(id);
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Bookmark
// ============================================================================

/// A single bookmark record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    id: BookmarkId,
    title: String,
    url: String,
    comment: String,
}

impl Bookmark {
    /// Create a bookmark for `raw_url`.
    ///
    /// Fails with [`StoreError::InvalidUrl`] unless the URL is an absolute URI.
    /// No network access happens here; callers wanting a fetched page title
    /// pass it through [`BookmarkOptions::title`].
    pub fn new(raw_url: &str, options: BookmarkOptions) -> Result<Self> {
        let raw_url = raw_url.trim();
        Url::parse(raw_url).map_err(|source| StoreError::InvalidUrl {
            url: raw_url.to_string(),
            source,
        })?;

        Ok(Self {
            id: options.id.unwrap_or_else(BookmarkId::generate),
            title: non_empty(options.title).unwrap_or_else(|| raw_url.to_string()),
            url: raw_url.to_string(),
            comment: non_empty(options.comment).unwrap_or_default(),
        })
    }

    /// Parse one label file line.
    pub fn from_line(line: &str) -> Result<Self> {
        let line = line.trim();
        let tokens = tokenize(line);

        if !(2..=4).contains(&tokens.len()) {
            return Err(StoreError::InvalidBookmark(format!(
                "arguments mismatch: expected 2 to 4 fields, got {}",
                tokens.len()
            )));
        }

        let mut fields = tokens.iter().map(|t| unquote(t));
        let title = fields.next().unwrap_or_default();
        let raw_url = fields.next().unwrap_or_default();
        let comment = fields.next().unwrap_or_default();
        let id = match fields.next() {
            Some(id) if !id.trim().is_empty() => Some(id.parse::<BookmarkId>()?),
            _ => None,
        };

        Self::new(
            &raw_url,
            BookmarkOptions {
                title: Some(title),
                comment: Some(comment),
                id,
            },
        )
    }

    /// Serialized form, newline terminated.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }

    pub fn id(&self) -> BookmarkId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The comment, or the URL when there is none.
    pub fn description(&self) -> &str {
        if self.comment.is_empty() {
            &self.url
        } else {
            &self.comment
        }
    }

    /// Replace the title. A blank title resets it to the URL.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = non_empty(Some(title.into())).unwrap_or_else(|| self.url.clone());
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = non_empty(Some(comment.into())).unwrap_or_default();
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            quote(&self.title),
            quote(&self.url),
            quote(&self.comment),
            quote(&self.id.to_string())
        )
    }
}

impl FromStr for Bookmark {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_line(s)
    }
}

// ============================================================================
// Quoting
// ============================================================================

/// Split a line into fields, keeping the surrounding quotes of each field.
///
/// A space separates fields only outside quotes; inside quotes a backslash
/// escapes the following character.
pub(crate) fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' if quoted => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            ' ' if !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Strip the quotes of a field and resolve its escapes.
/// Unquoted fields are returned verbatim.
pub(crate) fn unquote(token: &str) -> String {
    let inner = match token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return token.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn quote(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for c in field.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
