//! Pure HTML extraction helpers.
//!
//! Callers fetch documents themselves and pass the markup in; nothing here
//! touches the network or keeps state between calls.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn entity_regex() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| {
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);").expect("valid entity regex")
    })
}

/// Inner HTML of the first `<tag>` element, matched case-insensitively.
pub fn extract(html: &str, tag: &str) -> Option<String> {
    let tag = regex::escape(tag);
    let pattern = format!(r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>");
    let re = Regex::new(&pattern).ok()?;

    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Text of the document `<title>`, with entities decoded and whitespace collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    let title = extract(html, "title")?;
    let title = unescape(&title)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    (!title.is_empty()).then_some(title)
}

/// The main readable part of a page: `<article>`, `<main>` or `<body>`,
/// falling back to the whole document.
pub fn simplify(html: &str) -> String {
    ["article", "main", "body"]
        .iter()
        .find_map(|tag| extract(html, tag))
        .unwrap_or_else(|| html.to_string())
}

/// Decode named and numeric character references.
pub fn unescape(text: &str) -> String {
    entity_regex()
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            decode(entity).map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn decode(entity: &str) -> Option<char> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }

    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }

    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "hellip" => Some('\u{2026}'),
        "middot" => Some('\u{b7}'),
        "laquo" => Some('\u{ab}'),
        "raquo" => Some('\u{bb}'),
        "copy" => Some('\u{a9}'),
        _ => None,
    }
}

/// Escape text for inclusion in HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
