//! Soft hyphen insertion
//!
//! Breaks come from the Liang patterns embedded in the `hyphenation` crate.
//! Only text between tags is touched, and only inside `<body>` when the
//! document has one.

use crate::error::SeError;
use hyphenation::{Hyphenator, Language, Load, Standard};
use regex::Regex;
use std::sync::LazyLock;

/// U+00AD SOFT HYPHEN
pub const SOFT_HYPHEN: char = '\u{AD}';

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{M}\x{AD}]+").expect("valid regex"));
static ROOT_LANGUAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<html\b[^>]*?\b(?:xml:)?lang="([^"]+)""#).expect("valid regex")
});

/// Map a BCP 47 tag to a pattern set
pub fn language_for_tag(tag: &str) -> Result<Language, SeError> {
    let tag = tag.trim().to_ascii_lowercase();
    let (primary, region) = match tag.split_once(['-', '_']) {
        Some((primary, region)) => (primary, Some(region)),
        None => (tag.as_str(), None),
    };

    let language = match (primary, region) {
        ("en", Some("gb")) => Language::EnglishGB,
        ("en", _) => Language::EnglishUS,
        ("fr", _) => Language::French,
        ("de", _) => Language::German1996,
        ("es", _) => Language::Spanish,
        ("it", _) => Language::Italian,
        ("la", _) => Language::Latin,
        ("pt", _) => Language::Portuguese,
        ("nl", _) => Language::Dutch,
        ("sv", _) => Language::Swedish,
        ("da", _) => Language::Danish,
        ("fi", _) => Language::Finnish,
        ("pl", _) => Language::Polish,
        ("ru", _) => Language::Russian,
        _ => return Err(SeError::InvalidLanguage(tag)),
    };
    Ok(language)
}

/// The `xml:lang` or `lang` attribute of the root element, if any
pub fn document_language(xhtml: &str) -> Option<String> {
    ROOT_LANGUAGE
        .captures(xhtml)
        .map(|captures| captures[1].to_string())
}

/// Load the embedded patterns for a language tag
pub fn load_hyphenator(tag: &str) -> Result<Standard, SeError> {
    let language = language_for_tag(tag)?;
    Standard::from_embedded(language)
        .map_err(|e| SeError::InvalidLanguage(format!("{} ({})", tag, e)))
}

fn hyphenate_word(word: &str, hyphenator: &Standard) -> String {
    if word.contains(SOFT_HYPHEN) {
        return word.to_string();
    }

    // Patterns are lowercase; keep a one-to-one char mapping back to the original
    let lowered: String = word
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect();
    let breaks: Vec<usize> = hyphenator
        .hyphenate(&lowered)
        .breaks
        .iter()
        .map(|&byte| lowered[..byte].chars().count())
        .collect();

    let mut output = String::with_capacity(word.len() + breaks.len() * 2);
    for (i, c) in word.chars().enumerate() {
        if breaks.contains(&i) {
            output.push(SOFT_HYPHEN);
        }
        output.push(c);
    }
    output
}

fn hyphenate_text(text: &str, hyphenator: &Standard, output: &mut String) {
    let mut last_end = 0;
    for word in WORD.find_iter(text) {
        output.push_str(&text[last_end..word.start()]);
        // Leave entity names like &hellip; alone
        if text[..word.start()].ends_with('&') {
            output.push_str(word.as_str());
        } else {
            output.push_str(&hyphenate_word(word.as_str(), hyphenator));
        }
        last_end = word.end();
    }
    output.push_str(&text[last_end..]);
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Insert soft hyphens into the body text of an XHTML document
pub fn hyphenate_xhtml(xhtml: &str, hyphenator: &Standard, ignore_h_tags: bool) -> String {
    let mut output = String::with_capacity(xhtml.len() + xhtml.len() / 8);
    let mut in_body = !xhtml.contains("<body");
    let mut heading_depth = 0usize;
    let mut rest = xhtml;

    while !rest.is_empty() {
        let Some(tag_start) = rest.find('<') else {
            if in_body && (heading_depth == 0 || !ignore_h_tags) {
                hyphenate_text(rest, hyphenator, &mut output);
            } else {
                output.push_str(rest);
            }
            break;
        };

        let text = &rest[..tag_start];
        if in_body && (heading_depth == 0 || !ignore_h_tags) {
            hyphenate_text(text, hyphenator, &mut output);
        } else {
            output.push_str(text);
        }

        let tag_end = rest[tag_start..]
            .find('>')
            .map(|end| tag_start + end + 1)
            .unwrap_or(rest.len());
        let tag = &rest[tag_start..tag_end];
        output.push_str(tag);

        let closing = tag.starts_with("</");
        let name: String = tag
            .trim_start_matches(['<', '/'])
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if name == "body" {
            in_body = !closing;
        } else if is_heading(&name) && !tag.ends_with("/>") {
            if closing {
                heading_depth = heading_depth.saturating_sub(1);
            } else {
                heading_depth += 1;
            }
        }

        rest = &rest[tag_end..];
    }

    output
}
