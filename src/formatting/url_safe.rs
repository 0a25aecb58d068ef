//! URL-safe slugs for file and repository names

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-z]").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip diacritics by decomposing and dropping combining marks
pub fn remove_diacritics(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Make a string URL-safe
///
/// `"Alice’s Adventures in Wonderland"` becomes
/// `"alices-adventures-in-wonderland"`.
pub fn make_url_safe(text: &str) -> String {
    let text = remove_diacritics(text);
    let text = text.trim().to_lowercase();
    let text = text.replace(['\'', '’'], "");
    let text = NON_ALPHANUMERIC.replace_all(&text, " ");
    let text = WHITESPACE_RUN.replace_all(text.trim_start(), "-");
    text.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(
            make_url_safe("Alice’s Adventures in Wonderland"),
            "alices-adventures-in-wonderland"
        );
    }

    #[test]
    fn test_diacritics_removed() {
        assert_eq!(make_url_safe("Émile Zola"), "emile-zola");
        assert_eq!(remove_diacritics("café"), "cafe");
    }

    #[test]
    fn test_punctuation_and_trailing_dashes() {
        assert_eq!(make_url_safe("  What Is Man? "), "what-is-man");
        assert_eq!(make_url_safe("H. G. Wells"), "h-g-wells");
        assert_eq!(make_url_safe("Don't Panic!!!"), "dont-panic");
    }

    #[test]
    fn test_empty() {
        assert_eq!(make_url_safe(""), "");
        assert_eq!(make_url_safe("???"), "");
    }
}
