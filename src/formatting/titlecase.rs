//! Title casing in house style
//!
//! Articles, coordinating conjunctions, and short prepositions are lowercased
//! unless they open or close the title or follow a subtitle break. Words that
//! already carry internal capitals (`McDonald`, `NASA`) are left alone, and
//! uppercase Roman numerals stay uppercase.

use regex::Regex;
use std::sync::LazyLock;

const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "from", "if", "in", "into", "nor",
    "of", "on", "onto", "or", "the", "to", "upon", "v", "v.", "via", "vs", "vs.", "with",
];

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("valid regex"));
static ROMAN_NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^M{0,4}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$").expect("valid regex")
});

fn is_small_word(word: &str) -> bool {
    SMALL_WORDS.contains(&word.to_lowercase().as_str())
}

/// Punctuation after which the next word starts a new (sub)title
fn ends_clause(token: &str) -> bool {
    token
        .trim_end_matches(|c: char| matches!(c, '”' | '’' | '"' | '\'' | ')'))
        .ends_with([':', '.', '?', '!', '—'])
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn has_internal_capital(word: &str) -> bool {
    word.chars().skip(1).any(char::is_uppercase)
}

fn case_segment(segment: &str, force_capital: bool) -> String {
    if segment.is_empty() {
        return String::new();
    }
    if ROMAN_NUMERAL.is_match(segment) && segment.chars().any(|c| c.is_ascii_uppercase()) {
        return segment.to_string();
    }
    if has_internal_capital(segment) {
        return segment.to_string();
    }
    if !force_capital && is_small_word(segment) {
        return segment.to_lowercase();
    }
    capitalize(segment)
}

/// Titlecase one whitespace-delimited token
fn case_word(token: &str, force_capital: bool) -> String {
    // Split off leading and trailing punctuation like quotes and parentheses
    let start = token
        .char_indices()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, _)| i);
    let Some(start) = start else {
        return token.to_string();
    };
    let end = token
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric() || *c == '.')
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(token.len());
    let (leading, rest) = token.split_at(start);
    let (core, trailing) = rest.split_at(end - start);

    let cased: Vec<String> = core
        .split('-')
        .enumerate()
        .map(|(i, segment)| case_segment(segment, force_capital && i == 0))
        .collect();

    format!("{}{}{}", leading, cased.join("-"), trailing)
}

/// Convert a string to titlecase
pub fn titlecase(text: &str) -> String {
    // All-caps input carries no casing information worth keeping
    let lowered;
    let text = if text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase) {
        lowered = text.to_lowercase();
        lowered.as_str()
    } else {
        text
    };

    let words: Vec<_> = WORD.find_iter(text).collect();
    let mut output = String::with_capacity(text.len());
    let mut last_end = 0;

    for (i, word) in words.iter().enumerate() {
        let is_first = i == 0 || ends_clause(words[i - 1].as_str());
        let is_last = i + 1 == words.len();

        output.push_str(&text[last_end..word.start()]);
        output.push_str(&case_word(word.as_str(), is_first || is_last));
        last_end = word.end();
    }
    output.push_str(&text[last_end..]);

    output
}
