//! Word segmentation and case functions for display names.
//!
//! # Examples
//!
//! ```
//! use enumschema_codegen::case::{apply, split_words};
//! use enumschema_core::Transform;
//!
//! assert_eq!(split_words("HTTPServerError"), vec!["HTTP", "Server", "Error"]);
//! assert_eq!(apply(Transform::Snake, "HTTPServerError"), "http_server_error");
//! assert_eq!(apply(Transform::KebabUpper, "lowCase"), "LOW-CASE");
//! ```

use enumschema_core::Transform;
use regex::Regex;
use std::sync::LazyLock;

/// Runs of characters that are neither letters nor digits.
static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid regex"));

/// Applies a case function to `name`.
#[must_use]
pub fn apply(transform: Transform, name: &str) -> String {
    match transform {
        Transform::Identity => name.to_string(),
        Transform::Snake => delimit(name, "_").to_lowercase(),
        Transform::SnakeUpper => delimit(name, "_").to_uppercase(),
        Transform::Kebab => delimit(name, "-").to_lowercase(),
        Transform::KebabUpper => delimit(name, "-").to_uppercase(),
        Transform::Upper => name.to_uppercase(),
        Transform::Lower => name.to_lowercase(),
        Transform::Title => title(name),
        Transform::TitleLower => lower_first(&title(name)),
        Transform::First => name.chars().next().map(String::from).unwrap_or_default(),
        Transform::FirstUpper => name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default(),
        Transform::FirstLower => name
            .chars()
            .next()
            .map(|c| c.to_lowercase().collect())
            .unwrap_or_default(),
        Transform::Whitespace => delimit(name, " ").to_lowercase(),
    }
}

/// Splits an identifier into words.
///
/// Non-alphanumeric runs separate words. Inside a run, a word starts at an
/// upper-case letter following a lower-case letter or a digit, and at the
/// last capital of an acronym that is followed by a lower-case letter.
/// Digits stay with the word before them.
#[must_use]
pub fn split_words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for chunk in SEPARATOR_REGEX.split(name).filter(|c| !c.is_empty()) {
        let chars: Vec<(usize, char)> = chunk.char_indices().collect();
        let mut start = 0;
        for i in 1..chars.len() {
            let (offset, c) = chars[i];
            let prev = chars[i - 1].1;
            let next = chars.get(i + 1).map(|&(_, n)| n);

            let boundary = c.is_uppercase()
                && (prev.is_lowercase()
                    || prev.is_numeric()
                    || (prev.is_uppercase() && next.is_some_and(char::is_lowercase)));
            if boundary {
                words.push(&chunk[start..offset]);
                start = offset;
            }
        }
        words.push(&chunk[start..]);
    }
    words
}

/// Joins the words of `name` with `sep`, keeping their case.
#[must_use]
pub fn delimit(name: &str, sep: &str) -> String {
    split_words(name).join(sep)
}

/// Upper-cases the first letter of every word, where words are separated
/// by whitespace and ASCII punctuation.
#[must_use]
pub fn title(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev = ' ';
    for c in name.chars() {
        if is_title_separator(prev) {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev = c;
    }
    out
}

fn is_title_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}
