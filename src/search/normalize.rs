//! Canonicalization of fastener notation.
//!
//! Catalog names and user input spell the same size or standard in many ways:
//! Latin or Cyrillic `M`, three different multiplication signs, decimal commas,
//! `DIN 933` vs `din933`. [`normalize`] folds all of them into one comparable
//! form. Each rule is a separate function so it can be tested on its own; the
//! order in [`RULES`] matters.

use regex::Regex;
use std::sync::LazyLock;

/// Canonical separator between diameter and length.
pub const SEPARATOR: char = 'x';

/// Canonical root that every "galvanized" adjective collapses to.
pub const ZINC_ROOT: &str = "цинк";

/// Characters that stand for multiplication in fastener sizes.
const MULTIPLICATION_SIGNS: [char; 3] = ['x', 'х', '×'];

/// Anchored to a word start so the rewritten `цинк` can never expose a new
/// match (`ооцинк` stays as is).
static GALVANIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bоцинк[а-яё]*").expect("galvanized pattern is valid"));

static STANDARD_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(din|iso)\s*(\d+)").expect("standard pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A single named rewrite step.
type Rule = fn(&str) -> String;

/// Normalization pipeline, applied in order.
pub(crate) const RULES: &[(&str, Rule)] = &[
    ("lowercase", lowercase),
    ("galvanized", collapse_galvanized),
    ("multiplication", unify_multiplication),
    ("decimal_comma", decimal_comma),
    ("diameter_prefix", diameter_prefix),
    ("standard_code", collapse_standard_code),
    ("whitespace", collapse_whitespace),
    ("trim", trim),
];

/// Canonicalize free text for substring comparison.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    RULES
        .iter()
        .fold(text.to_string(), |acc, (_, rule)| rule(&acc))
}

pub(crate) fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// `оцинкованный`, `оцинковка`, ... → `цинк`.
pub(crate) fn collapse_galvanized(text: &str) -> String {
    GALVANIZED.replace_all(text, ZINC_ROOT).into_owned()
}

pub(crate) fn unify_multiplication(text: &str) -> String {
    text.chars()
        .map(|c| {
            if MULTIPLICATION_SIGNS.contains(&c) {
                SEPARATOR
            } else {
                c
            }
        })
        .collect()
}

/// `4,2` → `4.2`. Only commas with a digit on both sides are touched.
pub(crate) fn decimal_comma(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between_digits = c == ','
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if between_digits { '.' } else { c }
        })
        .collect()
}

/// `m8` / `м8` at the start of a word → `M8`.
pub(crate) fn diameter_prefix(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let word_start = i == 0 || !chars[i - 1].is_alphanumeric();
            let is_prefix = matches!(c, 'm' | 'м' | 'M' | 'М')
                && word_start
                && chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if is_prefix { 'M' } else { c }
        })
        .collect()
}

/// `din 965` → `din965`, `iso 4017` → `iso4017`.
pub(crate) fn collapse_standard_code(text: &str) -> String {
    STANDARD_CODE.replace_all(text, "$1$2").into_owned()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

pub(crate) fn trim(text: &str) -> String {
    text.trim().to_string()
}
