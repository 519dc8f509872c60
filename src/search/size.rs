//! Generation of the textual spellings a catalog may use for a size.
//!
//! A bolt `M8` × `100` shows up in catalogs as `M8x100`, `М8х100`, `M8 × 100`,
//! `M8-100`, `M8100` and more. The retrieval stages query the store with all of
//! them, and the analyzer accepts any of them as a size match.

use regex::Regex;
use std::sync::LazyLock;

/// Separators used between diameter and length.
const BOLT_SEPARATORS: [&str; 4] = ["x", "х", "×", "-"];

/// Separators emitted for a compound profile size (`50x50x40`).
const PROFILE_SEPARATORS: [char; 3] = ['x', 'х', '×'];

/// Separator characters recognised inside an upper-cased profile size.
const PROFILE_MARKS: [char; 5] = ['x', 'X', 'х', 'Х', '×'];

/// Separators for the fractional-digit spellings (no hyphen form).
const FRACTION_SEPARATORS: [&str; 3] = ["x", "х", "×"];

static UNIT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*мм$").expect("unit pattern is valid"));

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)[.,](\d+)$").expect("decimal pattern is valid"));

/// Canonical diameter: no `мм` suffix, upper-cased, Latin `M` prefix.
pub fn canonical_diameter(diameter: &str) -> String {
    let stripped = UNIT_SUFFIX.replace(diameter.trim(), "");
    let upper = stripped.to_uppercase();
    match upper.strip_prefix('М') {
        Some(rest) => format!("M{rest}"),
        None => upper,
    }
}

/// Canonical length: no `мм` suffix.
pub fn canonical_length(length: &str) -> String {
    UNIT_SUFFIX.replace(length.trim(), "").into_owned()
}

/// All spellings of `diameter` × `length`, in first-seen order without duplicates.
///
/// Returns an empty list when either side is empty after canonicalization.
pub fn size_variants(diameter: Option<&str>, length: Option<&str>) -> Vec<String> {
    let d = diameter.map(canonical_diameter).unwrap_or_default();
    let l = length.map(canonical_length).unwrap_or_default();
    if d.is_empty() || l.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();

    if d.contains(PROFILE_MARKS) && !d.starts_with('M') {
        // Profile size such as an angle 50x50x40: opaque, only the separator varies.
        for sep in PROFILE_SEPARATORS {
            out.push(d.replace(PROFILE_MARKS, &sep.to_string()));
        }
        return dedup(out);
    }

    let latin = d.clone();
    let cyrillic = match d.strip_prefix('M') {
        Some(rest) => format!("М{rest}"),
        None => d.clone(),
    };

    for sep in BOLT_SEPARATORS {
        out.push(format!("{latin}{sep}{l}"));
        out.push(format!("{latin} {sep} {l}"));
        out.push(format!("{cyrillic}{sep}{l}"));
        out.push(format!("{cyrillic} {sep} {l}"));
    }
    out.push(format!("{latin}{l}"));
    out.push(format!("{cyrillic}{l}"));

    // Catalogs sometimes record M4.2 self-tappers as "2x90".
    if let Some(caps) = DECIMAL.captures(&d) {
        let fractional = &caps[2];
        for sep in FRACTION_SEPARATORS {
            out.push(format!("{fractional}{sep}{l}"));
            out.push(format!("{fractional} {sep} {l}"));
        }
    }

    dedup(out)
}

/// Order-preserving deduplication.
pub(crate) fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = ahash::AHashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
