//! Per-request token sets derived from a [`UserIntent`].

use super::normalize::{ZINC_ROOT, normalize};
use super::size::{dedup, size_variants};
use crate::types::UserIntent;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Spellings that catalog names use for galvanized coatings.
const ZINC_SPELLINGS: &[&str] = &["цинк", "оцинк", "оцинкованный"];

/// Markers that identify a stainless material request.
const STAINLESS_MARKERS: &[&str] = &["нерж", "stainless", "inox", "a2", "a4"];

/// Synonyms and grades appended for stainless steel.
const STAINLESS_SYNONYMS: &[&str] = &[
    "нерж",
    "нержавеющая",
    "нержавейка",
    "a2",
    "a4",
    "aisi 304",
    "aisi 316",
    "inox",
];

/// Markers that identify a carbon steel request.
const CARBON_MARKERS: &[&str] = &["углерод", "сталь", "steel", "carbon"];

/// Synonyms and strength classes appended for carbon steel.
const CARBON_SYNONYMS: &[&str] = &["сталь", "углеродистая", "ст.", "8.8", "10.9", "12.9"];

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Token categories, in the order they are analyzed and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Type,
    Standard,
    Size,
    Coating,
    Material,
    Grade,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Type,
        Self::Standard,
        Self::Size,
        Self::Coating,
        Self::Material,
        Self::Grade,
    ];

    /// Lower-case name used in explanations, config keys and errors.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Standard => "standard",
            Self::Size => "size",
            Self::Coating => "coating",
            Self::Material => "material",
            Self::Grade => "grade",
        }
    }
}

/// Search tokens for one request. Immutable after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenSet {
    type_token: Option<String>,
    standard: Vec<String>,
    size: Vec<String>,
    coating: Vec<String>,
    material: Vec<String>,
    grade: Vec<String>,
}

impl TokenSet {
    /// Build every category from the intent.
    pub fn from_intent(intent: &UserIntent) -> Self {
        Self {
            type_token: intent.part_type().map(normalize).filter(|t| !t.is_empty()),
            standard: intent.standard().map(standard_tokens).unwrap_or_default(),
            size: size_variants(intent.diameter(), intent.length()),
            coating: intent.coating().map(coating_tokens).unwrap_or_default(),
            material: intent.material().map(material_tokens).unwrap_or_default(),
            grade: intent
                .grade()
                .map(|g| vec![g.to_lowercase()])
                .unwrap_or_default(),
        }
    }

    /// Normalized fastener kind, if one was given.
    pub fn type_token(&self) -> Option<&str> {
        self.type_token.as_deref()
    }

    /// Lower-cased standard; DIN/ISO codes add fused and single-spaced spellings.
    pub fn standard(&self) -> &[String] {
        &self.standard
    }

    /// Every spelling of the requested size, most canonical first.
    pub fn size(&self) -> &[String] {
        &self.size
    }

    /// Coating plus the zinc spellings when the coating is zinc.
    pub fn coating(&self) -> &[String] {
        &self.coating
    }

    /// Material plus the stainless or carbon steel synonyms it triggers.
    pub fn material(&self) -> &[String] {
        &self.material
    }

    /// Lower-cased grade.
    pub fn grade(&self) -> &[String] {
        &self.grade
    }

    /// Tokens of one category; the type category yields zero or one token.
    pub fn category(&self, category: Category) -> &[String] {
        match category {
            Category::Type => self.type_token.as_slice(),
            Category::Standard => &self.standard,
            Category::Size => &self.size,
            Category::Coating => &self.coating,
            Category::Material => &self.material,
            Category::Grade => &self.grade,
        }
    }

    /// True when no category carries a token.
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.category(*c).is_empty())
    }
}

/// `DIN 933` → `din 933`, `din933`.
fn standard_tokens(standard: &str) -> Vec<String> {
    let raw = standard.to_lowercase();
    let mut out = vec![raw.clone()];
    if raw.contains("din") || raw.contains("iso") {
        out.push(WHITESPACE.replace_all(&raw, "").into_owned());
        out.push(WHITESPACE.replace_all(&raw, " ").into_owned());
    }
    dedup(out)
}

fn coating_tokens(coating: &str) -> Vec<String> {
    let raw = coating.to_lowercase();
    let mut out = vec![raw.clone()];
    if raw.contains(ZINC_ROOT) {
        out.extend(ZINC_SPELLINGS.iter().map(ToString::to_string));
    }
    dedup(out)
}

fn material_tokens(material: &str) -> Vec<String> {
    let raw = material.to_lowercase();
    let mut out = vec![raw.clone()];
    if STAINLESS_MARKERS.iter().any(|m| raw.contains(m)) {
        out.extend(STAINLESS_SYNONYMS.iter().map(ToString::to_string));
    } else if CARBON_MARKERS.iter().any(|m| raw.contains(m)) {
        out.extend(CARBON_SYNONYMS.iter().map(ToString::to_string));
    }
    dedup(out)
}
