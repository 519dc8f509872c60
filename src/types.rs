//! Request, catalog and response types shared across the crate.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// Structured search request as produced by the upstream intent parser.
///
/// Every field is optional. Empty and whitespace-only strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UserIntent {
    /// Part category, e.g. "болт", "винт", "гайка"
    #[serde(rename = "type", default)]
    pub part_type: Option<String>,
    /// Standard code, e.g. "DIN 933"
    #[serde(default)]
    pub standard: Option<String>,
    /// Diameter, e.g. "M8" or "4,2"
    #[serde(default)]
    pub diameter: Option<String>,
    /// Length, e.g. "100" or "100 мм"
    #[serde(default)]
    pub length: Option<String>,
    /// Coating, e.g. "цинк"
    #[serde(default)]
    pub coating: Option<String>,
    /// Material, e.g. "нержавеющая сталь"
    #[serde(default)]
    pub material: Option<String>,
    /// Strength class, e.g. "8.8" or "A2-70"
    #[serde(default)]
    pub grade: Option<String>,
    /// Whether the intent came from the simple parser rather than the full one
    #[serde(default)]
    pub is_simple_parsed: Option<bool>,
}

fn present(field: Option<&String>) -> Option<&str> {
    field.map(|s| s.as_str()).filter(|s| !s.trim().is_empty())
}

impl UserIntent {
    /// Fastener kind (`болт`, `гайка`, ...). Blank strings read as absent,
    /// as do all other field accessors.
    pub fn part_type(&self) -> Option<&str> {
        present(self.part_type.as_ref())
    }

    /// Standard as written by the user, e.g. `DIN 933`.
    pub fn standard(&self) -> Option<&str> {
        present(self.standard.as_ref())
    }

    /// Diameter, with or without the `M` prefix; a profile size like `50x50x40` also lands here.
    pub fn diameter(&self) -> Option<&str> {
        present(self.diameter.as_ref())
    }

    /// Length in millimetres, possibly suffixed with `мм`.
    pub fn length(&self) -> Option<&str> {
        present(self.length.as_ref())
    }

    /// Coating, e.g. `цинк`.
    pub fn coating(&self) -> Option<&str> {
        present(self.coating.as_ref())
    }

    /// Material, e.g. `нержавейка`.
    pub fn material(&self) -> Option<&str> {
        present(self.material.as_ref())
    }

    /// Strength class or steel grade, e.g. `8.8` or `A2`.
    pub fn grade(&self) -> Option<&str> {
        present(self.grade.as_ref())
    }

    /// `false` when the flag is missing.
    pub fn is_simple_parsed(&self) -> bool {
        self.is_simple_parsed.unwrap_or(false)
    }

    /// Set the fastener kind.
    pub fn with_type(mut self, part_type: impl Into<String>) -> Self {
        self.part_type = Some(part_type.into());
        self
    }

    /// Set the standard.
    pub fn with_standard(mut self, standard: impl Into<String>) -> Self {
        self.standard = Some(standard.into());
        self
    }

    /// Set diameter and length together.
    pub fn with_size(mut self, diameter: impl Into<String>, length: impl Into<String>) -> Self {
        self.diameter = Some(diameter.into());
        self.length = Some(length.into());
        self
    }

    /// Set the coating.
    pub fn with_coating(mut self, coating: impl Into<String>) -> Self {
        self.coating = Some(coating.into());
        self
    }

    /// Set the material.
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Set the grade.
    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    /// Mark the intent as coming from the simple parser (or not).
    pub const fn simple_parsed(mut self, simple: bool) -> Self {
        self.is_simple_parsed = Some(simple);
        self
    }
}

/// A catalog row. Only `sku` and `name` are interpreted; other columns pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub sku: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CatalogEntry {
    /// Entry with no extra columns.
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// One scored candidate in the response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub relevance_score: u8,
    /// Same value as `relevance_score`; older clients read this name.
    pub probability_percent: u8,
    pub match_reason: String,
    pub explanation: String,
    pub matched_tokens: Vec<String>,
    pub search_query: String,
    pub full_query: String,
}

/// Incoming search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Original free-text query, echoed back on every result
    #[serde(default)]
    pub search_query: String,
    /// Structured intent extracted from the query
    #[serde(default)]
    pub user_intent: UserIntent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Simple,
    Complex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMetadata {
    pub query_type: QueryType,
    pub total_results: usize,
    pub search_time_ms: u64,
    pub used_fallback: bool,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub results: Vec<RankedResult>,
    pub search_metadata: SearchMetadata,
}

/// Failure response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}
