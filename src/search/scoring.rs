//! Relevance probability for a match analysis.
//!
//! The score is a weighted sum of matched categories plus combination bonuses,
//! then pushed through guard rails that encode how much a partial match can be
//! trusted:
//! - standard + size matched: at least 80
//! - only the type matched: at most 40
//! - only the coating matched: at most 20
//!
//! The result is clamped to 0..=100.

use super::analyze::MatchAnalysis;
use super::tokens::Category;
use serde::{Deserialize, Serialize};

/// Bonus when standard and size both match.
pub const STANDARD_SIZE_BONUS: f64 = 15.0;
/// Bonus when type and size both match.
pub const TYPE_SIZE_BONUS: f64 = 10.0;
/// Bonus when type, standard, size and coating all match.
pub const FULL_MATCH_BONUS: f64 = 20.0;

/// Floor applied when standard and size both match.
pub const STANDARD_SIZE_FLOOR: f64 = 80.0;
/// Cap applied when the type is the only match.
pub const TYPE_ONLY_CAP: f64 = 40.0;
/// Cap applied when the coating is the only match.
pub const COATING_ONLY_CAP: f64 = 20.0;

/// Base weight per category.
///
/// Material and grade default to zero: they are collected and reported but
/// do not move the score unless configured to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    #[serde(rename = "type")]
    pub part_type: f64,
    pub standard: f64,
    pub size: f64,
    pub coating: f64,
    pub material: f64,
    pub grade: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            part_type: 25.0,
            standard: 40.0,
            size: 30.0,
            coating: 15.0,
            material: 0.0,
            grade: 0.0,
        }
    }
}

impl ScoringWeights {
    pub const fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Type => self.part_type,
            Category::Standard => self.standard,
            Category::Size => self.size,
            Category::Coating => self.coating,
            Category::Material => self.material,
            Category::Grade => self.grade,
        }
    }
}

/// A computed score and the lines that explain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub value: u8,
    pub explanation: Vec<String>,
}

/// Pure scoring function over [`MatchAnalysis`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub const fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score value only.
    pub fn score(&self, analysis: &MatchAnalysis) -> u8 {
        self.explain(analysis).value
    }

    /// Score with contribution, bonus and guard lines.
    pub fn explain(&self, analysis: &MatchAnalysis) -> Score {
        let mut explanation = Vec::new();
        let mut total = 0.0;

        for category in Category::ALL {
            let weight = self.weights.weight(category);
            if analysis.is_match(category) && weight != 0.0 {
                total += weight;
                explanation.push(format!("{} weight: +{}", category.as_str(), weight));
            }
        }

        let standard_size = analysis.standard_match && analysis.size_match;
        let type_size = analysis.type_match && analysis.size_match;
        let full = type_size && analysis.standard_match && analysis.coating_match;

        if standard_size {
            total += STANDARD_SIZE_BONUS;
            explanation.push(format!("standard + size bonus: +{STANDARD_SIZE_BONUS}"));
        }
        if type_size {
            total += TYPE_SIZE_BONUS;
            explanation.push(format!("type + size bonus: +{TYPE_SIZE_BONUS}"));
        }
        if full {
            total += FULL_MATCH_BONUS;
            explanation.push(format!("full match bonus: +{FULL_MATCH_BONUS}"));
        }

        if standard_size && total < STANDARD_SIZE_FLOOR {
            total = STANDARD_SIZE_FLOOR;
            explanation.push(format!("standard + size floor: {STANDARD_SIZE_FLOOR}"));
        }
        match analysis.only_match() {
            Some(Category::Type) if total > TYPE_ONLY_CAP => {
                total = TYPE_ONLY_CAP;
                explanation.push(format!("type-only cap: {TYPE_ONLY_CAP}"));
            }
            Some(Category::Coating) if total > COATING_ONLY_CAP => {
                total = COATING_ONLY_CAP;
                explanation.push(format!("coating-only cap: {COATING_ONLY_CAP}"));
            }
            _ => {}
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = total.clamp(0.0, 100.0).round() as u8;
        explanation.push(format!("probability: {value}%"));

        Score { value, explanation }
    }
}
