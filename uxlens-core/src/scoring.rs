//! Severity-weighted category scoring and rating bands.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AnalysisResult, Category, CategoryScores, Finding, Severity};

/// Points deducted per finding at each severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeverityWeights {
    /// Deduction per critical finding.
    pub critical: u32,
    /// Deduction per high finding.
    pub high: u32,
    /// Deduction per medium finding.
    pub medium: u32,
    /// Deduction per low finding.
    pub low: u32,
}

impl SeverityWeights {
    /// Deduction table used for accessibility findings.
    pub const ACCESSIBILITY: Self = Self {
        critical: 20,
        high: 10,
        medium: 5,
        low: 2,
    };

    /// Deduction table used for UX findings.
    pub const UX: Self = Self {
        critical: 15,
        high: 8,
        medium: 4,
        low: 1,
    };

    /// Deduction for one severity.
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Weight table per category.
///
/// Loaded from JSON by callers that want a different policy; any category
/// left out of the document keeps its default table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Table for accessibility findings.
    pub accessibility: SeverityWeights,
    /// Table for responsive findings.
    pub responsive: SeverityWeights,
    /// Table for visual findings.
    pub visual: SeverityWeights,
    /// Table for UX findings.
    pub ux: SeverityWeights,
    /// Table for performance findings.
    pub performance: SeverityWeights,
}

impl ScoringPolicy {
    /// Weight table for one category.
    pub fn weights_for(&self, category: Category) -> &SeverityWeights {
        match category {
            Category::Accessibility => &self.accessibility,
            Category::Responsive => &self.responsive,
            Category::Visual => &self.visual,
            Category::Ux => &self.ux,
            Category::Performance => &self.performance,
        }
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            accessibility: SeverityWeights::ACCESSIBILITY,
            responsive: SeverityWeights::ACCESSIBILITY,
            visual: SeverityWeights::ACCESSIBILITY,
            ux: SeverityWeights::UX,
            performance: SeverityWeights::ACCESSIBILITY,
        }
    }
}

/// Score one category: 100 minus the weighted findings, clamped to `0..=100`.
///
/// A category with no findings scores 100. The result depends only on the
/// multiset of severities, not on finding order.
pub fn category_score(findings: &[Finding], category: Category, weights: &SeverityWeights) -> u8 {
    let deductions: u64 = findings
        .iter()
        .filter(|finding| finding.category == category)
        .map(|finding| u64::from(weights.weight(finding.severity)))
        .sum();
    100u64.saturating_sub(deductions) as u8
}

/// Score every category under a policy.
pub fn score_categories(findings: &[Finding], policy: &ScoringPolicy) -> CategoryScores {
    let mut scores = CategoryScores::perfect();
    for category in Category::ALL {
        scores.set(
            category,
            category_score(findings, category, policy.weights_for(category)),
        );
    }
    scores
}

/// Mean of scores rounded to the nearest integer, halves rounding up.
pub fn rounded_mean(values: &[u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    let sum: u32 = values.iter().map(|value| u32::from(*value)).sum();
    let count = values.len() as u32;
    ((2 * sum + count) / (2 * count)) as u8
}

/// Overall score: rounded mean of the five category scores.
pub fn overall_score(scores: &CategoryScores) -> u8 {
    let values = Category::ALL.map(|category| scores.get(category));
    rounded_mean(&values)
}

/// Clamp every category score and derive `overall_score` from them.
///
/// This is the last step applied to an otherwise complete result.
pub fn finalize_scores(mut result: AnalysisResult) -> AnalysisResult {
    for category in Category::ALL {
        let score = result.scores.get(category);
        result.scores.set(category, score);
    }
    result.overall_score = overall_score(&result.scores);
    result
}

/// Qualitative band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    /// 90 and above.
    Excellent,
    /// 80 to 89.
    Good,
    /// 70 to 79.
    Fair,
    /// 60 to 69.
    Poor,
    /// Below 60.
    Critical,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Critical => "Critical",
        };
        f.write_str(text)
    }
}

/// Band a score; boundaries belong to the higher band.
pub fn rating(score: u8) -> Rating {
    match score {
        90.. => Rating::Excellent,
        80..=89 => Rating::Good,
        70..=79 => Rating::Fair,
        60..=69 => Rating::Poor,
        _ => Rating::Critical,
    }
}
