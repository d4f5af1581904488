//! Layout analyzers: touch targets, breakpoints, overflow and spacing grids.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum touch target edge in CSS pixels.
pub const MIN_TOUCH_TARGET_PX: f64 = 44.0;

/// Number of spacing values kept in [`SpacingSystem::common_values`].
const COMMON_SPACING_VALUES: usize = 10;

/// Largest distinct-value count still treated as a deliberate custom scale.
const MAX_CUSTOM_SPACING_VALUES: usize = 8;

static MIN_WIDTH_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"min-width:\s*(\d+)px").expect("valid min-width pattern"));

/// Rendered geometry of an interactive element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ElementBox {
    /// CSS selector of the element.
    pub selector: String,
    /// Rendered width in CSS pixels.
    pub width: f64,
    /// Rendered height in CSS pixels.
    pub height: f64,
}

/// An element classified against the touch target minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchTarget {
    /// CSS selector of the element.
    pub selector: String,
    /// Rendered width in CSS pixels.
    pub width: f64,
    /// Rendered height in CSS pixels.
    pub height: f64,
    /// Both edges are at least 44px.
    pub meets_standard: bool,
}

impl From<&ElementBox> for TouchTarget {
    fn from(element: &ElementBox) -> Self {
        Self {
            selector: element.selector.clone(),
            width: element.width,
            height: element.height,
            meets_standard: element.width >= MIN_TOUCH_TARGET_PX
                && element.height >= MIN_TOUCH_TARGET_PX,
        }
    }
}

/// Touch targets partitioned by [`TouchTarget::meets_standard`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchTargetReport {
    /// Targets at least 44×44, in input order.
    pub passing: Vec<TouchTarget>,
    /// Targets below 44×44, in input order.
    pub failing: Vec<TouchTarget>,
}

/// Partition elements by the 44×44px touch target minimum.
pub fn evaluate_touch_targets(elements: &[ElementBox]) -> TouchTargetReport {
    let (passing, failing): (Vec<_>, Vec<_>) = elements
        .iter()
        .map(TouchTarget::from)
        .partition(|target| target.meets_standard);
    TouchTargetReport { passing, failing }
}

/// How well a stylesheet's media queries cover device widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakpointCoverage {
    /// Three or more distinct breakpoints.
    Excellent,
    /// Exactly two.
    Good,
    /// One or none.
    Poor,
}

/// Distinct `min-width` breakpoints found in CSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointReport {
    /// Breakpoints in ascending order, deduplicated.
    pub breakpoints: Vec<u32>,
    /// Coverage rating.
    pub coverage: BreakpointCoverage,
}

/// Extract every `min-width: Npx` breakpoint and rate the coverage.
pub fn analyze_breakpoints(css: &str) -> BreakpointReport {
    let breakpoints: BTreeSet<u32> = MIN_WIDTH_QUERY
        .captures_iter(css)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    let coverage = match breakpoints.len() {
        n if n >= 3 => BreakpointCoverage::Excellent,
        2 => BreakpointCoverage::Good,
        _ => BreakpointCoverage::Poor,
    };

    BreakpointReport {
        breakpoints: breakpoints.into_iter().collect(),
        coverage,
    }
}

/// True when content is wider than the viewport.
pub fn detect_horizontal_scroll(viewport_width: f64, content_width: f64) -> bool {
    content_width > viewport_width
}

/// Shape of the spacing scale in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpacingPattern {
    /// Every value is a multiple of 8.
    #[serde(rename = "8px-grid")]
    EightPointGrid,
    /// Every value is a multiple of 4.
    #[serde(rename = "4px-grid")]
    FourPointGrid,
    /// A small set of values on some other common divisor.
    #[serde(rename = "custom")]
    Custom,
    /// Too many unrelated values.
    #[serde(rename = "inconsistent")]
    Inconsistent,
}

impl SpacingPattern {
    /// Serialized name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EightPointGrid => "8px-grid",
            Self::FourPointGrid => "4px-grid",
            Self::Custom => "custom",
            Self::Inconsistent => "inconsistent",
        }
    }
}

/// Spacing scale detected from margins and paddings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingSystem {
    /// Base unit in pixels.
    pub base_unit: u32,
    /// Detected pattern.
    pub pattern: SpacingPattern,
    /// Smallest distinct values, ascending.
    pub common_values: Vec<u32>,
}

/// Detect the spacing grid behind a set of margin and padding values.
///
/// Non-positive values are ignored. With no values left the set is
/// vacuously an 8px grid.
pub fn detect_spacing_system(margins: &[i64], paddings: &[i64]) -> SpacingSystem {
    let unique: Vec<u32> = margins
        .iter()
        .chain(paddings)
        .filter(|value| **value > 0)
        .map(|value| u32::try_from(*value).unwrap_or(u32::MAX))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let divisible_by = |divisor: u32| unique.iter().all(|value| value % divisor == 0);
    let (pattern, base_unit) = if divisible_by(8) {
        (SpacingPattern::EightPointGrid, 8)
    } else if divisible_by(4) {
        (SpacingPattern::FourPointGrid, 4)
    } else if unique.len() <= MAX_CUSTOM_SPACING_VALUES {
        (SpacingPattern::Custom, gcd_all(&unique))
    } else {
        (SpacingPattern::Inconsistent, 1)
    };

    SpacingSystem {
        base_unit,
        pattern,
        common_values: unique.into_iter().take(COMMON_SPACING_VALUES).collect(),
    }
}

/// Greatest common divisor of a set; 1 for an empty set.
pub fn gcd_all(values: &[u32]) -> u32 {
    match values.split_first() {
        None => 1,
        Some((first, rest)) => rest.iter().fold(*first, |acc, value| gcd(acc, *value)),
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}
