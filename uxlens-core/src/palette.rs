//! Palette extraction from computed style values.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::color::normalize_color;

/// Number of entries kept in [`Palette::most_used`].
const MOST_USED_LIMIT: usize = 10;

static COLOR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#[0-9a-f]{6}|#[0-9a-f]{3}|rgba?\([^)]+\)").expect("valid color token pattern")
});

/// A computed style declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StyleEntry {
    /// CSS property name.
    pub property: String,
    /// Computed value, possibly containing several colors.
    pub value: String,
}

impl StyleEntry {
    /// Create a style declaration.
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A normalized color and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorUsage {
    /// Lowercase `#rrggbb`.
    pub color: String,
    /// Occurrences across all style values.
    pub count: usize,
}

/// Colors in use on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    /// Distinct colors in first-seen order.
    pub unique: Vec<String>,
    /// Up to ten colors by descending count, ties in first-seen order.
    pub most_used: Vec<ColorUsage>,
}

/// Collect and rank every color token found in the style values.
pub fn extract_colors(styles: &[StyleEntry]) -> Palette {
    let mut unique: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for style in styles {
        for token in COLOR_TOKEN.find_iter(&style.value) {
            let normalized = match normalize_color(token.as_str()) {
                Ok(normalized) => normalized,
                Err(err) => {
                    debug!("skipping color token in {}: {err}", style.property);
                    continue;
                }
            };
            let count = counts.entry(normalized.clone()).or_insert(0);
            if *count == 0 {
                unique.push(normalized);
            }
            *count += 1;
        }
    }

    let mut most_used: Vec<ColorUsage> = unique
        .iter()
        .map(|color| ColorUsage {
            color: color.clone(),
            count: counts.get(color).copied().unwrap_or_default(),
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    most_used.sort_by(|a, b| b.count.cmp(&a.count));
    most_used.truncate(MOST_USED_LIMIT);

    Palette { unique, most_used }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_and_counts_tokens() {
        let styles = [
            StyleEntry::new("color", "#FFF"),
            StyleEntry::new("background", "rgb(255, 255, 255)"),
            StyleEntry::new("border", "1px solid #336699"),
            StyleEntry::new("box-shadow", "0 0 2px rgba(51,102,153,0.4), 0 1px #ffffff"),
        ];
        let palette = extract_colors(&styles);
        assert_eq!(palette.unique, vec!["#ffffff", "#336699"]);
        assert_eq!(
            palette.most_used,
            vec![
                ColorUsage {
                    color: "#ffffff".to_string(),
                    count: 3
                },
                ColorUsage {
                    color: "#336699".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let styles = [
            StyleEntry::new("color", "#000000"),
            StyleEntry::new("color", "#111111"),
            StyleEntry::new("color", "#222222"),
            StyleEntry::new("color", "#222222"),
        ];
        let palette = extract_colors(&styles);
        let order: Vec<_> = palette.most_used.iter().map(|u| u.color.as_str()).collect();
        assert_eq!(order, vec!["#222222", "#000000", "#111111"]);
    }

    #[test]
    fn most_used_is_capped_at_ten() {
        let styles: Vec<_> = (0..15)
            .map(|i| StyleEntry::new("color", format!("#0000{i:02x}")))
            .collect();
        let palette = extract_colors(&styles);
        assert_eq!(palette.unique.len(), 15);
        assert_eq!(palette.most_used.len(), 10);
    }

    #[test]
    fn skips_unparsable_functional_tokens() {
        let palette = extract_colors(&[StyleEntry::new("color", "rgb(var(--brand))")]);
        assert!(palette.unique.is_empty());
        assert!(palette.most_used.is_empty());
    }
}
