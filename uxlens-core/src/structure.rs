//! Structural validators for heading outlines and ARIA attributes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest heading text quoted in a skipped-level issue.
const HEADING_EXCERPT_CHARS: usize = 30;

/// ARIA roles accepted by [`validate_aria`].
pub const VALID_ARIA_ROLES: [&str; 12] = [
    "button",
    "link",
    "navigation",
    "main",
    "complementary",
    "banner",
    "contentinfo",
    "form",
    "search",
    "region",
    "article",
    "section",
];

/// A heading in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Heading {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Text content.
    pub text: String,
}

impl Heading {
    /// Create a heading.
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// ARIA attributes of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AriaElement {
    /// Selector of the element, used only for reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// `role` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// `aria-label` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    /// `aria-labelledby` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_labelled_by: Option<String>,
}

/// Outcome of a structural check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    /// True when no issues were found.
    pub is_valid: bool,
    /// Issue messages in discovery order.
    pub issues: Vec<String>,
}

impl Validation {
    fn from_issues(issues: Vec<String>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
        }
    }
}

/// Check a heading outline for a single H1 and no skipped levels.
pub fn validate_heading_hierarchy(headings: &[Heading]) -> Validation {
    if headings.is_empty() {
        return Validation::from_issues(vec!["No headings found on page".to_string()]);
    }

    let mut issues = Vec::new();
    let h1_count = headings.iter().filter(|h| h.level == 1).count();
    if h1_count == 0 {
        issues.push("Missing H1 heading".to_string());
    } else if h1_count > 1 {
        issues.push(format!("Multiple H1 headings found ({h1_count})"));
    }

    for pair in headings.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if i16::from(curr.level) - i16::from(prev.level) > 1 {
            let excerpt: String = curr.text.chars().take(HEADING_EXCERPT_CHARS).collect();
            issues.push(format!(
                "Skipped heading level: H{} → H{} (\"{excerpt}...\")",
                prev.level, curr.level
            ));
        }
    }

    Validation::from_issues(issues)
}

/// Check an element's role against the supported set and require an
/// accessible name on buttons and links.
pub fn validate_aria(element: &AriaElement) -> Validation {
    let mut issues = Vec::new();
    let Some(role) = element.role.as_deref() else {
        return Validation::from_issues(issues);
    };

    if !VALID_ARIA_ROLES.contains(&role) {
        issues.push(format!("Invalid ARIA role: \"{role}\""));
    }

    if matches!(role, "button" | "link")
        && is_blank(element.aria_label.as_deref())
        && is_blank(element.aria_labelled_by.as_deref())
    {
        issues.push(format!("{role} missing accessible name"));
    }

    Validation::from_issues(issues)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).is_none_or(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_outline_is_invalid() {
        let result = validate_heading_hierarchy(&[]);
        assert!(!result.is_valid);
        assert_eq!(result.issues, vec!["No headings found on page"]);
    }

    #[test]
    fn well_formed_outline_is_valid() {
        let headings = [
            Heading::new(1, "Title"),
            Heading::new(2, "Section"),
            Heading::new(3, "Sub"),
            Heading::new(2, "Next"),
        ];
        let result = validate_heading_hierarchy(&headings);
        assert!(result.is_valid, "{:?}", result.issues);
    }

    #[test]
    fn skipped_level_names_both_levels() {
        let result = validate_heading_hierarchy(&[Heading::new(1, "A"), Heading::new(3, "B")]);
        assert!(!result.is_valid);
        assert_eq!(result.issues, vec!["Skipped heading level: H1 → H3 (\"B...\")"]);
    }

    #[test]
    fn skipped_level_truncates_long_text() {
        let long = "x".repeat(50);
        let result = validate_heading_hierarchy(&[Heading::new(1, "A"), Heading::new(4, long)]);
        let expected = format!("Skipped heading level: H1 → H4 (\"{}...\")", "x".repeat(30));
        assert_eq!(result.issues, vec![expected]);
    }

    #[test]
    fn reports_missing_and_multiple_h1() {
        let missing = validate_heading_hierarchy(&[Heading::new(2, "A")]);
        assert_eq!(missing.issues, vec!["Missing H1 heading"]);

        let multiple = validate_heading_hierarchy(&[Heading::new(1, "A"), Heading::new(1, "B")]);
        assert_eq!(multiple.issues, vec!["Multiple H1 headings found (2)"]);
    }

    #[test]
    fn rejects_unknown_role() {
        let element = AriaElement {
            role: Some("buton".to_string()),
            ..AriaElement::default()
        };
        let result = validate_aria(&element);
        assert_eq!(result.issues, vec!["Invalid ARIA role: \"buton\""]);
    }

    #[test]
    fn button_needs_accessible_name() {
        let unnamed = AriaElement {
            role: Some("button".to_string()),
            ..AriaElement::default()
        };
        assert_eq!(
            validate_aria(&unnamed).issues,
            vec!["button missing accessible name"]
        );

        let labelled_by = AriaElement {
            role: Some("link".to_string()),
            aria_labelled_by: Some("nav-title".to_string()),
            ..AriaElement::default()
        };
        assert!(validate_aria(&labelled_by).is_valid);
    }

    #[test]
    fn element_without_role_is_valid() {
        assert!(validate_aria(&AriaElement::default()).is_valid);
    }
}
