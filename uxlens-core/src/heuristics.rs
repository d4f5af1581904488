//! Weighted-deduction usability heuristics for forms and navigation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const UNLABELED_INPUT_PENALTY: i32 = 20;
const MISSING_VALIDATION_PENALTY: i32 = 15;
const MISSING_ERROR_SUMMARY_PENALTY: i32 = 10;
const MISSING_SKIP_LINK_PENALTY: i32 = 15;
const DEEP_MENU_PENALTY: i32 = 10;
const UNSEARCHABLE_MENU_PENALTY: i32 = 10;

/// Deepest menu nesting that is still easy to scan.
const MAX_MENU_DEPTH: u32 = 3;
/// Most top-level items before search becomes necessary.
const MAX_ITEMS_WITHOUT_SEARCH: u32 = 10;

/// One form control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    /// Input type, e.g. `email`.
    #[serde(rename = "type")]
    pub kind: String,
    /// A visible or programmatic label is associated.
    pub has_label: bool,
    /// The control currently shows a validation error.
    #[serde(default)]
    pub has_error: bool,
}

/// Observed facts about a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormFacts {
    /// Selector of the form, used only for reporting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Controls in document order.
    #[serde(default)]
    pub inputs: Vec<FormInput>,
    /// Client-side validation is wired up.
    #[serde(default)]
    pub has_validation: bool,
    /// An error summary region exists for assistive technology.
    #[serde(default)]
    pub has_error_summary: bool,
}

/// Observed facts about the primary navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationFacts {
    /// A "skip to main content" link exists.
    pub has_skip_link: bool,
    /// A site search control exists.
    pub has_search_bar: bool,
    /// Deepest submenu nesting.
    pub menu_depth: u32,
    /// Number of top-level items.
    pub item_count: u32,
}

/// A heuristic score with the issues that lowered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicScore {
    /// Score in `0..=100`.
    pub score: u8,
    /// Issue messages in evaluation order.
    pub issues: Vec<String>,
}

#[derive(Default)]
struct Deductions {
    penalty: i32,
    issues: Vec<String>,
}

impl Deductions {
    fn deduct(&mut self, points: i32, issue: String) {
        self.penalty += points;
        self.issues.push(issue);
    }

    fn finish(self) -> HeuristicScore {
        HeuristicScore {
            score: (100 - self.penalty).clamp(0, 100) as u8,
            issues: self.issues,
        }
    }
}

/// Score a form on labelling, validation and error reporting.
pub fn evaluate_form(form: &FormFacts) -> HeuristicScore {
    let mut deductions = Deductions::default();

    let unlabeled = form.inputs.iter().filter(|input| !input.has_label).count();
    if unlabeled > 0 {
        deductions.deduct(
            UNLABELED_INPUT_PENALTY,
            format!("{unlabeled} input(s) missing labels"),
        );
    }

    if !form.has_validation {
        deductions.deduct(
            MISSING_VALIDATION_PENALTY,
            "No client-side validation detected".to_string(),
        );
    }

    if form.inputs.iter().any(|input| input.has_error) && !form.has_error_summary {
        deductions.deduct(
            MISSING_ERROR_SUMMARY_PENALTY,
            "No error summary for screen readers".to_string(),
        );
    }

    deductions.finish()
}

/// Score navigation on skip links, depth and findability.
pub fn evaluate_navigation(nav: &NavigationFacts) -> HeuristicScore {
    let mut deductions = Deductions::default();

    if !nav.has_skip_link {
        deductions.deduct(
            MISSING_SKIP_LINK_PENALTY,
            "Missing skip to main content link".to_string(),
        );
    }

    if nav.menu_depth > MAX_MENU_DEPTH {
        deductions.deduct(
            DEEP_MENU_PENALTY,
            format!("Navigation too deep ({} levels)", nav.menu_depth),
        );
    }

    if nav.item_count > MAX_ITEMS_WITHOUT_SEARCH && !nav.has_search_bar {
        deductions.deduct(
            UNSEARCHABLE_MENU_PENALTY,
            "Many items but no search functionality".to_string(),
        );
    }

    deductions.finish()
}
