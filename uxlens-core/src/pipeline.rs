//! Page pipeline: runs every analyzer over extracted page facts, merges the
//! external assessment, and assembles scored results.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::color::{ContrastCheck, contrast};
use crate::domain::{
    AnalysisResult, Category, CategoryWinners, ColorPalette, ComparisonResult, DesignSystem,
    Evidence, Finding, Recommendation, Severity, SiteComparison, SpacingScale, Viewport, Winner,
};
use crate::error::{Result, UxLensError};
use crate::heuristics::{
    FormFacts, HeuristicScore, NavigationFacts, evaluate_form, evaluate_navigation,
};
use crate::layout::{
    BreakpointCoverage, BreakpointReport, ElementBox, SpacingPattern, SpacingSystem,
    TouchTargetReport, analyze_breakpoints, detect_horizontal_scroll, detect_spacing_system,
    evaluate_touch_targets,
};
use crate::palette::{Palette, StyleEntry, extract_colors};
use crate::scoring::{ScoringPolicy, finalize_scores, score_categories};
use crate::structure::{AriaElement, Heading, Validation, validate_aria, validate_heading_hierarchy};

/// Contrast below this ratio fails even large text and is critical.
const CRITICAL_CONTRAST_RATIO: f64 = 3.0;
/// Palette entries promoted to the derived primary colors.
const DERIVED_PRIMARY_COLORS: usize = 5;
/// Category score at or above which a site lists the category as a strength.
const STRENGTH_THRESHOLD: u8 = 90;
/// Category score below which a site lists the category as a weakness.
const WEAKNESS_THRESHOLD: u8 = 70;

/// A foreground/background pair sampled from rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ColorPair {
    /// Text color.
    pub foreground: String,
    /// Background color behind the text.
    pub background: String,
    /// Selector of the text element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

/// Rendered document width at one viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewportLayout {
    /// Viewport the page was rendered at.
    pub viewport: Viewport,
    /// `scrollWidth` of the document.
    pub content_width: f64,
}

/// Raw facts extracted from a rendered page by the browser layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PageFacts {
    /// Page URL.
    pub url: String,
    /// Document widths per viewport.
    pub viewports: Vec<ViewportLayout>,
    /// Sampled text color pairs.
    pub color_pairs: Vec<ColorPair>,
    /// Headings in document order.
    pub headings: Vec<Heading>,
    /// Elements carrying ARIA attributes.
    pub aria_elements: Vec<AriaElement>,
    /// Interactive element geometry.
    pub touch_elements: Vec<ElementBox>,
    /// Concatenated stylesheet text.
    pub css: String,
    /// Computed style declarations.
    pub styles: Vec<StyleEntry>,
    /// Margin values in pixels.
    pub margins: Vec<i64>,
    /// Padding values in pixels.
    pub paddings: Vec<i64>,
    /// Forms on the page.
    pub forms: Vec<FormFacts>,
    /// Primary navigation, when present.
    pub navigation: Option<NavigationFacts>,
}

/// Outputs of every analyzer for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDiagnostics {
    /// Contrast checks for every parsable color pair, with its selector.
    pub contrast: Vec<(Option<String>, ContrastCheck)>,
    /// Heading outline validation.
    pub headings: Validation,
    /// ARIA validation per element, with its selector.
    pub aria: Vec<(Option<String>, Validation)>,
    /// Touch target classification.
    pub touch_targets: TouchTargetReport,
    /// Breakpoint coverage.
    pub breakpoints: BreakpointReport,
    /// Viewports whose content overflows horizontally.
    pub overflowing: Vec<Viewport>,
    /// Extracted palette.
    pub palette: Palette,
    /// Detected spacing grid.
    pub spacing: SpacingSystem,
    /// Form heuristics, with the form's selector.
    pub forms: Vec<(Option<String>, HeuristicScore)>,
    /// Navigation heuristic.
    pub navigation: Option<HeuristicScore>,
}

/// Run every analyzer over the page facts.
///
/// Color pairs that cannot be parsed are logged and skipped so that one
/// malformed sample does not discard the rest of the page.
pub fn diagnose(facts: &PageFacts) -> PageDiagnostics {
    let contrast = facts
        .color_pairs
        .iter()
        .filter_map(|pair| match contrast(&pair.foreground, &pair.background) {
            Ok(check) => Some((pair.selector.clone(), check)),
            Err(err) => {
                debug!("skipping color pair on {}: {err}", facts.url);
                None
            }
        })
        .collect();

    let overflowing = facts
        .viewports
        .iter()
        .filter(|layout| {
            detect_horizontal_scroll(f64::from(layout.viewport.width), layout.content_width)
        })
        .map(|layout| layout.viewport.clone())
        .collect();

    PageDiagnostics {
        contrast,
        headings: validate_heading_hierarchy(&facts.headings),
        aria: facts
            .aria_elements
            .iter()
            .map(|element| (element.selector.clone(), validate_aria(element)))
            .collect(),
        touch_targets: evaluate_touch_targets(&facts.touch_elements),
        breakpoints: analyze_breakpoints(&facts.css),
        overflowing,
        palette: extract_colors(&facts.styles),
        spacing: detect_spacing_system(&facts.margins, &facts.paddings),
        forms: facts
            .forms
            .iter()
            .map(|form| (form.selector.clone(), evaluate_form(form)))
            .collect(),
        navigation: facts.navigation.as_ref().map(evaluate_navigation),
    }
}

#[derive(Default)]
struct FindingLog {
    findings: Vec<Finding>,
    ordinals: HashMap<&'static str, usize>,
}

impl FindingLog {
    fn push(
        &mut self,
        prefix: &'static str,
        category: Category,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Finding {
        let ordinal = self.ordinals.entry(prefix).or_insert(0);
        *ordinal += 1;
        self.findings.push(Finding::new(
            format!("{prefix}-{ordinal}"),
            category,
            severity,
            title,
            description,
        ));
        let last = self.findings.len() - 1;
        &mut self.findings[last]
    }
}

impl PageDiagnostics {
    /// Convert analyzer outcomes into findings, in analyzer order.
    pub fn findings(&self) -> Vec<Finding> {
        let mut log = FindingLog::default();
        self.contrast_findings(&mut log);
        self.structure_findings(&mut log);
        self.layout_findings(&mut log);
        self.visual_findings(&mut log);
        self.usability_findings(&mut log);
        log.findings
    }

    fn contrast_findings(&self, log: &mut FindingLog) {
        for (selector, check) in self.contrast.iter().filter(|(_, check)| !check.wcag_aa) {
            let severity = if check.ratio < CRITICAL_CONTRAST_RATIO {
                Severity::Critical
            } else {
                Severity::High
            };
            let finding = log.push(
                "contrast",
                Category::Accessibility,
                severity,
                "Insufficient color contrast",
                format!(
                    "Contrast ratio {:.2}:1 between {} and {} is below the 4.5:1 minimum.",
                    check.ratio, check.foreground, check.background
                ),
            );
            finding.wcag_criterion = Some("1.4.3 Contrast (Minimum)".to_string());
            finding.impact = Some("Text is hard to read for users with low vision.".to_string());
            finding.location = selector.clone();
        }
    }

    fn structure_findings(&self, log: &mut FindingLog) {
        for issue in &self.headings.issues {
            let severity = if issue.starts_with("No headings") {
                Severity::High
            } else {
                Severity::Medium
            };
            let finding = log.push(
                "heading",
                Category::Accessibility,
                severity,
                "Heading hierarchy",
                issue.clone(),
            );
            finding.wcag_criterion = Some("1.3.1 Info and Relationships".to_string());
            finding.impact =
                Some("Screen reader users rely on headings to navigate the page.".to_string());
        }

        for (selector, validation) in &self.aria {
            for issue in &validation.issues {
                let severity = if issue.ends_with("missing accessible name") {
                    Severity::High
                } else {
                    Severity::Medium
                };
                let finding = log.push(
                    "aria",
                    Category::Accessibility,
                    severity,
                    "ARIA attributes",
                    issue.clone(),
                );
                finding.wcag_criterion = Some("4.1.2 Name, Role, Value".to_string());
                finding.location = selector.clone();
            }
        }
    }

    fn layout_findings(&self, log: &mut FindingLog) {
        for target in &self.touch_targets.failing {
            let finding = log.push(
                "touch-target",
                Category::Responsive,
                Severity::Medium,
                "Touch target too small",
                format!(
                    "Element is {}×{}px; interactive targets need at least 44×44px.",
                    target.width, target.height
                ),
            );
            finding.wcag_criterion = Some("2.5.5 Target Size".to_string());
            finding.location = Some(target.selector.clone());
        }

        if self.breakpoints.coverage == BreakpointCoverage::Poor {
            let found = match self.breakpoints.breakpoints.as_slice() {
                [only] => format!("a single min-width breakpoint ({only}px)"),
                _ => "no min-width breakpoints".to_string(),
            };
            log.push(
                "breakpoint",
                Category::Responsive,
                Severity::Medium,
                "Limited responsive breakpoints",
                format!("Stylesheets define {found}; layouts may not adapt between device classes."),
            );
        }

        for viewport in &self.overflowing {
            let finding = log.push(
                "overflow",
                Category::Responsive,
                Severity::High,
                "Horizontal scrolling",
                format!(
                    "Content is wider than the {}px viewport and scrolls horizontally.",
                    viewport.width
                ),
            );
            finding.location = Some(viewport.label());
        }
    }

    fn visual_findings(&self, log: &mut FindingLog) {
        let severity = match self.spacing.pattern {
            SpacingPattern::EightPointGrid | SpacingPattern::FourPointGrid => return,
            SpacingPattern::Custom => Severity::Low,
            SpacingPattern::Inconsistent => Severity::Medium,
        };
        let values: Vec<String> = self
            .spacing
            .common_values
            .iter()
            .map(|value| format!("{value}px"))
            .collect();
        log.push(
            "spacing",
            Category::Visual,
            severity,
            "Spacing scale",
            format!(
                "Spacing follows a {} pattern (base unit {}px): {}.",
                self.spacing.pattern.as_str(),
                self.spacing.base_unit,
                values.join(", ")
            ),
        );
    }

    fn usability_findings(&self, log: &mut FindingLog) {
        for (index, (selector, result)) in self.forms.iter().enumerate() {
            if result.issues.is_empty() {
                continue;
            }
            let finding = log.push(
                "form",
                Category::Ux,
                heuristic_severity(result.score),
                format!("Form usability: form {}", index + 1),
                format!("{} (score {}/100)", result.issues.join("; "), result.score),
            );
            finding.location = selector.clone();
        }

        if let Some(result) = self.navigation.as_ref().filter(|nav| !nav.issues.is_empty()) {
            let finding = log.push(
                "navigation",
                Category::Ux,
                heuristic_severity(result.score),
                "Navigation usability",
                format!("{} (score {}/100)", result.issues.join("; "), result.score),
            );
            finding.location = Some("Primary navigation".to_string());
        }
    }

    /// Design system reconstructed from the palette and spacing grid.
    pub fn design_system(&self) -> DesignSystem {
        let base = self.spacing.base_unit.max(1);
        DesignSystem {
            colors: (!self.palette.most_used.is_empty()).then(|| ColorPalette {
                primary: self
                    .palette
                    .most_used
                    .iter()
                    .take(DERIVED_PRIMARY_COLORS)
                    .map(|usage| usage.color.clone())
                    .collect(),
                ..ColorPalette::default()
            }),
            typography: None,
            spacing: (!self.spacing.common_values.is_empty()).then(|| SpacingScale {
                unit: base,
                scale: self
                    .spacing
                    .common_values
                    .iter()
                    .map(|value| f64::from(*value) / f64::from(base))
                    .collect(),
                ..SpacingScale::default()
            }),
            ..DesignSystem::default()
        }
    }
}

fn heuristic_severity(score: u8) -> Severity {
    match score {
        0..=59 => Severity::High,
        60..=84 => Severity::Medium,
        _ => Severity::Low,
    }
}

/// Findings and recommendations decided by the external assessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Narrative summary.
    #[serde(default)]
    pub summary: String,
    /// Findings in discovery order.
    #[serde(default)]
    pub findings: Vec<Finding>,
    /// Recommendations in discovery order.
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Design system, when the assessor reconstructed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_system: Option<DesignSystem>,
    /// Captured artefacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

/// The collaborator that decides what is wrong with a page.
///
/// Implementations typically wrap a model conversation; the pipeline only
/// sees the validated records it returns.
#[cfg_attr(test, mockall::automock)]
pub trait Assessor {
    /// Assess a page given its facts and the automated diagnostics.
    fn assess(&self, facts: &PageFacts, diagnostics: &PageDiagnostics) -> Result<Assessment>;
}

/// A precomputed assessment, e.g. one read from disk.
impl Assessor for Assessment {
    fn assess(&self, _facts: &PageFacts, _diagnostics: &PageDiagnostics) -> Result<Assessment> {
        Ok(self.clone())
    }
}

/// Analyze one page and return a fully scored result.
///
/// Automated findings come first, followed by the assessor's findings; scores
/// are derived from the combined list under `policy`.
pub fn analyze_page<A: Assessor + ?Sized>(
    facts: &PageFacts,
    timestamp: &str,
    assessor: &A,
    policy: &ScoringPolicy,
) -> Result<AnalysisResult> {
    let diagnostics = diagnose(facts);
    let mut findings = diagnostics.findings();
    let automated = findings.len();
    let assessment = assessor.assess(facts, &diagnostics)?;
    findings.extend(assessment.findings);

    let design_system = assessment
        .design_system
        .or_else(|| Some(diagnostics.design_system()))
        .filter(|system| system != &DesignSystem::default());

    let result = AnalysisResult {
        url: facts.url.clone(),
        timestamp: timestamp.to_string(),
        summary: assessment.summary,
        overall_score: 0,
        scores: score_categories(&findings, policy),
        findings,
        recommendations: assessment.recommendations,
        design_system,
        evidence: assessment.evidence.unwrap_or_default(),
    };
    let result = finalize_scores(result);

    info!(
        "analyzed {}: {} automated and {} assessed findings, overall {}/100",
        result.url,
        automated,
        result.findings.len() - automated,
        result.overall_score
    );
    Ok(result)
}

/// Build a comparison of results in the order given; rank follows that order.
pub fn compare_results(results: &[AnalysisResult]) -> Result<ComparisonResult> {
    if results.is_empty() {
        return Err(UxLensError::Other("no results to compare".to_string()));
    }

    let sites = results
        .iter()
        .enumerate()
        .map(|(index, result)| SiteComparison {
            url: result.url.clone(),
            scores: result.scores,
            rank: index as u32 + 1,
            strengths: categories_where(result, |score| score >= STRENGTH_THRESHOLD),
            weaknesses: categories_where(result, |score| score < WEAKNESS_THRESHOLD),
        })
        .collect();

    let winner = Winner {
        overall: best_site(results, |result| result.overall_score),
        by_category: CategoryWinners {
            accessibility: best_site(results, |result| result.scores.accessibility),
            responsive: best_site(results, |result| result.scores.responsive),
            visual: best_site(results, |result| result.scores.visual),
            ux: best_site(results, |result| result.scores.ux),
            performance: best_site(results, |result| result.scores.performance),
        },
    };

    Ok(ComparisonResult {
        sites,
        summary: format!(
            "Analyzed {} websites for comparative UI/UX quality.",
            results.len()
        ),
        winner,
    })
}

/// URL of the highest scoring result; the earliest wins ties.
fn best_site(results: &[AnalysisResult], key: impl Fn(&AnalysisResult) -> u8) -> String {
    results
        .iter()
        .rev()
        .max_by_key(|result| key(result))
        .map(|result| result.url.clone())
        .unwrap_or_default()
}

fn categories_where(result: &AnalysisResult, predicate: impl Fn(u8) -> bool) -> Vec<String> {
    Category::ALL
        .into_iter()
        .filter(|category| predicate(result.scores.get(*category)))
        .map(|category| category.label().to_string())
        .collect()
}
