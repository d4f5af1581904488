//! Domain entities for uxlens.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Quality dimension a finding or score belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// WCAG conformance.
    Accessibility,
    /// Layout behaviour across viewports.
    Responsive,
    /// Palette, typography and spacing consistency.
    Visual,
    /// Usability of navigation, forms and feedback.
    Ux,
    /// Loading and runtime behaviour.
    Performance,
}

impl Category {
    /// Every category in report order.
    pub const ALL: [Category; 5] = [
        Category::Accessibility,
        Category::Responsive,
        Category::Visual,
        Category::Ux,
        Category::Performance,
    ];

    /// Stable lowercase identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accessibility => "accessibility",
            Self::Responsive => "responsive",
            Self::Visual => "visual",
            Self::Ux => "ux",
            Self::Performance => "performance",
        }
    }

    /// Human-readable name used in report tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Accessibility => "Accessibility",
            Self::Responsive => "Responsive Design",
            Self::Visual => "Visual Design",
            Self::Ux => "User Experience",
            Self::Performance => "Performance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgently an issue needs attention.
///
/// Also used as the priority of a [`Recommendation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks users outright.
    Critical,
    /// Significant barrier.
    High,
    /// Noticeable friction.
    Medium,
    /// Polish.
    Low,
}

impl Severity {
    /// Every severity from most to least urgent.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Stable lowercase identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated implementation cost of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    /// Under a day.
    Low,
    /// A few days.
    Medium,
    /// A sprint or more.
    High,
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(text)
    }
}

/// Supporting artefacts attached to a finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindingEvidence {
    /// Path of a screenshot showing the issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    /// Path of an accessibility snapshot showing the issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
    /// Offending markup or CSS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A single diagnosed issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Identifier, unique within one analysis.
    pub id: String,
    /// Category the issue is scored under.
    pub category: Category,
    /// Urgency of the issue.
    pub severity: Severity,
    /// Short headline.
    pub title: String,
    /// Full explanation.
    pub description: String,
    /// CSS selector, page section or viewport the issue was seen at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// WCAG success criterion, e.g. `1.4.3 Contrast (Minimum)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wcag_criterion: Option<String>,
    /// Effect on users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// User groups affected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_users: Vec<String>,
    /// Supporting artefacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<FindingEvidence>,
}

impl Finding {
    /// Create a finding with only the required fields populated.
    pub fn new(
        id: impl Into<String>,
        category: Category,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            severity,
            title: title.into(),
            description: description.into(),
            location: None,
            wcag_criterion: None,
            impact: None,
            affected_users: Vec::new(),
            evidence: None,
        }
    }

    /// Attach a location.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Attach a WCAG criterion reference.
    pub fn with_wcag(mut self, criterion: impl Into<String>) -> Self {
        self.wcag_criterion = Some(criterion.into());
        self
    }

    /// Attach a user impact statement.
    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    /// Attach a code snippet as evidence.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        let evidence = self.evidence.get_or_insert_with(FindingEvidence::default);
        evidence.code = Some(code.into());
        self
    }
}

/// Before/after pair illustrating a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CodeExample {
    /// Current markup.
    pub before: String,
    /// Suggested markup.
    pub after: String,
}

/// A proposed remediation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Identifier, unique within one analysis.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// Why the change matters.
    pub description: String,
    /// Priority tier, using the same four levels as finding severity.
    pub priority: Severity,
    /// Category the change improves.
    pub category: Category,
    /// Implementation cost.
    pub effort: Effort,
    /// Concrete steps.
    pub implementation: String,
    /// Optional before/after snippet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_example: Option<CodeExample>,
    /// Expected outcome once applied.
    #[serde(default)]
    pub estimated_impact: String,
}

/// Per-category quality scores, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryScores {
    /// Accessibility score.
    pub accessibility: u8,
    /// Responsive design score.
    pub responsive: u8,
    /// Visual design score.
    pub visual: u8,
    /// User experience score.
    pub ux: u8,
    /// Performance score.
    pub performance: u8,
}

impl CategoryScores {
    /// Scores with every category at 100.
    pub fn perfect() -> Self {
        Self {
            accessibility: 100,
            responsive: 100,
            visual: 100,
            ux: 100,
            performance: 100,
        }
    }

    /// Score for one category.
    pub fn get(&self, category: Category) -> u8 {
        match category {
            Category::Accessibility => self.accessibility,
            Category::Responsive => self.responsive,
            Category::Visual => self.visual,
            Category::Ux => self.ux,
            Category::Performance => self.performance,
        }
    }

    /// Replace the score for one category, clamping to 100.
    pub fn set(&mut self, category: Category, score: u8) {
        let score = score.min(100);
        match category {
            Category::Accessibility => self.accessibility = score,
            Category::Responsive => self.responsive = score,
            Category::Visual => self.visual = score,
            Category::Ux => self.ux = score,
            Category::Performance => self.performance = score,
        }
    }
}

impl Default for CategoryScores {
    fn default() -> Self {
        Self::perfect()
    }
}

/// A captured screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Screenshot {
    /// Viewport name the capture was taken at.
    pub viewport: String,
    /// File path of the image.
    pub path: String,
    /// Capture time.
    pub timestamp: String,
}

/// A captured accessibility tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessibilitySnapshot {
    /// Viewport name the capture was taken at.
    pub viewport: String,
    /// File path or inline dump of the tree.
    pub tree: String,
    /// Capture time.
    pub timestamp: String,
}

/// Raw artefacts gathered while observing the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Screenshots per viewport.
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
    /// Accessibility snapshots per viewport.
    #[serde(default)]
    pub snapshots: Vec<AccessibilitySnapshot>,
    /// Browser console errors.
    #[serde(default)]
    pub console_errors: Vec<String>,
    /// Failed or slow network requests.
    #[serde(default)]
    pub network_issues: Vec<String>,
}

/// Named semantic colors of a palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SemanticColors {
    /// Success color.
    pub success: String,
    /// Warning color.
    pub warning: String,
    /// Error color.
    pub error: String,
    /// Informational color.
    pub info: String,
}

/// Colors observed on the page, grouped by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ColorPalette {
    /// Brand colors.
    #[serde(default)]
    pub primary: Vec<String>,
    /// Supporting colors.
    #[serde(default)]
    pub secondary: Vec<String>,
    /// Highlight colors.
    #[serde(default)]
    pub accent: Vec<String>,
    /// State colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticColors>,
    /// Greys.
    #[serde(default)]
    pub neutrals: Vec<String>,
}

/// Font stacks in use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FontFamilies {
    /// Heading font stack.
    pub heading: String,
    /// Body font stack.
    pub body: String,
    /// Monospace font stack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mono: Option<String>,
}

/// One step of the type scale, e.g. `h1` or `body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypeScaleStep {
    /// Step name.
    pub name: String,
    /// CSS font size.
    pub font_size: String,
    /// CSS line height.
    pub line_height: String,
    /// CSS font weight.
    pub font_weight: String,
    /// CSS letter spacing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
}

/// Typography system in use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    /// Font stacks.
    #[serde(default)]
    pub font_families: FontFamilies,
    /// Type scale from largest to smallest.
    #[serde(default)]
    pub scale: Vec<TypeScaleStep>,
}

/// Spacing scale in use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SpacingScale {
    /// Base unit in pixels.
    pub unit: u32,
    /// Multipliers of the base unit.
    #[serde(default)]
    pub scale: Vec<f64>,
    /// Named sizes such as `sm` or `lg`.
    #[serde(default)]
    pub common: BTreeMap<String, String>,
}

/// Variants and states of a reusable component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComponentSpec {
    /// Visual variants.
    #[serde(default)]
    pub variants: Vec<String>,
    /// Interaction states.
    #[serde(default)]
    pub states: Vec<String>,
}

/// Design system reconstructed from the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DesignSystem {
    /// Color palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorPalette>,
    /// Typography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    /// Spacing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<SpacingScale>,
    /// Component library keyed by component name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, ComponentSpec>,
}

/// Completed analysis of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Analysed URL.
    pub url: String,
    /// RFC 3339 time of the analysis.
    pub timestamp: String,
    /// Narrative summary.
    pub summary: String,
    /// Rounded mean of the category scores.
    #[serde(default)]
    pub overall_score: u8,
    /// Category scores.
    pub scores: CategoryScores,
    /// Findings in discovery order.
    #[serde(default)]
    pub findings: Vec<Finding>,
    /// Recommendations in discovery order.
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Reconstructed design system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_system: Option<DesignSystem>,
    /// Captured artefacts.
    #[serde(default)]
    pub evidence: Evidence,
}

impl AnalysisResult {
    /// Findings of one category, in discovery order.
    pub fn findings_in(&self, category: Category) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(move |finding| finding.category == category)
    }

    /// Number of findings at a severity, across all categories.
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .count()
    }
}

/// Browser viewport used while observing a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Display name.
    pub name: String,
    /// Width in CSS pixels.
    pub width: u32,
    /// Height in CSS pixels.
    pub height: u32,
    /// Device pixel ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_scale_factor: Option<f64>,
}

impl Viewport {
    /// Location label such as `Tablet Portrait (768×1024)`.
    pub fn label(&self) -> String {
        format!("{} ({}×{})", self.name, self.width, self.height)
    }
}

/// The viewports every page is checked against by default.
pub fn standard_viewports() -> Vec<Viewport> {
    [
        ("Desktop FHD", 1920, 1080, 1.0),
        ("Laptop", 1366, 768, 1.0),
        ("Tablet Portrait", 768, 1024, 2.0),
        ("Mobile iPhone SE", 375, 667, 2.0),
        ("Mobile iPhone 12", 390, 844, 3.0),
    ]
    .into_iter()
    .map(|(name, width, height, scale)| Viewport {
        name: name.to_string(),
        width,
        height,
        device_scale_factor: Some(scale),
    })
    .collect()
}

/// One row of a multi-site comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SiteComparison {
    /// Site URL.
    pub url: String,
    /// Category scores of the site.
    pub scores: CategoryScores,
    /// Caller-assigned rank, 1 is best.
    pub rank: u32,
    /// Categories the site does well in.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// Categories the site struggles with.
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// Winning URL per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryWinners {
    /// Best accessibility.
    pub accessibility: String,
    /// Best responsive design.
    pub responsive: String,
    /// Best visual design.
    pub visual: String,
    /// Best user experience.
    pub ux: String,
    /// Best performance.
    pub performance: String,
}

impl CategoryWinners {
    /// Winning URL for one category.
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Accessibility => &self.accessibility,
            Category::Responsive => &self.responsive,
            Category::Visual => &self.visual,
            Category::Ux => &self.ux,
            Category::Performance => &self.performance,
        }
    }
}

/// Overall and per-category winners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    /// Best site overall.
    pub overall: String,
    /// Best site per category.
    pub by_category: CategoryWinners,
}

/// Side-by-side comparison of several analysed sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComparisonResult {
    /// Rows in caller order.
    pub sites: Vec<SiteComparison>,
    /// Narrative summary.
    pub summary: String,
    /// Winners.
    pub winner: Winner,
}
