//! OpenAPI component schemas for uxlens input and output documents.

use utoipa::OpenApi;

use crate::color::ContrastCheck;
use crate::domain::{
    AccessibilitySnapshot, AnalysisResult, Category, CategoryScores, CategoryWinners, CodeExample,
    ColorPalette, ComparisonResult, ComponentSpec, DesignSystem, Effort, Evidence, Finding,
    FindingEvidence, FontFamilies, Recommendation, Screenshot, SemanticColors, Severity,
    SiteComparison, SpacingScale, TypeScaleStep, Typography, Viewport, Winner,
};
use crate::heuristics::{FormFacts, FormInput, NavigationFacts};
use crate::layout::ElementBox;
use crate::palette::StyleEntry;
use crate::pipeline::{Assessment, ColorPair, PageFacts, ViewportLayout};
use crate::scoring::{ScoringPolicy, SeverityWeights};
use crate::structure::{AriaElement, Heading};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "uxlens",
        description = "Documents accepted and produced by the uxlens analysis engine"
    ),
    components(
        schemas(
            PageFacts,
            ViewportLayout,
            ColorPair,
            Heading,
            AriaElement,
            ElementBox,
            StyleEntry,
            FormFacts,
            FormInput,
            NavigationFacts,
            Assessment,
            ScoringPolicy,
            SeverityWeights,
            ContrastCheck,
            AnalysisResult,
            Category,
            Severity,
            Effort,
            Finding,
            FindingEvidence,
            Recommendation,
            CodeExample,
            CategoryScores,
            Evidence,
            Screenshot,
            AccessibilitySnapshot,
            DesignSystem,
            ColorPalette,
            SemanticColors,
            Typography,
            FontFamilies,
            TypeScaleStep,
            SpacingScale,
            ComponentSpec,
            Viewport,
            ComparisonResult,
            SiteComparison,
            Winner,
            CategoryWinners
        )
    )
)]
/// OpenAPI document describing every uxlens payload.
pub struct ApiDoc;

/// Render the schema document as pretty JSON.
pub fn schema_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}
