#![deny(missing_docs)]
//! uxlens core library.
//!
//! This crate turns facts observed on a rendered web page into scored UI/UX
//! findings and renders them as Markdown or JSON reports.

pub mod color;
pub mod domain;
pub mod error;
pub mod heuristics;
pub mod layout;
pub mod palette;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod scoring;
pub mod structure;

pub use color::{ContrastCheck, Rgb, contrast, luminance, normalize_color};
pub use domain::{
    AnalysisResult, Category, CategoryScores, ComparisonResult, DesignSystem, Effort, Evidence,
    Finding, Recommendation, Severity, Viewport, standard_viewports,
};
pub use error::{Result, UxLensError};
pub use pipeline::{
    Assessment, Assessor, PageDiagnostics, PageFacts, analyze_page, compare_results, diagnose,
};
pub use report::{
    render_batch_summary, render_comparison, render_json, render_report, site_domain,
};
pub use schema::{ApiDoc, schema_json};
pub use scoring::{
    Rating, ScoringPolicy, SeverityWeights, finalize_scores, overall_score, rating,
    score_categories,
};
