//! Markdown and JSON rendering for analysis and comparison results.
//!
//! A single-site report is a fixed sequence of section builders, each a pure
//! function of the [`AnalysisResult`]. Builders that have nothing to say
//! return `None` and are dropped before the sections are joined.

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::{
    AnalysisResult, Category, ComparisonResult, DesignSystem, Finding, Recommendation, Severity,
};
use crate::scoring::{rating, rounded_mean};

/// Separator between top-level report sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// A report section builder.
pub type SectionBuilder = fn(&AnalysisResult) -> Option<String>;

/// Section builders in report order.
pub const REPORT_SECTIONS: [SectionBuilder; 9] = [
    header_section,
    executive_summary_section,
    accessibility_section,
    responsive_section,
    visual_section,
    ux_section,
    performance_section,
    recommendations_section,
    appendix_section,
];

const NEXT_STEPS: [&str; 5] = [
    "Address critical accessibility violations",
    "Fix responsive design breakpoints",
    "Implement recommended improvements",
    "Re-test after fixes",
    "Conduct user testing for validation",
];

/// Render a complete single-site report as Markdown.
pub fn render_report(result: &AnalysisResult) -> String {
    let sections: Vec<String> = REPORT_SECTIONS
        .iter()
        .filter_map(|build| build(result))
        .map(|section| section.trim_end().to_string())
        .filter(|section| !section.is_empty())
        .collect();
    let mut output = sections.join(SECTION_SEPARATOR);
    output.push('\n');
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Host name of a URL without a leading `www.`; the input when no host is found.
pub fn site_domain(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = host.split(':').next().unwrap_or_default().to_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    if host.is_empty() {
        url.to_string()
    } else {
        host
    }
}

fn display_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| {
            parsed
                .with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

fn iso_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| {
            parsed
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Title, analysis date and URL.
pub fn header_section(result: &AnalysisResult) -> Option<String> {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "# UI/UX Analysis Report: {}\n",
        site_domain(&result.url)
    );
    let _ = writeln!(
        output,
        "**Analysis Date**: {}",
        display_timestamp(&result.timestamp)
    );
    let _ = writeln!(output, "**URL**: {}", result.url);
    Some(output)
}

/// Overall score, category table and severity counts.
pub fn executive_summary_section(result: &AnalysisResult) -> Option<String> {
    let mut output = String::new();
    let _ = writeln!(output, "## Executive Summary\n");
    if !result.summary.trim().is_empty() {
        let _ = writeln!(output, "{}\n", result.summary.trim());
    }
    let _ = writeln!(
        output,
        "**Overall Score**: {}/100 ({})\n",
        result.overall_score,
        rating(result.overall_score)
    );

    let _ = writeln!(output, "**Category Scores**");
    let _ = writeln!(output, "| Category | Score | Rating |");
    let _ = writeln!(output, "|----------|-------|--------|");
    for category in Category::ALL {
        let score = result.scores.get(category);
        let _ = writeln!(
            output,
            "| {} | {score}/100 | {} |",
            category.label(),
            rating(score)
        );
    }

    let _ = writeln!(output, "\n**Issue Summary**");
    for severity in Severity::ALL {
        let (icon, label) = match severity {
            Severity::Critical => ("🚨", "Critical"),
            Severity::High => ("⚠️", "High Priority"),
            Severity::Medium => ("ℹ️", "Medium Priority"),
            Severity::Low => ("💡", "Low Priority"),
        };
        let _ = writeln!(
            output,
            "- {icon} {label}: {}",
            result.count_severity(severity)
        );
    }
    Some(output)
}

struct CategorySection {
    category: Category,
    heading: &'static str,
    all_clear: &'static str,
    score_label: &'static str,
}

const ACCESSIBILITY: CategorySection = CategorySection {
    category: Category::Accessibility,
    heading: "1. Accessibility Audit (WCAG 2.1)",
    all_clear: "✅ **Excellent accessibility!** No major issues found.",
    score_label: "Accessibility Score",
};

const RESPONSIVE: CategorySection = CategorySection {
    category: Category::Responsive,
    heading: "2. Responsive Design Analysis",
    all_clear: "✅ **Excellent responsive design!** No major issues found across the tested viewports.",
    score_label: "Responsive Score",
};

const VISUAL: CategorySection = CategorySection {
    category: Category::Visual,
    heading: "3. Visual Design Assessment",
    all_clear: "✅ **Consistent visual design!** No major issues found.",
    score_label: "Visual Design Score",
};

const UX: CategorySection = CategorySection {
    category: Category::Ux,
    heading: "4. User Experience Evaluation",
    all_clear: "✅ **Excellent user experience!** No major issues found.",
    score_label: "UX Score",
};

const PERFORMANCE: CategorySection = CategorySection {
    category: Category::Performance,
    heading: "5. Performance Analysis",
    all_clear: "✅ **Good performance!** No major issues found.",
    score_label: "Performance Score",
};

/// Accessibility findings grouped by severity.
pub fn accessibility_section(result: &AnalysisResult) -> Option<String> {
    Some(render_category(result, &ACCESSIBILITY, None))
}

/// Responsive design findings grouped by severity.
pub fn responsive_section(result: &AnalysisResult) -> Option<String> {
    Some(render_category(result, &RESPONSIVE, None))
}

/// Design system summary and visual findings grouped by severity.
pub fn visual_section(result: &AnalysisResult) -> Option<String> {
    let design_system = result.design_system.as_ref().and_then(format_design_system);
    Some(render_category(result, &VISUAL, design_system.as_deref()))
}

/// UX findings grouped by severity.
pub fn ux_section(result: &AnalysisResult) -> Option<String> {
    Some(render_category(result, &UX, None))
}

/// Performance findings grouped by severity.
pub fn performance_section(result: &AnalysisResult) -> Option<String> {
    Some(render_category(result, &PERFORMANCE, None))
}

fn render_category(
    result: &AnalysisResult,
    section: &CategorySection,
    preamble: Option<&str>,
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "## {}\n", section.heading);
    if let Some(preamble) = preamble {
        let _ = writeln!(output, "{}\n", preamble.trim_end());
    }

    let findings: Vec<&Finding> = result.findings_in(section.category).collect();
    if findings.is_empty() {
        let _ = writeln!(output, "{}\n", section.all_clear);
    }
    for severity in Severity::ALL {
        let bucket: Vec<&Finding> = findings
            .iter()
            .copied()
            .filter(|finding| finding.severity == severity)
            .collect();
        if bucket.is_empty() {
            continue;
        }
        let _ = writeln!(output, "### {}\n", severity_heading(severity));
        for (index, finding) in bucket.iter().enumerate() {
            append_finding(&mut output, finding, index + 1);
        }
    }

    let _ = writeln!(
        output,
        "**{}**: {}/100",
        section.score_label,
        result.scores.get(section.category)
    );
    output
}

fn severity_heading(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Critical Issues 🚨 (Must Fix)",
        Severity::High => "High Priority ⚠️",
        Severity::Medium => "Medium Priority ℹ️",
        Severity::Low => "Low Priority 💡",
    }
}

fn append_finding(output: &mut String, finding: &Finding, index: usize) {
    let _ = write!(output, "{index}. **{}**", finding.title);
    if let Some(criterion) = &finding.wcag_criterion {
        let _ = write!(output, " (WCAG {criterion})");
    }
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "   - **Location**: {}",
        finding.location.as_deref().unwrap_or("General")
    );
    let _ = writeln!(output, "   - **Description**: {}", finding.description);
    if let Some(impact) = finding.impact.as_deref().filter(|impact| !impact.is_empty()) {
        let _ = writeln!(output, "   - **Impact**: {impact}");
    }
    if let Some(code) = finding
        .evidence
        .as_ref()
        .and_then(|evidence| evidence.code.as_deref())
    {
        let _ = writeln!(output, "   - **Code Example**:");
        append_indented_code(output, &[code]);
    }
    let _ = writeln!(output);
}

fn append_indented_code(output: &mut String, blocks: &[&str]) {
    let _ = writeln!(output, "     ```html");
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            let _ = writeln!(output);
        }
        for line in block.lines() {
            let _ = writeln!(output, "     {line}");
        }
    }
    let _ = writeln!(output, "     ```");
}

/// Recommendations grouped by priority.
pub fn recommendations_section(result: &AnalysisResult) -> Option<String> {
    let mut output = String::new();
    let _ = writeln!(output, "## Recommendations by Priority\n");
    if result.recommendations.is_empty() {
        let _ = writeln!(output, "No recommendations at this time.");
        return Some(output);
    }

    for priority in Severity::ALL {
        let tier: Vec<&Recommendation> = result
            .recommendations
            .iter()
            .filter(|recommendation| recommendation.priority == priority)
            .collect();
        if tier.is_empty() {
            continue;
        }
        let heading = match priority {
            Severity::Critical => "🔴 Critical (Fix Immediately)",
            Severity::High => "🟡 High Priority (Fix Soon)",
            Severity::Medium => "🟢 Medium Priority (Nice to Have)",
            Severity::Low => "🔵 Low Priority (Future Enhancement)",
        };
        let _ = writeln!(output, "### {heading}\n");
        for (index, recommendation) in tier.iter().enumerate() {
            append_recommendation(&mut output, recommendation, index + 1);
        }
    }
    Some(output)
}

fn append_recommendation(output: &mut String, recommendation: &Recommendation, index: usize) {
    let _ = writeln!(output, "{index}. **{}**", recommendation.title);
    let _ = writeln!(output, "   - **Why**: {}", recommendation.description);
    let _ = writeln!(output, "   - **How**: {}", recommendation.implementation);
    let _ = writeln!(output, "   - **Effort**: {}", recommendation.effort);
    if !recommendation.estimated_impact.is_empty() {
        let _ = writeln!(output, "   - **Impact**: {}", recommendation.estimated_impact);
    }
    if let Some(example) = &recommendation.code_example {
        let _ = writeln!(output, "   - **Code Example**:");
        let before = format!("<!-- Before -->\n{}", example.before);
        let after = format!("<!-- After -->\n{}", example.after);
        append_indented_code(output, &[before.as_str(), after.as_str()]);
    }
    let _ = writeln!(output);
}

/// Evidence counts, evidence listing and next-steps checklist.
pub fn appendix_section(result: &AnalysisResult) -> Option<String> {
    let evidence = &result.evidence;
    let mut output = String::new();
    let _ = writeln!(output, "## Appendix: Technical Details\n");
    let _ = writeln!(output, "### Testing Environment");
    let _ = writeln!(
        output,
        "- **Analysis Date**: {}",
        iso_timestamp(&result.timestamp)
    );
    let _ = writeln!(
        output,
        "- **Screenshots Captured**: {}",
        evidence.screenshots.len()
    );
    let _ = writeln!(
        output,
        "- **Snapshots Captured**: {}",
        evidence.snapshots.len()
    );
    let _ = writeln!(
        output,
        "- **Console Errors**: {}",
        evidence.console_errors.len()
    );
    let _ = writeln!(
        output,
        "- **Network Issues**: {}\n",
        evidence.network_issues.len()
    );

    let mut items: Vec<String> = Vec::new();
    items.extend(
        evidence
            .screenshots
            .iter()
            .map(|shot| format!("Screenshot ({}): `{}`", shot.viewport, shot.path)),
    );
    items.extend(evidence.snapshots.iter().map(|snapshot| {
        format!(
            "Accessibility Snapshot ({}): `{}`",
            snapshot.viewport, snapshot.tree
        )
    }));
    items.extend(
        evidence
            .console_errors
            .iter()
            .map(|error| format!("Console error: `{error}`")),
    );
    items.extend(
        evidence
            .network_issues
            .iter()
            .map(|issue| format!("Network issue: {issue}")),
    );
    if !items.is_empty() {
        let _ = writeln!(output, "### Evidence");
        for item in items {
            let _ = writeln!(output, "- {item}");
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "### Next Steps");
    for (index, step) in NEXT_STEPS.iter().enumerate() {
        let _ = writeln!(output, "{}. [ ] {step}", index + 1);
    }
    Some(output)
}

fn format_design_system(system: &DesignSystem) -> Option<String> {
    let mut output = String::new();

    if let Some(colors) = &system.colors {
        let mut lines = Vec::new();
        for (index, color) in colors.primary.iter().enumerate() {
            lines.push(format!("--primary-{}: {color};", index + 1));
        }
        for (index, color) in colors.secondary.iter().enumerate() {
            lines.push(format!("--secondary-{}: {color};", index + 1));
        }
        for (index, color) in colors.accent.iter().enumerate() {
            lines.push(format!("--accent-{}: {color};", index + 1));
        }
        if let Some(semantic) = &colors.semantic {
            lines.push(format!("--success: {};", semantic.success));
            lines.push(format!("--warning: {};", semantic.warning));
            lines.push(format!("--error: {};", semantic.error));
            lines.push(format!("--info: {};", semantic.info));
        }
        for (index, color) in colors.neutrals.iter().enumerate() {
            lines.push(format!("--neutral-{}: {color};", index + 1));
        }
        if !lines.is_empty() {
            let _ = writeln!(output, "**Color Palette**\n```css");
            for line in lines {
                let _ = writeln!(output, "{line}");
            }
            let _ = writeln!(output, "```\n");
        }
    }

    if let Some(typography) = &system.typography {
        let families = &typography.font_families;
        if !families.heading.is_empty() || !families.body.is_empty() {
            let _ = writeln!(output, "**Font Families**");
            let _ = writeln!(output, "- Heading: {}", families.heading);
            let _ = writeln!(output, "- Body: {}", families.body);
            if let Some(mono) = &families.mono {
                let _ = writeln!(output, "- Mono: {mono}");
            }
            let _ = writeln!(output);
        }
        if !typography.scale.is_empty() {
            let _ = writeln!(output, "**Typography Scale**\n```css");
            for step in &typography.scale {
                let _ = writeln!(
                    output,
                    "{}: {}/{}, {}",
                    step.name, step.font_size, step.line_height, step.font_weight
                );
            }
            let _ = writeln!(output, "```\n");
        }
    }

    if let Some(spacing) = &system.spacing {
        let scale: Vec<String> = spacing.scale.iter().map(f64::to_string).collect();
        let _ = writeln!(output, "**Spacing System**");
        let _ = writeln!(output, "- Base unit: {}px", spacing.unit);
        if !scale.is_empty() {
            let _ = writeln!(output, "- Pattern: {}", scale.join(", "));
        }
        for (name, value) in &spacing.common {
            let _ = writeln!(output, "- {name}: {value}");
        }
        let _ = writeln!(output);
    }

    if !system.components.is_empty() {
        let _ = writeln!(output, "**Components**");
        for (name, component) in &system.components {
            let _ = write!(output, "- {name}");
            if !component.variants.is_empty() {
                let _ = write!(output, ": variants {}", component.variants.join(", "));
            }
            if !component.states.is_empty() {
                let _ = write!(output, "; states {}", component.states.join(", "));
            }
            let _ = writeln!(output);
        }
        let _ = writeln!(output);
    }

    if output.is_empty() {
        return None;
    }
    Some(format!("### Design System Extracted\n\n{}", output.trim_end()))
}

/// Render a multi-site comparison as Markdown.
///
/// Rows keep the order of `comparison.sites`; the overall column is the
/// rounded mean of the four table categories.
pub fn render_comparison(comparison: &ComparisonResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# UI/UX Competitive Analysis\n");
    let _ = writeln!(output, "## Summary\n\n{}\n", comparison.summary);

    let _ = writeln!(output, "## Overall Comparison\n");
    let _ = writeln!(
        output,
        "| Site | Accessibility | Responsive | Visual | UX | Overall | Rank |"
    );
    let _ = writeln!(
        output,
        "|------|---------------|------------|--------|----|---------|------|"
    );
    for site in &comparison.sites {
        let scores = &site.scores;
        let overall = rounded_mean(&[
            scores.accessibility,
            scores.responsive,
            scores.visual,
            scores.ux,
        ]);
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {overall} | {} |",
            site_domain(&site.url),
            scores.accessibility,
            scores.responsive,
            scores.visual,
            scores.ux,
            site.rank
        );
    }

    let _ = writeln!(output, "\n## Category Winners\n");
    for category in Category::ALL {
        let url = comparison.winner.by_category.get(category);
        if url.is_empty() {
            continue;
        }
        let _ = writeln!(output, "- **{}**: {}", category.label(), site_domain(url));
    }
    if !comparison.winner.overall.is_empty() {
        let _ = writeln!(
            output,
            "\n**Overall Winner**: {}",
            site_domain(&comparison.winner.overall)
        );
    }

    let notes: Vec<String> = comparison
        .sites
        .iter()
        .filter(|site| !site.strengths.is_empty() || !site.weaknesses.is_empty())
        .map(|site| {
            let mut parts = Vec::new();
            if !site.strengths.is_empty() {
                parts.push(format!("strengths: {}", site.strengths.join(", ")));
            }
            if !site.weaknesses.is_empty() {
                parts.push(format!("weaknesses: {}", site.weaknesses.join(", ")));
            }
            format!("- **{}**: {}", site_domain(&site.url), parts.join("; "))
        })
        .collect();
    if !notes.is_empty() {
        let _ = writeln!(output, "\n## Site Notes\n");
        for note in notes {
            let _ = writeln!(output, "{note}");
        }
    }
    output
}

/// Render the one-page summary of a batch run, one block per site in the
/// order given.
pub fn render_batch_summary(results: &[AnalysisResult]) -> String {
    let blocks: Vec<String> = results
        .iter()
        .map(|result| {
            let mut block = String::new();
            let _ = writeln!(block, "## {}\n", site_domain(&result.url));
            let _ = writeln!(block, "- Overall: {}/100", result.overall_score);
            let _ = writeln!(
                block,
                "- Accessibility: {}/100",
                result.scores.accessibility
            );
            let _ = writeln!(block, "- Responsive: {}/100", result.scores.responsive);
            let _ = writeln!(block, "- Findings: {}", result.findings.len());
            block
        })
        .collect();
    format!("# Batch Analysis Summary\n\n{}", blocks.join("\n"))
}
