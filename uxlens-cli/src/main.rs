#![deny(missing_docs)]
//! uxlens command-line interface.
//!
//! Renders analysis reports, runs the page pipeline over extracted facts,
//! analyzes batches of sites and compares several analyzed sites.

mod config;

use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{load_policy, read_json};
use log::info;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uxlens_core::{
    AnalysisResult, Assessment, Category, ComparisonResult, PageFacts, ScoringPolicy, Severity,
    analyze_page, compare_results, finalize_scores, rating, render_batch_summary,
    render_comparison, render_json, render_report, schema_json, score_categories, site_domain,
};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "uxlens", version, about = "uxlens UI/UX analysis CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct PolicyArgs {
    /// JSON file with per-category severity weights.
    #[arg(long, env = "UXLENS_POLICY")]
    policy: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report from a stored analysis result.
    Report {
        /// Analysis result JSON.
        #[arg(short, long)]
        input: PathBuf,
        /// Recompute category scores from the findings.
        #[arg(long)]
        rescore: bool,
        #[command(flatten)]
        policy: PolicyArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Analyze extracted page facts and render the result.
    Analyze {
        /// Page facts JSON.
        #[arg(long)]
        facts: PathBuf,
        /// Assessment JSON with findings and recommendations.
        #[arg(long)]
        assessment: Option<PathBuf>,
        /// Analysis timestamp (RFC 3339); defaults to now.
        #[arg(long)]
        timestamp: Option<String>,
        #[command(flatten)]
        policy: PolicyArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Analyze several sites and write one report per site plus a summary.
    Batch {
        /// Page facts JSON (repeatable).
        #[arg(long = "facts", required = true)]
        facts: Vec<PathBuf>,
        /// Assessment JSON paired with the facts file at the same position.
        #[arg(long = "assessment")]
        assessments: Vec<PathBuf>,
        /// Directory receiving the site reports and the summary.
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
        /// Maximum number of sites analyzed concurrently.
        #[arg(short = 'j', long, env = "UXLENS_CONCURRENCY", default_value_t = 4)]
        concurrency: usize,
        /// Analysis timestamp (RFC 3339); defaults to now.
        #[arg(long)]
        timestamp: Option<String>,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Compare stored analysis results; rank follows argument order.
    Compare {
        /// Analysis result JSON (repeatable).
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,
        /// Maximum number of results loaded concurrently.
        #[arg(short = 'j', long, env = "UXLENS_CONCURRENCY", default_value_t = 4)]
        concurrency: usize,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Print the OpenAPI schema of every input and output document.
    Schema {
        /// Write the schema to a file instead of stdout.
        #[arg(long = "report-output")]
        report_output: Option<PathBuf>,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            rescore,
            policy,
            report,
        } => run_report(input, rescore, policy, report).await?,
        Commands::Analyze {
            facts,
            assessment,
            timestamp,
            policy,
            report,
        } => {
            let timestamp = timestamp.unwrap_or_else(|| {
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            });
            run_analyze(facts, assessment, timestamp, policy, report).await?
        }
        Commands::Batch {
            facts,
            assessments,
            output,
            concurrency,
            timestamp,
            policy,
        } => {
            let timestamp = timestamp.unwrap_or_else(|| {
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            });
            let sites = pair_sites(facts, assessments)?;
            run_batch(sites, output, concurrency, timestamp, policy).await?
        }
        Commands::Compare {
            inputs,
            concurrency,
            report,
        } => run_compare(inputs, concurrency, report).await?,
        Commands::Schema { report_output } => run_schema(report_output).await?,
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

async fn run_report(
    input: PathBuf,
    rescore: bool,
    policy: PolicyArgs,
    report: OutputArgs,
) -> CliResult<()> {
    let mut result: AnalysisResult = read_json(&input).await?;
    if rescore {
        let policy = load_policy(policy.policy.as_deref()).await?;
        result.scores = score_categories(&result.findings, &policy);
    }
    let result = finalize_scores(result);
    emit_result(&result, &report).await
}

async fn run_analyze(
    facts: PathBuf,
    assessment: Option<PathBuf>,
    timestamp: String,
    policy: PolicyArgs,
    report: OutputArgs,
) -> CliResult<()> {
    let policy = load_policy(policy.policy.as_deref()).await?;
    let result = analyze_site(&facts, assessment.as_deref(), &timestamp, &policy).await?;
    emit_result(&result, &report).await
}

async fn analyze_site(
    facts: &Path,
    assessment: Option<&Path>,
    timestamp: &str,
    policy: &ScoringPolicy,
) -> CliResult<AnalysisResult> {
    let facts: PageFacts = read_json(facts).await?;
    let assessment: Assessment = match assessment {
        Some(path) => read_json(path).await?,
        None => Assessment::default(),
    };
    Ok(analyze_page(&facts, timestamp, &assessment, policy)?)
}

/// A facts file with the assessment supplied at the same position, if any.
#[derive(Clone, Debug, PartialEq)]
struct BatchSite {
    facts: PathBuf,
    assessment: Option<PathBuf>,
}

fn pair_sites(facts: Vec<PathBuf>, assessments: Vec<PathBuf>) -> CliResult<Vec<BatchSite>> {
    if assessments.len() > facts.len() {
        return Err(format!(
            "{} assessments given for {} facts files",
            assessments.len(),
            facts.len()
        )
        .into());
    }
    let mut assessments = assessments.into_iter();
    Ok(facts
        .into_iter()
        .map(|facts| BatchSite {
            facts,
            assessment: assessments.next(),
        })
        .collect())
}

async fn run_batch(
    sites: Vec<BatchSite>,
    output: PathBuf,
    concurrency: usize,
    timestamp: String,
    policy: PolicyArgs,
) -> CliResult<()> {
    let policy = load_policy(policy.policy.as_deref()).await?;
    let results = analyze_sites(sites, concurrency, timestamp, policy).await?;

    tokio::fs::create_dir_all(&output).await?;
    let mut seen: HashMap<String, usize> = HashMap::new();
    for result in &results {
        let domain = site_domain(&result.url);
        let repeats = seen.entry(domain.clone()).or_insert(0);
        *repeats += 1;
        let name = if *repeats == 1 {
            format!("batch-{domain}.md")
        } else {
            format!("batch-{domain}-{repeats}.md")
        };
        let path = output.join(name);
        tokio::fs::write(&path, render_report(result)).await?;
        info!(
            "{domain}: {}/100, report written to {}",
            result.overall_score,
            path.display()
        );
    }

    let summary = output.join("batch-summary.md");
    tokio::fs::write(&summary, render_batch_summary(&results)).await?;
    info!("batch summary written to {}", summary.display());
    Ok(())
}

/// Analyze sites concurrently while keeping the caller's order.
async fn analyze_sites(
    sites: Vec<BatchSite>,
    concurrency: usize,
    timestamp: String,
    policy: ScoringPolicy,
) -> CliResult<Vec<AnalysisResult>> {
    let concurrency = if concurrency == 0 { 1 } else { concurrency };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let policy = Arc::new(policy);
    let timestamp: Arc<str> = timestamp.into();
    let mut tasks = JoinSet::new();
    let count = sites.len();

    for (index, site) in sites.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let policy = policy.clone();
        let timestamp = timestamp.clone();
        tasks.spawn(async move {
            let _permit = permit;
            let analyzed =
                analyze_site(&site.facts, site.assessment.as_deref(), &timestamp, &policy).await;
            (index, analyzed)
        });
    }

    let mut slots: Vec<Option<AnalysisResult>> = vec![None; count];
    while let Some(joined) = tasks.join_next().await {
        let (index, analyzed) = joined.map_err(|err| format!("analysis task failed: {err}"))?;
        slots[index] = Some(analyzed?);
    }
    info!("analyzed {count} sites");

    Ok(slots.into_iter().flatten().collect())
}

async fn run_compare(inputs: Vec<PathBuf>, concurrency: usize, report: OutputArgs) -> CliResult<()> {
    let results = load_results(inputs, concurrency).await?;
    let comparison = compare_results(&results)?;
    emit_comparison(&comparison, &report).await
}

async fn run_schema(report_output: Option<PathBuf>) -> CliResult<()> {
    let output = OutputArgs {
        format: OutputFormat::Json,
        report_output,
    };
    let mut contents = schema_json()?;
    contents.push('\n');
    emit_output(&output, contents).await
}

/// Load results concurrently while keeping the caller's order.
async fn load_results(inputs: Vec<PathBuf>, concurrency: usize) -> CliResult<Vec<AnalysisResult>> {
    let concurrency = if concurrency == 0 { 1 } else { concurrency };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();
    let count = inputs.len();

    for (index, path) in inputs.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        tasks.spawn(async move {
            let _permit = permit;
            let loaded = read_json::<AnalysisResult>(&path).await;
            (index, loaded)
        });
    }

    let mut slots: Vec<Option<AnalysisResult>> = vec![None; count];
    while let Some(joined) = tasks.join_next().await {
        let (index, loaded) = joined.map_err(|err| format!("load task failed: {err}"))?;
        slots[index] = Some(finalize_scores(loaded?));
    }
    info!("loaded {count} analysis results");

    Ok(slots.into_iter().flatten().collect())
}

async fn emit_result(result: &AnalysisResult, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_result_text(result),
        OutputFormat::Markdown => render_report(result),
        OutputFormat::Json => render_json(result)?,
    };
    emit_output(output, contents).await
}

async fn emit_comparison(comparison: &ComparisonResult, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_comparison_text(comparison),
        OutputFormat::Markdown => render_comparison(comparison),
        OutputFormat::Json => render_json(comparison)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        info!("report written to {}", path.display());
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_result_text(result: &AnalysisResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "URL: {}", result.url);
    let _ = writeln!(output, "Analyzed: {}", result.timestamp);
    let _ = writeln!(
        output,
        "Overall: {}/100 ({})",
        result.overall_score,
        rating(result.overall_score)
    );
    let _ = writeln!(output, "Scores:");
    for category in Category::ALL {
        let _ = writeln!(
            output,
            "- {}: {}",
            category.label(),
            result.scores.get(category)
        );
    }

    if result.findings.is_empty() {
        let _ = writeln!(output, "Findings: none");
    } else {
        let _ = writeln!(output, "Findings:");
        for severity in Severity::ALL {
            for finding in result
                .findings
                .iter()
                .filter(|finding| finding.severity == severity)
            {
                let _ = writeln!(
                    output,
                    "- [{severity}] {} {}: {}",
                    finding.category, finding.id, finding.title
                );
            }
        }
    }

    if result.recommendations.is_empty() {
        let _ = writeln!(output, "Recommendations: none");
    } else {
        let _ = writeln!(output, "Recommendations:");
        for recommendation in &result.recommendations {
            let _ = writeln!(
                output,
                "- [{}] {} (effort: {})",
                recommendation.priority, recommendation.title, recommendation.effort
            );
        }
    }
    output
}

fn render_comparison_text(comparison: &ComparisonResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", comparison.summary);
    for site in &comparison.sites {
        let scores = &site.scores;
        let _ = writeln!(
            output,
            "#{} {}: accessibility {}, responsive {}, visual {}, ux {}, performance {}",
            site.rank,
            site.url,
            scores.accessibility,
            scores.responsive,
            scores.visual,
            scores.ux,
            scores.performance
        );
    }
    let _ = writeln!(output, "Winner: {}", comparison.winner.overall);
    output
}

#[cfg(test)]
mod tests {
    use super::{
        BatchSite, Cli, Commands, OutputArgs, OutputFormat, PolicyArgs, load_results, pair_sites,
        render_comparison_text, render_result_text, run_analyze, run_batch, run_compare,
        run_report, run_schema,
    };
    use clap::Parser;
    use std::path::{Path, PathBuf};
    use uxlens_core::{AnalysisResult, Category, Finding, Severity, compare_results};

    static UNIQUE_COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

    pub(crate) fn unique_dir_name() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let counter = UNIQUE_COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        PathBuf::from(format!("uxlens_cli_test_{nanos}_{counter}"))
    }

    fn write_result(dir: &Path, name: &str, url: &str, findings: Vec<Finding>) -> PathBuf {
        let mut result: AnalysisResult = serde_json::from_value(serde_json::json!({
            "url": url,
            "timestamp": "2024-05-01T10:30:00Z",
            "summary": "Stored result.",
            "scores": {
                "accessibility": 100,
                "responsive": 100,
                "visual": 100,
                "ux": 100,
                "performance": 100
            }
        }))
        .expect("result");
        result.findings = findings;
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(&result).expect("serialize")).expect("write");
        path
    }

    fn file_output(path: &Path, format: OutputFormat) -> OutputArgs {
        OutputArgs {
            format,
            report_output: Some(path.to_path_buf()),
        }
    }

    fn no_policy() -> PolicyArgs {
        PolicyArgs { policy: None }
    }

    #[test]
    fn compare_accepts_repeated_inputs() {
        let cli = Cli::try_parse_from([
            "uxlens", "compare", "--input", "a.json", "-i", "b.json", "-j", "2",
        ])
        .expect("parse");
        match cli.command {
            Commands::Compare {
                inputs,
                concurrency,
                report,
            } => {
                assert_eq!(inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
                assert_eq!(concurrency, 2);
                assert_eq!(report.format, OutputFormat::Markdown);
            }
            _ => panic!("expected compare command"),
        }
    }

    #[test]
    fn compare_requires_an_input() {
        assert!(Cli::try_parse_from(["uxlens", "compare"]).is_err());
    }

    #[tokio::test]
    async fn report_rescore_recomputes_scores() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let input = write_result(
            &root,
            "result.json",
            "https://www.example.com",
            vec![Finding::new(
                "contrast-1",
                Category::Accessibility,
                Severity::Critical,
                "Low contrast",
                "Body text fails AA",
            )],
        );

        let stored = root.join("out/stored.json");
        run_report(input.clone(), false, no_policy(), file_output(&stored, OutputFormat::Json))
            .await
            .expect("report");
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&stored).expect("read")).expect("parse");
        assert_eq!(json["scores"]["accessibility"], 100);
        assert_eq!(json["overallScore"], 100);

        let rescored = root.join("out/rescored.json");
        run_report(input.clone(), true, no_policy(), file_output(&rescored, OutputFormat::Json))
            .await
            .expect("rescore");
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&rescored).expect("read"))
                .expect("parse");
        assert_eq!(json["scores"]["accessibility"], 80);
        assert_eq!(json["overallScore"], 96);

        let markdown = root.join("out/report.md");
        run_report(input, false, no_policy(), file_output(&markdown, OutputFormat::Markdown))
            .await
            .expect("markdown");
        let contents = std::fs::read_to_string(&markdown).expect("read markdown");
        assert!(contents.starts_with("# UI/UX Analysis Report: example.com"));
        assert!(contents.contains("### Critical Issues"));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn analyze_merges_facts_and_assessment() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let facts = root.join("facts.json");
        std::fs::write(
            &facts,
            r##"{
                "url": "https://shop.example.org",
                "headings": [{"level": 1, "text": "Shop"}],
                "colorPairs": [{"foreground": "#777", "background": "#fff", "selector": ".muted"}],
                "css": "@media (min-width: 640px) {} @media (min-width: 768px) {} @media (min-width: 1024px) {} @media (min-width: 1280px) {}"
            }"##,
        )
        .expect("write facts");
        let assessment = root.join("assessment.json");
        std::fs::write(
            &assessment,
            r#"{
                "summary": "Checkout needs work.",
                "findings": [{
                    "id": "ux-1",
                    "category": "ux",
                    "severity": "high",
                    "title": "Checkout hides totals",
                    "description": "Order total appears only after payment."
                }]
            }"#,
        )
        .expect("write assessment");

        let out = root.join("analysis.json");
        run_analyze(
            facts,
            Some(assessment),
            "2024-05-01T10:30:00Z".to_string(),
            no_policy(),
            file_output(&out, OutputFormat::Json),
        )
        .await
        .expect("analyze");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("parse");
        assert_eq!(json["url"], "https://shop.example.org");
        assert_eq!(json["summary"], "Checkout needs work.");
        assert_eq!(json["scores"]["ux"], 92);
        let ids: Vec<&str> = json["findings"]
            .as_array()
            .expect("findings")
            .iter()
            .filter_map(|finding| finding["id"].as_str())
            .collect();
        assert_eq!(ids.last(), Some(&"ux-1"));
        assert!(ids.contains(&"contrast-1"));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn batch_pairs_assessments_by_position() {
        let cli = Cli::try_parse_from([
            "uxlens",
            "batch",
            "--facts",
            "a.json",
            "--assessment",
            "a-review.json",
            "--facts",
            "b.json",
            "-o",
            "out",
        ])
        .expect("parse");
        let Commands::Batch {
            facts,
            assessments,
            output,
            concurrency,
            ..
        } = cli.command
        else {
            panic!("expected batch command");
        };
        assert_eq!(output, PathBuf::from("out"));
        assert_eq!(concurrency, 4);

        let sites = pair_sites(facts, assessments).expect("pair");
        assert_eq!(
            sites,
            vec![
                BatchSite {
                    facts: PathBuf::from("a.json"),
                    assessment: Some(PathBuf::from("a-review.json")),
                },
                BatchSite {
                    facts: PathBuf::from("b.json"),
                    assessment: None,
                },
            ]
        );

        assert!(
            pair_sites(
                vec![PathBuf::from("a.json")],
                vec![PathBuf::from("x.json"), PathBuf::from("y.json")]
            )
            .is_err()
        );
        assert!(Cli::try_parse_from(["uxlens", "batch"]).is_err());
    }

    #[tokio::test]
    async fn batch_writes_site_reports_and_ordered_summary() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let facts: Vec<PathBuf> = ["zeta", "alpha", "mid"]
            .iter()
            .map(|name| {
                let path = root.join(format!("{name}.json"));
                std::fs::write(
                    &path,
                    format!(
                        r#"{{
                            "url": "https://www.{name}.example/home",
                            "headings": [{{"level": 1, "text": "Home"}}]
                        }}"#
                    ),
                )
                .expect("write facts");
                path
            })
            .collect();
        let assessment = root.join("zeta-review.json");
        std::fs::write(
            &assessment,
            r#"{
                "summary": "Zeta needs a lighter hero.",
                "findings": [{
                    "id": "perf-1",
                    "category": "performance",
                    "severity": "medium",
                    "title": "Heavy hero",
                    "description": "Hero image is 3 MB."
                }]
            }"#,
        )
        .expect("write assessment");

        let sites = vec![
            BatchSite {
                facts: facts[0].clone(),
                assessment: Some(assessment),
            },
            BatchSite {
                facts: facts[1].clone(),
                assessment: None,
            },
            BatchSite {
                facts: facts[2].clone(),
                assessment: None,
            },
        ];
        let out = root.join("reports");
        run_batch(sites, out.clone(), 2, "2024-05-01T10:30:00Z".to_string(), no_policy())
            .await
            .expect("batch");

        for name in ["zeta", "alpha", "mid"] {
            let report = std::fs::read_to_string(out.join(format!("batch-{name}.example.md")))
                .expect("site report");
            assert!(report.starts_with(&format!("# UI/UX Analysis Report: {name}.example\n")));
        }
        let zeta = std::fs::read_to_string(out.join("batch-zeta.example.md")).expect("zeta");
        assert!(zeta.contains("Zeta needs a lighter hero."));
        assert!(zeta.contains("Heavy hero"));

        let summary = std::fs::read_to_string(out.join("batch-summary.md")).expect("summary");
        assert!(summary.starts_with("# Batch Analysis Summary\n\n"));
        let rows: Vec<usize> = ["## zeta.example", "## alpha.example", "## mid.example"]
            .iter()
            .map(|row| summary.find(row).expect("summary row"))
            .collect();
        assert!(rows[0] < rows[1] && rows[1] < rows[2]);
        assert!(summary.contains("## zeta.example\n\n- Overall: "));
        assert_eq!(summary.matches("- Findings: ").count(), 3);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn load_results_keeps_caller_order() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let paths: Vec<PathBuf> = ["c", "a", "b", "d"]
            .iter()
            .map(|name| {
                write_result(
                    &root,
                    &format!("{name}.json"),
                    &format!("https://{name}.example"),
                    Vec::new(),
                )
            })
            .collect();

        for concurrency in [0, 1, 3] {
            let results = load_results(paths.clone(), concurrency).await.expect("load");
            let urls: Vec<&str> = results.iter().map(|result| result.url.as_str()).collect();
            assert_eq!(
                urls,
                vec![
                    "https://c.example",
                    "https://a.example",
                    "https://b.example",
                    "https://d.example"
                ]
            );
        }

        let mut with_missing = paths.clone();
        with_missing.push(root.join("missing.json"));
        assert!(load_results(with_missing, 2).await.is_err());

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn compare_renders_ranked_table() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let first = write_result(
            &root,
            "first.json",
            "https://www.first.example",
            vec![Finding::new(
                "nav-1",
                Category::Ux,
                Severity::High,
                "Deep menu",
                "Four levels deep",
            )],
        );
        let second = write_result(&root, "second.json", "https://second.example", Vec::new());

        let out = root.join("comparison.md");
        run_compare(
            vec![first, second],
            2,
            file_output(&out, OutputFormat::Markdown),
        )
        .await
        .expect("compare");
        let contents = std::fs::read_to_string(&out).expect("read");
        assert!(contents.contains("| first.example | 100 | 100 | 100 | 100 | 100 | 1 |"));
        assert!(contents.contains("| second.example | 100 | 100 | 100 | 100 | 100 | 2 |"));
        assert!(contents.contains("**Overall Winner**: first.example"));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn schema_writes_openapi_document() {
        let root = std::env::temp_dir().join(unique_dir_name());
        let out = root.join("schema/openapi.json");
        run_schema(Some(out.clone())).await.expect("schema");
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("parse");
        assert!(json["components"]["schemas"]["AnalysisResult"].is_object());

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn render_result_text_covers_branches() {
        let mut result: AnalysisResult = serde_json::from_value(serde_json::json!({
            "url": "https://example.com",
            "timestamp": "2024-05-01T10:30:00Z",
            "summary": "",
            "scores": {
                "accessibility": 90,
                "responsive": 100,
                "visual": 100,
                "ux": 100,
                "performance": 100
            },
            "overallScore": 98
        }))
        .expect("result");

        let text = render_result_text(&result);
        assert!(text.contains("Overall: 98/100 (Excellent)"));
        assert!(text.contains("Findings: none"));
        assert!(text.contains("Recommendations: none"));

        result.findings = vec![
            Finding::new("a-1", Category::Visual, Severity::Low, "Odd spacing", "d"),
            Finding::new("a-2", Category::Accessibility, Severity::Critical, "Contrast", "d"),
        ];
        let text = render_result_text(&result);
        let critical = text.find("- [critical] accessibility a-2: Contrast").expect("critical");
        let low = text.find("- [low] visual a-1: Odd spacing").expect("low");
        assert!(critical < low);
    }

    #[test]
    fn render_comparison_text_lists_sites() {
        let results: Vec<AnalysisResult> = ["https://a.example", "https://b.example"]
            .iter()
            .map(|url| {
                serde_json::from_value(serde_json::json!({
                    "url": url,
                    "timestamp": "",
                    "summary": "",
                    "scores": {
                        "accessibility": 100,
                        "responsive": 100,
                        "visual": 100,
                        "ux": 100,
                        "performance": 100
                    }
                }))
                .expect("result")
            })
            .collect();
        let comparison = compare_results(&results).expect("comparison");
        let text = render_comparison_text(&comparison);
        assert!(text.contains("#1 https://a.example"));
        assert!(text.contains("#2 https://b.example"));
        assert!(text.contains("Winner: https://a.example"));
    }
}
