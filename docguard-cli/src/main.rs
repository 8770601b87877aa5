//! DocGuard CLI - README conformance checks from the command line.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use docguard::{
    CheckOptions, ConformanceReport, DocGuardCore, Finding, RequirementBundle, Status,
};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "docguard")]
#[command(about = "Module README conformance checker: headers, tables and dead links", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a single README file
    Check {
        /// Path to the README (defaults to $README_PATH)
        #[arg(value_name = "FILE", env = "README_PATH")]
        file: PathBuf,

        #[command(flatten)]
        args: CheckArgs,
    },

    /// Check every README.md below a directory
    Project {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        args: CheckArgs,
    },

    /// List the requirements that would be checked
    Rules {
        /// Requirement bundle (TOML); built-in defaults otherwise
        #[arg(long, value_name = "TOML")]
        config: Option<PathBuf>,

        /// Show header match modes and exclusion reasons
        #[arg(short, long)]
        details: bool,
    },

    /// Print the default requirement bundle as TOML
    InitConfig,
}

#[derive(Args)]
struct CheckArgs {
    /// Requirement bundle (TOML); built-in defaults otherwise
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Skip link liveness checks (offline mode)
    #[arg(long)]
    no_links: bool,

    /// Report excluded and unparsable URLs as skipped findings
    #[arg(long)]
    show_skipped: bool,

    /// Cap concurrent link checks (default: one task per link)
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,
}

impl CheckArgs {
    fn options(&self) -> CheckOptions {
        CheckOptions {
            check_links: !self.no_links,
            report_skipped: self.show_skipped,
            max_concurrency: self.max_concurrency,
            timeout: self.timeout_secs.map(Duration::from_secs),
            ..CheckOptions::default()
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
    /// GitHub Actions format
    Github,
    /// GitLab CI format
    Gitlab,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check { file, args } => handle_check(&file, &args).await,
        Commands::Project { dir, args } => handle_project(&dir, &args).await,
        Commands::Rules { config, details } => handle_rules(config.as_deref(), details),
        Commands::InitConfig => handle_init_config(),
    };

    process::exit(exit_code);
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_bundle(config: Option<&Path>) -> anyhow::Result<RequirementBundle> {
    match config {
        Some(path) => RequirementBundle::load(path)
            .with_context(|| format!("Failed to load requirements from {}", path.display())),
        None => Ok(RequirementBundle::default()),
    }
}

async fn handle_check(file: &Path, args: &CheckArgs) -> i32 {
    let result = async {
        let bundle = load_bundle(args.config.as_deref())?;
        let report = DocGuardCore::check_file(file, &bundle, args.options()).await?;
        anyhow::Ok(report)
    }
    .await;

    match result {
        Ok(report) => {
            output_results(std::slice::from_ref(&report), &args.format);
            exit_code(std::slice::from_ref(&report))
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

async fn handle_project(dir: &Path, args: &CheckArgs) -> i32 {
    let result = async {
        let bundle = load_bundle(args.config.as_deref())?;
        let reports = DocGuardCore::check_project(dir, &bundle, args.options()).await?;
        anyhow::Ok(reports)
    }
    .await;

    match result {
        Ok(reports) => {
            output_results(&reports, &args.format);
            exit_code(&reports)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn exit_code(reports: &[ConformanceReport]) -> i32 {
    if reports.iter().all(ConformanceReport::is_conformant) {
        0
    } else {
        1
    }
}

fn output_results(results: &[ConformanceReport], format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(results),
        OutputFormat::Json => output_json(results),
        OutputFormat::Github => output_github(results),
        OutputFormat::Gitlab => output_gitlab(results),
    }
}

fn display_file(report: &ConformanceReport) -> String {
    report
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<document>".to_string())
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Pass => "PASS",
        Status::Fail => "FAIL",
        Status::Skipped => "SKIP",
    }
}

fn output_human(results: &[ConformanceReport]) {
    if results.is_empty() {
        println!("No README.md files found");
        return;
    }

    for result in results {
        println!("\nFile: {}", display_file(result));
        println!("{}", "─".repeat(60));

        for finding in &result.findings {
            println!(
                "  {}  {}: {}",
                status_label(finding.status),
                finding.subject,
                finding.detail
            );
        }

        println!("\n  Summary:");
        println!("    Passed:  {}", result.stats.passed);
        println!("    Failed:  {}", result.stats.failed);
        println!("    Skipped: {}", result.stats.skipped);
        if result.is_conformant() {
            println!("  Conformant");
        } else {
            println!("  Not conformant");
        }
    }
}

fn output_json(results: &[ConformanceReport]) {
    let output = serde_json::json!({
        "results": results,
        "summary": {
            "total_files": results.len(),
            "total_findings": results.iter().map(|r| r.total_findings()).sum::<usize>(),
            "failed": results.iter().map(|r| r.stats.failed).sum::<usize>(),
            "conformant": results.iter().all(|r| r.is_conformant()),
        }
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn github_level(finding: &Finding) -> Option<&'static str> {
    match finding.status {
        Status::Fail => Some("error"),
        Status::Skipped => Some("notice"),
        Status::Pass => None,
    }
}

fn output_github(results: &[ConformanceReport]) {
    for result in results {
        for finding in &result.findings {
            if let Some(level) = github_level(finding) {
                println!(
                    "::{} file={}::{}: {}",
                    level,
                    display_file(result),
                    finding.subject,
                    finding.detail.replace('\n', " ")
                );
            }
        }
    }
}

fn output_gitlab(results: &[ConformanceReport]) {
    let mut reports = Vec::new();
    for result in results {
        for finding in result.failures() {
            reports.push(serde_json::json!({
                "description": format!("{}: {}", finding.subject, finding.detail),
                "check_name": finding.rule_id,
                "severity": "major",
                "location": {
                    "path": display_file(result),
                }
            }));
        }
    }
    match serde_json::to_string_pretty(&reports) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn handle_rules(config: Option<&Path>, details: bool) -> i32 {
    let bundle = match load_bundle(config) {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return 1;
        }
    };

    println!("Requirements:\n");

    if bundle.require_non_empty {
        println!("  document_not_empty");
        println!("    Document must not be empty");
        println!();
    }

    for header in &bundle.headers {
        println!("  required_header");
        println!("    '{}' at least {} time(s)", header.text, header.min_count);
        if details {
            println!("    match mode: {:?}", header.mode);
        }
        println!();
    }

    for table in &bundle.tables {
        println!("  table_schema");
        println!(
            "    '{}' followed by a table with columns [{}]",
            table.header_line(),
            table.columns.join(", ")
        );
        println!();
    }

    println!("  link_liveness");
    println!("    Every absolute URL must answer 200 OK");
    for rule in &bundle.links.exclude {
        println!("    excluded: {}", rule.marker);
        if details {
            if let Some(ref reason) = rule.reason {
                println!("      {}", reason);
            }
        }
    }
    println!();
    0
}

fn handle_init_config() -> i32 {
    match RequirementBundle::default().to_toml() {
        Ok(text) => {
            print!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
