use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing::debug;

use devpulse_core::{DevpulseConfig, OutputFormat, RepoMetrics, RepositoryReference, TimeSeries};

#[derive(Parser)]
#[command(
    name = "devpulse",
    version,
    about = "Weekly commit and issue activity for GitHub repositories",
    long_about = "devpulse turns a repository's recent commits and issues into weekly series\n\
                   ready for charting: commit frequency and issue open/close flow.\n\n\
                   Examples:\n  \
                     devpulse metrics vercel/next.js                Weekly activity for a repository\n  \
                     devpulse metrics https://github.com/tokio-rs/tokio --format json\n  \
                     devpulse normalize github.com/serde-rs/serde.git  Print the canonical owner/name\n  \
                     devpulse doctor                                Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .devpulse.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Show weekly commit frequency and issue flow for a repository
    #[command(long_about = "Show weekly commit frequency and issue flow for a repository.\n\n\
        Fetches the repository summary plus the most recent page of commits and issues,\n\
        then buckets them into UTC weeks. Only weeks with activity are listed, and only\n\
        the most recent ones are kept (see [series] in .devpulse.toml).\n\n\
        Examples:\n  devpulse metrics vercel/next.js\n  devpulse metrics https://github.com/rust-lang/rust --format markdown")]
    Metrics {
        /// Repository as owner/name or a full GitHub URL (default: default_repo from config)
        repo: Option<String>,

        /// GitHub token (default: GITHUB_TOKEN or GH_TOKEN env var)
        #[arg(long)]
        github_token: Option<String>,

        /// Number of most recent weeks to keep (1-12)
        #[arg(long)]
        weeks: Option<usize>,
    },
    /// Print the canonical owner/name for a repository reference
    #[command(long_about = "Print the canonical owner/name for a repository reference.\n\n\
        Accepts owner/name or a full repository URL, with or without scheme, .git suffix,\n\
        query string or fragment. No network access.\n\n\
        Examples:\n  devpulse normalize https://github.com/vercel/next.js.git\n  devpulse normalize 'github.com/vercel/next.js?tab=readme'")]
    Normalize {
        /// Repository reference to normalize
        repo: String,
    },
    /// Create a default .devpulse.toml configuration file
    #[command(long_about = "Create a default .devpulse.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .devpulse.toml already exists.")]
    Init,
    /// Check your devpulse setup and environment
    #[command(long_about = "Check your devpulse setup and environment.\n\n\
        Runs diagnostics for the config file, GitHub token, API base URL and series\n\
        options. Use --format json for machine-readable output.")]
    Doctor,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1m\x1b[36m~\x1b[0m \x1b[1mdevpulse\x1b[0m v{version}: weekly repository activity, ready to chart\n");

        println!("Quick start:");
        println!("  \x1b[36mdevpulse init\x1b[0m                    Create a .devpulse.toml config file");
        println!("  \x1b[36mdevpulse metrics owner/name\x1b[0m      Weekly commits and issue flow\n");

        println!("All commands:");
        println!("  \x1b[32mmetrics\x1b[0m    Commit frequency and issue flow per week");
        println!("  \x1b[32mnormalize\x1b[0m  Canonical owner/name for a repository reference");
        println!("  \x1b[32mdoctor\x1b[0m     Check your setup and environment");
        println!("  \x1b[32minit\x1b[0m       Create default configuration\n");
    } else {
        println!("devpulse v{version}: weekly repository activity, ready to chart\n");

        println!("Quick start:");
        println!("  devpulse init                    Create a .devpulse.toml config file");
        println!("  devpulse metrics owner/name      Weekly commits and issue flow\n");

        println!("All commands:");
        println!("  metrics    Commit frequency and issue flow per week");
        println!("  normalize  Canonical owner/name for a repository reference");
        println!("  doctor     Check your setup and environment");
        println!("  init       Create default configuration\n");
    }

    println!("Run 'devpulse <command> --help' for details.");
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "devpulse=debug,devpulse_github=debug,devpulse_pulse=debug"
    } else {
        "devpulse=warn,devpulse_github=warn,devpulse_pulse=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Token precedence: `--github-token` > config > `GITHUB_TOKEN` > `GH_TOKEN`.
fn resolve_token(flag: Option<String>, config: &DevpulseConfig) -> Option<String> {
    flag.or_else(|| config.github.token.clone())
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .or_else(|| std::env::var("GH_TOKEN").ok())
        .filter(|t| !t.trim().is_empty())
}

fn parse_reference(raw: &str) -> Result<RepositoryReference> {
    Ok(RepositoryReference::parse(raw)?)
}

fn print_metrics(metrics: &RepoMetrics, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(metrics).into_diagnostic()?);
        }
        OutputFormat::Markdown => {
            println!("# {}\n", metrics.full_name);
            println!("| Stars | Forks | Open issues | Watchers |");
            println!("|-------|-------|-------------|----------|");
            println!(
                "| {} | {} | {} | {} |\n",
                metrics.stars, metrics.forks, metrics.open_issues, metrics.watchers
            );

            println!("## Commit Frequency\n");
            if metrics.commit_frequency.is_empty() {
                println!("No commits in the fetched page.\n");
            } else {
                println!("| Week | Commits |");
                println!("|------|---------|");
                for point in &metrics.commit_frequency {
                    println!("| {} | {} |", point.label, point.commits.unwrap_or(0));
                }
                println!();
            }

            println!("## Issue Flow\n");
            if metrics.issue_flow.is_empty() {
                println!("No issues in the fetched page.\n");
            } else {
                println!("| Week | Opened | Closed |");
                println!("|------|--------|--------|");
                for point in &metrics.issue_flow {
                    println!(
                        "| {} | {} | {} |",
                        point.label,
                        point.opened.unwrap_or(0),
                        point.closed.unwrap_or(0)
                    );
                }
                println!();
            }
        }
        OutputFormat::Text => {
            println!("{}", metrics.full_name);
            println!(
                "  stars {}  forks {}  open issues {}  watchers {}\n",
                metrics.stars, metrics.forks, metrics.open_issues, metrics.watchers
            );

            println!("Commit frequency (week of):");
            print_bars(&metrics.commit_frequency, |p| vec![p.commits.unwrap_or(0)]);

            println!("\nIssue flow (week of: opened / closed):");
            print_bars(&metrics.issue_flow, |p| {
                vec![p.opened.unwrap_or(0), p.closed.unwrap_or(0)]
            });
        }
    }
    Ok(())
}

fn print_bars(series: &TimeSeries, values: impl Fn(&devpulse_core::WeeklyPoint) -> Vec<u64>) {
    if series.is_empty() {
        println!("  (no activity)");
        return;
    }
    let max = series.iter().flat_map(&values).max().unwrap_or(0);
    for point in series {
        println!("{}", bar_line(&point.label, &values(point), max));
    }
}

/// One chart row, scaled by the week's largest counter against `max`.
fn bar_line(label: &str, counts: &[u64], max: u64) -> String {
    let peak = counts.iter().copied().max().unwrap_or(0);
    let bar_len = (peak * 40).div_ceil(max.max(1)) as usize;
    let numbers: Vec<String> = counts.iter().map(u64::to_string).collect();
    format!(
        "  {:>5}  {:<40}  {}",
        label,
        "#".repeat(bar_len),
        numbers.join(" / ")
    )
}

#[derive(serde::Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }

    fn colored_symbol(&self) -> String {
        match self.status {
            "pass" => "\x1b[32m\u{2713}\x1b[0m".into(),
            "fail" => "\x1b[31m\u{2717}\x1b[0m".into(),
            _ => "\x1b[33m~\x1b[0m".into(),
        }
    }
}

fn run_doctor(config: &DevpulseConfig, format: OutputFormat, use_color: bool) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();

    // 1. Config file
    if std::path::Path::new(".devpulse.toml").exists() {
        checks.push(CheckResult::pass("config_file", ".devpulse.toml found"));
    } else {
        checks.push(CheckResult::fail(
            "config_file",
            ".devpulse.toml not found",
            "run 'devpulse init' to create a default config",
        ));
    }

    // 2. GitHub token
    if resolve_token(None, config).is_some() {
        checks.push(CheckResult::pass("github_token", "token configured"));
    } else {
        checks.push(CheckResult::fail(
            "github_token",
            "GITHUB_TOKEN not set",
            "export GITHUB_TOKEN=... (unauthenticated requests are heavily rate limited)",
        ));
    }

    // 3. API base
    match devpulse_github::GitHubClient::new(&config.github) {
        Ok(client) => checks.push(CheckResult::pass(
            "api_base",
            format!("{} (per_page {})", config.github.api_base, client.per_page()),
        )),
        Err(e) => checks.push(CheckResult::fail(
            "api_base",
            e.to_string(),
            "set [github] api_base to an http(s) URL in .devpulse.toml",
        )),
    }

    // 4. Default repository
    match RepositoryReference::parse(&config.default_repo) {
        Ok(repo) => checks.push(CheckResult::pass("default_repo", repo.to_string())),
        Err(e) => checks.push(CheckResult::fail(
            "default_repo",
            e.to_string(),
            "set default_repo to owner/name in .devpulse.toml",
        )),
    }

    // 5. Series shape
    checks.push(CheckResult::info(
        "series",
        format!(
            "last {} weeks, weeks start on {} (UTC)",
            config.series.max_weeks, config.series.week_start
        ),
    ));

    match format {
        OutputFormat::Json => {
            let version = env!("CARGO_PKG_VERSION");
            let json = serde_json::json!({
                "version": version,
                "checks": checks,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        _ => {
            let version = env!("CARGO_PKG_VERSION");
            println!("devpulse v{version}: environment check\n");

            for check in &checks {
                let sym = if use_color {
                    check.colored_symbol()
                } else {
                    check.symbol().to_string()
                };
                let label = check.name.replace('_', " ");
                println!("  {sym} {label:<20} {}", check.detail);
                if let Some(hint) = &check.hint {
                    println!("    hint: {hint}");
                }
            }

            let passed = checks.iter().filter(|c| c.status == "pass").count();
            let failed = checks.iter().filter(|c| c.status == "fail").count();
            let info = checks.iter().filter(|c| c.status == "info").count();
            println!("\n{passed} checks passed, {failed} failed, {info} info");
        }
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# devpulse configuration

# Repository used by `devpulse metrics` when none is given
# default_repo = "vercel/next.js"

[github]
# api_base = "https://api.github.com"
# token = "ghp_..."            # or export GITHUB_TOKEN
# per_page = 100               # single page, max 100
# user_agent = "devpulse"
# timeout_secs = 30

[series]
# max_weeks = 12             # 1 to 12
# week_start = "sunday"
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => DevpulseConfig::from_file(path)?,
        None => {
            let default_path = std::path::Path::new(".devpulse.toml");
            if default_path.exists() {
                DevpulseConfig::from_file(default_path)?
            } else {
                DevpulseConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    debug!(format = %cli.format, api_base = %config.github.api_base, "starting");

    match cli.command {
        None => {
            print_welcome(use_color);
            return Ok(());
        }
        Some(Command::Metrics {
            ref repo,
            ref github_token,
            weeks,
        }) => {
            // Validate before any network call.
            let raw = repo.as_deref().unwrap_or(&config.default_repo);
            let reference = parse_reference(raw)?;

            let mut github = config.github.clone();
            github.token = resolve_token(github_token.clone(), &config);
            if github.token.is_none() {
                debug!("no GitHub token; requests are unauthenticated");
            }
            let client = devpulse_github::GitHubClient::new(&github)?;

            let mut options = devpulse_pulse::BucketOptions::from(&config.series);
            if let Some(weeks) = weeks {
                options = options.with_max_weeks(weeks);
            }

            let is_tty = std::io::stderr().is_terminal();
            let spinner = if is_tty {
                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                        .into_diagnostic()?,
                );
                pb.set_message(format!("Fetching activity for {reference}..."));
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                Some(pb)
            } else {
                None
            };

            let metrics = devpulse_github::collect_metrics(&client, &reference, &options)
                .await
                .inspect_err(|_e| {
                    if let Some(pb) = &spinner {
                        pb.finish_and_clear();
                    }
                })?;

            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }

            print_metrics(&metrics, cli.format)?;
        }
        Some(Command::Normalize { ref repo }) => {
            let reference = parse_reference(repo)?;
            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&reference).into_diagnostic()?
                    );
                }
                OutputFormat::Markdown => println!("`{reference}`"),
                OutputFormat::Text => println!("{reference}"),
            }
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".devpulse.toml");
            if path.exists() {
                miette::bail!(
                    help = "edit the existing file or remove it first",
                    ".devpulse.toml already exists"
                );
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .devpulse.toml with default configuration");
        }
        Some(Command::Doctor) => {
            run_doctor(&config, cli.format, use_color)?;
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "devpulse", &mut std::io::stdout());
        }
    }

    Ok(())
}
