//! Command-line interface for `yamldiff-core`.
//!
//! Compares two multi-document YAML files by document identifier, prints a
//! report, and optionally comments on and labels a GitHub pull request.
//! Exit status: 0 when the inputs match, 1 when differences were found, 2 on
//! any error.

mod gh;

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use yamldiff_core::review::{
    self, LegacyLabels, ReviewConfig, ReviewRequest, DEFAULT_CHANGES_LABEL,
    DEFAULT_NO_CHANGES_LABEL,
};
use yamldiff_core::{
    read_documents, ComparisonResult, DiffEntry, Engine, IdentifierPath, RenderConfig, Summary,
    DEFAULT_IDENTIFIER_PATH,
};

use crate::gh::GhCli;

const EXIT_IDENTICAL: i32 = 0;
const EXIT_DIFFERENT: i32 = 1;
const EXIT_ERROR: i32 = 2;

const LOG_ENV: &str = "YAMLDIFF_LOG";
const GH_PROGRAM_ENV: &str = "YAMLDIFF_GH";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// Summary and field-level diffs as JSON.
    Json,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "yamldiff",
    version,
    about = "Compare multi-document YAML files by document identifier."
)]
struct Cli {
    /// Old YAML file.
    file1: PathBuf,

    /// New YAML file.
    file2: PathBuf,

    /// Dotted path of the field identifying each document.
    #[arg(long, default_value = DEFAULT_IDENTIFIER_PATH)]
    key: String,

    /// Only print the summary counts.
    #[arg(short = 'c', long = "show-counts")]
    show_counts: bool,

    /// Print added and deleted documents in full.
    #[arg(short, long)]
    verbose: bool,

    /// Disable ANSI colors.
    #[arg(long = "no-color")]
    no_color: bool,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Review configuration file (templates and labels).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Post the rendered template as a pull request comment (needs --config).
    #[arg(long = "post-comment")]
    post_comment: bool,

    /// CI build link exposed to the template as `.Link`.
    #[arg(long, default_value = "")]
    link: String,

    /// Template variable, exposed as `.Vars.KEY`. Repeatable.
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Label the pull request without a config file.
    #[arg(long = "github-label")]
    github_label: bool,

    /// Repository as OWNER/NAME.
    #[arg(long = "github-repo")]
    github_repo: Option<String>,

    /// Pull request number.
    #[arg(long = "github-pr")]
    github_pr: Option<u64>,

    /// Access token; defaults to $GITHUB_TOKEN.
    #[arg(long = "github-token")]
    github_token: Option<String>,

    /// Label applied by --github-label when differences exist.
    #[arg(long = "changes-label", default_value = DEFAULT_CHANGES_LABEL)]
    changes_label: String,

    /// Label applied by --github-label when nothing changed.
    #[arg(long = "no-changes-label", default_value = DEFAULT_NO_CHANGES_LABEL)]
    no_changes_label: String,

    /// Diagnostic log format on stderr. Filter with $YAMLDIFF_LOG.
    #[arg(long = "log-format", value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn main() {
    match try_main(env::args_os()) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let _ = writeln!(io::stderr(), "Error: {err:#}");
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn try_main<I>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = OsString>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            return Ok(EXIT_ERROR);
        }
        Err(err) => {
            let _ = err.print();
            return Ok(EXIT_IDENTICAL);
        }
    };
    init_tracing(cli.log_format);
    run(&cli)
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal());
    // A subscriber may already be installed when embedded in tests.
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn run(cli: &Cli) -> Result<i32> {
    let config = cli
        .config
        .as_ref()
        .map(|path| {
            ReviewConfig::load(path)
                .with_context(|| format!("error loading config {}", path.display()))
        })
        .transpose()?;

    let old = read_documents(&cli.file1)
        .with_context(|| format!("error reading {}", cli.file1.display()))?;
    let new = read_documents(&cli.file2)
        .with_context(|| format!("error reading {}", cli.file2.display()))?;
    let engine = Engine::new(IdentifierPath::new(&cli.key));
    let result = engine.compare(old, new);

    let color = !cli.no_color && io::stdout().is_terminal();
    let render_config = RenderConfig::new().with_color(color).with_verbose(cli.verbose);

    if !(cli.post_comment && config.is_some()) {
        let report = render_report(&result, cli, &render_config)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(report.as_bytes()).context("error writing report")?;
        stdout.flush().ok();
    }

    let token = cli
        .github_token
        .clone()
        .or_else(|| env::var("GITHUB_TOKEN").ok())
        .filter(|token| !token.is_empty());
    let request = ReviewRequest {
        repo: cli.github_repo.clone(),
        pull_request: cli.github_pr,
        token: token.clone(),
        post_comment: cli.post_comment,
        link: cli.link.clone(),
        vars: cli.vars.iter().cloned().collect::<BTreeMap<_, _>>(),
    };
    let host = gh_host(token.unwrap_or_default());

    if let Some(config) = &config {
        let details = result.render(&RenderConfig::new().with_verbose(cli.verbose));
        review::publish(&result, &details, config, &request, &host)
            .context("error publishing review")?;
    } else if cli.github_label {
        let labels = LegacyLabels {
            changes: cli.changes_label.clone(),
            no_changes: cli.no_changes_label.clone(),
        };
        review::apply_legacy_label(&result, &labels, &request, &host)
            .context("error applying GitHub label")?;
    }

    Ok(if result.has_differences() { EXIT_DIFFERENT } else { EXIT_IDENTICAL })
}

fn gh_host(token: String) -> GhCli {
    let host = GhCli::new(token);
    match env::var_os(GH_PROGRAM_ENV) {
        Some(program) if !program.is_empty() => host.with_program(program),
        _ => host,
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    modified: BTreeMap<&'a str, &'a [DiffEntry]>,
}

fn render_report(result: &ComparisonResult, cli: &Cli, config: &RenderConfig) -> Result<String> {
    match cli.format {
        OutputFormat::Json => {
            let report = JsonReport {
                summary: result.summary(),
                modified: result
                    .modified()
                    .iter()
                    .map(|(key, modification)| (key.as_str(), modification.diffs()))
                    .collect(),
            };
            let mut text =
                serde_json::to_string_pretty(&report).context("error serializing report")?;
            text.push('\n');
            Ok(text)
        }
        OutputFormat::Text if cli.show_counts => Ok(result.render_summary(config)),
        OutputFormat::Text => Ok(result.render(config)),
    }
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}
