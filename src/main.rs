use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pr_ticket_check::config::{DEFAULT_BYPASS_LABEL, DEFAULT_TICKET_BASE_URL};
use pr_ticket_check::services::set_output;
use pr_ticket_check::utils::resolve_repo;
use pr_ticket_check::{
    load_event, run_check, Annotations, Config, GitHubApi, Outcome, TicketMatcher, TicketPattern,
};

/// Check that a pull request references a ticket and link it in the description
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Token used to update the pull request
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: String,

    /// Do not require a ticket in the title
    #[arg(long, env = "INPUT_IGNORE-TITLE", default_value = "false", num_args = 0..=1,
          default_missing_value = "true", value_parser = parse_input_bool, action = ArgAction::Set)]
    ignore_title: bool,

    /// Accepted for compatibility; the body check always runs
    #[arg(long, env = "INPUT_IGNORE-BODY", default_value = "false", num_args = 0..=1,
          default_missing_value = "true", value_parser = parse_input_bool, action = ArgAction::Set)]
    ignore_body: bool,

    /// Which ticket reference format to look for
    #[arg(long, env = "INPUT_TICKET-PATTERN", value_enum, default_value_t = TicketPattern::ProjectKey)]
    ticket_pattern: TicketPattern,

    /// Label that skips the check entirely
    #[arg(long, env = "INPUT_BYPASS-LABEL", default_value = DEFAULT_BYPASS_LABEL)]
    bypass_label: String,

    /// Prefix the ticket id is appended to when linking
    #[arg(long, env = "INPUT_TICKET-BASE-URL", default_value = DEFAULT_TICKET_BASE_URL)]
    ticket_base_url: String,

    /// Webhook payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// Repository as owner/name, defaults to the one in the payload
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// GitHub API root, for GitHub Enterprise
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Step output file to record the outcome in. Rejected arguments are
    /// recorded as failed through GITHUB_OUTPUT as well
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_path: Option<PathBuf>,

    /// Compute the linked description without updating the pull request
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            ignore_title: self.ignore_title,
            ignore_body: self.ignore_body,
            pattern: self.ticket_pattern,
            bypass_label: self.bypass_label.clone(),
            ticket_base_url: self.ticket_base_url.clone(),
            dry_run: self.dry_run,
            ..Config::new(self.token.clone())
        }
    }
}

/// Boolean action input: true/True/TRUE or false/False/FALSE, empty means false.
fn parse_input_bool(value: &str) -> Result<bool, String> {
    match value.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" | "" => Ok(false),
        other => Err(format!(
            "expected one of true|True|TRUE|false|False|FALSE, got '{}'",
            other
        )),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> ExitCode {
    let mut annotations = Annotations::stdout();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return reject_arguments(err, &mut annotations),
    };
    init_tracing();

    let outcome = match run(&cli, &mut annotations) {
        Ok(outcome) => Some(outcome),
        Err(err) => {
            tracing::debug!("{err:?}");
            // Nothing left to report to if stdout is gone
            let _ = annotations.error(&format!("{err:#}"));
            None
        }
    };

    let label = outcome.as_ref().map(Outcome::to_str).unwrap_or("failed");
    if let Some(path) = &cli.output_path {
        if let Err(err) = set_output(path, "outcome", label) {
            let _ = annotations.error(&format!("{err:#}"));
            return ExitCode::FAILURE;
        }
    }
    let _ = io::stdout().flush();

    match outcome {
        Some(outcome) if !outcome.is_failure() => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

/// Bad inputs still fail the check visibly: annotation plus `outcome=failed`.
fn reject_arguments<W: Write>(err: clap::Error, annotations: &mut Annotations<W>) -> ExitCode {
    let _ = err.print();
    if !err.use_stderr() {
        // --help / --version
        return ExitCode::SUCCESS;
    }

    let rendered = err.to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ");
    let _ = annotations.error(message);
    if let Some(path) = std::env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) {
        let _ = set_output(&PathBuf::from(path), "outcome", "failed");
    }
    ExitCode::from(err.exit_code().clamp(1, 255) as u8)
}

fn run<W: Write>(cli: &Cli, annotations: &mut Annotations<W>) -> Result<Outcome> {
    if cli.token.trim().is_empty() {
        anyhow::bail!("Input required and not supplied: token");
    }
    let config = cli.config();
    if config.ignore_body {
        tracing::debug!("ignore-body is set but the body check is never skipped");
    }
    let matcher = TicketMatcher::from_config(&config)?;

    let event = load_event(&cli.event_path)?;
    let pr = event
        .pull_request
        .context("event payload has no pull_request")?;
    let repo = resolve_repo(cli.repository.as_deref(), event.repository.as_ref());
    tracing::debug!(number = pr.number, repo = ?repo, "loaded pull request");

    let api = GitHubApi::new(&config.token, cli.api_url.as_deref());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_check(
        &config,
        &matcher,
        &pr,
        repo.as_ref(),
        &api,
        annotations,
    ))
}
