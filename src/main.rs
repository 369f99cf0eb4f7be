// src/main.rs
mod client;
mod config;
mod error;
mod normalize;
mod prompt;
mod types;
mod vcs;

use anyhow::Result;
use clap::Parser;
use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use indicatif::ProgressBar;
use tracing_subscriber::EnvFilter;

use client::ChatClient;
use config::{Config, ResolvedConfig};
use error::Error;
use normalize::{normalize, CUSTOM_MESSAGE_OPTION};
use vcs::{MAX_DIFF_TOKENS, VcsKind};

// =============================================================================
// CLI
// =============================================================================
#[derive(Parser)]
#[command(
    name = "aicommit",
    version,
    about = "Generate commit messages from your staged diff with an LLM, pick one, commit."
)]
struct Cli {
    /// API key (falls back to config file, then OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// Completion token budget
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Service endpoint base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Endpoint style: chat or legacy completion
    #[arg(long, value_parser = ["chat", "completion"])]
    endpoint: Option<String>,

    /// Character cap on the outgoing prompt
    #[arg(long)]
    max_question_length: Option<usize>,

    /// Override the diff command (used verbatim, skips VCS detection)
    #[arg(long)]
    diff_cmd: Option<String>,

    /// Override the commit command
    #[arg(long)]
    commit_cmd: Option<String>,
}

// =============================================================================
// PIPELINE
// =============================================================================
async fn run(cli: Cli) -> Result<()> {
    let file_config = Config::load();
    let config = ResolvedConfig::new(
        cli.api_key.as_ref(),
        cli.model.as_ref(),
        cli.max_tokens,
        cli.temperature,
        cli.base_url.as_ref(),
        cli.endpoint.as_ref(),
        cli.max_question_length,
        cli.diff_cmd.as_ref(),
        cli.commit_cmd.as_ref(),
        &file_config,
    );

    // Capturing. The client is constructed only after a non-empty diff
    // exists, so no-VCS and nothing-to-commit runs never touch the
    // network.
    let (diff, detected) = match prepare_diff(&config, vcs::detect)? {
        Some(captured) => captured,
        None => {
            println!("No changes to commit.");
            return Ok(());
        }
    };

    // Rendering
    let question = prompt::render(&config.prompt_template, &diff);

    let client = ChatClient::new(&config)?;

    // Requesting/Selecting: re-ask whenever no real candidate came back
    let chosen = loop {
        let candidates = request_candidates(&client, &question).await?;
        if !has_real_candidates(&candidates) {
            continue;
        }
        break select_message(&candidates)?;
    };

    // Committing
    let commit_cmd = resolve_commit_command(&config, detected, vcs::detect)?;
    match chosen {
        Some(message) => vcs::run_interactive(&vcs::build_commit_command(&commit_cmd, &message))?,
        // Sentinel: unmodified interactive commit, no message injected
        None => vcs::run_interactive(&commit_cmd)?,
    }

    Ok(())
}

/// Everything that happens before the service client exists: resolve
/// the diff command, capture, apply the token cap. `Ok(None)` means
/// nothing to commit.
fn prepare_diff(
    config: &ResolvedConfig,
    detect_fn: impl Fn() -> Option<VcsKind>,
) -> Result<Option<(String, Option<VcsKind>)>, Error> {
    let (diff_cmd, detected) = resolve_diff_command(config, detect_fn)?;
    let diff = vcs::capture_diff(&diff_cmd)?;
    if diff.trim().is_empty() {
        return Ok(None);
    }

    let diff = if vcs::diff_token_count(&diff) > MAX_DIFF_TOKENS {
        println!("{}", style(format!("Diff is too big. Truncating to {} tokens.", MAX_DIFF_TOKENS)).yellow());
        vcs::truncate_diff_tokens(&diff, MAX_DIFF_TOKENS)
    } else {
        diff
    };

    Ok(Some((diff, detected)))
}

fn resolve_diff_command(
    config: &ResolvedConfig,
    detect_fn: impl Fn() -> Option<VcsKind>,
) -> Result<(String, Option<VcsKind>), Error> {
    match &config.diff_cmd {
        Some(cmd) => Ok((cmd.clone(), None)),
        None => {
            let kind = detect_fn().ok_or(Error::NoVcsDetected)?;
            Ok((kind.diff_command().to_string(), Some(kind)))
        }
    }
}

fn resolve_commit_command(
    config: &ResolvedConfig,
    detected: Option<VcsKind>,
    detect_fn: impl Fn() -> Option<VcsKind>,
) -> Result<String, Error> {
    match &config.commit_cmd {
        Some(cmd) => Ok(cmd.clone()),
        None => {
            let kind = detected.or_else(detect_fn).ok_or(Error::NoVcsDetected)?;
            Ok(kind.commit_command().to_string())
        }
    }
}

async fn request_candidates(client: &ChatClient, question: &str) -> Result<Vec<String>, Error> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Asking the model for commit messages...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    let response = client.get_answer_retry(question).await;
    spinner.finish_and_clear();
    Ok(normalize(&response?))
}

/// The sentinel is always present; anything beyond it is a real candidate.
fn has_real_candidates(candidates: &[String]) -> bool {
    candidates.len() > 1
}

/// Present the candidates. `None` means the sentinel was picked;
/// cancellation (Esc, interrupt) aborts the run.
fn select_message(candidates: &[String]) -> Result<Option<String>, Error> {
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Pick a commit message")
        .items(candidates)
        .default(0)
        .interact_opt()
        .map_err(|_| Error::Aborted)?;

    match selection {
        None => Err(Error::Aborted),
        Some(i) if candidates[i] == CUSTOM_MESSAGE_OPTION => Ok(None),
        Some(i) => Ok(Some(candidates[i].clone())),
    }
}

// =============================================================================
// MAIN
// =============================================================================
fn init_tracing() {
    let default_level = if std::env::var_os("DEBUG").is_some() { "aicommit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<Error>() {
        Some(Error::NoVcsDetected) => println!("No supported version control system detected."),
        Some(Error::CommandFailed { command }) => println!("Failed to run {}", command),
        Some(Error::Aborted) => println!("Aborted."),
        _ => println!("Error: {}", err),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        report(&e);
        std::process::exit(1);
    }
}
