//! ghdash - GitHub profile dashboard for the terminal
//!
//! A CLI tool that fetches a GitHub user's public profile and
//! repositories and renders star totals, top languages and the most
//! starred repositories.
//!
//! Exit codes:
//!   0 - Dashboard rendered
//!   1 - Runtime error (config, network, unexpected API response)
//!   2 - User not found
//!   3 - Rate limited or access denied
//!   4 - Invalid username

mod analysis;
mod cli;
mod config;
mod github;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use github::{ClientConfig, FetchError, FetchErrorKind, GitHubClient};
use indicatif::{ProgressBar, ProgressStyle};
use report::ReportOptions;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config decides the log level, so it is loaded before logging starts
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(config.log_level(&args))?;

    info!("ghdash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration from {}", source);

    match run_dashboard(args, config).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Dashboard failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .ghdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {DEFAULT_CONFIG_FILE} already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {DEFAULT_CONFIG_FILE}"))?;

    println!("✅ Created {DEFAULT_CONFIG_FILE} with default settings.");
    println!("   Edit it to customize the API endpoint, page size and report sections.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr so a report printed to stdout stays clean.
fn init_logging(level: tracing::Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Fetch, aggregate and render one dashboard. Returns the exit code.
async fn run_dashboard(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    let client = GitHubClient::new(ClientConfig::from(&config.api))?;
    let username = args.username().trim();

    if args.dry_run {
        return handle_dry_run(&client, username);
    }

    let spinner = (!args.quiet).then(|| fetch_spinner(username));

    let fetched = client.fetch_dashboard(username).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let (user, repositories) = match fetched {
        Ok(data) => data,
        Err(e) => return Ok(handle_fetch_error(&e)),
    };

    let summary = analysis::aggregate(user, &repositories);
    debug!(
        "Aggregated {} repositories ({} with a language), {} stars, {} top languages",
        summary.repositories.len(),
        summary.languages_tracked(),
        summary.total_stars,
        summary.top_languages.len()
    );

    let options = ReportOptions::from(&config.report);
    let output = match config.general.format {
        OutputFormat::Text => report::generate_text_report(&summary, &options),
        OutputFormat::Markdown => report::generate_markdown_report(&summary, &options),
        OutputFormat::Json => report::generate_json_report(&summary)?,
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !args.quiet {
                eprintln!("✅ Dashboard for @{} saved to: {}", summary.user.login, path.display());
            }
        }
        None => print!("{}", output),
    }

    info!(
        "Rendered dashboard for @{} in {:.2}s",
        summary.user.login,
        start_time.elapsed().as_secs_f64()
    );

    Ok(0)
}

/// Handle --dry-run: print the requests that would be made, exit.
fn handle_dry_run(client: &GitHubClient, username: &str) -> Result<i32> {
    let username = match github::validate_username(username) {
        Ok(name) => name,
        Err(e) => return Ok(handle_fetch_error(&e)),
    };

    println!("🔍 Dry run: no requests will be sent.\n");
    println!("   GET {}", client.user_url(username));
    println!("   GET {}", client.repos_url(username));
    Ok(0)
}

/// Log a fetch failure, print the fallback and pick the exit code.
fn handle_fetch_error(err: &FetchError) -> i32 {
    match err.kind() {
        FetchErrorKind::Network | FetchErrorKind::Unexpected => error!("Fetch failed: {}", err),
        _ => warn!("Fetch failed: {}", err),
    }

    eprintln!("\n{}", report::render_error(err));
    exit_code(err.kind())
}

/// Process exit code for a fetch failure.
fn exit_code(kind: FetchErrorKind) -> i32 {
    match kind {
        FetchErrorKind::Network | FetchErrorKind::Unexpected => 1,
        FetchErrorKind::NotFound => 2,
        FetchErrorKind::RateLimited => 3,
        FetchErrorKind::InvalidUsername => 4,
    }
}

fn fetch_spinner(username: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching @{username} from GitHub..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so it reports where the configuration
/// came from instead of logging it. An unreadable default file falls back
/// to defaults with a warning on stderr.
fn load_config(args: &Args) -> Result<(Config, String)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, config_path.display().to_string()));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, DEFAULT_CONFIG_FILE.to_string())),
        Ok(None) => Ok((Config::default(), "built-in defaults".to_string())),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}", e);
            Ok((Config::default(), "built-in defaults".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let kinds = [
            FetchErrorKind::NotFound,
            FetchErrorKind::RateLimited,
            FetchErrorKind::InvalidUsername,
        ];
        let codes: Vec<i32> = kinds.iter().map(|k| exit_code(*k)).collect();

        assert_eq!(codes, vec![2, 3, 4]);
        assert_eq!(exit_code(FetchErrorKind::Network), 1);
        assert_eq!(exit_code(FetchErrorKind::Unexpected), 1);
    }
}
