//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ghdash - GitHub profile dashboard for the terminal
///
/// Fetches a GitHub user's public profile and repositories and renders
/// total stars, top languages and most starred repositories.
///
/// Examples:
///   ghdash octocat
///   ghdash octocat --format markdown --output octocat.md
///   ghdash octocat --format json --per-page 100
///   ghdash octocat --dry-run
///   ghdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// GitHub username to show
    #[arg(value_name = "USERNAME", required_unless_present = "init_config")]
    pub username: Option<String>,

    /// Output file path for the report
    ///
    /// If not specified, the report is printed to stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ghdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GitHub API base URL
    ///
    /// Point this at a GitHub Enterprise instance, e.g. https://ghe.example.com/api/v3
    #[arg(long, value_name = "URL", env = "GHDASH_API_URL")]
    pub api_url: Option<String>,

    /// Number of repositories to request (first page only, 1-100)
    #[arg(long, value_name = "COUNT")]
    pub per_page: Option<u8>,

    /// Order in which GitHub returns repositories before ranking by stars
    #[arg(long, value_name = "SORT")]
    pub sort: Option<RepoSort>,

    /// Number of repositories shown in the report
    #[arg(long, value_name = "COUNT")]
    pub top_repos: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: print the requests that would be made and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .ghdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain terminal text (default)
    #[default]
    Text,
    /// Markdown document
    Markdown,
    /// JSON document
    Json,
}

/// Sort directive passed to the repository listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum RepoSort {
    Created,
    /// Most recently updated first (default)
    #[default]
    Updated,
    Pushed,
    FullName,
}

impl RepoSort {
    /// Value of the `sort` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            RepoSort::Created => "created",
            RepoSort::Updated => "updated",
            RepoSort::Pushed => "pushed",
            RepoSort::FullName => "full_name",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the username, empty if not set (should be validated first).
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.username().trim().is_empty() {
            return Err("A GitHub username is required".to_string());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(per_page) = self.per_page {
            if !(1..=100).contains(&per_page) {
                return Err("Per-page must be between 1 and 100".to_string());
            }
        }

        if self.top_repos == Some(0) {
            return Err("Top repos must be at least 1".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
