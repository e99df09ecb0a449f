//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ghdash.toml` files.

use crate::cli::{OutputFormat, RepoSort};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".ghdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// GitHub API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path. Reports go to stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Repositories requested from the first page.
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    /// Sort directive for the repository listing.
    #[serde(default)]
    pub sort: RepoSort,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            per_page: default_per_page(),
            sort: RepoSort::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    format!("ghdash/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    30
}

fn default_per_page() -> u8 {
    10
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of repositories listed.
    #[serde(default = "default_top_repos")]
    pub top_repos: usize,

    /// Include the top languages section.
    #[serde(default = "default_true")]
    pub show_languages: bool,

    /// Include the repositories section.
    #[serde(default = "default_true")]
    pub show_repositories: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_repos: default_top_repos(),
            show_languages: true,
            show_repositories: true,
        }
    }
}

fn default_top_repos() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.ghdash.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values given explicitly on the command line override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(per_page) = args.per_page {
            self.api.per_page = per_page;
        }
        if let Some(sort) = args.sort {
            self.api.sort = sort;
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }

        if let Some(top_repos) = args.top_repos {
            self.report.top_repos = top_repos;
        }
    }

    /// Log level after combining CLI flags with `[general] verbose`.
    ///
    /// `--quiet` wins over a verbose config file.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        let level = args.log_level();
        if level == tracing::Level::INFO && self.general.verbose {
            tracing::Level::DEBUG
        } else {
            level
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.github.com");
        assert_eq!(config.api.per_page, 10);
        assert_eq!(config.api.sort, RepoSort::Updated);
        assert_eq!(config.report.top_repos, 5);
        assert_eq!(config.general.format, OutputFormat::Text);
        assert!(config.api.user_agent.starts_with("ghdash/"));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "dashboard.md"
format = "markdown"

[api]
base_url = "https://ghe.example.com/api/v3"
per_page = 100
sort = "full-name"

[report]
top_repos = 10
show_languages = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, Some(PathBuf::from("dashboard.md")));
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert_eq!(config.api.base_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.api.per_page, 100);
        assert_eq!(config.api.sort, RepoSort::FullName);
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.report.top_repos, 10);
        assert!(!config.report.show_languages);
        assert!(config.report.show_repositories);
    }

    #[test]
    fn test_merge_with_args_overrides_explicit_values() {
        let mut config = Config::default();
        config.api.per_page = 42;
        config.report.top_repos = 8;

        let args = crate::cli::Args::try_parse_from([
            "ghdash",
            "octocat",
            "--format",
            "json",
            "--timeout",
            "5",
        ])
        .unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.api.timeout_seconds, 5);
        // not given on the command line
        assert_eq!(config.api.per_page, 42);
        assert_eq!(config.report.top_repos, 8);
    }

    #[test]
    fn test_verbose_config_raises_log_level() {
        let config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();

        let args = crate::cli::Args::try_parse_from(["ghdash", "octocat"]).unwrap();
        assert_eq!(config.log_level(&args), tracing::Level::DEBUG);

        let quiet = crate::cli::Args::try_parse_from(["ghdash", "octocat", "--quiet"]).unwrap();
        assert_eq!(config.log_level(&quiet), tracing::Level::ERROR);

        assert_eq!(Config::default().log_level(&args), tracing::Level::INFO);
    }

    #[test]
    fn test_verbose_flag_merges_into_config() {
        let mut config = Config::default();
        let args = crate::cli::Args::try_parse_from(["ghdash", "octocat", "-v"]).unwrap();

        config.merge_with_args(&args);

        assert!(config.general.verbose);
        assert_eq!(config.log_level(&args), tracing::Level::DEBUG);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[api]\nper_page = 25\n",
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.api.per_page, 25);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[api\nper_page = ").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[report]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.api.per_page, 10);
    }
}
