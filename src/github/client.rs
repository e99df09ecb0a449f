//! HTTP client for the GitHub REST API.
//!
//! Fetches the user profile and the first page of repositories for a
//! username. Both requests run concurrently and either failure
//! short-circuits the pair.

use crate::cli::RepoSort;
use crate::github::error::FetchError;
use crate::models::{Repository, UserProfile};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Largest page size the repository listing accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Longest username GitHub allows.
const MAX_USERNAME_LEN: usize = 39;

/// Configuration for the GitHub client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub per_page: u8,
    pub sort: RepoSort,
}

impl From<&crate::config::ApiConfig> for ClientConfig {
    fn from(config: &crate::config::ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            timeout_seconds: config.timeout_seconds,
            per_page: config.per_page.clamp(1, MAX_PER_PAGE),
            sort: config.sort,
        }
    }
}

/// Client for the two dashboard resources.
pub struct GitHubClient {
    config: ClientConfig,
    http: Client,
}

impl GitHubClient {
    /// Create a client with the GitHub v3 media type and configured user agent.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent value")?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        debug!("GitHub client targeting {}", config.base_url);

        Ok(Self { config, http })
    }

    /// URL of the user profile resource.
    pub fn user_url(&self, username: &str) -> String {
        format!("{}/users/{}", self.config.base_url, username)
    }

    /// URL of the first page of the user's repositories.
    pub fn repos_url(&self, username: &str) -> String {
        format!(
            "{}/users/{}/repos?sort={}&per_page={}",
            self.config.base_url,
            username,
            self.config.sort.as_query(),
            self.config.per_page
        )
    }

    /// Fetch a user profile.
    pub async fn fetch_user(&self, username: &str) -> Result<UserProfile, FetchError> {
        let username = validate_username(username)?;
        self.get_json(&self.user_url(username), username).await
    }

    /// Fetch the first page of a user's repositories.
    pub async fn fetch_repositories(&self, username: &str) -> Result<Vec<Repository>, FetchError> {
        let username = validate_username(username)?;
        self.get_json(&self.repos_url(username), username).await
    }

    /// Fetch the profile and repositories concurrently.
    ///
    /// Returns only when both succeed.
    pub async fn fetch_dashboard(
        &self,
        username: &str,
    ) -> Result<(UserProfile, Vec<Repository>), FetchError> {
        let username = validate_username(username)?;
        info!("Fetching profile and repositories for @{}", username);

        let (user, repos) = futures::try_join!(
            self.fetch_user(username),
            self.fetch_repositories(username)
        )?;

        info!("Fetched @{} with {} repositories", user.login, repos.len());
        Ok((user, repos))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, username: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            debug!("GET {} failed with {}", url, status);
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read error body from {}: {}", url, e);
                    String::new()
                }
            };
            return Err(FetchError::from_status(status, &headers, &body, username));
        }

        response.json::<T>().await.map_err(FetchError::from_transport)
    }
}

/// Check a username against GitHub's naming rules.
///
/// Alphanumerics and single hyphens, no leading or trailing hyphen, at
/// most 39 characters. Surrounding whitespace is ignored.
pub fn validate_username(username: &str) -> Result<&str, FetchError> {
    let trimmed = username.trim();

    let valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_USERNAME_LEN
        && trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !trimmed.starts_with('-')
        && !trimmed.ends_with('-')
        && !trimmed.contains("--");

    if valid {
        Ok(trimmed)
    } else {
        Err(FetchError::InvalidUsername(username.to_string()))
    }
}
