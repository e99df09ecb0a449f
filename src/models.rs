//! Data models for the dashboard.
//!
//! This module contains the records fetched from the GitHub REST API and
//! the summary derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A GitHub user profile from the `/users/{username}` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Login handle (e.g. `octocat`).
    pub login: String,
    /// Numeric account id.
    pub id: u64,
    /// Display name, if the user set one.
    #[serde(default)]
    pub name: Option<String>,
    /// Profile bio.
    #[serde(default)]
    pub bio: Option<String>,
    /// Free-form location string.
    #[serde(default)]
    pub location: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: String,
    /// Profile page URL.
    #[serde(default)]
    pub html_url: String,
    /// Number of public repositories.
    #[serde(default)]
    pub public_repos: u64,
    /// Number of followers.
    #[serde(default)]
    pub followers: u64,
    /// Number of accounts this user follows.
    #[serde(default)]
    pub following: u64,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
    /// Last profile update time.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Returns the display name, falling back to the login handle.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.login,
        }
    }
}

/// A repository from the `/users/{username}/repos` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Primary language as detected by GitHub.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    /// Whether this repository is a fork.
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub topics: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Repository {
    /// Returns the primary language when it is set and non-empty.
    pub fn primary_language(&self) -> Option<&str> {
        self.language.as_deref().filter(|lang| !lang.is_empty())
    }
}

/// One entry of the ranked language histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    /// Language name exactly as reported by GitHub.
    pub language: String,
    /// Number of repositories using it as their primary language.
    pub count: u64,
}

impl LanguageCount {
    pub fn new(language: impl Into<String>, count: u64) -> Self {
        Self {
            language: language.into(),
            count,
        }
    }
}

impl fmt::Display for LanguageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.language, self.count)
    }
}

/// Summary statistics for one dashboard view.
///
/// Built by [`crate::analysis::aggregate`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The profile as fetched.
    pub user: UserProfile,
    /// All fetched repositories, most starred first.
    pub repositories: Vec<Repository>,
    /// Sum of star counts across every repository.
    pub total_stars: u64,
    /// Most used languages, highest count first, at most five entries.
    pub top_languages: Vec<LanguageCount>,
}

impl DashboardSummary {
    /// Returns the `n` most starred repositories.
    pub fn top_repositories(&self, n: usize) -> &[Repository] {
        &self.repositories[..n.min(self.repositories.len())]
    }

    /// Number of repositories that report a primary language.
    pub fn languages_tracked(&self) -> usize {
        self.repositories
            .iter()
            .filter(|r| r.primary_language().is_some())
            .count()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn user(login: &str) -> UserProfile {
        UserProfile {
            login: login.to_string(),
            id: 583231,
            name: Some("The Octocat".to_string()),
            bio: None,
            location: Some("San Francisco".to_string()),
            avatar_url: "https://avatars.githubusercontent.com/u/583231?v=4".to_string(),
            html_url: format!("https://github.com/{login}"),
            public_repos: 8,
            followers: 1000,
            following: 9,
            created_at: Utc.with_ymd_and_hms(2011, 1, 25, 18, 44, 36).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 22, 11, 20, 0).unwrap(),
        }
    }

    pub fn repo(id: u64, stars: u64, language: Option<&str>) -> Repository {
        Repository {
            id,
            name: format!("repo-{id}"),
            full_name: format!("octocat/repo-{id}"),
            html_url: format!("https://github.com/octocat/repo-{id}"),
            description: None,
            language: language.map(String::from),
            stargazers_count: stars,
            forks_count: 0,
            fork: false,
            topics: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        }
    }
}
