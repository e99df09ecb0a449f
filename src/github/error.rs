//! Typed failures of the GitHub fetch layer.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Error returned while fetching dashboard data from GitHub.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The username was rejected before any request was made.
    #[error("'{0}' is not a valid GitHub username")]
    InvalidUsername(String),

    /// The user does not exist or is not visible.
    #[error("GitHub user '{0}' not found")]
    NotFound(String),

    /// Rate limit hit or access denied (403/429).
    #[error("GitHub API refused the request ({status}){}", reset_suffix(.reset))]
    RateLimited {
        status: StatusCode,
        reset: Option<DateTime<Utc>>,
    },

    /// Transport failure: DNS, connect, TLS, timeout.
    #[error("failed to reach GitHub: {0}")]
    Network(#[source] reqwest::Error),

    /// Response body was not the expected JSON shape.
    #[error("failed to decode GitHub response: {0}")]
    Decode(#[source] reqwest::Error),

    /// Any other non-success status.
    #[error("GitHub API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

/// Flat classification consumed by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    InvalidUsername,
    NotFound,
    RateLimited,
    Network,
    Unexpected,
}

impl FetchError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::InvalidUsername(_) => FetchErrorKind::InvalidUsername,
            FetchError::NotFound(_) => FetchErrorKind::NotFound,
            FetchError::RateLimited { .. } => FetchErrorKind::RateLimited,
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::Decode(_) | FetchError::Api { .. } => FetchErrorKind::Unexpected,
        }
    }

    /// Classify a transport-level reqwest error.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err)
        } else {
            FetchError::Network(err)
        }
    }

    /// Classify a non-success HTTP response.
    pub fn from_status(status: StatusCode, headers: &HeaderMap, body: &str, username: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => FetchError::NotFound(username.to_string()),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited {
                status,
                reset: rate_limit_reset(headers),
            },
            _ => FetchError::Api {
                status,
                message: api_message(body),
            },
        }
    }
}

/// Body of a GitHub error response.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

fn api_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().chars().take(200).collect(),
    }
}

/// Reads `x-ratelimit-reset` (epoch seconds) when the header is present.
fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let secs = headers
        .get("x-ratelimit-reset")?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()?;
    DateTime::from_timestamp(secs, 0)
}

fn reset_suffix(reset: &Option<DateTime<Utc>>) -> String {
    match reset {
        Some(at) => format!(", resets at {}", at.format("%H:%M:%S UTC")),
        None => String::new(),
    }
}
