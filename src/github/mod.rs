//! GitHub REST API access.
//!
//! This module provides the HTTP client that fetches dashboard data and
//! the typed errors it reports.

pub mod client;
pub mod error;

pub use client::{validate_username, ClientConfig, GitHubClient};
pub use error::{FetchError, FetchErrorKind};
