//! Profile aggregation and statistics.
//!
//! This module combines a fetched user profile and repository list into
//! the dashboard summary: star totals, a ranked language histogram and
//! the repositories ordered by popularity.

use crate::models::{DashboardSummary, LanguageCount, Repository, UserProfile};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Number of languages kept in the ranked histogram.
pub const TOP_LANGUAGES_LIMIT: usize = 5;

/// Build the dashboard summary for a user and their repositories.
///
/// The input slice is left untouched; the summary owns a reordered copy.
pub fn aggregate(user: UserProfile, repositories: &[Repository]) -> DashboardSummary {
    let repositories = sort_by_stars(repositories);
    let total_stars = total_stars(&repositories);
    let top_languages = rank_languages(count_languages(&repositories), TOP_LANGUAGES_LIMIT);

    DashboardSummary {
        user,
        repositories,
        total_stars,
        top_languages,
    }
}

/// Return a copy of the repositories sorted by star count (most starred first).
///
/// Repositories with equal star counts keep their relative input order.
pub fn sort_by_stars(repositories: &[Repository]) -> Vec<Repository> {
    let mut sorted = repositories.to_vec();
    // slice::sort_by_key is stable
    sorted.sort_by_key(|r| Reverse(r.stargazers_count));
    sorted
}

/// Sum star counts across all repositories.
pub fn total_stars(repositories: &[Repository]) -> u64 {
    repositories
        .iter()
        .fold(0u64, |sum, r| sum.saturating_add(r.stargazers_count))
}

/// Count repositories per primary language, in first-encounter order.
///
/// Repositories without a language (null or empty) are skipped.
pub fn count_languages(repositories: &[Repository]) -> Vec<LanguageCount> {
    let mut counts: Vec<LanguageCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for language in repositories.iter().filter_map(Repository::primary_language) {
        match index.get(language) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(language, counts.len());
                counts.push(LanguageCount::new(language, 1));
            }
        }
    }

    counts
}

/// Rank language counts highest first and keep at most `limit` entries.
///
/// Ties keep the order of the input, so callers pass counts in
/// first-encounter order.
pub fn rank_languages(mut counts: Vec<LanguageCount>, limit: usize) -> Vec<LanguageCount> {
    counts.sort_by_key(|c| Reverse(c.count));
    counts.truncate(limit);
    counts
}
