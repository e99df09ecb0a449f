//! Dashboard report generation.
//!
//! Renders a dashboard summary as Markdown, JSON or plain terminal text,
//! and renders the fallback shown when fetching fails.

use crate::config::ReportConfig;
use crate::github::{FetchError, FetchErrorKind};
use crate::models::{DashboardSummary, LanguageCount, Repository, UserProfile};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Rendering options.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Number of repositories listed.
    pub top_repos: usize,
    pub show_languages: bool,
    pub show_repositories: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for ReportOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            top_repos: config.top_repos,
            show_languages: config.show_languages,
            show_repositories: config.show_repositories,
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(summary: &DashboardSummary, options: &ReportOptions) -> String {
    let mut output = String::new();

    output.push_str("# GitHub Dashboard\n\n");
    output.push_str(&format!("Statistics for @{}\n\n", summary.user.login));

    output.push_str(&generate_profile_section(&summary.user));
    output.push_str(&generate_stats_section(&summary.user, summary.total_stars));

    if options.show_languages {
        output.push_str(&generate_languages_section(&summary.top_languages));
    }

    if options.show_repositories {
        output.push_str(&generate_repositories_section(
            summary.top_repositories(options.top_repos),
        ));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the profile section.
fn generate_profile_section(user: &UserProfile) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", user.display_name()));

    if !user.avatar_url.is_empty() {
        section.push_str(&format!(
            "<img src=\"{}\" alt=\"{}'s avatar\" width=\"150\" height=\"150\">\n\n",
            escape_attr(&user.avatar_url),
            escape_attr(user.display_name())
        ));
    }

    if user.html_url.is_empty() {
        section.push_str(&format!("- **Login:** @{}\n", user.login));
    } else {
        section.push_str(&format!("- **Login:** [@{}]({})\n", user.login, user.html_url));
    }
    if let Some(bio) = non_empty(&user.bio) {
        section.push_str(&format!("- **Bio:** {}\n", bio));
    }
    if let Some(location) = non_empty(&user.location) {
        section.push_str(&format!("- **Location:** 📍 {}\n", location));
    }
    section.push_str(&format!(
        "- **Member Since:** {}\n\n",
        format_date(&user.created_at)
    ));

    section
}

/// Generate the headline statistics table.
fn generate_stats_section(user: &UserProfile, total_stars: u64) -> String {
    let mut section = String::new();

    section.push_str("## Stats\n\n");
    section.push_str("| Repositories | Followers | Following | Total Stars |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        user.public_repos, user.followers, user.following, total_stars
    ));

    section
}

/// Generate the top languages section.
fn generate_languages_section(languages: &[LanguageCount]) -> String {
    let mut section = String::new();

    section.push_str("## Top Languages\n\n");

    if languages.is_empty() {
        section.push_str("No language data available.\n\n");
        return section;
    }

    section.push_str("| Language | Repositories |\n");
    section.push_str("|:---|:---:|\n");
    for entry in languages {
        section.push_str(&format!("| {} | {} |\n", escape_cell(&entry.language), entry.count));
    }
    section.push('\n');

    section
}

/// Generate the repositories section.
fn generate_repositories_section(repositories: &[Repository]) -> String {
    let mut section = String::new();

    section.push_str("## Top Repositories\n\n");

    if repositories.is_empty() {
        section.push_str("No public repositories.\n\n");
        return section;
    }

    section.push_str("| # | Repository | Description | Language | ⭐ Stars | Forks | Updated |\n");
    section.push_str("|:---:|:---|:---|:---|:---:|:---:|:---|\n");

    for (i, repo) in repositories.iter().enumerate() {
        let name = if repo.html_url.is_empty() {
            escape_cell(&repo.name)
        } else {
            format!("[{}]({})", escape_cell(&repo.name), repo.html_url)
        };

        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            i + 1,
            name,
            non_empty(&repo.description).map(escape_cell).unwrap_or_default(),
            repo.primary_language().map(escape_cell).unwrap_or_else(|| "-".to_string()),
            repo.stargazers_count,
            repo.forks_count,
            format_date(&repo.updated_at)
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Data from the GitHub REST API. Generated by ghdash.*\n");

    footer
}

/// Generate a compact plain-text report for the terminal.
pub fn generate_text_report(summary: &DashboardSummary, options: &ReportOptions) -> String {
    let user = &summary.user;
    let mut lines = Vec::new();

    lines.push(format!("{} (@{})", user.display_name(), user.login));
    if let Some(bio) = non_empty(&user.bio) {
        lines.push(format!("  {}", bio));
    }
    if let Some(location) = non_empty(&user.location) {
        lines.push(format!("  📍 {}", location));
    }
    lines.push(format!("  Member since {}", format_date(&user.created_at)));
    lines.push(String::new());

    lines.push(format!(
        "Repositories: {} | Followers: {} | Following: {} | Total Stars: {}",
        user.public_repos, user.followers, user.following, summary.total_stars
    ));

    if options.show_languages {
        lines.push(String::new());
        lines.push("Top Languages:".to_string());
        if summary.top_languages.is_empty() {
            lines.push("  (none)".to_string());
        }
        for entry in &summary.top_languages {
            lines.push(format!("  {:<20} {}", entry.language, entry.count));
        }
    }

    if options.show_repositories {
        lines.push(String::new());
        lines.push("Top Repositories:".to_string());
        let top = summary.top_repositories(options.top_repos);
        if top.is_empty() {
            lines.push("  (none)".to_string());
        }
        for (i, repo) in top.iter().enumerate() {
            lines.push(format!(
                "  {}. {} ⭐ {} · {} forks · {}",
                i + 1,
                repo.name,
                repo.stargazers_count,
                repo.forks_count,
                repo.primary_language().unwrap_or("-")
            ));
            if let Some(description) = non_empty(&repo.description) {
                lines.push(format!("     {}", description));
            }
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Generate a JSON report.
pub fn generate_json_report(summary: &DashboardSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).map_err(Into::into)
}

/// Short headline for a fetch failure.
pub fn error_title(kind: FetchErrorKind) -> &'static str {
    match kind {
        FetchErrorKind::InvalidUsername => "Invalid username",
        FetchErrorKind::NotFound => "User not found",
        FetchErrorKind::RateLimited => "Rate limit exceeded",
        FetchErrorKind::Network => "Network error",
        FetchErrorKind::Unexpected => "Something went wrong",
    }
}

/// User-facing explanation for a fetch failure.
pub fn error_description(kind: FetchErrorKind) -> &'static str {
    match kind {
        FetchErrorKind::InvalidUsername => {
            "GitHub usernames contain only letters, digits and single hyphens, \
             cannot start or end with a hyphen, and are at most 39 characters."
        }
        FetchErrorKind::NotFound => {
            "The GitHub username you entered doesn't exist or is private."
        }
        FetchErrorKind::RateLimited => {
            "GitHub API rate limit exceeded. Please try again later."
        }
        FetchErrorKind::Network => {
            "Unable to connect to GitHub. Please check your connection."
        }
        FetchErrorKind::Unexpected => {
            "An unexpected error occurred while loading the dashboard."
        }
    }
}

/// Render the fallback shown instead of a dashboard.
pub fn render_error(error: &FetchError) -> String {
    let kind = error.kind();
    let mut output = String::new();

    output.push_str(&format!("⚠️  {}\n\n", error_title(kind)));
    output.push_str(error_description(kind));
    output.push('\n');

    if let FetchError::RateLimited {
        reset: Some(reset), ..
    } = error
    {
        output.push_str(&format!(
            "The limit resets at {}.\n",
            reset.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output
}

/// Format a timestamp as e.g. `Jan 25, 2011`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Escape text placed inside a double-quoted HTML attribute.
fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate;
    use crate::models::fixtures::{repo, user};
    use chrono::TimeZone;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;

    fn create_test_summary() -> DashboardSummary {
        let mut repos: Vec<Repository> = (1..=7)
            .map(|i| repo(i, i * 10, Some(if i % 2 == 0 { "Rust" } else { "Go" })))
            .collect();
        repos[6].description = Some("Pipes | and\nnewlines".to_string());
        aggregate(user("octocat"), &repos)
    }

    #[test]
    fn test_generate_markdown_report() {
        let summary = create_test_summary();
        let markdown = generate_markdown_report(&summary, &ReportOptions::default());

        assert!(markdown.contains("# GitHub Dashboard"));
        assert!(markdown.contains("Statistics for @octocat"));
        assert!(markdown.contains("## The Octocat"));
        assert!(markdown.contains("| 8 | 1000 | 9 | 280 |"));
        assert!(markdown.contains("📍 San Francisco"));
        assert!(markdown.contains("Jan 25, 2011"));
        assert!(markdown.contains("## Top Languages"));
        assert!(markdown.contains("## Top Repositories"));
    }

    #[test]
    fn test_markdown_limits_repositories() {
        let summary = create_test_summary();
        let options = ReportOptions {
            top_repos: 2,
            ..Default::default()
        };

        let markdown = generate_markdown_report(&summary, &options);

        assert!(markdown.contains("[repo-7]"));
        assert!(markdown.contains("[repo-6]"));
        assert!(!markdown.contains("[repo-5]"));
        assert!(markdown.contains("Pipes \\| and newlines"));
    }

    #[test]
    fn test_languages_section_keeps_rank_order() {
        let section = generate_languages_section(&[
            LanguageCount::new("Go", 4),
            LanguageCount::new("Rust", 3),
        ]);

        let go = section.find("| Go | 4 |").unwrap();
        let rust = section.find("| Rust | 3 |").unwrap();
        assert!(go < rust);
    }

    #[test]
    fn test_sections_can_be_disabled() {
        let summary = create_test_summary();
        let options = ReportOptions {
            top_repos: 5,
            show_languages: false,
            show_repositories: false,
        };

        let markdown = generate_markdown_report(&summary, &options);
        assert!(!markdown.contains("## Top Languages"));
        assert!(!markdown.contains("## Top Repositories"));

        let text = generate_text_report(&summary, &options);
        assert!(!text.contains("Top Languages:"));
    }

    #[test]
    fn test_empty_summary_sections() {
        let summary = aggregate(user("ghost"), &[]);

        let markdown = generate_markdown_report(&summary, &ReportOptions::default());
        assert!(markdown.contains("No language data available."));
        assert!(markdown.contains("No public repositories."));

        let text = generate_text_report(&summary, &ReportOptions::default());
        assert!(text.contains("Total Stars: 0"));
        assert!(text.contains("(none)"));
    }

    #[test]
    fn test_generate_text_report() {
        let summary = create_test_summary();
        let text = generate_text_report(&summary, &ReportOptions::default());

        assert!(text.starts_with("The Octocat (@octocat)"));
        assert!(text.contains("Total Stars: 280"));
        assert!(text.contains("1. repo-7 ⭐ 70"));
        assert!(!text.contains("6. "));
    }

    #[test]
    fn test_generate_json_report() {
        let summary = create_test_summary();
        let json = generate_json_report(&summary).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_stars"], 280);
        assert_eq!(value["user"]["login"], "octocat");
        assert_eq!(value["repositories"].as_array().map(Vec::len), Some(7));
        assert_eq!(value["top_languages"][0]["language"], "Go");
        assert_eq!(value["top_languages"][0]["count"], 4);
    }

    #[test]
    fn test_render_error_per_kind() {
        let not_found = FetchError::from_status(
            StatusCode::NOT_FOUND,
            &HeaderMap::new(),
            "",
            "nobody",
        );
        let rendered = render_error(&not_found);
        assert!(rendered.contains("User not found"));
        assert!(rendered.contains("doesn't exist or is private"));

        let invalid = FetchError::InvalidUsername("-bad".to_string());
        assert!(render_error(&invalid).contains("Invalid username"));

        let rate_limited = FetchError::RateLimited {
            status: StatusCode::FORBIDDEN,
            reset: Utc.timestamp_opt(1_700_000_000, 0).single(),
        };
        let rendered = render_error(&rate_limited);
        assert!(rendered.contains("Rate limit exceeded"));
        assert!(rendered.contains("2023-11-14 22:13:20 UTC"));

        let server = FetchError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: "Bad Gateway".to_string(),
        };
        assert!(render_error(&server).contains("Something went wrong"));
    }

    #[test]
    fn test_error_copy_is_distinct() {
        assert_eq!(error_title(FetchErrorKind::Network), "Network error");
        assert!(error_description(FetchErrorKind::Network).contains("check your connection"));
    }

    #[test]
    fn test_avatar_alt_text_is_escaped() {
        let mut profile = user("octocat");
        profile.name = Some(r#"Bob "The <Builder>" & Co"#.to_string());

        let section = generate_profile_section(&profile);

        assert!(section.contains(
            r#"alt="Bob &quot;The &lt;Builder&gt;&quot; &amp; Co's avatar""#
        ));
        assert!(section.contains("## Bob \"The <Builder>\" & Co"));
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a&b"), "a&amp;b");
        assert_eq!(escape_attr("&lt;"), "&amp;lt;");
        assert_eq!(escape_attr("plain"), "plain");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
        assert_eq!(format_date(&date), "Mar 2, 2024");
    }
}
