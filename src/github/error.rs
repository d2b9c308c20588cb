//! GitHub API error types.
//!
//! Errors are categorised as transient (5xx, rate limits, network trouble) or
//! permanent (everything else). The bot never retries inside a pass; the
//! category is part of the error message, so the abort log and `/status`
//! tell an outage apart from a misconfiguration (bad token, missing label
//! permissions).

use std::fmt;
use thiserror::Error;

/// The kind of GitHub API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubErrorKind {
    /// Likely to succeed on a later poll.
    ///
    /// Examples:
    /// - HTTP 5xx (server errors)
    /// - HTTP 429 (rate limited)
    /// - HTTP 403 with a rate limit message
    /// - Network timeouts
    Transient,

    /// Needs a human to fix.
    ///
    /// Examples:
    /// - HTTP 401/403 (bad or under-scoped token)
    /// - HTTP 404 (repo or PR not found)
    /// - Malformed responses
    Permanent,
}

impl fmt::Display for GitHubErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitHubErrorKind::Transient => f.write_str("transient"),
            GitHubErrorKind::Permanent => f.write_str("permanent"),
        }
    }
}

/// A GitHub API error with its category.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    pub kind: GitHubErrorKind,

    /// The HTTP status code, if available.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(
                f,
                "GitHub API error (HTTP {}, {}): {}",
                code, self.kind, self.message
            ),
            None => write!(f, "GitHub API error ({}): {}", self.kind, self.message),
        }
    }
}

impl GitHubApiError {
    /// Creates a permanent error without an octocrab source.
    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: GitHubErrorKind::Permanent,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Categorizes an octocrab error.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let status_code = status_code_of(&err);
        let message = match &err {
            octocrab::Error::GitHub { source, .. } => source.message.clone(),
            other => other.to_string(),
        };
        let kind = classify(status_code, &message);

        Self {
            kind,
            status_code,
            message,
            source: Some(err),
        }
    }
}

/// Extracts the HTTP status code from an API error response.
fn status_code_of(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

fn classify(status_code: Option<u16>, message: &str) -> GitHubErrorKind {
    match status_code {
        Some(429) => GitHubErrorKind::Transient,
        Some(403) if is_rate_limit_error(message) => GitHubErrorKind::Transient,
        Some(code) if (500..600).contains(&code) => GitHubErrorKind::Transient,
        Some(_) => GitHubErrorKind::Permanent,
        None if is_network_error(message) => GitHubErrorKind::Transient,
        None => GitHubErrorKind::Permanent,
    }
}

/// Checks if an error message indicates a rate limit.
fn is_rate_limit_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("rate limit") || message_lower.contains("abuse detection")
}

/// Checks if an error message indicates a network-level error.
fn is_network_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("timeout")
        || message_lower.contains("timed out")
        || message_lower.contains("connection")
        || message_lower.contains("dns")
}
