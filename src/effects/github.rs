//! GitHub API effect types.
//!
//! These types describe GitHub API operations as data, without executing them.
//! The interpreter in [`crate::github`] executes them against the real API; tests
//! use an in-memory interpreter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Comment, Event, IssueData, PrNumber};

/// A GitHub API effect.
///
/// Effects are repo-scoped: the interpreter is constructed with a `RepoId`, so
/// effects don't include it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GitHubEffect {
    // ─── Queries ──────────────────────────────────────────────────────────────
    /// List all open issues and pull requests in the repository.
    ListOpenIssues,

    /// Get the time the PR's code last changed (its latest commit).
    GetLastModified { pr: PrNumber },

    /// List comments on a PR, oldest first, updated at or after `since`.
    ListComments {
        pr: PrNumber,
        since: DateTime<Utc>,
    },

    /// List the label events on a PR, oldest first.
    ListEvents { pr: PrNumber },

    // ─── Mutations ────────────────────────────────────────────────────────────
    /// Add labels to a PR. Labels already present are left as they are.
    AddLabels { pr: PrNumber, labels: Vec<String> },

    /// Remove a single label from a PR.
    RemoveLabel { pr: PrNumber, label: String },
}

impl GitHubEffect {
    /// Returns true if this effect changes state on GitHub.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            GitHubEffect::AddLabels { .. } | GitHubEffect::RemoveLabel { .. }
        )
    }
}

/// Response from a GitHub effect.
///
/// Each variant corresponds to the response from a particular effect type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GitHubResponse {
    /// Response to `ListOpenIssues`.
    Issues(Vec<IssueData>),

    /// Response to `GetLastModified`.
    LastModified(DateTime<Utc>),

    /// Response to `ListComments`.
    Comments(Vec<Comment>),

    /// Response to `ListEvents`.
    Events(Vec<Event>),

    /// Response to `AddLabels`.
    LabelsAdded,

    /// Response to `RemoveLabel`.
    LabelRemoved,
}
