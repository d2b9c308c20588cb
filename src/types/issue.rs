//! Snapshot types for a review request and its history.
//!
//! Everything here is fetched fresh at the start of a reconciliation pass and
//! dropped at the end of it. Nothing is mutated after construction.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{Login, PrNumber, UserId};

/// A GitHub account as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub login: Login,
}

impl Identity {
    pub fn new(id: u64, login: impl Into<String>) -> Self {
        Identity {
            id: UserId(id),
            login: Login::new(login),
        }
    }
}

/// An issue comment.
///
/// The author is optional because GitHub reports deleted ("ghost") accounts
/// without a usable user object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: Option<Identity>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// The label actions the timeline cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// `labeled` in the GitHub issue events API.
    LabelAdded,
    /// `unlabeled` in the GitHub issue events API.
    LabelRemoved,
}

/// A label add/remove event from an issue's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub actor: Option<Identity>,
    pub action: EventAction,
    pub label: String,
    pub created_at: DateTime<Utc>,
    /// Whether the actor is someone other than this bot.
    ///
    /// Computed when the event is fetched, since only the interpreter knows
    /// which login the bot runs as.
    pub actor_is_human: bool,
}

/// An open issue or pull request as returned by the issue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueData {
    pub number: PrNumber,
    /// True when the issue is backed by a pull request.
    pub is_pull_request: bool,
    pub labels: BTreeSet<String>,
    pub assignee: Option<Identity>,
    pub assignees: Vec<Identity>,
}

impl IssueData {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.contains(name)
    }
}
