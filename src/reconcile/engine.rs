//! The label reconciliation engine.
//!
//! `ReconcileEngine` is stateless: given a snapshot of one pull request it
//! decides whether the mergeable label should be added, removed, or left
//! alone, and returns that decision as data. It does no I/O.
//!
//! # Algorithm
//!
//! Comments created before the PR's last modification are ignored. The
//! remaining comments are walked newest first, skipping anyone who is not an
//! authorized reviewer. The first authorized command decides:
//!
//! | Label present? | Newest command | Result |
//! |---|---|---|
//! | no | merge | add both labels, unless a human removed one after the command |
//! | no | cancel | nothing |
//! | yes | cancel | remove the mergeable label, unless a human added one after the command |
//! | yes | merge | nothing |
//!
//! Comments that are neither command are skipped.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::{IdentityPolicy, ReviewerSet, is_approved_to_alter_labels};
use crate::commands::{LabelCommand, classify_comment};
use crate::config::LabelConfig;
use crate::effects::GitHubEffect;
use crate::timeline::{last_manual_addition, last_manual_removal};
use crate::types::{Comment, Event, Identity, Login, PrNumber};

/// Everything the engine needs to know about one pull request.
#[derive(Debug, Clone)]
pub struct PrSnapshot {
    pub pr: PrNumber,
    /// Whether the mergeable label is currently on the PR.
    pub has_mergeable_label: bool,
    /// When the PR's code last changed. Commands older than this are stale.
    pub last_modified: DateTime<Utc>,
    pub reviewers: ReviewerSet,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
    pub events: Vec<Event>,
}

/// Why a pass ended without touching the labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoChangeReason {
    /// No authorized reviewer issued a relevant command since the last change.
    NoCommand,

    /// The label is absent and the newest authorized command is a cancel.
    CancelIsNewest { command_at: DateTime<Utc> },

    /// The label is present and the newest authorized command is a merge.
    MergeIsNewest { command_at: DateTime<Utc> },

    /// A human removed a mergeable label after the merge command was posted.
    ManuallyRemoved {
        command_at: DateTime<Utc>,
        removed_at: DateTime<Utc>,
    },

    /// A human added a mergeable label after the cancel command was posted.
    ManuallyAdded {
        command_at: DateTime<Utc>,
        added_at: DateTime<Utc>,
    },
}

/// The outcome of one decision. At most one label mutation per pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    AddLabels {
        labels: Vec<String>,
        reviewer: Login,
        command_at: DateTime<Utc>,
    },
    RemoveLabel {
        label: String,
        reviewer: Login,
        command_at: DateTime<Utc>,
    },
    NoChange(NoChangeReason),
}

impl Decision {
    /// The label mutation this decision calls for, if any.
    pub fn effect(&self, pr: PrNumber) -> Option<GitHubEffect> {
        match self {
            Decision::AddLabels { labels, .. } => Some(GitHubEffect::AddLabels {
                pr,
                labels: labels.clone(),
            }),
            Decision::RemoveLabel { label, .. } => Some(GitHubEffect::RemoveLabel {
                pr,
                label: label.clone(),
            }),
            Decision::NoChange(_) => None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Decision::NoChange(_))
    }
}

/// Decides label mutations from comment and event history.
#[derive(Debug, Clone)]
pub struct ReconcileEngine<P> {
    labels: LabelConfig,
    policy: P,
}

impl<P: IdentityPolicy> ReconcileEngine<P> {
    pub fn new(labels: LabelConfig, policy: P) -> Self {
        ReconcileEngine { labels, policy }
    }

    pub fn labels(&self) -> &LabelConfig {
        &self.labels
    }

    /// Decides what to do with the PR described by `snapshot`.
    pub fn decide(&self, snapshot: &PrSnapshot) -> Decision {
        let mut commands = self.authorized_commands(snapshot);

        if snapshot.has_mergeable_label {
            self.remove_if_cancelled(snapshot, &mut commands)
        } else {
            self.add_if_commented(snapshot, &mut commands)
        }
    }

    /// Authorized, non-stale comments, newest first, paired with their
    /// author and classification.
    fn authorized_commands<'a>(
        &'a self,
        snapshot: &'a PrSnapshot,
    ) -> impl Iterator<Item = (&'a Identity, &'a Comment, LabelCommand)> + 'a {
        snapshot
            .comments
            .iter()
            .rev()
            .filter(move |comment| comment.created_at >= snapshot.last_modified)
            .filter_map(move |comment| {
                let author = comment.author.as_ref()?;
                if !is_approved_to_alter_labels(Some(author), &snapshot.reviewers, &self.policy) {
                    return None;
                }
                Some((author, comment, classify_comment(&comment.body)))
            })
    }

    fn add_if_commented<'a>(
        &self,
        snapshot: &PrSnapshot,
        commands: &mut impl Iterator<Item = (&'a Identity, &'a Comment, LabelCommand)>,
    ) -> Decision {
        for (author, comment, command) in commands {
            match command {
                LabelCommand::Neither => continue,
                LabelCommand::Cancel => {
                    return Decision::NoChange(NoChangeReason::CancelIsNewest {
                        command_at: comment.created_at,
                    });
                }
                LabelCommand::Merge => {
                    if let Some(removed_at) = last_manual_removal(&snapshot.events, &self.labels)
                        .filter(|removed_at| *removed_at > comment.created_at)
                    {
                        return Decision::NoChange(NoChangeReason::ManuallyRemoved {
                            command_at: comment.created_at,
                            removed_at,
                        });
                    }
                    return Decision::AddLabels {
                        labels: self.labels.labels_to_add(),
                        reviewer: author.login.clone(),
                        command_at: comment.created_at,
                    };
                }
            }
        }
        Decision::NoChange(NoChangeReason::NoCommand)
    }

    fn remove_if_cancelled<'a>(
        &self,
        snapshot: &PrSnapshot,
        commands: &mut impl Iterator<Item = (&'a Identity, &'a Comment, LabelCommand)>,
    ) -> Decision {
        for (author, comment, command) in commands {
            match command {
                LabelCommand::Neither => continue,
                LabelCommand::Merge => {
                    return Decision::NoChange(NoChangeReason::MergeIsNewest {
                        command_at: comment.created_at,
                    });
                }
                LabelCommand::Cancel => {
                    if let Some(added_at) = last_manual_addition(&snapshot.events, &self.labels)
                        .filter(|added_at| *added_at > comment.created_at)
                    {
                        return Decision::NoChange(NoChangeReason::ManuallyAdded {
                            command_at: comment.created_at,
                            added_at,
                        });
                    }
                    return Decision::RemoveLabel {
                        label: self.labels.mergeable.clone(),
                        reviewer: author.login.clone(),
                        command_at: comment.created_at,
                    };
                }
            }
        }
        Decision::NoChange(NoChangeReason::NoCommand)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
