//! Executes one reconciliation pass for one pull request.
//!
//! The `Reconciler` fetches the PR's history through a [`GitHubInterpreter`],
//! hands a snapshot to the [`ReconcileEngine`], and applies at most one label
//! mutation. A fetch failure aborts the pass before anything is mutated; the
//! next poll starts over from fresh data.

use serde::Serialize;
use thiserror::Error;

use crate::auth::{IdentityPolicy, reviewers_of};
use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse};
use crate::timeline::{label_added_time, mergeable_label_added_time};
use crate::types::{IssueData, PrNumber};

use super::engine::{Decision, PrSnapshot, ReconcileEngine};

/// Errors that abort a pass for one pull request.
#[derive(Debug, Error)]
pub enum ReconcileError<E: std::error::Error + 'static> {
    /// Fetching the comment window (or the last-modified time bounding it)
    /// failed.
    #[error("failed to fetch comments for PR {pr}")]
    CommentFetch {
        pr: PrNumber,
        #[source]
        source: E,
    },

    #[error("failed to fetch events for PR {pr}")]
    EventFetch {
        pr: PrNumber,
        #[source]
        source: E,
    },

    /// The label mutation itself failed. Nothing is retried here; the next
    /// pass recomputes the decision.
    #[error("failed to apply {effect:?} to PR {pr}")]
    LabelMutation {
        pr: PrNumber,
        effect: GitHubEffect,
        #[source]
        source: E,
    },

    /// The interpreter answered with the wrong response variant.
    #[error("unexpected response for PR {pr}: expected {expected}")]
    UnexpectedResponse { pr: PrNumber, expected: &'static str },
}

impl<E: std::error::Error + 'static> ReconcileError<E> {
    pub fn pr(&self) -> PrNumber {
        match self {
            ReconcileError::CommentFetch { pr, .. }
            | ReconcileError::EventFetch { pr, .. }
            | ReconcileError::LabelMutation { pr, .. }
            | ReconcileError::UnexpectedResponse { pr, .. } => *pr,
        }
    }
}

/// Why an item was not reconciled at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A plain issue rather than a pull request.
    NotPullRequest,
    /// Nobody is assigned, so nobody can approve.
    NoReviewers,
}

/// Result of a completed pass for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PassOutcome {
    Skipped { reason: SkipReason },
    /// The engine ran. If the decision is a change, it has been applied.
    Decided { decision: Decision },
}

/// Drives the engine against a live (or fake) GitHub.
#[derive(Debug)]
pub struct Reconciler<I, P> {
    interpreter: I,
    engine: ReconcileEngine<P>,
}

impl<I, P> Reconciler<I, P>
where
    I: GitHubInterpreter + Sync,
    P: IdentityPolicy + Sync,
{
    pub fn new(interpreter: I, engine: ReconcileEngine<P>) -> Self {
        Reconciler {
            interpreter,
            engine,
        }
    }

    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }

    pub fn engine(&self) -> &ReconcileEngine<P> {
        &self.engine
    }

    /// Runs one reconciliation pass for `issue`.
    pub async fn reconcile(
        &self,
        issue: &IssueData,
    ) -> Result<PassOutcome, ReconcileError<I::Error>> {
        let pr = issue.number;

        if !issue.is_pull_request {
            return Ok(PassOutcome::Skipped {
                reason: SkipReason::NotPullRequest,
            });
        }

        let reviewers = reviewers_of(issue);
        if reviewers.is_empty() {
            tracing::debug!(pr = %pr, "No assignees; skipping");
            return Ok(PassOutcome::Skipped {
                reason: SkipReason::NoReviewers,
            });
        }

        let last_modified = match self
            .interpreter
            .interpret(GitHubEffect::GetLastModified { pr })
            .await
            .map_err(|source| ReconcileError::CommentFetch { pr, source })?
        {
            GitHubResponse::LastModified(t) => t,
            _ => {
                return Err(ReconcileError::UnexpectedResponse {
                    pr,
                    expected: "LastModified",
                });
            }
        };

        let comments = match self
            .interpreter
            .interpret(GitHubEffect::ListComments {
                pr,
                since: last_modified,
            })
            .await
            .map_err(|source| ReconcileError::CommentFetch { pr, source })?
        {
            GitHubResponse::Comments(comments) => comments,
            _ => {
                return Err(ReconcileError::UnexpectedResponse {
                    pr,
                    expected: "Comments",
                });
            }
        };

        let events = match self
            .interpreter
            .interpret(GitHubEffect::ListEvents { pr })
            .await
            .map_err(|source| ReconcileError::EventFetch { pr, source })?
        {
            GitHubResponse::Events(events) => events,
            _ => {
                return Err(ReconcileError::UnexpectedResponse {
                    pr,
                    expected: "Events",
                });
            }
        };

        let snapshot = PrSnapshot {
            pr,
            has_mergeable_label: issue.has_label(&self.engine.labels().mergeable),
            last_modified,
            reviewers,
            comments,
            events,
        };

        let decision = self.engine.decide(&snapshot);

        match &decision {
            Decision::AddLabels {
                labels, reviewer, ..
            } => {
                tracing::info!(
                    pr = %pr,
                    reviewer = %reviewer,
                    labels = ?labels,
                    previously_labelled_at = ?mergeable_label_added_time(
                        &snapshot.events,
                        self.engine.labels()
                    ),
                    "Adding labels: reviewer approved"
                );
            }
            Decision::RemoveLabel {
                label, reviewer, ..
            } => {
                tracing::info!(
                    pr = %pr,
                    reviewer = %reviewer,
                    label = %label,
                    labelled_at = ?label_added_time(&snapshot.events, label),
                    "Removing label: reviewer cancelled"
                );
            }
            Decision::NoChange(reason) => {
                tracing::debug!(pr = %pr, reason = ?reason, "Labels unchanged");
            }
        }

        if let Some(effect) = decision.effect(pr) {
            self.interpreter
                .interpret(effect.clone())
                .await
                .map_err(|source| ReconcileError::LabelMutation { pr, effect, source })?;
        }

        Ok(PassOutcome::Decided { decision })
    }
}
