//! The polling loop.
//!
//! Each pass lists the repository's open issues and runs one reconciliation
//! per item; the loop then waits `poll_interval` before the next pass. Items
//! are independent: a failure on one is logged and the loop moves on to the
//! next. Nothing carries over between passes, so the next poll retries with
//! fresh data.
//!
//! # Polling Strategy
//!
//! - **Poll interval**: 60 seconds by default (configurable via `LGTM_BOT_POLL_INTERVAL_SECS`)
//! - **Initial stagger**: based on the repo ID hash, so several bot instances
//!   restarted together don't all hit the API at once

use std::hash::{Hash, Hasher};
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::auth::IdentityPolicy;
use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse};
use crate::reconcile::{Decision, PassOutcome, Reconciler};
use crate::types::RepoId;

/// Default poll interval (60 seconds).
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Configuration for the polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Pause between the end of one pass and the start of the next.
    pub poll_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PollConfig {
    pub fn new() -> Self {
        PollConfig {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    /// Reads `LGTM_BOT_POLL_INTERVAL_SECS`, falling back to the default when unset.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var("LGTM_BOT_POLL_INTERVAL_SECS") {
            Ok(s) => {
                let secs = s
                    .parse::<u64>()
                    .context("LGTM_BOT_POLL_INTERVAL_SECS must be a number of seconds")?;
                if secs == 0 {
                    anyhow::bail!("LGTM_BOT_POLL_INTERVAL_SECS must be positive");
                }
                Ok(PollConfig {
                    poll_interval: Duration::from_secs(secs),
                })
            }
            Err(_) => Ok(Self::new()),
        }
    }

    /// Delay before the first poll for `repo`.
    ///
    /// Deterministic per repo, and always less than half the poll interval.
    pub fn initial_poll_delay(&self, repo: &RepoId) -> Duration {
        let mut hasher = std::hash::DefaultHasher::new();
        repo.hash(&mut hasher);
        let max_delay = (self.poll_interval.as_secs() / 2).max(1);
        Duration::from_secs(hasher.finish() % max_delay)
    }
}

/// The listing step of a pass failed, so no item was examined.
#[derive(Debug, Error)]
pub enum PollError<E: std::error::Error + 'static> {
    #[error("failed to list open issues: {0}")]
    ListIssues(#[source] E),

    #[error("unexpected response to ListOpenIssues")]
    UnexpectedResponse,
}

/// Tallies for one pass over the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub examined: usize,
    pub skipped: usize,
    pub unchanged: usize,
    pub labels_added: usize,
    pub labels_removed: usize,
    pub failed: usize,
}

/// What the poll loop last did, for the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassStatus {
    pub finished_at: DateTime<Utc>,
    /// `None` if the pass could not list issues.
    pub summary: Option<PassSummary>,
    pub error: Option<String>,
}

/// Runs one pass over every open issue in the repository.
pub async fn run_pass<I, P>(
    reconciler: &Reconciler<I, P>,
) -> Result<PassSummary, PollError<I::Error>>
where
    I: GitHubInterpreter + Sync,
    P: IdentityPolicy + Sync,
{
    let issues = match reconciler
        .interpreter()
        .interpret(GitHubEffect::ListOpenIssues)
        .await
        .map_err(PollError::ListIssues)?
    {
        GitHubResponse::Issues(issues) => issues,
        _ => return Err(PollError::UnexpectedResponse),
    };

    let mut summary = PassSummary::default();

    for issue in &issues {
        summary.examined += 1;
        match reconciler.reconcile(issue).await {
            Ok(PassOutcome::Skipped { .. }) => summary.skipped += 1,
            Ok(PassOutcome::Decided { decision }) => match decision {
                Decision::AddLabels { .. } => summary.labels_added += 1,
                Decision::RemoveLabel { .. } => summary.labels_removed += 1,
                Decision::NoChange(_) => summary.unchanged += 1,
            },
            Err(e) => {
                summary.failed += 1;
                tracing::error!(
                    pr = %e.pr(),
                    error = %e,
                    source = ?std::error::Error::source(&e),
                    "Reconciliation pass aborted"
                );
            }
        }
    }

    Ok(summary)
}

/// Polls until `shutdown` is cancelled, publishing each pass's result on
/// `status`.
pub async fn run<I, P>(
    reconciler: Reconciler<I, P>,
    repo: RepoId,
    config: PollConfig,
    status: watch::Sender<Option<PassStatus>>,
    shutdown: CancellationToken,
) where
    I: GitHubInterpreter + Sync,
    P: IdentityPolicy + Sync,
{
    let initial_delay = config.initial_poll_delay(&repo);
    tracing::info!(
        repo = %repo,
        delay = ?initial_delay,
        interval = ?config.poll_interval,
        "Starting poll loop"
    );

    tokio::select! {
        _ = shutdown.cancelled() => return,
        _ = tokio::time::sleep(initial_delay) => {}
    }

    loop {
        let result = run_pass(&reconciler).await;
        let pass_status = match result {
            Ok(summary) => {
                tracing::info!(
                    repo = %repo,
                    examined = summary.examined,
                    added = summary.labels_added,
                    removed = summary.labels_removed,
                    failed = summary.failed,
                    "Pass complete"
                );
                PassStatus {
                    finished_at: Utc::now(),
                    summary: Some(summary),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(repo = %repo, error = %e, "Pass aborted");
                PassStatus {
                    finished_at: Utc::now(),
                    summary: None,
                    error: Some(e.to_string()),
                }
            }
        };
        status.send_replace(Some(pass_status));

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(config.poll_interval) => {}
        }
    }

    tracing::info!(repo = %repo, "Poll loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ValidIdentity;
    use crate::config::LabelConfig;
    use crate::reconcile::ReconcileEngine;
    use crate::test_utils::{
        MockCall, MockGitHub, alice, at, bot, comment, mallory, pull_request,
    };

    fn reconciler(github: MockGitHub) -> Reconciler<MockGitHub, ValidIdentity> {
        Reconciler::new(
            github,
            ReconcileEngine::new(LabelConfig::default(), ValidIdentity::new(bot().login)),
        )
    }

    fn busy_repo() -> MockGitHub {
        let mut issue = pull_request(4, &[], vec![alice()]);
        issue.is_pull_request = false;

        MockGitHub::new()
            .with_pr(
                pull_request(1, &[], vec![alice()]),
                at(0),
                vec![comment(&alice(), "/lgtm", 1)],
                vec![],
            )
            .with_pr(
                pull_request(2, &["lgtm", "approved"], vec![alice()]),
                at(0),
                vec![comment(&alice(), "/approve cancel", 1)],
                vec![],
            )
            .with_pr(
                pull_request(3, &[], vec![alice()]),
                at(0),
                vec![comment(&mallory(), "/lgtm", 1)],
                vec![],
            )
            .with_pr(issue, at(0), vec![], vec![])
    }

    #[test]
    fn default_config_has_expected_values() {
        assert_eq!(PollConfig::new().poll_interval, Duration::from_secs(60));
    }

    #[test]
    fn initial_delay_is_deterministic_and_bounded() {
        let config = PollConfig::new();
        let repo = RepoId::new("owner", "repo");

        let delay = config.initial_poll_delay(&repo);

        assert_eq!(delay, config.initial_poll_delay(&repo));
        assert!(delay < config.poll_interval / 2);
    }

    #[test]
    fn tiny_interval_does_not_divide_by_zero() {
        let config = PollConfig {
            poll_interval: Duration::from_secs(1),
        };
        assert_eq!(
            config.initial_poll_delay(&RepoId::new("o", "r")),
            Duration::ZERO
        );
    }

    #[tokio::test]
    async fn pass_reconciles_every_item() {
        let r = reconciler(busy_repo());

        let summary = run_pass(&r).await.unwrap();

        assert_eq!(
            summary,
            PassSummary {
                examined: 4,
                skipped: 1,
                unchanged: 1,
                labels_added: 1,
                labels_removed: 1,
                failed: 0,
            }
        );
    }

    #[tokio::test]
    async fn second_pass_converges() {
        let r = reconciler(busy_repo());

        run_pass(&r).await.unwrap();
        let summary = run_pass(&r).await.unwrap();

        assert_eq!(summary.labels_added + summary.labels_removed, 0);
        assert_eq!(summary.unchanged, 3);
    }

    #[tokio::test]
    async fn item_failures_are_counted_not_fatal() {
        let github = busy_repo();
        github.fail(MockCall::ListEvents);
        let r = reconciler(github);

        let summary = run_pass(&r).await.unwrap();

        assert_eq!(summary.failed, 3);
        assert_eq!(summary.skipped, 1);
        assert!(r.interpreter().mutations().is_empty());
    }

    #[tokio::test]
    async fn listing_failure_aborts_pass() {
        let github = busy_repo();
        github.fail(MockCall::ListOpenIssues);
        let r = reconciler(github);

        let err = run_pass(&r).await.unwrap_err();

        assert!(matches!(err, PollError::ListIssues(_)));
        assert_eq!(
            err.to_string(),
            "failed to list open issues: mock GitHub failure: ListOpenIssues"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn loop_publishes_status_and_stops_on_shutdown() {
        let (tx, mut rx) = watch::channel(None);
        let shutdown = CancellationToken::new();
        let config = PollConfig {
            poll_interval: Duration::from_secs(2),
        };
        let handle = tokio::spawn(run(
            reconciler(busy_repo()),
            RepoId::new("owner", "repo"),
            config,
            tx,
            shutdown.clone(),
        ));

        rx.changed().await.unwrap();
        let status = rx.borrow_and_update().clone().unwrap();
        assert_eq!(status.summary.unwrap().labels_added, 1);
        assert!(status.error.is_none());

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn listing_failure_cause_reaches_status() {
        let github = busy_repo();
        github.fail(MockCall::ListOpenIssues);
        let (tx, mut rx) = watch::channel(None);
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run(
            reconciler(github),
            RepoId::new("owner", "repo"),
            PollConfig::new(),
            tx,
            shutdown.clone(),
        ));

        rx.changed().await.unwrap();
        let status = rx.borrow_and_update().clone().unwrap();
        assert!(status.summary.is_none());
        let error = status.error.unwrap();
        assert!(
            error.contains("mock GitHub failure: ListOpenIssues"),
            "status error was {:?}",
            error
        );

        shutdown.cancel();
        handle.await.unwrap();
    }
}
