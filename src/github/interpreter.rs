//! GitHub effect interpreter using octocrab.
//!
//! Calls go through octocrab's generic REST helpers with small local response
//! types, so only the fields the bot reads need to deserialize. List endpoints
//! are paginated at 100 items per page.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse};
use crate::types::{Comment, Event, EventAction, Identity, IssueData, Login, PrNumber};

use super::client::OctocrabClient;
use super::error::GitHubApiError;

/// Items per page for list endpoints (GitHub's maximum).
const PER_PAGE: usize = 100;

/// Safety limit to prevent runaway pagination.
const MAX_PAGES: u32 = 30;

// ─── REST Response Types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: u64,
    login: String,
}

impl From<ApiUser> for Identity {
    fn from(user: ApiUser) -> Self {
        Identity::new(user.id, user.login)
    }
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiIssue {
    number: u64,
    /// Present (with any content) only for pull requests.
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    #[serde(default)]
    assignee: Option<ApiUser>,
    #[serde(default)]
    assignees: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
struct ApiComment {
    #[serde(default)]
    user: Option<ApiUser>,
    #[serde(default)]
    body: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ApiIssueEvent {
    #[serde(default)]
    actor: Option<ApiUser>,
    event: String,
    #[serde(default)]
    label: Option<ApiLabel>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    commit: ApiCommitDetail,
}

#[derive(Debug, Deserialize)]
struct ApiCommitDetail {
    #[serde(default)]
    committer: Option<ApiGitActor>,
    #[serde(default)]
    author: Option<ApiGitActor>,
}

#[derive(Debug, Deserialize)]
struct ApiGitActor {
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

// ─── Interpreter Implementation ───────────────────────────────────────────────

impl GitHubInterpreter for OctocrabClient {
    type Error = GitHubApiError;

    async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
        interpret_github_effect(self, effect).await
    }
}

/// Executes a single effect against the GitHub API.
pub async fn interpret_github_effect(
    client: &OctocrabClient,
    effect: GitHubEffect,
) -> Result<GitHubResponse, GitHubApiError> {
    match effect {
        GitHubEffect::ListOpenIssues => list_open_issues(client).await,
        GitHubEffect::GetLastModified { pr } => get_last_modified(client, pr).await,
        GitHubEffect::ListComments { pr, since } => list_comments(client, pr, since).await,
        GitHubEffect::ListEvents { pr } => list_events(client, pr).await,
        GitHubEffect::AddLabels { pr, labels } => add_labels(client, pr, labels).await,
        GitHubEffect::RemoveLabel { pr, label } => remove_label(client, pr, label).await,
    }
}

/// Fetches every page of a list endpoint, oldest first as GitHub returns them.
async fn get_all_pages<T: DeserializeOwned>(
    client: &OctocrabClient,
    route: &str,
    extra_params: &[(&str, String)],
) -> Result<Vec<T>, GitHubApiError> {
    let mut page = 1u32;
    let mut all = Vec::new();

    loop {
        let mut params: Vec<(&str, String)> = extra_params.to_vec();
        params.push(("per_page", PER_PAGE.to_string()));
        params.push(("page", page.to_string()));

        let items: Vec<T> = client
            .inner()
            .get(route, Some(&params))
            .await
            .map_err(GitHubApiError::from_octocrab)?;

        let is_last_page = items.len() < PER_PAGE;
        all.extend(items);

        if is_last_page {
            return Ok(all);
        }
        if page >= MAX_PAGES {
            tracing::warn!(
                route,
                pages = page,
                items = all.len(),
                "Hit pagination limit; results may be incomplete"
            );
            return Ok(all);
        }
        page += 1;
    }
}

// ─── Queries ──────────────────────────────────────────────────────────────────

async fn list_open_issues(client: &OctocrabClient) -> Result<GitHubResponse, GitHubApiError> {
    let route = client.route("/issues");
    let issues: Vec<ApiIssue> =
        get_all_pages(client, &route, &[("state", "open".to_string())]).await?;

    Ok(GitHubResponse::Issues(
        issues.into_iter().map(issue_from_api).collect(),
    ))
}

fn issue_from_api(issue: ApiIssue) -> IssueData {
    IssueData {
        number: PrNumber(issue.number),
        is_pull_request: issue.pull_request.is_some(),
        labels: issue.labels.into_iter().map(|l| l.name).collect(),
        assignee: issue.assignee.map(Identity::from),
        assignees: issue.assignees.into_iter().map(Identity::from).collect(),
    }
}

/// The PR's last code change: the newest commit date across its commits.
async fn get_last_modified(
    client: &OctocrabClient,
    pr: PrNumber,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = client.route(&format!("/pulls/{}/commits", pr.0));
    let commits: Vec<ApiCommit> = get_all_pages(client, &route, &[]).await?;

    commits
        .into_iter()
        .filter_map(commit_date)
        .max()
        .map(GitHubResponse::LastModified)
        .ok_or_else(|| {
            GitHubApiError::permanent_without_source(format!("PR {} has no dated commits", pr))
        })
}

fn commit_date(commit: ApiCommit) -> Option<DateTime<Utc>> {
    let detail = commit.commit;
    detail
        .committer
        .and_then(|c| c.date)
        .or_else(|| detail.author.and_then(|a| a.date))
}

async fn list_comments(
    client: &OctocrabClient,
    pr: PrNumber,
    since: DateTime<Utc>,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = client.route(&format!("/issues/{}/comments", pr.0));
    let since_param = since.to_rfc3339_opts(SecondsFormat::Secs, true);
    let comments: Vec<ApiComment> =
        get_all_pages(client, &route, &[("since", since_param)]).await?;

    Ok(GitHubResponse::Comments(
        comments
            .into_iter()
            .map(|c| Comment {
                author: c.user.map(Identity::from),
                body: c.body.unwrap_or_default(),
                created_at: c.created_at,
            })
            .collect(),
    ))
}

async fn list_events(
    client: &OctocrabClient,
    pr: PrNumber,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = client.route(&format!("/issues/{}/events", pr.0));
    let events: Vec<ApiIssueEvent> = get_all_pages(client, &route, &[]).await?;

    Ok(GitHubResponse::Events(
        events
            .into_iter()
            .filter_map(|e| event_from_api(e, client.bot_login()))
            .collect(),
    ))
}

/// Maps a raw issue event, dropping anything that isn't a label change.
fn event_from_api(event: ApiIssueEvent, bot_login: &Login) -> Option<Event> {
    let action = match event.event.as_str() {
        "labeled" => EventAction::LabelAdded,
        "unlabeled" => EventAction::LabelRemoved,
        _ => return None,
    };
    let label = event.label?.name;
    let actor = event.actor.map(Identity::from);
    let actor_is_human = actor
        .as_ref()
        .is_some_and(|a| !a.login.matches(bot_login));

    Some(Event {
        actor,
        action,
        label,
        created_at: event.created_at,
        actor_is_human,
    })
}

// ─── Label Mutations ──────────────────────────────────────────────────────────

async fn add_labels(
    client: &OctocrabClient,
    pr: PrNumber,
    labels: Vec<String>,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = client.route(&format!("/issues/{}/labels", pr.0));
    let body = serde_json::json!({ "labels": labels });

    let _: Vec<ApiLabel> = client
        .inner()
        .post(route, Some(&body))
        .await
        .map_err(GitHubApiError::from_octocrab)?;

    Ok(GitHubResponse::LabelsAdded)
}

async fn remove_label(
    client: &OctocrabClient,
    pr: PrNumber,
    label: String,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = client.route(&format!(
        "/issues/{}/labels/{}",
        pr.0,
        urlencoding::encode(&label)
    ));

    let _: Vec<ApiLabel> = client
        .inner()
        .delete(route, None::<&()>)
        .await
        .map_err(GitHubApiError::from_octocrab)?;

    Ok(GitHubResponse::LabelRemoved)
}
