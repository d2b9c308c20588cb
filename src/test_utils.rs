//! Shared test utilities: fixtures, arbitrary generators and an in-memory
//! GitHub interpreter.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use thiserror::Error;

use crate::effects::{GitHubEffect, GitHubInterpreter, GitHubResponse};
use crate::types::{Comment, Event, EventAction, Identity, IssueData, PrNumber};

// ─── Fixtures ───

/// A fixed point in time, offset by `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 8, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn alice() -> Identity {
    Identity::new(1, "alice")
}

pub fn bob() -> Identity {
    Identity::new(2, "bob")
}

pub fn mallory() -> Identity {
    Identity::new(666, "mallory")
}

pub fn bot() -> Identity {
    Identity::new(999, "k8s-merge-robot")
}

pub fn comment(author: &Identity, body: &str, minutes: i64) -> Comment {
    Comment {
        author: Some(author.clone()),
        body: body.to_string(),
        created_at: at(minutes),
    }
}

pub fn human_event(action: EventAction, label: &str, minutes: i64) -> Event {
    Event {
        actor: Some(alice()),
        action,
        label: label.to_string(),
        created_at: at(minutes),
        actor_is_human: true,
    }
}

pub fn bot_event(action: EventAction, label: &str, minutes: i64) -> Event {
    Event {
        actor: Some(bot()),
        action,
        label: label.to_string(),
        created_at: at(minutes),
        actor_is_human: false,
    }
}

pub fn pull_request(number: u64, labels: &[&str], assignees: Vec<Identity>) -> IssueData {
    IssueData {
        number: PrNumber(number),
        is_pull_request: true,
        labels: labels.iter().map(|l| l.to_string()).collect(),
        assignee: assignees.first().cloned(),
        assignees,
    }
}

// ─── Generators ───

/// Comment bodies weighted towards commands.
pub fn arb_body() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/lgtm".to_string()),
        Just("/approve".to_string()),
        Just("/LGTM".to_string()),
        Just("/lgtm cancel".to_string()),
        Just("/approve cancel".to_string()),
        Just("/lgtm // ship it".to_string()),
        Just("/lgtm please".to_string()),
        Just("looks good".to_string()),
        "[a-z /]{0,20}",
    ]
}

/// One of the test identities, including ones that are never reviewers.
pub fn arb_author() -> impl Strategy<Value = Identity> {
    prop_oneof![Just(alice()), Just(bob()), Just(mallory()), Just(bot())]
}

/// Comments at strictly increasing minutes, oldest first.
pub fn arb_comments(max: usize) -> impl Strategy<Value = Vec<Comment>> {
    prop::collection::vec((arb_author(), arb_body(), 1i64..5), 0..max).prop_map(|items| {
        let mut minute = 0;
        items
            .into_iter()
            .map(|(author, body, gap)| {
                minute += gap;
                comment(&author, &body, minute)
            })
            .collect()
    })
}

// ─── In-memory interpreter ───

/// Calls the mock can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    ListOpenIssues,
    GetLastModified,
    ListComments,
    ListEvents,
    AddLabels,
    RemoveLabel,
}

impl MockCall {
    fn of(effect: &GitHubEffect) -> Self {
        match effect {
            GitHubEffect::ListOpenIssues => MockCall::ListOpenIssues,
            GitHubEffect::GetLastModified { .. } => MockCall::GetLastModified,
            GitHubEffect::ListComments { .. } => MockCall::ListComments,
            GitHubEffect::ListEvents { .. } => MockCall::ListEvents,
            GitHubEffect::AddLabels { .. } => MockCall::AddLabels,
            GitHubEffect::RemoveLabel { .. } => MockCall::RemoveLabel,
        }
    }
}

#[derive(Debug, Error)]
#[error("mock GitHub failure: {0}")]
pub struct MockError(pub String);

#[derive(Debug, Default)]
pub struct MockState {
    pub issues: BTreeMap<PrNumber, IssueData>,
    pub last_modified: HashMap<PrNumber, DateTime<Utc>>,
    pub comments: HashMap<PrNumber, Vec<Comment>>,
    pub events: HashMap<PrNumber, Vec<Event>>,
    pub failing: HashSet<MockCall>,
    /// Every effect interpreted, in order.
    pub log: Vec<GitHubEffect>,
    /// Timestamp given to events the bot itself generates.
    pub now: DateTime<Utc>,
}

/// A fake GitHub that applies label mutations to its own state and records
/// the bot's label changes as non-human events.
#[derive(Debug)]
pub struct MockGitHub {
    state: Mutex<MockState>,
}

impl MockGitHub {
    pub fn new() -> Self {
        MockGitHub {
            state: Mutex::new(MockState {
                now: at(1_000),
                ..MockState::default()
            }),
        }
    }

    /// Adds a PR modified at `last_modified` with the given history.
    pub fn with_pr(
        self,
        issue: IssueData,
        last_modified: DateTime<Utc>,
        comments: Vec<Comment>,
        events: Vec<Event>,
    ) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let pr = issue.number;
            state.issues.insert(pr, issue);
            state.last_modified.insert(pr, last_modified);
            state.comments.insert(pr, comments);
            state.events.insert(pr, events);
        }
        self
    }

    pub fn fail(&self, call: MockCall) {
        self.state.lock().unwrap().failing.insert(call);
    }

    pub fn heal(&self, call: MockCall) {
        self.state.lock().unwrap().failing.remove(&call);
    }

    pub fn labels(&self, pr: u64) -> BTreeSet<String> {
        self.state.lock().unwrap().issues[&PrNumber(pr)].labels.clone()
    }

    pub fn issue(&self, pr: u64) -> IssueData {
        self.state.lock().unwrap().issues[&PrNumber(pr)].clone()
    }

    pub fn mutations(&self) -> Vec<GitHubEffect> {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|e| e.is_mutation())
            .cloned()
            .collect()
    }

    pub fn log(&self) -> Vec<GitHubEffect> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn push_comment(&self, pr: u64, comment: Comment) {
        self.state
            .lock()
            .unwrap()
            .comments
            .entry(PrNumber(pr))
            .or_default()
            .push(comment);
    }

    pub fn push_event(&self, pr: u64, event: Event) {
        self.state
            .lock()
            .unwrap()
            .events
            .entry(PrNumber(pr))
            .or_default()
            .push(event);
    }

    fn apply(&self, effect: GitHubEffect) -> Result<GitHubResponse, MockError> {
        let mut state = self.state.lock().unwrap();
        state.log.push(effect.clone());

        if state.failing.contains(&MockCall::of(&effect)) {
            return Err(MockError(format!("{:?}", effect)));
        }

        match effect {
            GitHubEffect::ListOpenIssues => {
                Ok(GitHubResponse::Issues(state.issues.values().cloned().collect()))
            }
            GitHubEffect::GetLastModified { pr } => state
                .last_modified
                .get(&pr)
                .copied()
                .map(GitHubResponse::LastModified)
                .ok_or_else(|| MockError(format!("no PR {}", pr))),
            GitHubEffect::ListComments { pr, since } => Ok(GitHubResponse::Comments(
                state
                    .comments
                    .get(&pr)
                    .map(|all| {
                        all.iter()
                            .filter(|c| c.created_at >= since)
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default(),
            )),
            GitHubEffect::ListEvents { pr } => Ok(GitHubResponse::Events(
                state.events.get(&pr).cloned().unwrap_or_default(),
            )),
            GitHubEffect::AddLabels { pr, labels } => {
                let now = state.now;
                let issue = state
                    .issues
                    .get_mut(&pr)
                    .ok_or_else(|| MockError(format!("no PR {}", pr)))?;
                let mut added = Vec::new();
                for label in labels {
                    if issue.labels.insert(label.clone()) {
                        added.push(label);
                    }
                }
                let events = state.events.entry(pr).or_default();
                for label in added {
                    events.push(Event {
                        actor: Some(bot()),
                        action: EventAction::LabelAdded,
                        label,
                        created_at: now,
                        actor_is_human: false,
                    });
                }
                Ok(GitHubResponse::LabelsAdded)
            }
            GitHubEffect::RemoveLabel { pr, label } => {
                let now = state.now;
                let issue = state
                    .issues
                    .get_mut(&pr)
                    .ok_or_else(|| MockError(format!("no PR {}", pr)))?;
                if !issue.labels.remove(&label) {
                    return Err(MockError(format!("label {} not on {}", label, pr)));
                }
                state.events.entry(pr).or_default().push(Event {
                    actor: Some(bot()),
                    action: EventAction::LabelRemoved,
                    label,
                    created_at: now,
                    actor_is_human: false,
                });
                Ok(GitHubResponse::LabelRemoved)
            }
        }
    }
}

impl GitHubInterpreter for MockGitHub {
    type Error = MockError;

    async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
        self.apply(effect)
    }
}
