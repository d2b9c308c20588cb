//! Who may move the mergeable label.
//!
//! Only designated reviewers (the request's assignees) can add or cancel the
//! label, and only when their account passes the identity check. The request's
//! author and drive-by commenters are ignored unless they are also assigned.

use std::collections::HashSet;

use crate::types::{Identity, IssueData, Login, UserId};

/// The set of identities with reviewer authority on one request.
///
/// Membership is keyed on the stable user ID, so a reviewer who renames their
/// account between the assignment and the comment is still recognised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewerSet {
    ids: HashSet<UserId>,
}

impl ReviewerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identity: &Identity) {
        self.ids.insert(identity.id);
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.ids.contains(&identity.id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> FromIterator<&'a Identity> for ReviewerSet {
    fn from_iter<T: IntoIterator<Item = &'a Identity>>(iter: T) -> Self {
        let mut set = ReviewerSet::new();
        for identity in iter {
            set.insert(identity);
        }
        set
    }
}

/// Derives the reviewer set from an issue: its assignee plus its assignee
/// list, deduplicated.
pub fn reviewers_of(issue: &IssueData) -> ReviewerSet {
    issue
        .assignee
        .iter()
        .chain(issue.assignees.iter())
        .collect()
}

/// Decides whether an account is one the bot will act on behalf of.
pub trait IdentityPolicy {
    fn is_valid(&self, identity: &Identity) -> bool;
}

/// The default identity check.
///
/// An identity is valid when it has a non-empty login and is not the bot's
/// own account, so the bot can never authorize itself.
#[derive(Debug, Clone)]
pub struct ValidIdentity {
    bot_login: Login,
}

impl ValidIdentity {
    pub fn new(bot_login: Login) -> Self {
        Self { bot_login }
    }
}

impl IdentityPolicy for ValidIdentity {
    fn is_valid(&self, identity: &Identity) -> bool {
        !identity.login.as_str().trim().is_empty() && !identity.login.matches(&self.bot_login)
    }
}

impl<F> IdentityPolicy for F
where
    F: Fn(&Identity) -> bool,
{
    fn is_valid(&self, identity: &Identity) -> bool {
        self(identity)
    }
}

/// Returns true iff `author` passes the identity check and is a designated
/// reviewer.
///
/// A missing author (deleted account) is never approved.
pub fn is_approved_to_alter_labels(
    author: Option<&Identity>,
    reviewers: &ReviewerSet,
    policy: &impl IdentityPolicy,
) -> bool {
    match author {
        Some(identity) => policy.is_valid(identity) && reviewers.contains(identity),
        None => false,
    }
}
