//! Octocrab client wrapper scoped to a specific repository.
//!
//! `OctocrabClient` wraps an `Octocrab` instance and scopes all operations to
//! one repository, matching the design where effects don't carry repo info.
//! It also knows the bot's own login so it can mark events as human or not.

use octocrab::Octocrab;

use crate::types::{Login, RepoId};

/// A GitHub API client scoped to a specific repository.
#[derive(Clone)]
pub struct OctocrabClient {
    client: Octocrab,
    repo: RepoId,
    bot_login: Login,
}

impl OctocrabClient {
    pub fn new(client: Octocrab, repo: RepoId, bot_login: Login) -> Self {
        Self {
            client,
            repo,
            bot_login,
        }
    }

    /// Creates a client authenticated with a personal access token.
    pub fn from_token(
        token: impl Into<String>,
        repo: RepoId,
        bot_login: Login,
    ) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(client, repo, bot_login))
    }

    pub fn inner(&self) -> &Octocrab {
        &self.client
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    pub fn bot_login(&self) -> &Login {
        &self.bot_login
    }

    /// `/repos/{owner}/{repo}` followed by `suffix`.
    pub fn route(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{}", self.repo.owner, self.repo.repo, suffix)
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient")
            .field("repo", &self.repo)
            .field("bot_login", &self.bot_login)
            .finish_non_exhaustive()
    }
}
