//! Bot configuration.
//!
//! Everything is read from the environment at startup:
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `GITHUB_TOKEN` | yes | |
//! | `LGTM_BOT_REPO` | yes | |
//! | `LGTM_BOT_LOGIN` | yes | |
//! | `LGTM_BOT_MERGEABLE_LABEL` | no | `lgtm` |
//! | `LGTM_BOT_COMPANION_LABEL` | no | `approved` |
//! | `LGTM_BOT_POLL_INTERVAL_SECS` | no | `60` |
//! | `PORT` | no | `3000` |

use std::env;

use anyhow::{Context, Result};

use crate::poll::PollConfig;
use crate::types::{Login, RepoId};

/// Default name of the label that signals approval to merge.
pub const DEFAULT_MERGEABLE_LABEL: &str = "lgtm";

/// Default name of the label applied alongside the mergeable label.
pub const DEFAULT_COMPANION_LABEL: &str = "approved";

/// The pair of labels the bot manages.
///
/// Both are applied on `/lgtm`; only `mergeable` is removed on `/lgtm cancel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelConfig {
    pub mergeable: String,
    pub companion: String,
}

impl LabelConfig {
    pub fn new(mergeable: impl Into<String>, companion: impl Into<String>) -> Self {
        LabelConfig {
            mergeable: mergeable.into(),
            companion: companion.into(),
        }
    }

    /// Labels applied when a merge command wins.
    pub fn labels_to_add(&self) -> Vec<String> {
        vec![self.mergeable.clone(), self.companion.clone()]
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig::new(DEFAULT_MERGEABLE_LABEL, DEFAULT_COMPANION_LABEL)
    }
}

/// Top-level configuration for the binary.
#[derive(Clone)]
pub struct BotConfig {
    pub github_token: String,
    pub repo: RepoId,
    /// The login the bot acts as. Used to tell manual label edits apart from
    /// the bot's own.
    pub bot_login: Login,
    pub labels: LabelConfig,
    pub poll: PollConfig,
    pub port: u16,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN")
            .context("GITHUB_TOKEN environment variable is required")?;

        let repo = env::var("LGTM_BOT_REPO")
            .context("LGTM_BOT_REPO environment variable is required (owner/repo)")?;
        let repo = RepoId::parse(&repo).context("LGTM_BOT_REPO must be in owner/repo format")?;

        let bot_login = env::var("LGTM_BOT_LOGIN")
            .context("LGTM_BOT_LOGIN environment variable is required")?;
        if bot_login.trim().is_empty() {
            anyhow::bail!("LGTM_BOT_LOGIN must not be empty");
        }

        let labels = LabelConfig::new(
            env::var("LGTM_BOT_MERGEABLE_LABEL")
                .unwrap_or_else(|_| DEFAULT_MERGEABLE_LABEL.to_string()),
            env::var("LGTM_BOT_COMPANION_LABEL")
                .unwrap_or_else(|_| DEFAULT_COMPANION_LABEL.to_string()),
        );

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid number")?;

        Ok(BotConfig {
            github_token,
            repo,
            bot_login: Login::new(bot_login.trim()),
            labels,
            poll: PollConfig::from_env()?,
            port,
        })
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("repo", &self.repo)
            .field("bot_login", &self.bot_login)
            .field("labels", &self.labels)
            .field("poll", &self.poll)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
