//! lgtm bot - a GitHub bot that keeps a pull request's `lgtm`/`approved`
//! labels in step with its reviewers' `/lgtm` and `/approve` comments.
//!
//! The decision logic is pure ([`reconcile::ReconcileEngine`]); everything
//! that talks to GitHub goes through [`effects::GitHubInterpreter`].

pub mod auth;
pub mod commands;
pub mod config;
pub mod effects;
pub mod github;
pub mod poll;
pub mod reconcile;
pub mod server;
pub mod timeline;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;
