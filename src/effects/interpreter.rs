//! Effect interpreter trait.
//!
//! The trait-based design keeps the reconciliation logic independent of the
//! transport: production uses the octocrab-backed client, tests use an
//! in-memory fake that records what was asked of it.

use std::future::Future;

use super::github::{GitHubEffect, GitHubResponse};

/// Interprets GitHub effects against the GitHub API.
///
/// Implementations are constructed for one repository, so effects don't
/// carry repo info.
///
/// # Example (canned responses)
///
/// ```ignore
/// struct Canned(Vec<Comment>);
///
/// impl GitHubInterpreter for Canned {
///     type Error = std::io::Error;
///
///     async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
///         match effect {
///             GitHubEffect::ListComments { since, .. } => Ok(GitHubResponse::Comments(
///                 self.0.iter().filter(|c| c.created_at >= since).cloned().collect(),
///             )),
///             other => Err(std::io::Error::other(format!("unexpected {:?}", other))),
///         }
///     }
/// }
/// ```
pub trait GitHubInterpreter {
    /// The error type returned by this interpreter.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a GitHub effect and return its response.
    fn interpret(
        &self,
        effect: GitHubEffect,
    ) -> impl Future<Output = Result<GitHubResponse, Self::Error>> + Send;
}
