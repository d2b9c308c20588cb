//! Core domain types for the lgtm bot.
//!
//! Identifiers are newtypes so a user ID cannot be passed where a PR number is
//! expected; snapshot types describe one review request and its history.

pub mod ids;
pub mod issue;

pub use ids::{InvalidRepoId, Login, PrNumber, RepoId, UserId};
pub use issue::{Comment, Event, EventAction, Identity, IssueData};
