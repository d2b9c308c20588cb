//! GitHub API client and effect interpreter.
//!
//! This module provides the implementation for executing GitHub effects via the
//! octocrab library. It implements the `GitHubInterpreter` trait defined in the
//! effects module.
//!
//! Key features:
//! - Pagination for comments, events, commits and issues
//! - Marks label events as human or bot using the configured bot login
//! - Tags every error as transient or permanent in its message

mod client;
mod error;
mod interpreter;

pub use client::OctocrabClient;
pub use error::{GitHubApiError, GitHubErrorKind};
pub use interpreter::interpret_github_effect;
