//! Effects-as-data for GitHub operations.
//!
//! This module defines effect types that describe operations without executing them.
//! This enables:
//! - Pure decision logic that returns the label mutation as data
//! - Testability via mock interpreters
//! - Logging of intended operations

pub mod github;
pub mod interpreter;

pub use github::{GitHubEffect, GitHubResponse};
pub use interpreter::GitHubInterpreter;
