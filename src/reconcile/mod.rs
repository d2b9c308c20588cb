//! Label reconciliation.
//!
//! This module decides, once per poll, whether a pull request's mergeable
//! label should be present, and makes it so.
//!
//! # Architecture
//!
//! The module follows the effects-as-data pattern:
//! - [`ReconcileEngine`] is pure: snapshot in, [`Decision`] out
//! - [`Reconciler`] performs the fetches and the single mutation through a
//!   `GitHubInterpreter`
//!
//! # Key Invariants
//!
//! 1. **Most recent authorized command wins**: comments are scanned newest
//!    first and the first merge or cancel from an authorized reviewer decides.
//!
//! 2. **Stale commands are ignored**: comments created before the PR's last
//!    code change are not considered.
//!
//! 3. **Manual edits are honoured**: a human label change after the deciding
//!    command suppresses the bot's mutation.
//!
//! 4. **At most one mutation per pass**: either an add or a removal, never both.

pub mod engine;
pub mod runner;

pub use engine::{Decision, NoChangeReason, PrSnapshot, ReconcileEngine};
pub use runner::{PassOutcome, ReconcileError, Reconciler, SkipReason};
