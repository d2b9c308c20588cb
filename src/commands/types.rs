//! Command types for label slash commands.
//!
//! These commands are parsed from GitHub issue/PR comments.

use serde::{Deserialize, Serialize};

/// The classification of a comment body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelCommand {
    /// `/lgtm` or `/approve` on its own.
    ///
    /// Asks for the mergeable label (and its companion) to be applied.
    Merge,

    /// `/lgtm cancel` or `/approve cancel`.
    ///
    /// Asks for the mergeable label to be removed.
    Cancel,

    /// Anything else, including commands with extra arguments.
    Neither,
}
