//! Command parsing for label slash commands.
//!
//! Reviewers drive the mergeable label by posting comments. A comment counts
//! as a command only when its whole body (minus any `//` annotation) is the
//! command.
//!
//! # Supported Commands
//!
//! - `/lgtm` or `/approve` - apply the mergeable and companion labels
//! - `/lgtm cancel` or `/approve cancel` - remove the mergeable label
//!
//! # Example
//!
//! ```
//! use lgtm_bot::commands::{classify_comment, LabelCommand};
//!
//! assert_eq!(classify_comment("/lgtm"), LabelCommand::Merge);
//! assert_eq!(classify_comment("/lgtm cancel // new push"), LabelCommand::Cancel);
//! assert_eq!(classify_comment("Looks good, /lgtm"), LabelCommand::Neither);
//! ```

mod parser;
mod types;

pub use parser::{
    CANCEL_MODIFIER, COMMENT_DELIMITER, MERGE_COMMANDS, classify_comment, classify_fields,
    comment_fields, is_merge_command,
};
pub use types::LabelCommand;
