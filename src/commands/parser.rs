//! Parser for label commands in comment text.
//!
//! This module provides a pure parser that classifies unstructured GitHub
//! comment text. It never fails: anything unrecognised is `Neither`.

use super::types::LabelCommand;

/// Tokens that request the mergeable label.
///
/// `/lgtm` is the legacy spelling and `/approve` its successor; both are
/// honoured until the legacy one is removed.
pub const MERGE_COMMANDS: &[&str] = &["/lgtm", "/approve"];

/// Second field that turns a merge command into a cancellation.
pub const CANCEL_MODIFIER: &str = "cancel";

/// Everything from the first occurrence of this marker onward is an inline
/// annotation, not part of the command.
pub const COMMENT_DELIMITER: &str = "//";

/// Splits a comment body into command fields.
///
/// Text from the first [`COMMENT_DELIMITER`] onward is dropped, then the
/// remainder is split on whitespace. Leading and trailing whitespace never
/// produces empty fields.
///
/// # Examples
///
/// ```
/// use lgtm_bot::commands::comment_fields;
///
/// assert_eq!(comment_fields("/lgtm cancel"), vec!["/lgtm", "cancel"]);
/// assert_eq!(comment_fields("  /lgtm // looks good  "), vec!["/lgtm"]);
/// assert!(comment_fields("// just a note").is_empty());
/// ```
pub fn comment_fields(body: &str) -> Vec<&str> {
    let command = match body.find(COMMENT_DELIMITER) {
        Some(pos) => &body[..pos],
        None => body,
    };
    command.split_whitespace().collect()
}

/// Returns true if `token` is a merge command, ignoring case.
pub fn is_merge_command(token: &str) -> bool {
    MERGE_COMMANDS
        .iter()
        .any(|cmd| cmd.eq_ignore_ascii_case(token))
}

/// Classifies a field sequence produced by [`comment_fields`].
///
/// - exactly one field that is a merge command: `Merge`
/// - exactly two fields, a merge command followed by `cancel`: `Cancel`
/// - anything else: `Neither`
pub fn classify_fields(fields: &[&str]) -> LabelCommand {
    match fields {
        [cmd] if is_merge_command(cmd) => LabelCommand::Merge,
        [cmd, modifier]
            if is_merge_command(cmd) && modifier.eq_ignore_ascii_case(CANCEL_MODIFIER) =>
        {
            LabelCommand::Cancel
        }
        _ => LabelCommand::Neither,
    }
}

/// Classifies a raw comment body.
///
/// # Examples
///
/// ```
/// use lgtm_bot::commands::{LabelCommand, classify_comment};
///
/// assert_eq!(classify_comment("/LGTM"), LabelCommand::Merge);
/// assert_eq!(classify_comment("/approve Cancel"), LabelCommand::Cancel);
/// assert_eq!(classify_comment("/lgtm thanks!"), LabelCommand::Neither);
/// assert_eq!(classify_comment("I think /lgtm"), LabelCommand::Neither);
/// ```
pub fn classify_comment(body: &str) -> LabelCommand {
    classify_fields(&comment_fields(body))
}
