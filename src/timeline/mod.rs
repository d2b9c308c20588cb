//! Event timeline scanning.
//!
//! The reconciliation engine needs to know when a human last touched the
//! mergeable labels by hand, so that a manual correction is not reverted by a
//! command that predates it. This module answers "when did the latest event
//! matching X happen" over an issue's event history.

mod matcher;

use chrono::{DateTime, Utc};

use crate::config::LabelConfig;
use crate::types::Event;

pub use matcher::{AddLabel, And, EventMatcher, HumanActor, LabelName, Not, Or, RemoveLabel};

/// Returns the timestamp of the most recent event matching `matcher`.
///
/// Takes the maximum rather than the last element, so the answer does not
/// depend on the order the API returned events in. When timestamps tie, the
/// shared timestamp is returned.
pub fn last_event(events: &[Event], matcher: &impl EventMatcher) -> Option<DateTime<Utc>> {
    events
        .iter()
        .filter(|event| matcher.matches(event))
        .map(|event| event.created_at)
        .max()
}

/// Matches events on either the mergeable or the companion label.
pub fn mergeable_label(labels: &LabelConfig) -> Or<LabelName, LabelName> {
    LabelName::new(labels.mergeable.clone()).or(LabelName::new(labels.companion.clone()))
}

/// When a human last removed either mergeable label.
pub fn last_manual_removal(events: &[Event], labels: &LabelConfig) -> Option<DateTime<Utc>> {
    last_event(
        events,
        &RemoveLabel.and(mergeable_label(labels)).and(HumanActor),
    )
}

/// When a human last added either mergeable label.
pub fn last_manual_addition(events: &[Event], labels: &LabelConfig) -> Option<DateTime<Utc>> {
    last_event(
        events,
        &AddLabel.and(mergeable_label(labels)).and(HumanActor),
    )
}

/// When `label` was last added, by anyone.
pub fn label_added_time(events: &[Event], label: &str) -> Option<DateTime<Utc>> {
    last_event(events, &AddLabel.and(LabelName::new(label)))
}

/// When either mergeable label was last added, by anyone.
pub fn mergeable_label_added_time(
    events: &[Event],
    labels: &LabelConfig,
) -> Option<DateTime<Utc>> {
    label_added_time(events, &labels.mergeable).max(label_added_time(events, &labels.companion))
}
