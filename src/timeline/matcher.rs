//! Composable predicates over timeline events.
//!
//! Matchers are small values that can be combined with [`EventMatcher::and`],
//! [`EventMatcher::or`] and [`EventMatcher::not`]. Combinators short-circuit
//! left to right, like `&&` and `||`. Any `Fn(&Event) -> bool` is a matcher too.

use crate::types::{Event, EventAction};

/// A predicate over a single [`Event`].
pub trait EventMatcher {
    fn matches(&self, event: &Event) -> bool;

    fn and<M: EventMatcher>(self, other: M) -> And<Self, M>
    where
        Self: Sized,
    {
        And(self, other)
    }

    fn or<M: EventMatcher>(self, other: M) -> Or<Self, M>
    where
        Self: Sized,
    {
        Or(self, other)
    }

    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

impl<F> EventMatcher for F
where
    F: Fn(&Event) -> bool,
{
    fn matches(&self, event: &Event) -> bool {
        self(event)
    }
}

/// Matches when both sides match. The right side is not evaluated if the
/// left side fails.
#[derive(Debug, Clone, Copy)]
pub struct And<A, B>(pub A, pub B);

impl<A: EventMatcher, B: EventMatcher> EventMatcher for And<A, B> {
    fn matches(&self, event: &Event) -> bool {
        self.0.matches(event) && self.1.matches(event)
    }
}

/// Matches when either side matches. The right side is not evaluated if the
/// left side succeeds.
#[derive(Debug, Clone, Copy)]
pub struct Or<A, B>(pub A, pub B);

impl<A: EventMatcher, B: EventMatcher> EventMatcher for Or<A, B> {
    fn matches(&self, event: &Event) -> bool {
        self.0.matches(event) || self.1.matches(event)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Not<A>(pub A);

impl<A: EventMatcher> EventMatcher for Not<A> {
    fn matches(&self, event: &Event) -> bool {
        !self.0.matches(event)
    }
}

/// Matches `labeled` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLabel;

impl EventMatcher for AddLabel {
    fn matches(&self, event: &Event) -> bool {
        event.action == EventAction::LabelAdded
    }
}

/// Matches `unlabeled` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveLabel;

impl EventMatcher for RemoveLabel {
    fn matches(&self, event: &Event) -> bool {
        event.action == EventAction::LabelRemoved
    }
}

/// Matches events on a label with exactly this name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelName(pub String);

impl LabelName {
    pub fn new(name: impl Into<String>) -> Self {
        LabelName(name.into())
    }
}

impl EventMatcher for LabelName {
    fn matches(&self, event: &Event) -> bool {
        event.label == self.0
    }
}

/// Matches events performed by someone other than the bot.
///
/// Events with no actor are not attributed to a human.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanActor;

impl EventMatcher for HumanActor {
    fn matches(&self, event: &Event) -> bool {
        event.actor.is_some() && event.actor_is_human
    }
}
