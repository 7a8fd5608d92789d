//! Predicates that drop uninteresting events before rendering.

use std::collections::BTreeSet;

use crate::github::models::Event;

const PUSH_EVENT: &str = "PushEvent";

/// Lower-cased author name fragments that identify automated committers.
const BOT_MARKERS: [&str; 3] = ["[bot]", "github actions", "github-actions"];

/// Returns true when a commit author name belongs to a bot or CI actor.
///
/// Matching is case-insensitive and looks for `[bot]`, `GitHub Actions` or
/// `github-actions` anywhere in the name.
#[must_use]
pub fn is_bot_author(name: &str) -> bool {
    let lowered = name.to_lowercase();
    BOT_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Returns true for push events where any commit was authored by a bot.
#[must_use]
pub fn is_bot_push(event: &Event) -> bool {
    event.event_type == PUSH_EVENT
        && event
            .payload
            .commits
            .iter()
            .filter_map(|commit| commit.author_name.as_deref())
            .any(is_bot_author)
}

/// Order-preserving filter over accumulated events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    ignored_types: BTreeSet<String>,
}

impl EventFilter {
    /// Creates a filter dropping the given event types.
    #[must_use]
    pub const fn new(ignored_types: BTreeSet<String>) -> Self {
        Self { ignored_types }
    }

    /// Returns true when the event type is in the ignore set.
    #[must_use]
    pub fn is_ignored_type(&self, event: &Event) -> bool {
        self.ignored_types.contains(&event.event_type)
    }

    /// Returns true when the event should appear in the summary.
    #[must_use]
    pub fn keeps(&self, event: &Event) -> bool {
        !self.is_ignored_type(event) && !is_bot_push(event)
    }

    /// Filters `events` in order, keeping at most `limit` survivors.
    #[must_use]
    pub fn apply(&self, events: &[Event], limit: usize) -> Vec<Event> {
        events
            .iter()
            .filter(|event| self.keeps(event))
            .take(limit)
            .cloned()
            .collect()
    }
}
