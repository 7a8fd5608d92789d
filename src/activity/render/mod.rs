//! Event description rendering.
//!
//! A [`DescriptionTable`] maps each event type to a [`Renderer`]: either a
//! single describer that ignores the action, or a set of describers keyed by
//! action. Lookups that find nothing produce [`UNKNOWN_EVENT`] or
//! [`UNKNOWN_ACTION`] instead of failing.

mod defaults;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::github::models::{Event, EventPayload, PullRequestRef};

pub use defaults::default_table;

/// Description used when an event type has no renderer.
pub const UNKNOWN_EVENT: &str = "Unknown event";

/// Description used when an action-keyed renderer lacks the event's action.
pub const UNKNOWN_ACTION: &str = "Unknown action";

const MERGED_ACTION: &str = "merged";

/// Everything a describer may use to produce a description.
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'event> {
    /// Full `owner/repo` name.
    pub repo: &'event str,
    /// Effective privacy after the visibility lookup.
    pub is_private: bool,
    /// Pull request carried by the payload, if any.
    pub pr: Option<&'event PullRequestRef>,
    /// Complete event payload.
    pub payload: &'event EventPayload,
}

impl<'event> EventContext<'event> {
    /// Builds the context for `event` with the resolved privacy flag.
    #[must_use]
    pub fn for_event(event: &'event Event, is_private: bool) -> Self {
        Self {
            repo: event.repo.name.as_str(),
            is_private,
            pr: event.payload.pull_request.as_ref(),
            payload: &event.payload,
        }
    }
}

/// Turns an event context into a human-readable description.
pub trait Describe: Send + Sync {
    /// Renders the description.
    fn describe(&self, context: &EventContext<'_>) -> String;
}

impl<F> Describe for F
where
    F: Fn(&EventContext<'_>) -> String + Send + Sync,
{
    fn describe(&self, context: &EventContext<'_>) -> String {
        self(context)
    }
}

/// Renderer registered for one event type.
pub enum Renderer {
    /// One describer for every action.
    Single(Box<dyn Describe>),
    /// Describers keyed by action.
    ByAction(BTreeMap<String, Box<dyn Describe>>),
}

impl Renderer {
    fn render(&self, action: &str, context: &EventContext<'_>) -> String {
        match self {
            Self::Single(describer) => describer.describe(context),
            Self::ByAction(by_action) => by_action.get(action).map_or_else(
                || UNKNOWN_ACTION.to_owned(),
                |describer| describer.describe(context),
            ),
        }
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(_) => formatter.write_str("Single"),
            Self::ByAction(by_action) => formatter
                .debug_tuple("ByAction")
                .field(&by_action.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Derives the action used for renderer lookup.
///
/// The explicit payload action wins; otherwise a merged pull request yields
/// `merged`; otherwise the action is empty.
#[must_use]
pub fn derive_action(payload: &EventPayload) -> &str {
    match (&payload.action, &payload.pull_request) {
        (Some(action), _) => action.as_str(),
        (None, Some(pr)) if pr.merged => MERGED_ACTION,
        _ => "",
    }
}

/// Lookup table from event type to renderer.
#[derive(Debug, Default)]
pub struct DescriptionTable {
    renderers: HashMap<String, Renderer>,
}

impl DescriptionTable {
    /// Creates an empty table; every lookup yields [`UNKNOWN_EVENT`].
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers a describer used for every action of `event_type`.
    #[must_use]
    pub fn with_single(mut self, event_type: &str, describer: impl Describe + 'static) -> Self {
        self.renderers
            .insert(event_type.to_owned(), Renderer::Single(Box::new(describer)));
        self
    }

    /// Registers a describer for one action of `event_type`.
    ///
    /// A single describer previously registered for the type is replaced by
    /// the action-keyed renderer.
    #[must_use]
    pub fn with_action(
        mut self,
        event_type: &str,
        action: &str,
        describer: impl Describe + 'static,
    ) -> Self {
        let entry = self
            .renderers
            .entry(event_type.to_owned())
            .or_insert_with(|| Renderer::ByAction(BTreeMap::new()));
        if matches!(entry, Renderer::Single(_)) {
            *entry = Renderer::ByAction(BTreeMap::new());
        }
        if let Renderer::ByAction(by_action) = entry {
            by_action.insert(action.to_owned(), Box::new(describer));
        }
        self
    }

    /// Returns the renderer registered for `event_type`.
    #[must_use]
    pub fn renderer(&self, event_type: &str) -> Option<&Renderer> {
        self.renderers.get(event_type)
    }

    /// Describes an event of `event_type` performing `action`.
    #[must_use]
    pub fn describe(&self, event_type: &str, action: &str, context: &EventContext<'_>) -> String {
        self.renderer(event_type).map_or_else(
            || UNKNOWN_EVENT.to_owned(),
            |renderer| renderer.render(action, context),
        )
    }
}
