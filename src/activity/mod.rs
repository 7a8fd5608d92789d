//! Fetch, filter and render a user's recent public activity.
//!
//! [`ActivityAggregator`] pulls pages from an [`EventSource`] until enough
//! events survive the [`EventFilter`], then renders the survivors through a
//! [`DescriptionTable`]. Source failures never escape: they are logged and
//! treated as the end of the feed, so the caller always receives a (possibly
//! short or empty) summary.

pub mod filter;
pub mod render;
pub mod visibility;

use std::collections::BTreeSet;

use crate::github::gateway::{
    DEFAULT_PER_PAGE, EventSource, ListEventsParams, RepositoryVisibilitySource,
};
use crate::github::identity::Username;
use crate::github::models::Event;

pub use filter::EventFilter;
pub use render::{DescriptionTable, EventContext, Renderer, default_table, derive_action};
pub use visibility::RepositoryVisibility;

#[cfg(test)]
mod tests;

/// Inputs controlling one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationSettings {
    /// Account whose public events are summarised.
    pub username: Username,
    /// Maximum number of rendered events.
    pub event_limit: usize,
    /// Event types to drop.
    pub ignore_events: BTreeSet<String>,
    /// Page size requested from the event source.
    pub per_page: u8,
}

impl AggregationSettings {
    /// Creates settings with no ignored types and the default page size.
    #[must_use]
    pub const fn new(username: Username, event_limit: usize) -> Self {
        Self {
            username,
            event_limit,
            ignore_events: BTreeSet::new(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Replaces the ignored event types.
    #[must_use]
    pub fn with_ignore_events<I, S>(mut self, ignore_events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_events = ignore_events.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }
}

/// Outcome of the fetch-filter-converge loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedEvents {
    /// Surviving events in accumulated order, at most `event_limit` long.
    pub events: Vec<Event>,
    /// Number of events fetched in total.
    pub accumulated: usize,
    /// Fetched events that did not make it into `events`.
    pub skipped: usize,
}

/// Position in the paginated event feed, shared across top-up fetches.
#[derive(Debug, Clone, Copy)]
struct PageCursor {
    next_page: u32,
    exhausted: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            next_page: 1,
            exhausted: false,
        }
    }
}

/// Builds the activity summary from an event source and a repository
/// visibility source.
pub struct ActivityAggregator<'client, Events, Repositories>
where
    Events: EventSource,
    Repositories: RepositoryVisibilitySource,
{
    events: &'client Events,
    repositories: &'client Repositories,
    settings: &'client AggregationSettings,
    table: &'client DescriptionTable,
    filter: EventFilter,
}

impl<'client, Events, Repositories> ActivityAggregator<'client, Events, Repositories>
where
    Events: EventSource,
    Repositories: RepositoryVisibilitySource,
{
    /// Creates an aggregator over the given sources.
    #[must_use]
    pub fn new(
        events: &'client Events,
        repositories: &'client Repositories,
        settings: &'client AggregationSettings,
        table: &'client DescriptionTable,
    ) -> Self {
        Self {
            events,
            repositories,
            settings,
            table,
            filter: EventFilter::new(settings.ignore_events.clone()),
        }
    }

    /// Produces the numbered, newline-joined summary.
    ///
    /// Never fails: source errors shorten the summary instead.
    pub async fn summarise(&self) -> String {
        let visibility = self.load_visibility().await;
        let collected = self.collect().await;
        self.render(&collected.events, &visibility)
    }

    /// Loads repository visibility, falling back to an empty map on error.
    pub async fn load_visibility(&self) -> RepositoryVisibility {
        self.repositories.list_repositories().await.map_or_else(
            |error| {
                tracing::error!(
                    %error,
                    "failed to list repositories; using event visibility flags"
                );
                RepositoryVisibility::default()
            },
            |repositories| RepositoryVisibility::from_repositories(&repositories),
        )
    }

    /// Runs the fetch-filter-converge loop.
    ///
    /// Each top-up batch is placed before the events accumulated so far, so a
    /// refetch can push newer survivors out of the truncated result.
    pub async fn collect(&self) -> CollectedEvents {
        let limit = self.settings.event_limit;
        if limit == 0 {
            return CollectedEvents::default();
        }

        let mut cursor = PageCursor::default();
        let mut accumulated = self.fetch_batch(&mut cursor).await;
        let mut kept = self.filter.apply(&accumulated, limit);

        while kept.len() < limit {
            let mut batch = self.fetch_batch(&mut cursor).await;
            if batch.is_empty() {
                break;
            }
            batch.append(&mut accumulated);
            accumulated = batch;
            kept = self.filter.apply(&accumulated, limit);
        }

        kept.truncate(limit);
        let skipped = accumulated.len().saturating_sub(kept.len());
        if kept.len() < limit {
            tracing::warn!(
                found = kept.len(),
                limit,
                skipped,
                "fewer events than requested survived filtering; {skipped} skipped"
            );
        }

        CollectedEvents {
            events: kept,
            accumulated: accumulated.len(),
            skipped,
        }
    }

    /// Renders events as `"{ordinal}. {description}"` lines.
    #[must_use]
    pub fn render(&self, events: &[Event], visibility: &RepositoryVisibility) -> String {
        events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let context = EventContext::for_event(event, visibility.is_private(&event.repo));
                let action = derive_action(&event.payload);
                let description = self.table.describe(&event.event_type, action, &context);
                format!("{ordinal}. {description}", ordinal = index + 1)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn fetch_batch(&self, cursor: &mut PageCursor) -> Vec<Event> {
        let mut batch = Vec::new();
        if cursor.exhausted {
            return batch;
        }

        loop {
            let params =
                ListEventsParams::page(cursor.next_page).with_per_page(self.settings.per_page);
            match self
                .events
                .list_public_events(&self.settings.username, &params)
                .await
            {
                Ok(page) if page.is_empty() => {
                    tracing::warn!(page = params.page, "no more events available");
                    cursor.exhausted = true;
                    break;
                }
                Ok(mut page) => {
                    batch.append(&mut page);
                    cursor.next_page = cursor.next_page.saturating_add(1);
                    if batch.len() >= self.settings.event_limit {
                        break;
                    }
                }
                Err(error) => {
                    tracing::error!(page = params.page, %error, "failed to fetch events");
                    cursor.exhausted = true;
                    break;
                }
            }
        }

        batch
    }
}
