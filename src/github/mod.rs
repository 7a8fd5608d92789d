//! GitHub access for activity summaries.
//!
//! This module wraps Octocrab to list a user's public events and the
//! authenticated user's repositories. Errors are mapped into user-friendly
//! variants so callers never see Octocrab internals.

pub mod error;
pub mod gateway;
pub mod identity;
pub mod models;
pub mod rate_limit;

pub use error::ActivityError;
pub use gateway::{
    EventSource, ListEventsParams, OctocrabActivityGateway, RepositoryVisibilitySource,
};
pub use identity::{DEFAULT_API_BASE, PersonalAccessToken, Username, parse_api_base};
pub use models::{
    Commit, Event, EventPayload, EventRepository, IssueRef, PullRequestRef, RepositorySummary,
};

#[cfg(test)]
pub use gateway::{MockEventSource, MockRepositoryVisibilitySource};
