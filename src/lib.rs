//! Activity digest library crate summarising a GitHub user's public activity.
//!
//! The library wraps Octocrab to page through a user's public events, drops
//! ignored types and bot pushes, resolves repository visibility, and renders
//! a numbered Markdown list suitable for a profile README.

pub mod activity;
pub mod config;
pub mod github;
pub mod readme;
pub mod telemetry;

pub use activity::{
    ActivityAggregator, AggregationSettings, CollectedEvents, DescriptionTable, default_table,
};
pub use config::ActivityConfig;
pub use github::{
    ActivityError, Event, EventSource, OctocrabActivityGateway, PersonalAccessToken,
    RepositoryVisibilitySource, Username,
};
