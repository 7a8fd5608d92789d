//! Gateways for reading activity data through Octocrab.
//!
//! The aggregator only sees the two traits below, so tests can substitute
//! mocks while `OctocrabActivityGateway` performs the real HTTP requests.

mod activity;
mod client;
mod error_mapping;

pub use activity::OctocrabActivityGateway;

use async_trait::async_trait;

use crate::github::error::ActivityError;
use crate::github::identity::Username;
use crate::github::models::{Event, RepositorySummary};

/// Largest page size GitHub accepts for listing endpoints.
pub const MAX_PER_PAGE: u8 = 100;

/// Page size used for event listing unless configured otherwise.
pub const DEFAULT_PER_PAGE: u8 = 30;

/// Parameters for listing one page of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListEventsParams {
    /// Page number to fetch (1-based).
    pub page: u32,
    /// Items per page (max 100).
    pub per_page: u8,
}

impl ListEventsParams {
    /// Creates parameters for the given page at the default page size.
    #[must_use]
    pub const fn page(page: u32) -> Self {
        Self {
            page,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Overrides the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }

    /// Checks the parameters against GitHub's pagination bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidPagination`] when the page is zero or
    /// the page size falls outside `1..=100`.
    pub fn validate(&self) -> Result<(), ActivityError> {
        if self.page == 0 {
            return Err(ActivityError::InvalidPagination {
                message: "page must be at least 1".to_owned(),
            });
        }

        if self.per_page == 0 {
            return Err(ActivityError::InvalidPagination {
                message: "per_page must be at least 1".to_owned(),
            });
        }

        if self.per_page > MAX_PER_PAGE {
            return Err(ActivityError::InvalidPagination {
                message: format!("per_page must not exceed {MAX_PER_PAGE}"),
            });
        }

        Ok(())
    }
}

impl Default for ListEventsParams {
    fn default() -> Self {
        Self::page(1)
    }
}

/// Paginated source of a user's public events.
///
/// An empty page signals that the feed has no more events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch one page of public events for `username`, newest first.
    async fn list_public_events(
        &self,
        username: &Username,
        params: &ListEventsParams,
    ) -> Result<Vec<Event>, ActivityError>;
}

/// Source of the authenticated user's repositories and their visibility.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryVisibilitySource: Send + Sync {
    /// Fetch every repository visible to the authenticated user.
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, ActivityError>;
}
