//! Octocrab-backed gateway for events and repository visibility.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use url::Url;

use crate::github::error::ActivityError;
use crate::github::identity::{PersonalAccessToken, Username};
use crate::github::models::{ApiEvent, ApiRepository, Event, RepositorySummary};
use crate::github::rate_limit::RateLimitInfo;

use super::client::build_octocrab_client;
use super::error_mapping::{is_rate_limit_error, map_octocrab_error};
use super::{EventSource, ListEventsParams, MAX_PER_PAGE, RepositoryVisibilitySource};


const REPOSITORIES_PATH: &str = "/user/repos";

/// Octocrab-backed gateway serving both the event feed and the repository
/// listing. Built once per run and shared by reference.
pub struct OctocrabActivityGateway {
    client: Octocrab,
}

impl OctocrabActivityGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidUrl` when the base URI cannot be parsed
    /// or `ActivityError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &Url) -> Result<Self, ActivityError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }

    async fn map_octocrab_error_with_rate_limit(
        &self,
        operation: &str,
        error: &octocrab::Error,
    ) -> ActivityError {
        match error {
            octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
                let rate_limit = self.fetch_rate_limit_info().await;
                let base_message =
                    format!("{operation} failed: {message}", message = source.message);
                let message = match &rate_limit {
                    Some(info) => format!(
                        "{base_message} (resets at {reset})",
                        reset = info.reset_at()
                    ),
                    None => base_message,
                };

                ActivityError::RateLimitExceeded {
                    rate_limit,
                    message,
                }
            }
            _ => map_octocrab_error(operation, error),
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        let Ok(limit) = u32::try_from(rate.limit) else {
            return None;
        };
        let Ok(remaining) = u32::try_from(rate.remaining) else {
            return None;
        };
        Some(RateLimitInfo::new(limit, remaining, rate.reset))
    }
}

#[async_trait]
impl EventSource for OctocrabActivityGateway {
    async fn list_public_events(
        &self,
        username: &Username,
        params: &ListEventsParams,
    ) -> Result<Vec<Event>, ActivityError> {
        params.validate()?;

        let page_str = params.page.to_string();
        let per_page_str = params.per_page.to_string();
        let query_params = [
            ("page", page_str.as_str()),
            ("per_page", per_page_str.as_str()),
        ];

        let page_result: Page<ApiEvent> = match self
            .client
            .get(username.public_events_path(), Some(&query_params))
            .await
        {
            Ok(page_result) => page_result,
            Err(error) => {
                return Err(self
                    .map_octocrab_error_with_rate_limit("list public events", &error)
                    .await);
            }
        };

        tracing::debug!(
            username = username.as_str(),
            page = params.page,
            count = page_result.items.len(),
            "fetched public events"
        );

        Ok(page_result.items.into_iter().map(Event::from).collect())
    }
}

#[async_trait]
impl RepositoryVisibilitySource for OctocrabActivityGateway {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, ActivityError> {
        let per_page_str = MAX_PER_PAGE.to_string();
        let query_params = [("per_page", per_page_str.as_str())];

        let first_page: Page<ApiRepository> = match self
            .client
            .get(REPOSITORIES_PATH, Some(&query_params))
            .await
        {
            Ok(page) => page,
            Err(error) => {
                return Err(self
                    .map_octocrab_error_with_rate_limit("list repositories", &error)
                    .await);
            }
        };

        self.client
            .all_pages(first_page)
            .await
            .map(|repositories| {
                repositories
                    .into_iter()
                    .map(RepositorySummary::from)
                    .collect()
            })
            .map_err(|error| map_octocrab_error("list repositories", &error))
    }
}
