//! Error types exposed by the GitHub activity layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while loading configuration or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActivityError {
    /// No GitHub username was configured.
    #[error("GitHub username is required")]
    MissingUsername,

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The configured API base URL could not be parsed.
    #[error("API base URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if it could be fetched after the failure.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// The configured event limit is not a positive integer.
    #[error("event limit must be at least 1, got {value}")]
    InvalidEventLimit {
        /// The rejected value.
        value: usize,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The README did not contain a usable activity section.
    #[error("README must contain {start} followed by {end}")]
    MissingReadmeMarkers {
        /// Expected opening marker.
        start: &'static str,
        /// Expected closing marker.
        end: &'static str,
    },
}
