//! Translation of Octocrab failures into [`ActivityError`].
//!
//! The aggregator treats every variant as the end of the event feed, so the
//! mapping only has to keep the cause readable in the logged message.

use http::StatusCode;

use crate::github::error::ActivityError;

/// Token rejected or lacking scope for the events or repository listing.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Transport failures that never produced a GitHub response.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// GitHub signals quota exhaustion with 403 or 429 plus a rate-limit message
/// or documentation link; a bare 403 stays an authentication failure.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

/// Maps `error` for `operation` (e.g. `list public events`), leaving rate
/// limits to the gateway, which enriches them with the reset time.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ActivityError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return if is_auth_failure(source.status_code) {
            ActivityError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else {
            ActivityError::Api {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return ActivityError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ActivityError::Api {
        message: format!("{operation} failed: {error}"),
    }
}
