//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.activity-digest.toml` in current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `ACTIVITY_DIGEST_USERNAME`,
//!    `ACTIVITY_DIGEST_TOKEN`, or legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--username`/`-u`, `--token`/`-t`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! username = "octocat"
//! token = "ghp_example"
//! event_limit = 5
//! ignore_events = "WatchEvent,ForkEvent"
//! readme_path = "README.md"
//! ```

use std::collections::BTreeSet;
use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::activity::AggregationSettings;
use crate::github::error::ActivityError;
use crate::github::identity::{DEFAULT_API_BASE, Username, parse_api_base};

/// Number of events summarised when no limit is configured.
pub const DEFAULT_EVENT_LIMIT: usize = 10;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `ACTIVITY_DIGEST_USERNAME` or `--username`: GitHub login to summarise
/// - `ACTIVITY_DIGEST_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `ACTIVITY_DIGEST_EVENT_LIMIT` or `--event-limit`: Number of events
/// - `ACTIVITY_DIGEST_IGNORE_EVENTS` or `--ignore-events`: Comma-separated types
/// - `ACTIVITY_DIGEST_README_PATH` or `--readme-path`: README to update
/// - `ACTIVITY_DIGEST_API_BASE` or `--api-base`: GitHub API base URL
///
/// # Example
///
/// ```no_run
/// use activity_digest::ActivityConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = ActivityConfig::load().expect("failed to load configuration");
/// let settings = config.aggregation_settings().expect("invalid configuration");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "ACTIVITY_DIGEST",
    discovery(
        dotfile_name = ".activity-digest.toml",
        config_file_name = "activity-digest.toml",
        app_name = "activity-digest"
    )
)]
pub struct ActivityConfig {
    /// GitHub login whose public events are summarised.
    ///
    /// Can be provided via:
    /// - CLI: `--username <LOGIN>` or `-u <LOGIN>`
    /// - Environment: `ACTIVITY_DIGEST_USERNAME`
    /// - Config file: `username = "..."`
    #[ortho_config(cli_short = 'u')]
    pub username: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `ACTIVITY_DIGEST_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Maximum number of events in the summary.
    ///
    /// Defaults to 10 and must be at least 1. Limits above one page of
    /// events are met by reading further pages.
    #[ortho_config(cli_short = 'n')]
    pub event_limit: usize,

    /// Comma-separated event types to leave out, e.g. `WatchEvent,ForkEvent`.
    #[ortho_config()]
    pub ignore_events: Option<String>,

    /// Markdown file whose activity section is rewritten.
    ///
    /// When unset the summary is printed to stdout.
    #[ortho_config()]
    pub readme_path: Option<String>,

    /// GitHub API base URL; set for GitHub Enterprise Server.
    #[ortho_config()]
    pub api_base: Option<String>,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            username: None,
            token: None,
            event_limit: DEFAULT_EVENT_LIMIT,
            ignore_events: None,
            readme_path: None,
            api_base: None,
        }
    }
}

impl ActivityConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, ActivityError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(ActivityError::MissingToken)
    }

    /// Returns the validated username.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::MissingUsername`] when none is configured.
    pub fn require_username(&self) -> Result<Username, ActivityError> {
        self.username
            .as_deref()
            .ok_or(ActivityError::MissingUsername)
            .and_then(Username::new)
    }

    /// Returns the event limit once it is known to be positive.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidEventLimit`] when the limit is zero.
    pub const fn event_limit(&self) -> Result<usize, ActivityError> {
        if self.event_limit == 0 {
            return Err(ActivityError::InvalidEventLimit {
                value: self.event_limit,
            });
        }
        Ok(self.event_limit)
    }

    /// Parses `ignore_events` into a set of event types.
    ///
    /// Entries are trimmed and blanks dropped.
    #[must_use]
    pub fn ignored_event_types(&self) -> BTreeSet<String> {
        self.ignore_events
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Returns the API base URL, defaulting to the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidUrl`] when the configured value is not
    /// an HTTP(S) URL.
    pub fn api_base_url(&self) -> Result<Url, ActivityError> {
        parse_api_base(self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE))
    }

    /// Builds the aggregation settings from the validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure from the username or event limit.
    pub fn aggregation_settings(&self) -> Result<AggregationSettings, ActivityError> {
        let username = self.require_username()?;
        let limit = self.event_limit()?;
        Ok(AggregationSettings::new(username, limit).with_ignore_events(self.ignored_event_types()))
    }
}

#[cfg(test)]
mod tests;
