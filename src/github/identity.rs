//! Identity wrappers for the account whose activity is summarised.

use url::Url;

use super::error::ActivityError;

/// Public GitHub API endpoint used when no override is configured.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub login wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Validates that the login is non-empty and uses only the characters
    /// GitHub allows in logins (ASCII letters, digits and `-`).
    ///
    /// The login is placed in request paths as-is, so anything else is
    /// rejected rather than encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::MissingUsername`] when the value is blank and
    /// [`ActivityError::Configuration`] when it contains any other character.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ActivityError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ActivityError::MissingUsername);
        }
        if !trimmed
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '-')
        {
            return Err(ActivityError::Configuration {
                message: format!(
                    "GitHub username may only contain letters, digits and '-': {trimmed}"
                ),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the login.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn public_events_path(&self) -> String {
        format!("/users/{}/events/public", self.0)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ActivityError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ActivityError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Parses and normalises the API base URL.
///
/// Enterprise hosts are accepted verbatim, so `https://ghe.example.com/api/v3`
/// stays as given.
///
/// # Errors
///
/// Returns [`ActivityError::InvalidUrl`] when the value is not an absolute
/// HTTP(S) URL.
pub fn parse_api_base(value: &str) -> Result<Url, ActivityError> {
    let parsed =
        Url::parse(value.trim()).map_err(|error| ActivityError::InvalidUrl(error.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ActivityError::InvalidUrl(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}
