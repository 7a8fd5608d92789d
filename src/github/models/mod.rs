//! Data models representing GitHub activity events and repositories.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into the public domain types consumed by the aggregator.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[cfg(feature = "test-support")]
pub mod test_support;

/// One unit of public activity from a user's event feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event identifier assigned by GitHub.
    pub id: Option<String>,
    /// Event type tag such as `PushEvent` or `IssuesEvent`.
    pub event_type: String,
    /// Repository the event happened in.
    pub repo: EventRepository,
    /// Type-specific payload.
    pub payload: EventPayload,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
}

/// Repository reference embedded in an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRepository {
    /// Full `owner/repo` name.
    pub name: String,
    /// Visibility as reported by the event itself.
    pub is_private: bool,
}

/// Event payload with the fields the renderers and filters care about.
///
/// `raw` keeps the complete payload so renderers can read fields that are
/// not modelled here (`ref`, `ref_type`, `release`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPayload {
    /// Explicit action, e.g. `opened` or `closed`.
    pub action: Option<String>,
    /// Pull request the event refers to.
    pub pull_request: Option<PullRequestRef>,
    /// Issue the event refers to.
    pub issue: Option<IssueRef>,
    /// Commits carried by push events, in push order.
    pub commits: Vec<Commit>,
    /// Untouched JSON payload.
    pub raw: Value,
}

impl Default for EventPayload {
    fn default() -> Self {
        Self {
            action: None,
            pull_request: None,
            issue: None,
            commits: Vec::new(),
            raw: Value::Null,
        }
    }
}

impl EventPayload {
    /// Returns a top-level string field of the raw payload.
    #[must_use]
    pub fn raw_str(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }

    /// Returns a string field of a nested object in the raw payload.
    #[must_use]
    pub fn raw_nested_str(&self, object: &str, key: &str) -> Option<&str> {
        self.raw
            .get(object)
            .and_then(|nested| nested.get(key))
            .and_then(Value::as_str)
    }
}

/// Commit summary from a push event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    /// Commit SHA.
    pub sha: Option<String>,
    /// Commit message.
    pub message: Option<String>,
    /// Git author name (not the GitHub login).
    pub author_name: Option<String>,
}

/// Pull request reference embedded in an event payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Pull request number.
    pub number: u64,
    /// Title, when the payload includes it.
    pub title: Option<String>,
    /// HTML URL for linking.
    pub html_url: Option<String>,
    /// Whether the pull request has been merged.
    pub merged: bool,
}

/// Issue reference embedded in an event payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueRef {
    /// Issue number.
    pub number: u64,
    /// Title, when the payload includes it.
    pub title: Option<String>,
    /// HTML URL for linking.
    pub html_url: Option<String>,
}

/// Repository owned by the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    /// Short repository name.
    pub name: String,
    /// Full `owner/repo` name, matching event repository names.
    pub full_name: String,
    /// Whether the repository is private.
    pub private: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEvent {
    pub(crate) id: Option<String>,
    #[serde(rename = "type")]
    pub(crate) event_type: String,
    pub(crate) repo: ApiEventRepository,
    pub(crate) public: Option<bool>,
    #[serde(default)]
    pub(crate) payload: Value,
    pub(crate) created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEventRepository {
    pub(crate) name: String,
    pub(crate) private: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ApiPullRequestRef {
    number: u64,
    title: Option<String>,
    html_url: Option<String>,
    merged: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ApiIssueRef {
    number: u64,
    title: Option<String>,
    html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) name: String,
    pub(crate) full_name: Option<String>,
    #[serde(default)]
    pub(crate) private: bool,
    pub(crate) owner: Option<ApiOwner>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiOwner {
    pub(crate) login: String,
}

impl From<ApiEvent> for Event {
    fn from(value: ApiEvent) -> Self {
        // Prefer the repository's own flag; events only carry `public`.
        let is_private = value
            .repo
            .private
            .unwrap_or_else(|| !value.public.unwrap_or(true));

        Self {
            id: value.id,
            event_type: value.event_type,
            repo: EventRepository {
                name: value.repo.name,
                is_private,
            },
            payload: EventPayload::from_raw(value.payload),
            created_at: value.created_at,
        }
    }
}

impl EventPayload {
    /// Builds a payload from raw JSON.
    ///
    /// Each modelled field is read on its own, so a field with an unexpected
    /// shape is dropped without taking its siblings with it.
    #[must_use]
    pub fn from_raw(raw: Value) -> Self {
        Self {
            action: raw_field::<String>(&raw, "action"),
            pull_request: raw_field::<ApiPullRequestRef>(&raw, "pull_request").map(|pr| {
                PullRequestRef {
                    number: pr.number,
                    title: pr.title,
                    html_url: pr.html_url,
                    merged: pr.merged.unwrap_or(false),
                }
            }),
            issue: raw_field::<ApiIssueRef>(&raw, "issue").map(|issue| IssueRef {
                number: issue.number,
                title: issue.title,
                html_url: issue.html_url,
            }),
            commits: raw
                .get("commits")
                .and_then(Value::as_array)
                .map(|commits| commits.iter().map(Commit::from_raw).collect())
                .unwrap_or_default(),
            raw,
        }
    }
}

impl Commit {
    fn from_raw(raw: &Value) -> Self {
        let text = |value: Option<&Value>| value.and_then(Value::as_str).map(ToOwned::to_owned);
        Self {
            sha: text(raw.get("sha")),
            message: text(raw.get("message")),
            author_name: text(raw.get("author").and_then(|author| author.get("name"))),
        }
    }
}

fn raw_field<T: DeserializeOwned>(raw: &Value, key: &str) -> Option<T> {
    raw.get(key)
        .and_then(|value| T::deserialize(value).ok())
}

impl From<ApiRepository> for RepositorySummary {
    fn from(value: ApiRepository) -> Self {
        let full_name = value.full_name.unwrap_or_else(|| match &value.owner {
            Some(owner) => format!("{}/{}", owner.login, value.name),
            None => value.name.clone(),
        });

        Self {
            name: value.name,
            full_name,
            private: value.private,
        }
    }
}
