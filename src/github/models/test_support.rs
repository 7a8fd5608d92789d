//! Test helpers for constructing `Event` fixtures.
//!
//! # Examples
//!
//! ```
//! use activity_digest::github::models::test_support::{issues_event, push_event};
//!
//! let issue = issues_event("octocat/hello-world", "opened", 7);
//! assert_eq!(issue.payload.action.as_deref(), Some("opened"));
//!
//! let push = push_event("octocat/hello-world", &["Mona", "renovate[bot]"]);
//! assert_eq!(push.payload.commits.len(), 2);
//! ```

use serde_json::{Value, json};

use super::{Event, EventPayload, EventRepository, IssueRef, PullRequestRef};

/// Constructs a public event of the given type with an empty payload.
#[must_use]
pub fn event(event_type: &str, repo: &str) -> Event {
    Event {
        id: None,
        event_type: event_type.to_owned(),
        repo: EventRepository {
            name: repo.to_owned(),
            is_private: false,
        },
        payload: EventPayload::default(),
        created_at: None,
    }
}

/// Marks an event's embedded repository as private.
#[must_use]
pub fn private(mut event: Event) -> Event {
    event.repo.is_private = true;
    event
}

/// Constructs a `PushEvent` with one commit per author name.
#[must_use]
pub fn push_event(repo: &str, authors: &[&str]) -> Event {
    let commits: Vec<Value> = authors
        .iter()
        .enumerate()
        .map(|(index, author)| {
            json!({
                "sha": format!("{index:040x}"),
                "message": format!("commit {index}"),
                "author": { "name": author },
            })
        })
        .collect();

    Event {
        payload: EventPayload::from_raw(json!({
            "ref": "refs/heads/main",
            "size": authors.len(),
            "commits": commits,
        })),
        ..event("PushEvent", repo)
    }
}

/// Constructs an `IssuesEvent` with the given action and issue number.
#[must_use]
pub fn issues_event(repo: &str, action: &str, number: u64) -> Event {
    Event {
        payload: EventPayload {
            action: Some(action.to_owned()),
            issue: Some(IssueRef {
                number,
                title: Some(format!("Issue {number}")),
                html_url: Some(format!("https://github.com/{repo}/issues/{number}")),
            }),
            ..EventPayload::default()
        },
        ..event("IssuesEvent", repo)
    }
}

/// Constructs a `PullRequestEvent`; `action` of `None` models payloads that
/// only carry the pull request object.
#[must_use]
pub fn pull_request_event(repo: &str, action: Option<&str>, number: u64, merged: bool) -> Event {
    Event {
        payload: EventPayload {
            action: action.map(ToOwned::to_owned),
            pull_request: Some(PullRequestRef {
                number,
                title: Some(format!("Pull request {number}")),
                html_url: Some(format!("https://github.com/{repo}/pull/{number}")),
                merged,
            }),
            ..EventPayload::default()
        },
        ..event("PullRequestEvent", repo)
    }
}
