//! Built-in describers for the common GitHub event types.
//!
//! Descriptions are Markdown. Private repositories are never linked.

use super::{DescriptionTable, EventContext};

const PRIVATE_REPOSITORY: &str = "a private repository";
const GITHUB_WEB: &str = "https://github.com";

/// Returns the table used when no custom renderers are supplied.
#[must_use]
pub fn default_table() -> DescriptionTable {
    DescriptionTable::empty()
        .with_single("PushEvent", push)
        .with_single("CreateEvent", create)
        .with_single("DeleteEvent", delete)
        .with_single("ForkEvent", fork)
        .with_single("WatchEvent", watch)
        .with_single("PublicEvent", publicise)
        .with_single("ReleaseEvent", release)
        .with_single("IssueCommentEvent", issue_comment)
        .with_single("PullRequestReviewEvent", pull_request_review)
        .with_action("IssuesEvent", "opened", opened_issue)
        .with_action("IssuesEvent", "closed", closed_issue)
        .with_action("IssuesEvent", "reopened", reopened_issue)
        .with_action("PullRequestEvent", "opened", opened_pull_request)
        .with_action("PullRequestEvent", "closed", closed_pull_request)
        .with_action("PullRequestEvent", "reopened", reopened_pull_request)
        .with_action("PullRequestEvent", "merged", merged_pull_request)
}

fn repo_link(context: &EventContext<'_>) -> String {
    if context.is_private {
        PRIVATE_REPOSITORY.to_owned()
    } else {
        format!("[{repo}]({GITHUB_WEB}/{repo})", repo = context.repo)
    }
}

fn numbered_link(number: u64, html_url: Option<&str>, is_private: bool) -> String {
    match html_url {
        Some(url) if !is_private => format!("[#{number}]({url})"),
        _ => format!("#{number}"),
    }
}

fn issue_link(context: &EventContext<'_>) -> String {
    context.payload.issue.as_ref().map_or_else(
        || "an issue".to_owned(),
        |issue| numbered_link(issue.number, issue.html_url.as_deref(), context.is_private),
    )
}

fn pull_request_link(context: &EventContext<'_>) -> String {
    context.pr.map_or_else(
        || "a pull request".to_owned(),
        |pr| numbered_link(pr.number, pr.html_url.as_deref(), context.is_private),
    )
}

fn push(context: &EventContext<'_>) -> String {
    let count = context
        .payload
        .raw
        .get("size")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or_else(|| u64::try_from(context.payload.commits.len()).unwrap_or(u64::MAX));
    let noun = if count == 1 { "commit" } else { "commits" };
    format!("Pushed {count} {noun} to {}", repo_link(context))
}

fn create(context: &EventContext<'_>) -> String {
    let ref_type = context.payload.raw_str("ref_type").unwrap_or("repository");
    if ref_type == "repository" {
        return format!("Created repository {}", repo_link(context));
    }
    match context.payload.raw_str("ref") {
        Some(name) => format!("Created {ref_type} `{name}` in {}", repo_link(context)),
        None => format!("Created a {ref_type} in {}", repo_link(context)),
    }
}

fn delete(context: &EventContext<'_>) -> String {
    let ref_type = context.payload.raw_str("ref_type").unwrap_or("branch");
    match context.payload.raw_str("ref") {
        Some(name) => format!("Deleted {ref_type} `{name}` in {}", repo_link(context)),
        None => format!("Deleted a {ref_type} in {}", repo_link(context)),
    }
}

fn fork(context: &EventContext<'_>) -> String {
    format!("Forked {}", repo_link(context))
}

fn watch(context: &EventContext<'_>) -> String {
    format!("Starred {}", repo_link(context))
}

fn publicise(context: &EventContext<'_>) -> String {
    format!("Made {} public", repo_link(context))
}

fn release(context: &EventContext<'_>) -> String {
    match context.payload.raw_nested_str("release", "tag_name") {
        Some(tag) => format!("Published release `{tag}` in {}", repo_link(context)),
        None => format!("Published a release in {}", repo_link(context)),
    }
}

fn issue_comment(context: &EventContext<'_>) -> String {
    format!(
        "Commented on {} in {}",
        issue_link(context),
        repo_link(context)
    )
}

fn pull_request_review(context: &EventContext<'_>) -> String {
    format!(
        "Reviewed PR {} in {}",
        pull_request_link(context),
        repo_link(context)
    )
}

fn issue_with_verb(verb: &str, context: &EventContext<'_>) -> String {
    format!(
        "{verb} issue {} in {}",
        issue_link(context),
        repo_link(context)
    )
}

fn opened_issue(context: &EventContext<'_>) -> String {
    issue_with_verb("Opened", context)
}

fn closed_issue(context: &EventContext<'_>) -> String {
    issue_with_verb("Closed", context)
}

fn reopened_issue(context: &EventContext<'_>) -> String {
    issue_with_verb("Reopened", context)
}

fn pull_request_with_verb(verb: &str, context: &EventContext<'_>) -> String {
    format!(
        "{verb} PR {} in {}",
        pull_request_link(context),
        repo_link(context)
    )
}

fn opened_pull_request(context: &EventContext<'_>) -> String {
    pull_request_with_verb("Opened", context)
}

fn closed_pull_request(context: &EventContext<'_>) -> String {
    pull_request_with_verb("Closed", context)
}

fn reopened_pull_request(context: &EventContext<'_>) -> String {
    pull_request_with_verb("Reopened", context)
}

fn merged_pull_request(context: &EventContext<'_>) -> String {
    pull_request_with_verb("Merged", context)
}
