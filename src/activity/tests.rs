//! Unit tests for the fetch-filter-converge loop and rendering pass.

use std::io;
use std::sync::{Arc, Mutex};

use mockall::Sequence;
use rstest::{fixture, rstest};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use super::{ActivityAggregator, AggregationSettings, DescriptionTable, EventContext};
use crate::github::error::ActivityError;
use crate::github::gateway::{MockEventSource, MockRepositoryVisibilitySource};
use crate::github::identity::Username;
use crate::github::models::test_support::{event, issues_event, private, push_event};
use crate::github::models::{Event, RepositorySummary};

fn settings(limit: usize, ignore: &[&str]) -> AggregationSettings {
    let username = Username::new("octocat").expect("username should be valid");
    AggregationSettings::new(username, limit).with_ignore_events(ignore.iter().copied())
}

/// Event source serving `pages` in order; pages past the end are empty.
fn paged_source(pages: Vec<Vec<Event>>, expected_calls: usize) -> MockEventSource {
    let mut source = MockEventSource::new();
    source
        .expect_list_public_events()
        .times(expected_calls)
        .returning(move |username, params| {
            assert_eq!(username.as_str(), "octocat");
            let index = usize::try_from(params.page.saturating_sub(1)).unwrap_or(usize::MAX);
            Ok(pages.get(index).cloned().unwrap_or_default())
        });
    source
}

#[fixture]
fn no_repositories() -> MockRepositoryVisibilitySource {
    let mut repositories = MockRepositoryVisibilitySource::new();
    repositories
        .expect_list_repositories()
        .returning(|| Ok(Vec::new()));
    repositories
}

/// Table naming each event by repository so ordering is easy to assert.
fn repo_table() -> DescriptionTable {
    let by_repo = |context: &EventContext<'_>| context.repo.to_owned();
    DescriptionTable::empty()
        .with_single("IssuesEvent", by_repo)
        .with_single("PushEvent", by_repo)
        .with_single("WatchEvent", by_repo)
        .with_single("ForkEvent", by_repo)
}

fn issue(repo: &str) -> Event {
    issues_event(repo, "opened", 1)
}

/// Collects formatted log lines emitted on the current thread.
#[derive(Clone, Default)]
struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn lines(&self) -> Vec<String> {
        let buffer = self.buffer.lock().expect("log buffer mutex should be available");
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(ToOwned::to_owned)
            .collect()
    }

    fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(needle))
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("log buffer mutex should be available")
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'writer> MakeWriter<'writer> for LogCapture {
    type Writer = Self;

    fn make_writer(&'writer self) -> Self::Writer {
        self.clone()
    }
}

#[rstest]
#[tokio::test]
async fn documented_example_yields_single_line_and_skip_count(
    no_repositories: MockRepositoryVisibilitySource,
) {
    let source = paged_source(
        vec![vec![
            event("WatchEvent", "rust-lang/rust"),
            issues_event("octocat/hello-world", "opened", 7),
        ]],
        2,
    );
    let settings = settings(2, &["WatchEvent"]);
    let table = super::default_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let summary = aggregator.summarise().await;

    assert_eq!(
        summary,
        "1. Opened issue [#7](https://github.com/octocat/hello-world/issues/7) in \
         [octocat/hello-world](https://github.com/octocat/hello-world)"
    );
}

#[rstest]
#[tokio::test]
async fn skip_count_is_accumulated_minus_survivors(
    no_repositories: MockRepositoryVisibilitySource,
) {
    let source = paged_source(
        vec![vec![
            event("WatchEvent", "rust-lang/rust"),
            issue("octocat/hello-world"),
        ]],
        2,
    );
    let settings = settings(2, &["WatchEvent"]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let collected = aggregator.collect().await;

    assert_eq!(collected.events.len(), 1);
    assert_eq!(collected.accumulated, 2);
    assert_eq!(collected.skipped, 1);
}

#[rstest]
#[case::one(1)]
#[case::three(3)]
#[case::five(5)]
#[tokio::test]
async fn exactly_limit_lines_when_enough_events_survive(
    no_repositories: MockRepositoryVisibilitySource,
    #[case] limit: usize,
) {
    let page: Vec<Event> = (0..6).map(|n| issue(&format!("octocat/repo-{n}"))).collect();
    let source = paged_source(vec![page], 1);
    let settings = settings(limit, &[]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let summary = aggregator.summarise().await;

    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), limit);
    for (index, line) in lines.iter().enumerate() {
        let expected = format!("{}. octocat/repo-{index}", index + 1);
        assert_eq!(*line, expected);
    }
}

#[rstest]
#[tokio::test]
async fn accumulation_continues_within_a_batch_until_limit_is_reached(
    no_repositories: MockRepositoryVisibilitySource,
) {
    let source = paged_source(
        vec![
            vec![issue("octocat/a")],
            vec![issue("octocat/b")],
            vec![issue("octocat/c"), issue("octocat/d")],
        ],
        3,
    );
    let settings = settings(3, &[]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let summary = aggregator.summarise().await;

    assert_eq!(summary, "1. octocat/a\n2. octocat/b\n3. octocat/c");
}

#[rstest]
#[tokio::test]
async fn refetched_batch_is_placed_before_earlier_events(
    no_repositories: MockRepositoryVisibilitySource,
) {
    // Page 1 fills the first batch but only one event survives, so page 2 is
    // fetched and merged in front of it. The page 1 survivor is then cut off.
    let source = paged_source(
        vec![
            vec![event("WatchEvent", "octocat/starred"), issue("octocat/newest")],
            vec![issue("octocat/older"), issue("octocat/oldest")],
        ],
        2,
    );
    let settings = settings(2, &["WatchEvent"]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let summary = aggregator.summarise().await;

    assert_eq!(summary, "1. octocat/older\n2. octocat/oldest");
}

#[rstest]
#[tokio::test]
async fn refetch_with_partial_survivors_keeps_merged_order(
    no_repositories: MockRepositoryVisibilitySource,
) {
    let source = paged_source(
        vec![
            vec![event("WatchEvent", "octocat/starred"), issue("octocat/newest")],
            vec![event("WatchEvent", "octocat/other"), issue("octocat/older")],
        ],
        2,
    );
    let settings = settings(2, &["WatchEvent"]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let collected = aggregator.collect().await;

    let repos: Vec<&str> = collected
        .events
        .iter()
        .map(|event| event.repo.name.as_str())
        .collect();
    assert_eq!(repos, vec!["octocat/older", "octocat/newest"]);
    assert_eq!(collected.accumulated, 4);
    assert_eq!(collected.skipped, 2);
}

#[rstest]
#[tokio::test]
async fn exhausted_source_stops_the_convergence_loop(
    no_repositories: MockRepositoryVisibilitySource,
) {
    // Page 2 is empty: the source is marked exhausted and never called again.
    let source = paged_source(
        vec![vec![
            event("WatchEvent", "octocat/a"),
            event("WatchEvent", "octocat/b"),
        ]],
        2,
    );
    let settings = settings(2, &["WatchEvent"]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let collected = aggregator.collect().await;

    assert!(collected.events.is_empty());
    assert_eq!(collected.skipped, 2);
}

#[rstest]
#[tokio::test]
async fn fetch_failure_is_treated_as_end_of_feed(no_repositories: MockRepositoryVisibilitySource) {
    let mut sequence = Sequence::new();
    let mut source = MockEventSource::new();
    source
        .expect_list_public_events()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Ok(vec![issue("octocat/a")]));
    source
        .expect_list_public_events()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| {
            Err(ActivityError::Network {
                message: "connection reset".to_owned(),
            })
        });
    let settings = settings(3, &[]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let summary = aggregator.summarise().await;

    assert_eq!(summary, "1. octocat/a");
}

#[rstest]
#[tokio::test]
async fn first_page_failure_yields_empty_summary(no_repositories: MockRepositoryVisibilitySource) {
    let mut source = MockEventSource::new();
    source
        .expect_list_public_events()
        .times(1)
        .returning(|_, _| {
            Err(ActivityError::Authentication {
                message: "Bad credentials".to_owned(),
            })
        });
    let settings = settings(5, &[]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    assert_eq!(aggregator.summarise().await, "");
}

#[rstest]
#[tokio::test]
async fn bot_pushes_are_dropped_and_human_pushes_kept(
    no_repositories: MockRepositoryVisibilitySource,
) {
    let source = paged_source(
        vec![vec![
            push_event("octocat/bot-push", &["Mona", "github-actions[bot]"]),
            push_event("octocat/human-push", &["Mona", "Hubot"]),
        ]],
        2,
    );
    let settings = settings(2, &[]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let summary = aggregator.summarise().await;

    assert_eq!(summary, "1. octocat/human-push");
}

#[rstest]
#[tokio::test]
async fn zero_limit_skips_fetching(no_repositories: MockRepositoryVisibilitySource) {
    let source = paged_source(Vec::new(), 0);
    let settings = settings(0, &[]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    assert_eq!(aggregator.summarise().await, "");
}

#[tokio::test]
async fn listed_visibility_overrides_event_flag() {
    let source = paged_source(
        vec![vec![
            private(issues_event("octocat/now-public", "opened", 1)),
            private(issues_event("someone/else", "opened", 2)),
        ]],
        1,
    );
    let mut repositories = MockRepositoryVisibilitySource::new();
    repositories.expect_list_repositories().returning(|| {
        Ok(vec![RepositorySummary {
            name: "now-public".to_owned(),
            full_name: "octocat/now-public".to_owned(),
            private: false,
        }])
    });
    let settings = settings(2, &[]);
    let table = super::default_table();
    let aggregator = ActivityAggregator::new(&source, &repositories, &settings, &table);

    let summary = aggregator.summarise().await;

    assert_eq!(
        summary,
        "1. Opened issue [#1](https://github.com/octocat/now-public/issues/1) in \
         [octocat/now-public](https://github.com/octocat/now-public)\n\
         2. Opened issue #2 in a private repository"
    );
}

#[tokio::test]
async fn repository_listing_failure_falls_back_to_event_flags() {
    let source = paged_source(
        vec![vec![private(issues_event("octocat/secret", "closed", 3))]],
        2,
    );
    let mut repositories = MockRepositoryVisibilitySource::new();
    repositories.expect_list_repositories().returning(|| {
        Err(ActivityError::Api {
            message: "list repositories failed with status 500".to_owned(),
        })
    });
    let settings = settings(2, &[]);
    let table = super::default_table();
    let aggregator = ActivityAggregator::new(&source, &repositories, &settings, &table);

    let summary = aggregator.summarise().await;

    assert_eq!(summary, "1. Closed issue #3 in a private repository");
}

#[rstest]
fn render_reports_unknown_types_and_actions(no_repositories: MockRepositoryVisibilitySource) {
    let source = MockEventSource::new();
    let settings = settings(3, &[]);
    let table = super::default_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);
    let events = vec![
        event("GollumEvent", "octocat/wiki"),
        issues_event("octocat/hello-world", "labeled", 9),
    ];

    let rendered = aggregator.render(&events, &super::RepositoryVisibility::default());

    assert_eq!(rendered, "1. Unknown event\n2. Unknown action");
}

#[rstest]
#[tokio::test]
async fn short_summary_logs_skip_count_and_end_of_feed(
    no_repositories: MockRepositoryVisibilitySource,
) {
    let logs = LogCapture::default();
    let _guard = logs.install();
    let source = paged_source(
        vec![vec![
            event("WatchEvent", "rust-lang/rust"),
            issues_event("octocat/hello-world", "opened", 7),
        ]],
        2,
    );
    let settings = settings(2, &["WatchEvent"]);
    let table = super::default_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let collected = aggregator.collect().await;

    let end_of_feed = logs.lines_containing("no more events available");
    assert_eq!(end_of_feed.len(), 1, "logs: {:?}", logs.lines());
    assert!(
        end_of_feed.iter().all(|line| line.contains("WARN") && line.contains("page=2")),
        "unexpected end-of-feed line: {end_of_feed:?}"
    );

    let shortfall = logs.lines_containing("survived filtering");
    assert_eq!(shortfall.len(), 1, "logs: {:?}", logs.lines());
    let expected_field = format!("skipped={}", collected.accumulated - collected.events.len());
    assert!(
        shortfall.iter().all(|line| line.contains("WARN")
            && line.contains("skipped=1")
            && line.contains(&expected_field)
            && line.contains("found=1")
            && line.contains("limit=2")),
        "unexpected shortfall line: {shortfall:?}"
    );
}

#[rstest]
#[tokio::test]
async fn fetch_failure_is_logged_with_its_message(no_repositories: MockRepositoryVisibilitySource) {
    let logs = LogCapture::default();
    let _guard = logs.install();
    let mut source = MockEventSource::new();
    source.expect_list_public_events().times(1).returning(|_, _| {
        Err(ActivityError::Network {
            message: "connection reset".to_owned(),
        })
    });
    let settings = settings(1, &[]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let _summary = aggregator.summarise().await;

    let failures = logs.lines_containing("failed to fetch events");
    assert_eq!(failures.len(), 1, "logs: {:?}", logs.lines());
    assert!(
        failures
            .iter()
            .all(|line| line.contains("ERROR") && line.contains("connection reset")),
        "unexpected failure line: {failures:?}"
    );
}

#[rstest]
#[tokio::test]
async fn full_summary_logs_no_shortfall(no_repositories: MockRepositoryVisibilitySource) {
    let logs = LogCapture::default();
    let _guard = logs.install();
    let source = paged_source(vec![vec![issue("octocat/a"), issue("octocat/b")]], 1);
    let settings = settings(2, &[]);
    let table = repo_table();
    let aggregator = ActivityAggregator::new(&source, &no_repositories, &settings, &table);

    let _summary = aggregator.summarise().await;

    assert!(
        logs.lines_containing("survived filtering").is_empty(),
        "logs: {:?}",
        logs.lines()
    );
}
