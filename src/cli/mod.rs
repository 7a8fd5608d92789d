//! Summary generation operation run by the binary.

use std::io::{self, Write};
use std::path::Path;

use activity_digest::github::OctocrabActivityGateway;
use activity_digest::{
    ActivityAggregator, ActivityConfig, ActivityError, EventSource, PersonalAccessToken,
    RepositoryVisibilitySource, default_table, readme,
};
use url::Url;

/// Generates the summary and writes it to stdout or the configured README.
///
/// # Errors
///
/// Returns configuration errors for a missing username or token, an invalid
/// event limit or API base, and I/O errors from writing the output.
pub async fn run(config: &ActivityConfig) -> Result<(), ActivityError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, OctocrabActivityGateway::for_token, &mut stdout).await
}

/// Generates the summary using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &ActivityConfig,
    build_gateway: F,
    writer: &mut W,
) -> Result<(), ActivityError>
where
    G: EventSource + RepositoryVisibilitySource,
    F: FnOnce(&PersonalAccessToken, &Url) -> Result<G, ActivityError>,
    W: Write,
{
    let settings = config.aggregation_settings()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let api_base = config.api_base_url()?;

    let gateway = build_gateway(&token, &api_base)?;
    let table = default_table();
    let aggregator = ActivityAggregator::new(&gateway, &gateway, &settings, &table);
    let summary = aggregator.summarise().await;

    config.readme_path.as_deref().map_or_else(
        || {
            writeln!(writer, "{summary}").map_err(|error| ActivityError::Io {
                message: error.to_string(),
            })
        },
        |path| readme::update_file(Path::new(path), &summary).map(|_| ()),
    )
}
