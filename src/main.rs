//! Activity digest CLI entrypoint.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use activity_digest::{ActivityConfig, ActivityError, telemetry};
use ortho_config::OrthoConfig;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = telemetry::init() {
        report(&error);
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ActivityError> {
    let config = load_config()?;
    cli::run(&config).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ActivityError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<ActivityConfig, ActivityError> {
    ActivityConfig::load().map_err(|error| ActivityError::Configuration {
        message: error.to_string(),
    })
}

fn report(error: &ActivityError) {
    let _ignored = writeln!(io::stderr().lock(), "{error}");
}
