//! Splices the activity summary into a Markdown document.
//!
//! The summary replaces whatever sits between [`START_MARKER`] and
//! [`END_MARKER`]; the rest of the document is left untouched.

use std::fs;
use std::path::Path;

use crate::github::error::ActivityError;

/// Comment opening the activity section.
pub const START_MARKER: &str = "<!--START_SECTION:activity-->";

/// Comment closing the activity section.
pub const END_MARKER: &str = "<!--END_SECTION:activity-->";

/// Replaces the activity section of `document` with `content`.
///
/// # Errors
///
/// Returns [`ActivityError::MissingReadmeMarkers`] when either marker is
/// absent or the end marker precedes the start marker.
pub fn replace_section(document: &str, content: &str) -> Result<String, ActivityError> {
    let missing = || ActivityError::MissingReadmeMarkers {
        start: START_MARKER,
        end: END_MARKER,
    };

    let (before, rest) = document.split_once(START_MARKER).ok_or_else(missing)?;
    let (_, after) = rest.split_once(END_MARKER).ok_or_else(missing)?;

    Ok(format!(
        "{before}{START_MARKER}\n{content}\n{END_MARKER}{after}"
    ))
}

/// Rewrites the activity section of the file at `path`.
///
/// Returns `false` without writing when the section already holds `content`.
///
/// # Errors
///
/// Returns [`ActivityError::Io`] when the file cannot be read or written and
/// [`ActivityError::MissingReadmeMarkers`] when the markers are missing.
pub fn update_file(path: &Path, content: &str) -> Result<bool, ActivityError> {
    let current = fs::read_to_string(path).map_err(|error| ActivityError::Io {
        message: format!("read {}: {error}", path.display()),
    })?;
    let updated = replace_section(&current, content)?;

    if updated == current {
        tracing::info!(path = %path.display(), "activity section already up to date");
        return Ok(false);
    }

    fs::write(path, updated).map_err(|error| ActivityError::Io {
        message: format!("write {}: {error}", path.display()),
    })?;
    tracing::info!(path = %path.display(), "activity section updated");
    Ok(true)
}
