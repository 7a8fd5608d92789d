//! Repository visibility lookup with per-event fallback.

use std::collections::HashMap;

use crate::github::models::{EventRepository, RepositorySummary};

/// Maps full repository names to whether they are public.
///
/// Built once per run from the authenticated user's repository listing.
/// Repositories missing from the map (for instance ones owned by someone
/// else) fall back to the flag embedded in the event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryVisibility {
    public_by_name: HashMap<String, bool>,
}

impl RepositoryVisibility {
    /// Builds the map from a repository listing.
    #[must_use]
    pub fn from_repositories(repositories: &[RepositorySummary]) -> Self {
        repositories
            .iter()
            .map(|repo| (repo.full_name.clone(), !repo.private))
            .collect()
    }

    /// Returns the listed visibility, if the repository is known.
    #[must_use]
    pub fn is_public(&self, full_name: &str) -> Option<bool> {
        self.public_by_name.get(full_name).copied()
    }

    /// Resolves the effective privacy of an event's repository.
    #[must_use]
    pub fn is_private(&self, repo: &EventRepository) -> bool {
        self.is_public(&repo.name)
            .map_or(repo.is_private, |is_public| !is_public)
    }

    /// Number of repositories with known visibility.
    #[must_use]
    pub fn len(&self) -> usize {
        self.public_by_name.len()
    }

    /// Returns true when no visibility data is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.public_by_name.is_empty()
    }
}

impl FromIterator<(String, bool)> for RepositoryVisibility {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            public_by_name: iter.into_iter().collect(),
        }
    }
}
