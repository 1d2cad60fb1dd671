//! Shared CLI utilities.

use crate::config::load_config;
use crate::domain::{Config, ProjectMetadata};
use crate::metadata;
use crate::store::{SessionStore, StateDir};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolved project root with its state layout and configuration.
pub struct Project {
    pub root: PathBuf,
    pub state: StateDir,
    pub config: Config,
}

impl Project {
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve project root {}", root.display()))?;
        if !root.is_dir() {
            anyhow::bail!("Path is not a directory: {}", root.display());
        }
        let config = load_config(&root, config_path)?;
        let state = StateDir::new(&root);
        Ok(Self { root, state, config })
    }

    pub fn sessions(&self) -> Result<SessionStore> {
        Ok(SessionStore::open(&self.state)?)
    }

    /// Metadata for context ranking: the chosen session's snapshot, else the
    /// canonical project artifact, else defaults.
    pub fn metadata(&self, session_id: Option<&str>) -> Result<ProjectMetadata> {
        let store = self.sessions()?;
        if let Some(session) = store.resolve(session_id)? {
            if let Some(meta) = store.load_metadata(&session)? {
                tracing::debug!("Using metadata from session {}", session.id);
                return Ok(meta);
            }
        }
        Ok(metadata::load_metadata(&self.state)?.unwrap_or_default())
    }
}

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_csv_trims_and_drops_empty() {
        let parsed = parse_csv(&Some(" routes, ,core ".to_string()));
        assert_eq!(parsed, Some(vec!["routes".to_string(), "core".to_string()]));
        assert_eq!(parse_csv(&None), None);
    }
}
