//! Paths inside the state directory and the `init` record.

use crate::domain::STATE_DIR_NAME;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Written to `config.json` by `lec init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitRecord {
    pub initialized: DateTime<Local>,
    pub project_root: PathBuf,
}

/// Layout of `<project_root>/.lec/`.
#[derive(Debug, Clone)]
pub struct StateDir {
    project_root: PathBuf,
    root: PathBuf,
}

impl StateDir {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            root: project_root.join(STATE_DIR_NAME),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    pub fn active_session_file(&self) -> PathBuf {
        self.root.join("active_session")
    }

    pub fn init_record_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Canonical project metadata artifact.
    pub fn metadata_file(&self) -> PathBuf {
        self.root.join("project_metadata.json")
    }

    pub fn context_map_file(&self) -> PathBuf {
        self.root.join("context_map.json")
    }

    pub fn learning_dir(&self) -> PathBuf {
        self.root.join("learning")
    }

    /// Create the state directory and record when and where it was initialized.
    pub fn init(&self) -> Result<InitRecord> {
        fs::create_dir_all(self.cache_dir())
            .with_context(|| format!("Failed to create {}", self.cache_dir().display()))?;
        let record = InitRecord {
            initialized: Local::now(),
            project_root: self.project_root.clone(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        write_atomic(&self.init_record_file(), json.as_bytes())?;
        tracing::info!("Initialized state directory at {}", self.root.display());
        Ok(record)
    }

    pub fn load_init_record(&self) -> Result<Option<InitRecord>> {
        let path = self.init_record_file();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed reading {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("Invalid init record: {}", path.display()))?;
        Ok(Some(record))
    }
}

/// Write `contents` to a sibling temp file and rename it over `path`.
///
/// Readers see either the old file or the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("state");
    let tmp = parent.join(format!(".{}.{}.tmp", file_name, std::process::id()));
    {
        let mut file = fs::File::create(&tmp)
            .with_context(|| format!("Failed to create {}", tmp.display()))?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move {} into place", path.display()))?;
    Ok(())
}
