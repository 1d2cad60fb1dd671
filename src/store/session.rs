//! Per-project sessions keyed by a hash of the resolved project path.
//!
//! A session id is the first 8 hex characters of SHA-256 over the resolved
//! absolute path. Truncation admits collisions (roughly 1 in 2^32 for two
//! random paths), which is accepted for a local single-user tool.
//!
//! The active-session pointer is a plain file holding the session directory
//! path. Switching overwrites it; there is no history and no locking.

use crate::domain::ProjectMetadata;
use crate::store::layout::{write_atomic, StateDir};
use crate::utils::{resolve_path, short_digest};
use anyhow::Context;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SESSION_ID_LEN: usize = 8;

const METADATA_FILE: &str = "project_metadata.json";
const LAST_SCANNED_FILE: &str = "last_scanned";
const PROJECT_ROOT_FILE: &str = "project_root";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session '{0}' not found")]
    NotFound(String),
    #[error("'{0}' is not a valid session id (expected 8 lowercase hex characters)")]
    InvalidId(String),
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub storage_dir: PathBuf,
    /// Resolved project root, when recorded.
    pub project_root: Option<PathBuf>,
    pub last_scanned: Option<DateTime<Local>>,
}

pub struct SessionStore {
    sessions_dir: PathBuf,
    active_file: PathBuf,
}

impl SessionStore {
    pub fn open(state: &StateDir) -> SessionResult<Self> {
        let sessions_dir = state.sessions_dir();
        fs::create_dir_all(&sessions_dir)
            .with_context(|| format!("Failed to create {}", sessions_dir.display()))?;
        Ok(Self { sessions_dir, active_file: state.active_session_file() })
    }

    /// Session id for a project path. Deterministic for a given resolved path.
    pub fn derive_id(path: &Path) -> String {
        Self::id_for_resolved(&resolve_path(path))
    }

    /// Session id for a path that is already resolved.
    pub fn id_for_resolved(resolved: &Path) -> String {
        short_digest(resolved.to_string_lossy().as_bytes(), SESSION_ID_LEN)
    }

    pub fn is_valid_id(id: &str) -> bool {
        id.len() == SESSION_ID_LEN && id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    fn check_id(id: &str) -> SessionResult<()> {
        if Self::is_valid_id(id) {
            Ok(())
        } else {
            Err(SessionError::InvalidId(id.to_string()))
        }
    }

    fn dir_for(&self, id: &str) -> PathBuf {
        self.sessions_dir.join(id)
    }

    /// Ensure the storage directory for the project at `path` exists.
    ///
    /// Does not write metadata.
    pub fn get_or_create(&self, path: &Path) -> SessionResult<Session> {
        let resolved = resolve_path(path);
        let id = Self::id_for_resolved(&resolved);
        let dir = self.dir_for(&id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create session directory {}", dir.display()))?;

        let root_file = dir.join(PROJECT_ROOT_FILE);
        if !root_file.exists() {
            write_atomic(&root_file, resolved.to_string_lossy().as_bytes())?;
        }
        Ok(self.read_session(&id))
    }

    /// Look up an existing session by id.
    pub fn get(&self, id: &str) -> SessionResult<Session> {
        Self::check_id(id)?;
        if !self.dir_for(id).is_dir() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        Ok(self.read_session(id))
    }

    fn read_session(&self, id: &str) -> Session {
        let dir = self.dir_for(id);
        let project_root = fs::read_to_string(dir.join(PROJECT_ROOT_FILE))
            .ok()
            .map(|s| PathBuf::from(s.trim()));
        let last_scanned = fs::read_to_string(dir.join(LAST_SCANNED_FILE))
            .ok()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|ts| ts.with_timezone(&Local));
        Session { id: id.to_string(), storage_dir: dir, project_root, last_scanned }
    }

    /// Make the session for `path` the active one, replacing any previous pointer.
    pub fn set_active(&self, path: &Path) -> SessionResult<Session> {
        let session = self.get_or_create(path)?;
        self.write_pointer(&session)?;
        Ok(session)
    }

    /// Make an existing session active by id.
    pub fn activate_id(&self, id: &str) -> SessionResult<Session> {
        let session = self.get(id)?;
        self.write_pointer(&session)?;
        Ok(session)
    }

    fn write_pointer(&self, session: &Session) -> SessionResult<()> {
        write_atomic(&self.active_file, session.storage_dir.to_string_lossy().as_bytes())?;
        tracing::debug!("Active session is now {}", session.id);
        Ok(())
    }

    /// The active session, if the pointer is set and still names a session directory.
    pub fn get_active(&self) -> SessionResult<Option<Session>> {
        let Ok(raw) = fs::read_to_string(&self.active_file) else {
            return Ok(None);
        };
        let pointed = PathBuf::from(raw.trim());
        let id = pointed.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        if !Self::is_valid_id(&id) || !pointed.is_dir() {
            tracing::debug!("Ignoring stale active session pointer {}", pointed.display());
            return Ok(None);
        }
        Ok(Some(Session { storage_dir: pointed, ..self.read_session(&id) }))
    }

    /// Session chosen by an explicit id, falling back to the active pointer.
    pub fn resolve(&self, explicit: Option<&str>) -> SessionResult<Option<Session>> {
        match explicit {
            Some(id) => self.get(id).map(Some),
            None => self.get_active(),
        }
    }

    /// Persist a metadata snapshot plus the scan timestamp.
    ///
    /// The timestamp lands first, so a reader never finds metadata without one.
    pub fn save_metadata(
        &self,
        session: &Session,
        metadata: &ProjectMetadata,
    ) -> SessionResult<DateTime<Local>> {
        let scanned_at = Local::now();
        let json = serde_json::to_string_pretty(metadata)
            .context("Failed to serialize project metadata")?;
        write_atomic(
            &session.storage_dir.join(LAST_SCANNED_FILE),
            scanned_at.to_rfc3339().as_bytes(),
        )?;
        write_atomic(&session.storage_dir.join(METADATA_FILE), json.as_bytes())?;
        Ok(scanned_at)
    }

    /// Saved metadata for `session`, or `None` if it was never scanned.
    pub fn load_metadata(&self, session: &Session) -> SessionResult<Option<ProjectMetadata>> {
        let path = session.storage_dir.join(METADATA_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed reading {}", path.display()))?;
        let metadata = serde_json::from_str(&content)
            .with_context(|| format!("Invalid session metadata: {}", path.display()))?;
        Ok(Some(metadata))
    }

    /// All sessions, sorted by id.
    pub fn list(&self) -> SessionResult<Vec<Session>> {
        let entries = fs::read_dir(&self.sessions_dir)
            .with_context(|| format!("Failed to list {}", self.sessions_dir.display()))?;
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| Self::is_valid_id(name))
            .collect();
        ids.sort();
        Ok(ids.iter().map(|id| self.read_session(id)).collect())
    }

    pub fn delete(&self, id: &str) -> SessionResult<()> {
        Self::check_id(id)?;
        let dir = self.dir_for(id);
        if !dir.is_dir() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to remove session {}", dir.display()))?;
        self.clear_pointer_if(&dir)?;
        Ok(())
    }

    /// Remove every session. Returns how many were removed; an empty store is a no-op.
    pub fn purge_all(&self) -> SessionResult<usize> {
        let sessions = self.list()?;
        for session in &sessions {
            fs::remove_dir_all(&session.storage_dir).with_context(|| {
                format!("Failed to remove session {}", session.storage_dir.display())
            })?;
        }
        if self.active_file.exists() {
            fs::remove_file(&self.active_file).context("Failed to clear active session")?;
        }
        Ok(sessions.len())
    }

    fn clear_pointer_if(&self, dir: &Path) -> SessionResult<()> {
        if let Ok(raw) = fs::read_to_string(&self.active_file) {
            if Path::new(raw.trim()) == dir {
                fs::remove_file(&self.active_file).context("Failed to clear active session")?;
            }
        }
        Ok(())
    }
}
