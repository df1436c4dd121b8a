// ── File-backed session record ──
//
// One JSON document (`{"token":…,"user":…,"isAuthenticated":…}`) at a
// fixed path. Writes go to a sibling temp file and are renamed into place
// so a crash never leaves a half-written record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use stockroom_core::{CoreError, PersistedSession, SessionStore};

/// [`SessionStore`] persisting the record as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn persistence_error(&self, action: &str, err: impl std::fmt::Display) -> CoreError {
        CoreError::Persistence {
            message: format!("failed to {action} {}: {err}", self.path.display()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<PersistedSession>, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.persistence_error("read", e)),
        };
        let record: PersistedSession =
            serde_json::from_str(&raw).map_err(|e| self.persistence_error("parse", e))?;
        debug!(path = %self.path.display(), "loaded session record");
        Ok(Some(record))
    }

    fn save(&self, record: &PersistedSession) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.persistence_error("prepare", e))?;
        }
        let json = serde_json::to_string(record).map_err(|e| self.persistence_error("encode", e))?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, json).map_err(|e| self.persistence_error("write", e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.persistence_error("replace", e))?;
        debug!(path = %self.path.display(), "saved session record");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "cleared session record");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.persistence_error("remove", e)),
        }
    }
}
