// ── Session persistence seam ──
//
// Core never touches disk. The session controller writes its record
// through `SessionStore`; `stockroom-config` provides the file-backed
// implementation and tests use `MemorySessionStore`.

use std::sync::Mutex;

use crate::error::CoreError;
use crate::model::PersistedSession;

/// Durable storage for the one session record.
///
/// Only the session controller calls these methods.
pub trait SessionStore: Send + Sync {
    /// Load the stored record. A missing record is `Ok(None)`.
    fn load(&self) -> Result<Option<PersistedSession>, CoreError>;

    /// Replace the stored record.
    fn save(&self, record: &PersistedSession) -> Result<(), CoreError>;

    /// Remove the stored record. Removing a missing record succeeds.
    fn clear(&self) -> Result<(), CoreError>;
}

/// In-process store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<Option<PersistedSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a record already stored, as if from a previous run.
    pub fn with_record(record: PersistedSession) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    /// Current record, for inspection.
    pub fn snapshot(&self) -> Option<PersistedSession> {
        self.record.lock().expect("session record lock poisoned").clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<PersistedSession>, CoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, record: &PersistedSession) -> Result<(), CoreError> {
        *self.record.lock().expect("session record lock poisoned") = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.record.lock().expect("session record lock poisoned") = None;
        Ok(())
    }
}
