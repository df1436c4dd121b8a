// ── Session domain types ──

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Where the session state machine currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Unauthenticated,
    /// A stored token is being checked against the backend.
    Verifying,
    Authenticated,
    /// Last login attempt failed. Not authenticated.
    Error,
}

/// Observable session snapshot published by the session controller.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    pub token: Option<SecretString>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            user: None,
            token: None,
            loading: false,
            error: None,
        }
    }
}

/// The session record kept across restarts.
///
/// Holds exactly `{token, user, isAuthenticated}`. `is_authenticated` is
/// informational only: a restored record is always re-verified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
}
