// ── Session controller ──
//
// Owns the auth state machine: restore a persisted token, verify it,
// log in, log out, and the forced local logout used when the backend
// answers 401. State is published through a `watch` channel and the
// durable record is written only from here.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use stockroom_api::{ApiClient, Credentials, LOGIN_FAILED_MESSAGE};

use crate::error::CoreError;
use crate::model::{PersistedSession, SessionPhase, SessionState, User};
use crate::store::SessionStore;

// ── SessionController ────────────────────────────────────────────

/// Cheaply cloneable handle to the session state machine.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<SessionState>,
    /// Held for the duration of a verify call.
    verify_lock: Mutex<()>,
    /// Bumped each time a verify call completes.
    verify_epoch: AtomicU64,
}

impl SessionController {
    pub fn new(client: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            inner: Arc::new(SessionInner {
                client,
                store,
                state,
                verify_lock: Mutex::new(()),
                verify_epoch: AtomicU64::new(0),
            }),
        }
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.borrow().phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.inner.client
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Load the persisted record and verify any token it holds.
    ///
    /// A stored `isAuthenticated` flag is never trusted on its own: the
    /// session only becomes authenticated once the backend accepts the token.
    pub async fn restore(&self) -> SessionPhase {
        let record = match self.inner.store.load() {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "failed to load persisted session, starting signed out");
                None
            }
        };

        let token = record
            .as_ref()
            .and_then(|r| r.token.as_deref())
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.to_owned()));

        match token {
            Some(token) => {
                debug!("restored persisted token, verifying");
                let user = record.and_then(|r| r.user);
                self.inner.state.send_modify(|s| {
                    s.token = Some(token);
                    s.user = user;
                    s.phase = SessionPhase::Verifying;
                    s.loading = true;
                });
                self.verify().await
            }
            None => {
                self.inner.state.send_replace(SessionState::default());
                SessionPhase::Unauthenticated
            }
        }
    }

    /// Check the held token against the backend.
    ///
    /// Success keeps the token and refreshes the user. Any failure downgrades
    /// silently to unauthenticated and clears the persisted record. Callers
    /// that arrive while a verify is already in flight wait for it and
    /// report its outcome instead of issuing a second request.
    pub async fn verify(&self) -> SessionPhase {
        let seen = self.inner.verify_epoch.load(Ordering::Acquire);
        let _guard = self.inner.verify_lock.lock().await;
        if self.inner.verify_epoch.load(Ordering::Acquire) != seen {
            return self.phase();
        }

        let phase = self.verify_locked().await;
        self.inner.verify_epoch.fetch_add(1, Ordering::AcqRel);
        phase
    }

    async fn verify_locked(&self) -> SessionPhase {
        let token = self.inner.state.borrow().token.clone();
        let Some(token) = token else {
            self.inner.state.send_modify(|s| {
                s.phase = SessionPhase::Unauthenticated;
                s.user = None;
                s.loading = false;
            });
            return SessionPhase::Unauthenticated;
        };

        self.inner.state.send_modify(|s| {
            s.phase = SessionPhase::Verifying;
            s.loading = true;
        });

        match self.inner.client.verify_token(&token).await {
            Ok(auth) => {
                let user = User::from(auth.user);
                info!(user = %user.email, "session verified");
                self.inner.client.set_token(token.clone());
                self.inner.state.send_modify(|s| {
                    s.phase = SessionPhase::Authenticated;
                    s.user = Some(user);
                    s.token = Some(token);
                    s.loading = false;
                    s.error = None;
                });
                self.persist();
                SessionPhase::Authenticated
            }
            Err(e) => {
                info!(error = %e, "stored session rejected, signing out");
                self.reset_local();
                SessionPhase::Unauthenticated
            }
        }
    }

    /// Authenticate with credentials.
    ///
    /// On failure the session ends up signed out with `error` set to the
    /// server's message (or a generic fallback), and the same error is
    /// returned.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, CoreError> {
        self.inner.state.send_modify(|s| {
            s.phase = SessionPhase::Verifying;
            s.loading = true;
            s.error = None;
        });

        match self.inner.client.login(credentials).await {
            Ok(auth) => {
                let user = User::from(auth.user);
                let token = SecretString::from(auth.token);
                info!(user = %user.email, "logged in");
                self.inner.client.set_token(token.clone());
                self.inner.state.send_replace(SessionState {
                    phase: SessionPhase::Authenticated,
                    user: Some(user.clone()),
                    token: Some(token),
                    loading: false,
                    error: None,
                });
                self.persist();
                Ok(user)
            }
            Err(e) => {
                let message = match e {
                    stockroom_api::Error::Authentication { message } => message,
                    other => {
                        debug!(error = %other, "login transport failure");
                        LOGIN_FAILED_MESSAGE.to_owned()
                    }
                };
                warn!(%message, "login failed");
                self.inner.client.clear_token();
                self.clear_persisted();
                self.inner.state.send_replace(SessionState {
                    phase: SessionPhase::Error,
                    error: Some(message.clone()),
                    ..SessionState::default()
                });
                Err(CoreError::AuthenticationFailed { message })
            }
        }
    }

    /// Sign out.
    ///
    /// Local state and the persisted record are cleared first. The backend
    /// is then told on a best-effort basis; failures are logged and ignored.
    pub async fn logout(&self) {
        let token = self.inner.state.borrow().token.clone();
        self.reset_local();
        info!("logged out");

        if let Some(token) = token {
            if let Err(e) = self.inner.client.logout(&token).await {
                warn!(error = %e, "backend logout failed (non-fatal)");
            }
        }
    }

    /// Forced local sign-out after the backend rejected the token.
    ///
    /// Does not contact the backend.
    pub fn expire(&self) {
        let signed_out = {
            let state = self.inner.state.borrow();
            state.token.is_none() && !state.is_authenticated()
        };
        if signed_out {
            return;
        }
        warn!("session expired, signing out");
        self.reset_local();
    }

    /// Drop the last login error.
    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|s| {
            if s.error.is_none() && s.phase != SessionPhase::Error {
                return false;
            }
            s.error = None;
            if s.phase == SessionPhase::Error {
                s.phase = SessionPhase::Unauthenticated;
            }
            true
        });
    }

    // ── Internals ────────────────────────────────────────────────

    fn reset_local(&self) {
        self.inner.client.clear_token();
        self.clear_persisted();
        self.inner.state.send_replace(SessionState::default());
    }

    fn persist(&self) {
        let record = {
            let state = self.inner.state.borrow();
            PersistedSession {
                token: state.token.as_ref().map(|t| t.expose_secret().to_owned()),
                user: state.user.clone(),
                is_authenticated: state.is_authenticated(),
            }
        };
        if let Err(e) = self.inner.store.save(&record) {
            warn!(error = %e, "failed to persist session");
        }
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "failed to clear persisted session");
        }
    }
}

// ── AuthGate ─────────────────────────────────────────────────────

/// What a protected surface should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    /// Verification or login in progress.
    Loading,
    LoginPrompt,
    Protected,
}

impl GateView {
    pub fn for_state(state: &SessionState) -> Self {
        if state.loading {
            Self::Loading
        } else if state.is_authenticated() {
            Self::Protected
        } else {
            Self::LoginPrompt
        }
    }
}

/// Authorization gate in front of the protected surface.
///
/// Verifies the session once, the first time it is mounted.
pub struct AuthGate {
    session: SessionController,
    mounted: AtomicBool,
}

impl AuthGate {
    pub fn new(session: SessionController) -> Self {
        Self {
            session,
            mounted: AtomicBool::new(false),
        }
    }

    /// Run verification on first mount. Later mounts do nothing.
    pub async fn mount(&self) -> GateView {
        if !self.mounted.swap(true, Ordering::AcqRel) {
            self.session.verify().await;
        }
        self.view()
    }

    pub fn view(&self) -> GateView {
        GateView::for_state(&self.session.inner.state.borrow())
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }
}
