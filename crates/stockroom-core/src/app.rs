// ── Application root ──
//
// Builds both controllers once around one shared gateway client and runs
// the explicit startup sequence. Front ends hold a `Stockroom` instead of
// reaching for global state.

use std::sync::Arc;

use tracing::info;

use stockroom_api::ApiClient;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::inventory::InventoryController;
use crate::model::SessionPhase;
use crate::session::{AuthGate, SessionController};
use crate::store::SessionStore;

/// The wired-up application: config, session, and inventory.
#[derive(Clone)]
pub struct Stockroom {
    config: Arc<ClientConfig>,
    session: SessionController,
    inventory: InventoryController,
}

impl Stockroom {
    /// Build the gateway client and both controllers. Makes no requests.
    pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, CoreError> {
        let client = config.build_client()?;
        Ok(Self::with_client(config, Arc::new(client), store))
    }

    /// Wire controllers around an existing client.
    pub fn with_client(
        config: ClientConfig,
        client: Arc<ApiClient>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let session = SessionController::new(Arc::clone(&client), store);
        let inventory = InventoryController::new(
            client,
            session.clone(),
            config.items_per_page,
            config.search_debounce,
        );
        Self {
            config: Arc::new(config),
            session,
            inventory,
        }
    }

    /// Load the persisted session, then verify it.
    ///
    /// Returns the resulting phase. When it is `Authenticated` the caller
    /// typically follows up with `inventory().fetch_items()`.
    pub async fn start(&self) -> SessionPhase {
        let phase = self.session.restore().await;
        info!(?phase, backend = %self.config.equipment_url, "startup complete");
        phase
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn inventory(&self) -> &InventoryController {
        &self.inventory
    }

    /// A fresh gate for a protected surface.
    pub fn auth_gate(&self) -> AuthGate {
        AuthGate::new(self.session.clone())
    }
}
