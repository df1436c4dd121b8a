// ── Runtime client configuration ──
//
// These types describe *how* to reach the inventory backend and how the
// inventory view is shaped. They never touch disk: `stockroom-config`
// builds a `ClientConfig` from files and environment and hands it in.

use std::time::Duration;

use url::Url;

/// Default page size of the inventory grid.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 6;

/// Default quiet period before a typed search is sent.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed test backends).
    DangerAcceptInvalid,
}

/// Everything the controllers need to talk to one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the equipment resource (e.g., `https://api.example.com`).
    pub equipment_url: Url,
    /// Base URL of the auth resource. `None` uses `equipment_url`.
    pub auth_url: Option<Url>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Page size of the inventory grid. Always positive.
    pub items_per_page: usize,
    /// Quiet period of the search debouncer.
    pub search_debounce: Duration,
}

impl ClientConfig {
    /// Config with defaults for everything but the backend URL.
    pub fn new(equipment_url: Url) -> Self {
        Self {
            equipment_url,
            auth_url: None,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }

    pub(crate) fn transport(&self) -> stockroom_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => stockroom_api::TlsMode::System,
            TlsVerification::CustomCa(path) => stockroom_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => stockroom_api::TlsMode::DangerAcceptInvalid,
        };
        stockroom_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Build the shared gateway client.
    pub(crate) fn build_client(&self) -> Result<stockroom_api::ApiClient, stockroom_api::Error> {
        stockroom_api::ApiClient::new(
            self.equipment_url.as_str(),
            self.auth_url.as_ref().map(Url::as_str),
            &self.transport(),
        )
    }
}
