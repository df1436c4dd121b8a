//! Shared configuration for stockroom front ends.
//!
//! TOML file + `STOCKROOM_` environment layering via figment, semantic
//! validation, translation to `stockroom_core::ClientConfig`, the
//! file-backed session store, and tracing initialisation.

pub mod logging;
pub mod session_store;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use stockroom_core::config::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_SEARCH_DEBOUNCE, DEFAULT_TIMEOUT};
use stockroom_core::{ClientConfig, TlsVerification};

pub use logging::init_tracing;
pub use session_store::FileSessionStore;

/// Environment variable prefix. Nested keys are split on `__`,
/// e.g. `STOCKROOM_BACKEND__EQUIPMENT_URL`.
pub const ENV_PREFIX: &str = "STOCKROOM_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ConfigError>),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to initialise logging: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the backend lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the equipment resource. Required to build a client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_url: Option<String>,

    /// Base URL of the auth resource, when it lives on another host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            equipment_url: None,
            auth_url: None,
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InventoryConfig {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

/// Where the session record is kept between runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// File stem of the record (`<storage_name>.json`).
    #[serde(default = "default_storage_name")]
    pub storage_name: String,

    /// Directory of the record. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_name: default_storage_name(),
            storage_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `stockroom_core=debug`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Log file. When unset logs go to stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}
fn default_search_debounce_ms() -> u64 {
    u64::try_from(DEFAULT_SEARCH_DEBOUNCE.as_millis()).unwrap_or(300)
}
fn default_storage_name() -> String {
    "auth-storage".into()
}
fn default_level() -> String {
    "info".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "stockroom", "stockroom")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default directory of the session record.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("stockroom");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Validation ──────────────────────────────────────────────────────

fn parse_http_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw
        .trim()
        .parse()
        .map_err(|e| ConfigError::validation(field, format!("'{raw}' is not a URL ({e})")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::validation(
            field,
            format!("expected an http or https URL, got scheme '{other}'"),
        )),
    }
}

impl Config {
    /// Check every section and report all problems at once.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if let Some(raw) = &self.backend.equipment_url {
            if let Err(e) = parse_http_url("backend.equipment_url", raw) {
                errors.push(e);
            }
        }
        if let Some(raw) = &self.backend.auth_url {
            if let Err(e) = parse_http_url("backend.auth_url", raw) {
                errors.push(e);
            }
        }
        if self.backend.timeout == 0 {
            errors.push(ConfigError::validation(
                "backend.timeout",
                "must be at least 1 second",
            ));
        }
        if self.backend.insecure && self.backend.ca_cert.is_some() {
            errors.push(ConfigError::validation(
                "backend.insecure",
                "cannot be combined with backend.ca_cert",
            ));
        }

        if self.inventory.items_per_page == 0 {
            errors.push(ConfigError::validation(
                "inventory.items_per_page",
                "must be greater than zero",
            ));
        }

        let name = self.session.storage_name.trim();
        if name.is_empty() {
            errors.push(ConfigError::validation(
                "session.storage_name",
                "must not be empty",
            ));
        } else if name.contains(['/', '\\']) || name == "." || name == ".." {
            errors.push(ConfigError::validation(
                "session.storage_name",
                format!("'{name}' must be a plain file name"),
            ));
        }

        if let Err(e) = logging::build_filter(&self.logging.level) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Build the core client config. Validates first.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        self.validate().map_err(ConfigError::Invalid)?;

        let raw = self.backend.equipment_url.as_deref().ok_or_else(|| {
            ConfigError::validation("backend.equipment_url", "is required to reach the backend")
        })?;
        let equipment_url = parse_http_url("backend.equipment_url", raw)?;
        let auth_url = self
            .backend
            .auth_url
            .as_deref()
            .map(|raw| parse_http_url("backend.auth_url", raw))
            .transpose()?;

        let tls = if self.backend.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.backend.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        Ok(ClientConfig {
            equipment_url,
            auth_url,
            tls,
            timeout: Duration::from_secs(self.backend.timeout),
            items_per_page: self.inventory.items_per_page,
            search_debounce: Duration::from_millis(self.inventory.search_debounce_ms),
        })
    }

    /// Full path of the session record.
    pub fn session_path(&self) -> PathBuf {
        let dir = self.session.storage_dir.clone().unwrap_or_else(data_dir);
        dir.join(format!("{}.json", self.session.storage_name.trim()))
    }

    /// File-backed session store at [`Config::session_path`].
    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(self.session_path())
    }
}
