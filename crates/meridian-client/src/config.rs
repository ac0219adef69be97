//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MERIDIAN_API_URL=https://erp.acme.test                             │
//! │     MERIDIAN_API_TIMEOUT_SECS=45                                       │
//! │     MERIDIAN_PATH_LEAD_LIST=/api/v2/BD/Lead/GetList                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/meridian/client.toml (Linux)                             │
//! │     ~/Library/Application Support/com.meridian.mobile/client.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://erp.acme.test"
//! request_timeout_secs = 30
//! connect_timeout_secs = 10
//! user_agent = "meridian-mobile/0.1.0"
//!
//! [device]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! platform = "android"
//! app_version = "3.2.0"
//!
//! [paths]
//! LOGIN = "/api/v2/Auth/Login"
//! SALES_ORDER_PDF = "/api/SalesOrder/GetPrintPdf"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use meridian_core::PathTable;

use crate::error::{ClientError, ClientResult};

const PATH_ENV_PREFIX: &str = "MERIDIAN_PATH_";

// =============================================================================
// API Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Backend base URL; endpoint paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// TCP/TLS connect timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("meridian-mobile/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// =============================================================================
// Device Settings
// =============================================================================

/// Identity of this install, sent with push-token registration and removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Generated on first run and written back to the config file, so the
    /// token removed at logout matches the one registered at login.
    #[serde(default = "generate_device_id")]
    pub id: String,

    /// `android` or `ios`.
    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default)]
    pub app_version: String,
}

fn default_platform() -> String {
    "android".to_string()
}

fn generate_device_id() -> String {
    Uuid::new_v4().to_string()
}

impl Default for DeviceSettings {
    fn default() -> Self {
        DeviceSettings {
            id: generate_device_id(),
            platform: default_platform(),
            app_version: String::new(),
        }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub device: DeviceSettings,

    /// Endpoint key → path override.
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    ///
    /// When the file has no `device.id`, the generated one is saved back to
    /// it before environment overrides are applied.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            let mut has_device_id = false;
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                let raw: toml::Table = toml::from_str(&contents)?;
                has_device_id = raw
                    .get("device")
                    .and_then(|device| device.get("id"))
                    .is_some();
                config = toml::Value::Table(raw).try_into()?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }

            if !has_device_id {
                info!(device_id = %config.device.id, "Generated device id");
                if let Err(e) = config.save(Some(path)) {
                    warn!(error = %e, "Could not persist generated device id");
                }
            }
        }

        config.apply_env_overrides(std::env::vars());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.request_timeout_secs == 0 || self.api.connect_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeouts must be greater than 0".into(),
            ));
        }

        if self.device.id.trim().is_empty() {
            return Err(ClientError::InvalidConfig("device.id must not be empty".into()));
        }

        for key in self.path_table().unknown_keys() {
            warn!(key = %key, "Path override does not match any endpoint");
        }

        Ok(())
    }

    /// Applies `MERIDIAN_*` overrides from the given variables.
    fn apply_env_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            match name.as_str() {
                "MERIDIAN_API_URL" => {
                    debug!(url = %value, "Overriding API URL from environment");
                    self.api.base_url = value;
                }
                "MERIDIAN_API_TIMEOUT_SECS" => match value.parse::<u64>() {
                    Ok(secs) => self.api.request_timeout_secs = secs,
                    Err(_) => warn!(value = %value, "Ignoring non-numeric MERIDIAN_API_TIMEOUT_SECS"),
                },
                "MERIDIAN_DEVICE_PLATFORM" => self.device.platform = value,
                _ => {
                    if let Some(key) = name.strip_prefix(PATH_ENV_PREFIX) {
                        debug!(key = %key, path = %value, "Overriding endpoint path from environment");
                        self.paths.insert(key.to_string(), value);
                    }
                }
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "meridian", "mobile")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    /// Default paths with this config's overrides applied.
    pub fn path_table(&self) -> PathTable {
        PathTable::with_overrides(self.paths.clone())
    }
}
