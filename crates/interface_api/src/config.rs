//! API configuration

use std::path::PathBuf;

use serde::Deserialize;

use core_kernel::{CoreError, Currency};
use infra_store::StoreConfig;

/// API configuration
///
/// Every field can be set through an `API_`-prefixed environment variable,
/// e.g. `API_PORT=9000` or `API_DATA_DIR=/var/lib/mess`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory of the record store; unset keeps all data in memory
    pub data_dir: Option<PathBuf>,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// ISO 4217 code of the billing currency
    pub currency: String,
    /// Write each collection to disk as soon as it changes
    pub flush_on_write: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: Some(PathBuf::from("data")),
            log_level: "info".to_string(),
            log_json: false,
            currency: Currency::default().code().to_string(),
            flush_on_write: true,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured billing currency
    pub fn currency(&self) -> Result<Currency, CoreError> {
        self.currency
            .parse()
            .map_err(|_| CoreError::configuration(format!("Unsupported currency '{}'", self.currency)))
    }

    /// Record store settings derived from this configuration
    pub fn store_config(&self) -> StoreConfig {
        match &self.data_dir {
            Some(dir) => StoreConfig::new(dir.clone()).flush_on_write(self.flush_on_write),
            None => StoreConfig::in_memory(),
        }
    }
}
