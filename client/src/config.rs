//! Configuration management for the farm calculators
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with FARMCALC__ prefix
//!
//! The resulting [`Config`] is built once and passed to every component.

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::reference::{FertilizerProduct, ReferenceTables};
use shared::summary::DisplayContext;

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Remote calculator-results service
    pub remote: RemoteConfig,

    /// Credentials handed to the remote client
    pub auth: AuthConfig,

    /// Local rolling-window history
    pub storage: StorageConfig,

    /// Remote listing cache
    pub cache: CacheConfig,

    /// Formatting for history summaries
    pub display: DisplayConfig,

    /// Replaces the default Urea/DAP/MOP product set when present
    #[serde(default)]
    pub fertilizer_products: Option<Vec<FertilizerProduct>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Base URL of the API, without the /calculator-results suffix
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Extra attempts for idempotent requests
    pub retries: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Bearer token; the remote leg is skipped without one
    #[serde(default)]
    pub access_token: Option<String>,

    /// Owner of the history, part of the cache key
    pub user_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding one JSON file per calculator type
    pub data_dir: String,

    /// Maximum entries kept per calculator type
    pub history_cap: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    pub currency_symbol: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARMCALC_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("remote.base_url", "http://localhost:3000/api")?
            .set_default("remote.timeout_secs", 15)?
            .set_default("remote.retries", 1)?
            .set_default("auth.user_id", "local")?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.history_cap", 10)?
            .set_default("cache.ttl_secs", 30)?
            .set_default("display.currency_symbol", "₹")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARMCALC__ prefix)
            .add_source(
                Environment::with_prefix("FARMCALC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reference tables with the configured fertilizer products
    pub fn reference_tables(&self) -> AppResult<ReferenceTables> {
        match &self.fertilizer_products {
            Some(products) => ReferenceTables::with_fertilizer_products(products.clone())
                .map_err(|e| AppError::Configuration(format!("fertilizer_products: {}", e))),
            None => Ok(ReferenceTables::default()),
        }
    }

    pub fn display_context(&self) -> DisplayContext {
        DisplayContext {
            currency_symbol: self.display.currency_symbol.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            remote: RemoteConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            cache: CacheConfig::default(),
            display: DisplayConfig::default(),
            fertilizer_products: None,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: 15,
            retries: 1,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            user_id: "local".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            history_cap: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 30 }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}
