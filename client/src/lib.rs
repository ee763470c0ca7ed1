//! Farm calculators client
//!
//! Fertilizer, pesticide and profit calculations with a history that is
//! written to the remote calculator-results API and to a capped local
//! window, and read back from whichever is available.

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::{CredentialProvider, RemoteHistory, RemoteHistoryClient, StaticCredentials};
use services::{CalculatorService, FileStore, HistoryCache, HistoryService, LocalHistory, LocalStore};
use shared::summary::DisplayContext;

/// Application state shared by the CLI and embedders
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub calculator: CalculatorService,
    pub display: DisplayContext,
}

impl AppContext {
    /// Compose the services from configuration
    pub fn from_config(config: Config) -> AppResult<Self> {
        let credentials: Arc<dyn CredentialProvider> = Arc::new(StaticCredentials::new(
            config.auth.access_token.clone(),
            config.auth.user_id.clone(),
        ));
        let remote: Arc<dyn RemoteHistory> =
            Arc::new(RemoteHistoryClient::new(&config.remote, credentials.clone())?);
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::new(&config.storage.data_dir));
        Self::with_parts(config, credentials, remote, store)
    }

    /// Compose around caller-supplied collaborators
    pub fn with_parts(
        config: Config,
        credentials: Arc<dyn CredentialProvider>,
        remote: Arc<dyn RemoteHistory>,
        store: Arc<dyn LocalStore>,
    ) -> AppResult<Self> {
        let tables = Arc::new(config.reference_tables()?);
        let history = HistoryService::new(
            remote,
            LocalHistory::new(store, config.storage.history_cap),
            HistoryCache::new(Duration::from_secs(config.cache.ttl_secs)),
            credentials.clone(),
        );

        Ok(Self {
            display: config.display_context(),
            config: Arc::new(config),
            credentials,
            calculator: CalculatorService::new(tables, history),
        })
    }

    pub fn history(&self) -> &HistoryService {
        self.calculator.history()
    }
}
