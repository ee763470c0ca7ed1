//! Client for the remote calculator-results API
//!
//! - `POST   {base}/calculator-results/{type}`
//! - `GET    {base}/calculator-results/list?type={type}`
//! - `DELETE {base}/calculator-results/{id}`
//!
//! Every call carries the bearer token from the [`CredentialProvider`]; a
//! missing token fails fast without touching the network.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use shared::{CalculationRecord, CalculatorType, HistoryEntry};

use super::auth::CredentialProvider;
use super::wire::{self, RemoteSaved};
use crate::config::RemoteConfig;
use crate::error::{AppError, AppResult};

/// Remote replica of the calculation history
#[async_trait]
pub trait RemoteHistory: Send + Sync {
    async fn save(&self, record: &CalculationRecord) -> AppResult<RemoteSaved>;

    /// Most recent entries first
    async fn list(&self, calculator_type: CalculatorType) -> AppResult<Vec<HistoryEntry>>;

    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// HTTP implementation of [`RemoteHistory`]
#[derive(Clone)]
pub struct RemoteHistoryClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    retries: u32,
}

impl RemoteHistoryClient {
    /// Create a client with the configured timeout and retry count
    pub fn new(config: &RemoteConfig, credentials: Arc<dyn CredentialProvider>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            retries: config.retries,
        })
    }

    /// Create a client against a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            retries: 1,
        }
    }

    fn bearer(&self) -> AppResult<String> {
        self.credentials
            .bearer_token()
            .ok_or(AppError::MissingCredentials)
    }

    /// Send a request and map transport, auth and status failures
    async fn execute(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .bearer_auth(self.bearer()?)
            .send()
            .await
            .map_err(|e| AppError::RemoteUnavailable(format!("Calculator results request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            self.credentials.on_unauthorized();
            return Err(AppError::Unauthorized(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn json_body(response: Response) -> AppResult<Value> {
        response
            .json()
            .await
            .map_err(|e| AppError::RemoteProtocol(format!("Failed to parse response: {}", e)))
    }

    /// Run an idempotent call, retrying transient failures
    async fn idempotent<T, F, Fut>(&self, operation: &'static str, call: F) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Err(err) if err.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(operation, attempt, error = %err, "Retrying remote call");
                }
                outcome => return outcome,
            }
        }
    }

    async fn list_once(&self, calculator_type: CalculatorType) -> AppResult<Vec<HistoryEntry>> {
        let url = format!("{}/calculator-results/list", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("type", calculator_type.as_str())]);
        let body = Self::json_body(self.execute(request).await?).await?;
        wire::parse_listing(calculator_type, body)
    }

    async fn delete_once(&self, id: &str) -> AppResult<()> {
        let url = format!("{}/calculator-results/{}", self.base_url, id);
        match self.execute(self.client.delete(&url)).await {
            Ok(_) => Ok(()),
            // Already gone counts as deleted.
            Err(AppError::RemoteStatus { status: 404, .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl RemoteHistory for RemoteHistoryClient {
    async fn save(&self, record: &CalculationRecord) -> AppResult<RemoteSaved> {
        let url = format!(
            "{}/calculator-results/{}",
            self.base_url,
            record.calculator_type().as_str()
        );
        let body = wire::save_body(record)?;

        // Not retried: a lost response would otherwise create a duplicate row.
        let response = self.execute(self.client.post(&url).json(&body)).await?;
        let saved = wire::parse_saved(&Self::json_body(response).await?)?;

        tracing::debug!(
            calculator_type = %record.calculator_type(),
            remote_id = %saved.id,
            "Saved calculation remotely"
        );
        Ok(saved)
    }

    async fn list(&self, calculator_type: CalculatorType) -> AppResult<Vec<HistoryEntry>> {
        self.idempotent("list", || self.list_once(calculator_type)).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.idempotent("delete", || self.delete_once(id)).await
    }
}
