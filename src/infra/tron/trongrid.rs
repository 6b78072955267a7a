//! TronGrid explorer client.
//!
//! Reads TRC20 transfer history from the public TronGrid REST API. The API
//! works without a key at low request rates; a `TRON-PRO-API-KEY` header is
//! sent when one is configured.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::domain::{
    AppError, ExternalServiceError, TransferQuery, TransferRecord, TransferSource,
};

/// Default TronGrid API base URL
pub const DEFAULT_TRONGRID_API_URL: &str = "https://api.trongrid.io";

/// Header TronGrid reads the API key from
pub const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// Connection settings for [`TronGridClient`]
#[derive(Debug, Clone)]
pub struct TronGridConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
}

impl Default for TronGridConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TRONGRID_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Envelope of `/v1/accounts/{address}/transactions/trc20`
#[derive(Debug, Deserialize)]
struct TransferListResponse {
    #[serde(default)]
    data: Option<Vec<TransferRecord>>,
}

/// Transfer source backed by TronGrid
#[derive(Debug, Clone)]
pub struct TronGridClient {
    http_client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl TronGridClient {
    pub fn new(config: TronGridConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transfers_url(&self, address: &str) -> String {
        format!("{}/v1/accounts/{}/transactions/trc20", self.base_url, address)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key.expose_secret()),
            None => builder,
        }
    }

    fn map_send_error(e: reqwest::Error) -> AppError {
        error!(error = %e, "TronGrid request failed");
        if e.is_timeout() {
            AppError::ExternalService(ExternalServiceError::Timeout(e.to_string()))
        } else {
            AppError::ExternalService(ExternalServiceError::Network(e.to_string()))
        }
    }
}

#[async_trait]
impl TransferSource for TronGridClient {
    async fn health_check(&self) -> Result<(), AppError> {
        let url = format!("{}/wallet/getnowblock", self.base_url);
        let response = self
            .request(self.http_client.post(&url))
            .send()
            .await
            .map_err(Self::map_send_error)?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(ExternalServiceError::ApiError {
                status_code: response.status().as_u16(),
                message: "health check failed".to_string(),
            }));
        }
        Ok(())
    }

    #[instrument(skip(self, query), fields(address = %query.address, limit = query.limit))]
    async fn recent_incoming_transfers(
        &self,
        query: &TransferQuery,
    ) -> Result<Vec<TransferRecord>, AppError> {
        let url = self.transfers_url(&query.address);
        debug!(url = %url, contract = %query.contract_address, "Querying TronGrid");

        let response = self
            .request(self.http_client.get(&url))
            .query(&[
                ("limit", query.limit.to_string()),
                ("contract_address", query.contract_address.clone()),
                ("only_to", "true".to_string()),
            ])
            .send()
            .await
            .map_err(Self::map_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "TronGrid API returned error");
            return Err(AppError::ExternalService(ExternalServiceError::ApiError {
                status_code: status.as_u16(),
                message: body,
            }));
        }

        let list: TransferListResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse TronGrid response");
            AppError::ExternalService(ExternalServiceError::ParseError(e.to_string()))
        })?;

        let transfers = list.data.unwrap_or_default();
        debug!(count = transfers.len(), "Found TRC20 transfers");
        Ok(transfers)
    }
}
