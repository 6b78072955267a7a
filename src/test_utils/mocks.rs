//! Mock implementations for testing.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::{
    AppError, ExternalServiceError, TransferQuery, TransferRecord, TransferSource,
};

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Upstream status code to fail with, if any
    pub fail_with_status: Option<u16>,
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(status_code: u16) -> Self {
        Self {
            fail_with_status: Some(status_code),
        }
    }
}

/// In-memory transfer source returning a fixed list
pub struct MockTransferSource {
    transfers: Mutex<Vec<TransferRecord>>,
    config: MockConfig,
    is_healthy: AtomicBool,
    last_query: Mutex<Option<TransferQuery>>,
}

impl MockTransferSource {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            transfers: Mutex::new(Vec::new()),
            config,
            is_healthy: AtomicBool::new(true),
            last_query: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_transfers(transfers: Vec<TransferRecord>) -> Self {
        let source = Self::new();
        source.set_transfers(transfers);
        source
    }

    #[must_use]
    pub fn failing(status_code: u16) -> Self {
        Self::with_config(MockConfig::failure(status_code))
    }

    pub fn set_transfers(&self, transfers: Vec<TransferRecord>) {
        *self.transfers.lock().unwrap() = transfers;
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Query seen by the most recent fetch (for testing)
    pub fn last_query(&self) -> Option<TransferQuery> {
        self.last_query.lock().unwrap().clone()
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if let Some(status_code) = self.config.fail_with_status {
            return Err(AppError::ExternalService(ExternalServiceError::ApiError {
                status_code,
                message: "Mock error".to_string(),
            }));
        }
        Ok(())
    }
}

impl Default for MockTransferSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransferSource for MockTransferSource {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::ExternalService(ExternalServiceError::Network(
                "Unhealthy".to_string(),
            )));
        }
        self.check_should_fail()
    }

    async fn recent_incoming_transfers(
        &self,
        query: &TransferQuery,
    ) -> Result<Vec<TransferRecord>, AppError> {
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.check_should_fail()?;
        Ok(self.transfers.lock().unwrap().clone())
    }
}
