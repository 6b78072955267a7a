//! Application state management.

use std::sync::Arc;

use crate::domain::TransferSource;

use super::service::{AppService, VerifierConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AppService>,
}

impl AppState {
    /// Create a new application state
    #[must_use]
    pub fn new(transfer_source: Arc<dyn TransferSource>, config: VerifierConfig) -> Self {
        Self {
            service: Arc::new(AppService::new(transfer_source, config)),
        }
    }
}
