//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::TransferRecord;

/// Query for incoming token transfers into one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferQuery {
    /// Recipient address
    pub address: String,
    /// Token contract the transfers must belong to
    pub contract_address: String,
    /// Maximum number of records to fetch
    pub limit: u32,
}

/// Read access to a ledger's token transfer history
#[async_trait]
pub trait TransferSource: Send + Sync {
    /// Check explorer connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Fetch the most recent incoming transfers matching `query`.
    /// Ordering is whatever the explorer returns.
    async fn recent_incoming_transfers(
        &self,
        query: &TransferQuery,
    ) -> Result<Vec<TransferRecord>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptySource;

    #[async_trait]
    impl TransferSource for EmptySource {
        async fn health_check(&self) -> Result<(), AppError> {
            Ok(())
        }

        async fn recent_incoming_transfers(
            &self,
            _query: &TransferQuery,
        ) -> Result<Vec<TransferRecord>, AppError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let source: Box<dyn TransferSource> = Box::new(EmptySource);
        let query = TransferQuery {
            address: "TAddr".to_string(),
            contract_address: "TContract".to_string(),
            limit: 50,
        };
        assert!(source.health_check().await.is_ok());
        assert!(source.recent_incoming_transfers(&query).await.unwrap().is_empty());
    }
}
