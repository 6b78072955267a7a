//! Payment verification service.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::{
    AMOUNT_TOLERANCE, AppError, HealthResponse, HealthStatus, TransferQuery,
    TransferRecord, TransferSource, VerificationResult, VerifiedTransaction, VerifyPaymentRequest,
    units_to_amount,
};

/// USDT contract on the Tron mainnet
pub const DEFAULT_TOKEN_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// Number of transfers requested from the explorer per check
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// What the verifier watches
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Address payments must arrive at
    pub fee_address: String,
    /// Token contract the payments are made in
    pub token_contract: String,
    /// Transfers fetched per check
    pub page_limit: u32,
}

impl VerifierConfig {
    #[must_use]
    pub fn new(fee_address: impl Into<String>) -> Self {
        Self {
            fee_address: fee_address.into(),
            token_contract: DEFAULT_TOKEN_CONTRACT.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Filter applied to each fetched transfer
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentCriteria<'a> {
    pub fee_address: &'a str,
    pub token_contract: &'a str,
    /// Smallest accepted token amount, already reduced by the tolerance
    pub min_amount: f64,
    /// Oldest accepted block time (epoch ms)
    pub cutoff_ms: f64,
}

impl<'a> PaymentCriteria<'a> {
    #[must_use]
    pub fn new(config: &'a VerifierConfig, request: &VerifyPaymentRequest, now_ms: i64) -> Self {
        Self {
            fee_address: &config.fee_address,
            token_contract: &config.token_contract,
            min_amount: accepted_amount(request.min_amount),
            cutoff_ms: now_ms as f64 - request.time_window_minutes * MILLIS_PER_MINUTE,
        }
    }

    pub fn matches(&self, record: &TransferRecord) -> bool {
        if (record.block_timestamp as f64) < self.cutoff_ms {
            return false;
        }
        if !record.to.eq_ignore_ascii_case(self.fee_address) {
            return false;
        }
        // Explorer already filters by contract; reject anything that slipped through
        let contract = record.token_info.as_ref().and_then(|t| t.address.as_deref());
        if contract.is_some_and(|c| !c.eq_ignore_ascii_case(self.token_contract)) {
            return false;
        }
        match record.units() {
            Some(units) => units_to_amount(units) >= self.min_amount,
            None => {
                warn!(tx = %record.transaction_id, quant = %record.quant, "Skipping transfer with unparseable amount");
                false
            }
        }
    }
}

/// Smallest token amount accepted for `min_amount` after the 1% tolerance
pub fn accepted_amount(min_amount: f64) -> f64 {
    min_amount * AMOUNT_TOLERANCE
}

/// Pick the newest transfer satisfying `criteria`.
///
/// Sorting is stable, so transfers sharing a block time keep explorer order.
pub fn select_payment<'r>(
    records: &'r [TransferRecord],
    criteria: &PaymentCriteria<'_>,
) -> Option<&'r TransferRecord> {
    let mut matching: Vec<&TransferRecord> =
        records.iter().filter(|r| criteria.matches(r)).collect();
    matching.sort_by(|a, b| b.block_timestamp.cmp(&a.block_timestamp));
    matching.first().copied()
}

/// Application service containing business logic
pub struct AppService {
    transfer_source: Arc<dyn TransferSource>,
    config: VerifierConfig,
}

impl AppService {
    #[must_use]
    pub fn new(transfer_source: Arc<dyn TransferSource>, config: VerifierConfig) -> Self {
        Self {
            transfer_source,
            config,
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Check whether a qualifying payment arrived within the requested window
    pub async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerificationResult, AppError> {
        self.verify_payment_at(request, Utc::now().timestamp_millis())
            .await
    }

    /// Same as [`verify_payment`](Self::verify_payment) with an explicit clock
    #[instrument(skip(self, request), fields(min_amount = %request.min_amount, window = %request.time_window_minutes))]
    pub async fn verify_payment_at(
        &self,
        request: &VerifyPaymentRequest,
        now_ms: i64,
    ) -> Result<VerificationResult, AppError> {
        info!(
            "Checking for payments >= {} in the last {} minutes",
            request.min_amount, request.time_window_minutes
        );

        let query = TransferQuery {
            address: self.config.fee_address.clone(),
            contract_address: self.config.token_contract.clone(),
            limit: self.config.page_limit,
        };
        let transfers = self
            .transfer_source
            .recent_incoming_transfers(&query)
            .await?;
        debug!(count = transfers.len(), "Fetched transfers");

        let criteria = PaymentCriteria::new(&self.config, request, now_ms);
        let Some(payment) = select_payment(&transfers, &criteria) else {
            info!(
                checked = transfers.len(),
                "No qualifying payment found"
            );
            return Ok(VerificationResult::not_found(request, transfers.len()));
        };

        // matches() already rejected unparseable amounts
        let amount = payment.units().map(units_to_amount).unwrap_or_default();
        info!(
            tx = %payment.transaction_id,
            amount = %amount,
            from = %payment.from,
            "Payment verified"
        );

        Ok(VerificationResult::verified(VerifiedTransaction {
            id: payment.transaction_id.clone(),
            amount,
            from: payment.from.clone(),
            timestamp: payment.block_timestamp,
        }))
    }

    /// Ledger reachability check
    pub async fn health_check(&self) -> HealthResponse {
        let ledger = match self.transfer_source.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = %e, "Ledger health check failed");
                HealthStatus::Unhealthy
            }
        };
        HealthResponse::new(ledger)
    }
}
