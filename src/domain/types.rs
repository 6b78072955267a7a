//! Domain types shared by the service and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed decimal count of the verified token (USDT on TRC20)
pub const TOKEN_DECIMALS: u32 = 6;

/// Smallest units per whole token
pub const TOKEN_UNIT: u128 = 10u128.pow(TOKEN_DECIMALS);

/// Lookback window used when the request omits one
pub const DEFAULT_TIME_WINDOW_MINUTES: f64 = 60.0;

/// Share of the requested amount that still counts as paid (1% slippage)
pub const AMOUNT_TOLERANCE: f64 = 0.99;

/// Token metadata attached to a TRC20 transfer by the explorer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TokenInfo {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A single token transfer as reported by the ledger explorer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferRecord {
    pub transaction_id: String,
    pub from: String,
    pub to: String,
    /// Integer amount in smallest token units, as a decimal string
    #[serde(alias = "value")]
    pub quant: String,
    /// Block time in epoch milliseconds
    pub block_timestamp: i64,
    #[serde(default)]
    pub token_info: Option<TokenInfo>,
}

impl TransferRecord {
    #[must_use]
    pub fn new(
        transaction_id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        quant: impl Into<String>,
        block_timestamp: i64,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            from: from.into(),
            to: to.into(),
            quant: quant.into(),
            block_timestamp,
            token_info: None,
        }
    }

    /// Amount in smallest units, `None` if the explorer sent garbage
    pub fn units(&self) -> Option<u128> {
        self.quant.trim().parse().ok()
    }

    /// Human-readable token amount
    pub fn token_amount(&self) -> Option<f64> {
        self.units().map(units_to_amount)
    }
}

/// Convert smallest units to a whole-token amount
pub fn units_to_amount(units: u128) -> f64 {
    units as f64 / TOKEN_UNIT as f64
}

/// Body of `POST /verify-payment`
///
/// Values are taken as sent: a non-positive `minAmount` lets any recent
/// transfer qualify, a negative window matches nothing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    /// Minimum token amount the payment must carry
    #[schema(example = 10.0)]
    pub min_amount: f64,
    /// How far back to look, in minutes (fractions allowed)
    #[serde(default = "default_time_window")]
    #[schema(example = 60.0)]
    pub time_window_minutes: f64,
}

fn default_time_window() -> f64 {
    DEFAULT_TIME_WINDOW_MINUTES
}

impl VerifyPaymentRequest {
    #[must_use]
    pub fn new(min_amount: f64, time_window_minutes: f64) -> Self {
        Self {
            min_amount,
            time_window_minutes,
        }
    }
}

/// Transfer that satisfied the verification criteria
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VerifiedTransaction {
    /// Ledger transaction id
    #[schema(example = "a1b2c3d4e5f6")]
    pub id: String,
    /// Whole-token amount
    #[schema(example = 10.0)]
    pub amount: f64,
    /// Sender address
    #[schema(example = "TJRabPrwbZy45sbavfcjinPJC18kjpRTv8")]
    pub from: String,
    /// Block time in epoch milliseconds
    #[schema(example = 1_760_000_000_000_i64)]
    pub timestamp: i64,
}

/// Outcome of one verification call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<VerifiedTransaction>,
    /// Explanation when nothing matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of transfers the explorer returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_transactions: Option<usize>,
    /// Set when the check itself failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResult {
    #[must_use]
    pub fn verified(transaction: VerifiedTransaction) -> Self {
        Self {
            verified: true,
            transaction: Some(transaction),
            message: None,
            checked_transactions: None,
            error: None,
        }
    }

    #[must_use]
    pub fn not_found(request: &VerifyPaymentRequest, checked: usize) -> Self {
        Self {
            verified: false,
            transaction: None,
            message: Some(format!(
                "No payment of ${:.2} or more found in the last {} minutes",
                request.min_amount, request.time_window_minutes
            )),
            checked_transactions: Some(checked),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            verified: false,
            transaction: None,
            message: None,
            checked_transactions: None,
            error: Some(error.into()),
        }
    }
}

/// Health status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems unavailable
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthStatus,
    /// Ledger explorer reachability
    pub ledger: HealthStatus,
    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
    /// Application version
    #[schema(example = "0.1.0")]
    pub version: String,
}

impl HealthResponse {
    #[must_use]
    pub fn new(ledger: HealthStatus) -> Self {
        Self {
            status: ledger,
            ledger,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error response structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Error type identifier
    #[schema(example = "external_service_error")]
    pub r#type: String,
    /// Human-readable error message
    #[schema(example = "Ledger API returned 503")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_record_accepts_trongrid_value_field() {
        let json = r#"{
            "transaction_id": "abc",
            "token_info": {"symbol": "USDT", "address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", "decimals": 6, "name": "Tether USD"},
            "block_timestamp": 1760000000000,
            "from": "TSender",
            "to": "TReceiver",
            "type": "Transfer",
            "value": "10000000"
        }"#;

        let record: TransferRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.quant, "10000000");
        assert_eq!(record.token_amount(), Some(10.0));
        assert_eq!(
            record.token_info.unwrap().symbol.as_deref(),
            Some("USDT")
        );
    }

    #[test]
    fn test_transfer_record_unparseable_quant() {
        let record = TransferRecord::new("id", "a", "b", "ten", 0);
        assert_eq!(record.units(), None);
        assert_eq!(record.token_amount(), None);
    }

    #[test]
    fn test_verify_request_defaults_time_window() {
        let req: VerifyPaymentRequest = serde_json::from_str(r#"{"minAmount": 25}"#).unwrap();
        assert_eq!(req.min_amount, 25.0);
        assert_eq!(req.time_window_minutes, DEFAULT_TIME_WINDOW_MINUTES);
    }

    #[test]
    fn test_verify_request_accepts_fractional_and_float_windows() {
        let req: VerifyPaymentRequest =
            serde_json::from_str(r#"{"minAmount": 10, "timeWindowMinutes": 1.5}"#).unwrap();
        assert_eq!(req.time_window_minutes, 1.5);

        let req: VerifyPaymentRequest =
            serde_json::from_str(r#"{"minAmount": -3, "timeWindowMinutes": 90.0}"#).unwrap();
        assert_eq!(req.min_amount, -3.0);
        assert_eq!(req.time_window_minutes, 90.0);
    }

    #[test]
    fn test_verify_request_requires_min_amount() {
        assert!(serde_json::from_str::<VerifyPaymentRequest>(r#"{"timeWindowMinutes": 60}"#).is_err());
    }

    #[test]
    fn test_not_found_message_and_shape() {
        let result = VerificationResult::not_found(&VerifyPaymentRequest::new(10.0, 30.0), 4);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["verified"], false);
        assert_eq!(
            json["message"],
            "No payment of $10.00 or more found in the last 30 minutes"
        );
        assert_eq!(json["checkedTransactions"], 4);
        assert!(json.get("transaction").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_not_found_message_fractional_window() {
        let result = VerificationResult::not_found(&VerifyPaymentRequest::new(5.0, 1.5), 0);
        assert_eq!(
            result.message.as_deref(),
            Some("No payment of $5.00 or more found in the last 1.5 minutes")
        );
    }

    #[test]
    fn test_failed_result_shape() {
        let json = serde_json::to_value(VerificationResult::failed("Ledger API returned 500")).unwrap();
        assert_eq!(json["verified"], false);
        assert_eq!(json["error"], "Ledger API returned 500");
        assert!(json.get("message").is_none());
    }
}
