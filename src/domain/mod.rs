//! Domain layer containing core business types, traits, and error definitions.

pub mod card;
pub mod error;
pub mod traits;
pub mod types;

pub use card::{
    CardBrand, CardDetails, CardInput, detect_card_type, format_card_number, format_cvv,
    format_expiry, validate_luhn,
};
pub use error::{AppError, ConfigError, ExternalServiceError};
pub use traits::{TransferQuery, TransferSource};
pub use types::{
    AMOUNT_TOLERANCE, DEFAULT_TIME_WINDOW_MINUTES, ErrorDetail, ErrorResponse, HealthResponse,
    HealthStatus, TOKEN_DECIMALS, TOKEN_UNIT, TokenInfo, TransferRecord, VerificationResult,
    VerifiedTransaction, VerifyPaymentRequest, units_to_amount,
};
