//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use tracing::{error, warn};
use utoipa::OpenApi;

use crate::app::AppState;
use crate::domain::{
    AppError, ErrorDetail, ErrorResponse, ExternalServiceError, HealthResponse, HealthStatus,
    VerificationResult, VerifiedTransaction, VerifyPaymentRequest,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TRC20 Payment Verifier API",
        version = "0.1.0",
        description = "Checks whether a token payment reached the configured fee address",
        license(
            name = "MIT"
        )
    ),
    paths(
        verify_payment_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            VerifyPaymentRequest,
            VerificationResult,
            VerifiedTransaction,
            HealthResponse,
            HealthStatus,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "payments", description = "Payment verification endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Verify an incoming payment
///
/// Looks at the most recent transfers into the fee address and reports the
/// newest one that arrived inside the time window and carries at least 99%
/// of `minAmount`. Finding nothing is a normal `verified: false` answer.
#[utoipa::path(
    post,
    path = "/verify-payment",
    tag = "payments",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Verification finished (check `verified`)", body = VerificationResult),
        (status = 500, description = "Unreadable body or ledger lookup failed", body = VerificationResult)
    )
)]
pub async fn verify_payment_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> (StatusCode, Json<VerificationResult>) {
    let result = match payload {
        Ok(Json(request)) => state.service.verify_payment(&request).await,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Unreadable verification request body");
            Err(AppError::Deserialization(rejection.body_text()))
        }
    };

    match result {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(e) => {
            error!(error = %e, "Error verifying payment");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(VerificationResult::failed(e.to_string())),
            )
        }
    }
}

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let health = state.service.health_check().await;
    Json(health)
}

/// Kubernetes liveness check
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness check
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic"),
        (status = 503, description = "Ledger explorer unreachable")
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    let health = state.service.health_check().await;
    match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Fallback for unknown routes
pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_type) = match &self {
            AppError::ExternalService(ext_err) => match ext_err {
                ExternalServiceError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
                _ => (StatusCode::BAD_GATEWAY, "external_service_error"),
            },
            AppError::Deserialization(_) => (StatusCode::BAD_REQUEST, "deserialization_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        let message = self.to_string();

        if status.is_server_error() {
            error!(error_type = %error_type, message = %message, "Server error");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                r#type: error_type.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
