//! HTTP-based tests for the TronGrid transfer source.
//!
//! Uses `wiremock` to stand in for the TronGrid REST API.

use secrecy::SecretString;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

use tron_payment_verifier::domain::{
    AppError, ExternalServiceError, TransferQuery, TransferSource,
};
use tron_payment_verifier::infra::{TronGridClient, TronGridConfig};

const FEE_ADDRESS: &str = "TFeeAddress1111111111111111111111";
const CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

fn client_for(server: &MockServer) -> TronGridClient {
    TronGridClient::new(TronGridConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

fn query() -> TransferQuery {
    TransferQuery {
        address: FEE_ADDRESS.to_string(),
        contract_address: CONTRACT.to_string(),
        limit: 50,
    }
}

/// A TronGrid-shaped TRC20 transfer
fn trc20_transfer(id: &str, value: &str, block_timestamp: i64) -> serde_json::Value {
    json!({
        "transaction_id": id,
        "token_info": {
            "symbol": "USDT",
            "address": CONTRACT,
            "decimals": 6,
            "name": "Tether USD"
        },
        "block_timestamp": block_timestamp,
        "from": "TSenderAddress",
        "to": FEE_ADDRESS,
        "type": "Transfer",
        "value": value
    })
}

#[tokio::test]
async fn test_fetches_transfers_with_expected_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/accounts/{}/transactions/trc20", FEE_ADDRESS)))
        .and(query_param("limit", "50"))
        .and(query_param("contract_address", CONTRACT))
        .and(query_param("only_to", "true"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                trc20_transfer("tx_a", "10000000", 1_760_000_000_000_i64),
                trc20_transfer("tx_b", "2500000", 1_759_999_000_000_i64)
            ],
            "success": true,
            "meta": {"at": 1_760_000_001_000_i64, "page_size": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transfers = client_for(&server)
        .recent_incoming_transfers(&query())
        .await
        .unwrap();

    assert_eq!(transfers.len(), 2);
    assert_eq!(transfers[0].transaction_id, "tx_a");
    assert_eq!(transfers[0].token_amount(), Some(10.0));
    assert_eq!(transfers[1].token_amount(), Some(2.5));
}

#[tokio::test]
async fn test_sends_api_key_header_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("TRON-PRO-API-KEY", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = TronGridClient::new(TronGridConfig {
        base_url: server.uri(),
        api_key: Some(SecretString::from("test-key")),
        ..Default::default()
    })
    .unwrap();

    let transfers = client.recent_incoming_transfers(&query()).await.unwrap();
    assert!(transfers.is_empty());
}

#[tokio::test]
async fn test_missing_data_is_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let transfers = client_for(&server)
        .recent_incoming_transfers(&query())
        .await
        .unwrap();
    assert!(transfers.is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .recent_incoming_transfers(&query())
        .await
        .unwrap_err();

    match err {
        AppError::ExternalService(ExternalServiceError::ApiError {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .recent_incoming_transfers(&query())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::ExternalService(ExternalServiceError::ParseError(_))
    ));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = TronGridClient::new(TronGridConfig {
        base_url: server.uri(),
        timeout: Duration::from_millis(50),
        ..Default::default()
    })
    .unwrap();

    let err = client.recent_incoming_transfers(&query()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::ExternalService(ExternalServiceError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/getnowblock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"blockID": "abc"})))
        .mount(&server)
        .await;

    assert!(client_for(&server).health_check().await.is_ok());
}

#[tokio::test]
async fn test_health_check_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    assert!(client_for(&server).health_check().await.is_err());
}
