//! Application entry point.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::SecretString;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tron_payment_verifier::api::create_router;
use tron_payment_verifier::app::{
    AppState, DEFAULT_PAGE_LIMIT, DEFAULT_TOKEN_CONTRACT, VerifierConfig,
};
use tron_payment_verifier::domain::ConfigError;
use tron_payment_verifier::infra::tron::DEFAULT_TRONGRID_API_URL;
use tron_payment_verifier::infra::{TronGridClient, TronGridConfig};

/// Application configuration
struct Config {
    host: String,
    port: u16,
    /// Address incoming payments are checked against
    fee_address: String,
    /// TRC20 contract of the accepted token
    token_contract: String,
    trongrid_api_url: String,
    /// TronGrid API key (optional - public rate limits apply without it)
    trongrid_api_key: Option<SecretString>,
    /// Transfers fetched per verification (default: 50)
    transfer_page_limit: u32,
    /// Outbound request timeout in seconds (default: 30)
    ledger_timeout_secs: u64,
    json_logs: bool,
}

impl Config {
    fn from_env() -> Result<Self> {
        let fee_address = env::var("FEE_ADDRESS")
            .ok()
            .filter(|a| !a.trim().is_empty())
            .ok_or(ConfigError::Missing("FEE_ADDRESS"))?;
        let token_contract =
            env::var("TOKEN_CONTRACT").unwrap_or_else(|_| DEFAULT_TOKEN_CONTRACT.to_string());
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let trongrid_api_url = env::var("TRONGRID_API_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_TRONGRID_API_URL.to_string());
        let trongrid_api_key = env::var("TRONGRID_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(SecretString::from);

        let transfer_page_limit = env::var("TRANSFER_PAGE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_PAGE_LIMIT);

        let ledger_timeout_secs = env::var("LEDGER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let json_logs = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            fee_address,
            token_contract,
            trongrid_api_url,
            trongrid_api_key,
            transfer_page_limit,
            ledger_timeout_secs,
            json_logs,
        })
    }
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(config.json_logs);

    info!("TRC20 Payment Verifier v{}", env!("CARGO_PKG_VERSION"));
    info!("Fee address: {}", config.fee_address);

    let ledger_client = TronGridClient::new(TronGridConfig {
        base_url: config.trongrid_api_url.clone(),
        api_key: config.trongrid_api_key.clone(),
        timeout: Duration::from_secs(config.ledger_timeout_secs),
    })
    .context("Failed to create TronGrid client")?;
    info!(
        url = %config.trongrid_api_url,
        api_key = config.trongrid_api_key.is_some(),
        "TronGrid client created"
    );

    let verifier_config = VerifierConfig {
        fee_address: config.fee_address.clone(),
        token_contract: config.token_contract.clone(),
        page_limit: config.transfer_page_limit,
    };
    info!(
        token = %verifier_config.token_contract,
        page_limit = verifier_config.page_limit,
        "Watching token"
    );

    let app_state = Arc::new(AppState::new(Arc::new(ledger_client), verifier_config));
    let router = create_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server starting on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
