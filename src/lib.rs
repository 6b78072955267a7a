//! Card input formatting helpers and a TRC20 payment verification service.
//!
//! The crate is layered the usual way:
//! - [`domain`]: types, errors, traits and the pure card-input logic
//! - [`app`]: the verification service and shared state
//! - [`infra`]: the TronGrid ledger client
//! - [`api`]: axum handlers and routing

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
