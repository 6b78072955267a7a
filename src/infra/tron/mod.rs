//! Tron ledger access.

pub mod trongrid;

pub use trongrid::{API_KEY_HEADER, DEFAULT_TRONGRID_API_URL, TronGridClient, TronGridConfig};
