//! Infrastructure layer implementations.

pub mod tron;

pub use tron::{TronGridClient, TronGridConfig};
