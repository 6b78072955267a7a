//! Application layer containing business logic and shared state.

pub mod service;
pub mod state;

pub use service::{
    AppService, DEFAULT_PAGE_LIMIT, DEFAULT_TOKEN_CONTRACT, PaymentCriteria, VerifierConfig,
    accepted_amount, select_payment,
};
pub use state::AppState;
