//! Plaid integration
//!
//! Client for the financial-data API used to link bank accounts and pull
//! transaction history.

pub mod client;
pub mod types;

pub use client::{PlaidClient, PlaidEnvironment, PlaidError};
pub use types::{LinkTokenCreateResponse, PublicTokenExchangeResponse, TransactionsGetResponse};
