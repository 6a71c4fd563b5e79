//! Grubber / Nellet Backend Library
//!
//! REST endpoints for the Grubber restaurant list, the Nellet preference
//! store and a Plaid bank-linking integration. The binary is in `src/main.rs`.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod grubber;
pub mod nellet;
pub mod plaid;
/// Application state management
///
/// Holds the injected store and API clients.
pub mod state;
pub mod store;
