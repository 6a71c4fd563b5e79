//! State management module
//!
//! Shared, read-only application state injected into every handler.

pub mod app_state;

pub use app_state::{AppState, SharedState};
