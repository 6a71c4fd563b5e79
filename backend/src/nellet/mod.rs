//! Nellet module
//!
//! User preference records for the Nellet app.

pub mod models;

pub use models::{NelletUser, RegisterRequest, DEFAULT_PROFILE_PICTURE};
