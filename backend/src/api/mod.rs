//! API module
//!
//! Contains HTTP request handlers for the Grubber, Nellet and Plaid endpoints

pub mod diets;
pub mod favorites;
pub mod nellet;
pub mod plaid;
pub mod restaurants;
pub mod users;
pub mod utils;
