//! Grubber module
//!
//! Restaurant listings, Grubber users and their favorites.

pub mod favorites;
pub mod models;

pub use favorites::{apply_favorites_change, FavoritesOp};
pub use models::{generate_id, FavoriteRef, GrubberUser, RecordId, Restaurant};
