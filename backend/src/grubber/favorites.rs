//! Favorites merge
//!
//! Adds or removes a single [`FavoriteRef`] in a Grubber user's `favorites`
//! list. The read, merge and write run as one atomic store mutation, so two
//! concurrent calls for the same user cannot overwrite each other's change.

use crate::grubber::models::FavoriteRef;
use crate::store::{Document, DocumentStore, StoreError, KEY_ATTRIBUTE};
use serde_json::Value;

/// Attribute holding the favorites list on a user document
pub const FAVORITES_ATTRIBUTE: &str = "favorites";

/// Kind of change to apply to a favorites list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesOp {
    /// Append the entry unless one with the same id is present
    Add,
    /// Remove the first entry with the same id
    Remove,
}

/// Id of a stored favorites entry, if it has one
///
/// Entries that are not objects or lack an `id` never match a request and are
/// left in place.
pub fn favorite_id(entry: &Value) -> Option<&Value> {
    entry.get(KEY_ATTRIBUTE)
}

/// Add `requested` unless an entry with the same id already exists
///
/// Returns true if the list changed.
pub fn add_favorite(favorites: &mut Vec<Value>, requested: FavoriteRef) -> bool {
    if favorites
        .iter()
        .any(|entry| favorite_id(entry) == Some(&requested.id))
    {
        return false;
    }
    favorites.push(requested.into_entry());
    true
}

/// Remove the first entry whose id is `id`
///
/// Later duplicates are left in place. Returns true if an entry was removed.
pub fn remove_favorite(favorites: &mut Vec<Value>, id: &Value) -> bool {
    match favorites
        .iter()
        .position(|entry| favorite_id(entry) == Some(id))
    {
        Some(index) => {
            favorites.remove(index);
            true
        }
        None => false,
    }
}

/// Read the favorites list from a user document (absent or null is empty)
///
/// Only a value that is not a list is an error; individual entries are kept
/// whatever their shape.
pub fn read_favorites(document: &Document) -> Result<Vec<Value>, StoreError> {
    match document.get(FAVORITES_ATTRIBUTE) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(entries)) => Ok(entries.clone()),
        Some(other) => Err(StoreError::InvalidDocument(format!(
            "malformed {}: expected a list, got {}",
            FAVORITES_ATTRIBUTE, other
        ))),
    }
}

/// Replace the favorites list on a user document
pub fn write_favorites(document: &mut Document, favorites: Vec<Value>) {
    document.insert(FAVORITES_ATTRIBUTE.to_string(), Value::Array(favorites));
}

/// Apply a favorites change to a stored user
///
/// A missing `requested` entry leaves the list unchanged, but the list is
/// still written back (an absent attribute becomes `[]`).
///
/// # Returns
/// * `Ok(Some(document))` - The user document after the change
/// * `Ok(None)` - No user with that id exists
/// * `Err(StoreError)` - The store failed or the stored list is malformed
pub async fn apply_favorites_change(
    store: &dyn DocumentStore,
    table: &str,
    user_id: &str,
    op: FavoritesOp,
    requested: Option<FavoriteRef>,
) -> Result<Option<Document>, StoreError> {
    store
        .update(
            table,
            user_id,
            Box::new(move |document: &mut Document| {
                let mut favorites = read_favorites(document)?;
                let changed = match (op, requested) {
                    (FavoritesOp::Add, Some(entry)) => add_favorite(&mut favorites, entry),
                    (FavoritesOp::Remove, Some(entry)) => {
                        remove_favorite(&mut favorites, &entry.id)
                    }
                    (_, None) => false,
                };
                tracing::debug!(?op, changed, count = favorites.len(), "Merged favorites");
                write_favorites(document, favorites);
                Ok(())
            }),
        )
        .await
}
