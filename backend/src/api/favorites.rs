//! Grubber favorites API handlers
//!
//! Both endpoints run a single atomic read-merge-write on the user document
//! (see [`crate::grubber::favorites`]).

use crate::api::utils::{not_found, JsonBody};
use crate::error::AppError;
use crate::grubber::{apply_favorites_change, FavoriteRef, FavoritesOp, RecordId};
use crate::state::SharedState;
use crate::store::Document;
use axum::{extract::State, response::Json};
use serde::Deserialize;

/// Body of the favorites endpoints
///
/// `favorites` carries one entry per call despite the plural name.
#[derive(Debug, Deserialize)]
pub struct FavoritesRequest {
    /// Id of the Grubber user to change
    pub id: RecordId,
    /// Entry to add or remove; a missing entry leaves the list unchanged
    #[serde(default)]
    pub favorites: Option<FavoriteRef>,
}

/// PUT /grubber/favorites/add - Add a favorite unless already present
pub async fn add_favorite(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<FavoritesRequest>,
) -> Result<Json<Document>, AppError> {
    change_favorites(
        state,
        request,
        FavoritesOp::Add,
        "Could not update Grubber user -- favorites",
    )
    .await
}

/// PUT /grubber/favorites/delete - Remove the first matching favorite
pub async fn delete_favorite(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<FavoritesRequest>,
) -> Result<Json<Document>, AppError> {
    change_favorites(
        state,
        request,
        FavoritesOp::Remove,
        "Could not update Grubber user favorites -- delete",
    )
    .await
}

async fn change_favorites(
    state: SharedState,
    request: FavoritesRequest,
    op: FavoritesOp,
    context: &'static str,
) -> Result<Json<Document>, AppError> {
    if request.favorites.is_none() {
        tracing::warn!(user_id = %request.id, ?op, "Favorites request without an entry");
    }

    let updated = apply_favorites_change(
        state.store.as_ref(),
        &state.tables.grubber_users,
        &request.id,
        op,
        request.favorites,
    )
    .await
    .map_err(AppError::store(context))?
    .ok_or_else(|| not_found("Grubber user", &request.id))?;

    Ok(Json(updated))
}
