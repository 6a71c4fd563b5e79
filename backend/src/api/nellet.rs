//! Nellet user API handlers

use crate::api::utils::{not_found, JsonBody};
use crate::error::AppError;
use crate::nellet::{NelletUser, RegisterRequest};
use crate::state::SharedState;
use crate::store::{to_document, Document};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;

/// Response of the register endpoint
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Id of the stored user
    pub id: String,
}

/// GET /user/:id - Get a specific Nellet user
pub async fn get_nellet_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let item = state
        .store
        .get(&state.tables.nellet_users, &id)
        .await
        .map_err(AppError::store("Error retrieving nellet user"))?
        .ok_or_else(|| not_found("Nellet user", &id))?;

    Ok(Json(item))
}

/// POST /nellet/user/register - Store a Nellet user, filling in defaults
///
/// Registering an existing `sub` again overwrites the stored record.
pub async fn register_nellet_user(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    const CONTEXT: &str = "Could not create nellet user";

    tracing::debug!(sub = ?request.sub, "Registering nellet user");
    let user = NelletUser::from(request);

    let document = to_document(&user).map_err(AppError::store(CONTEXT))?;
    state
        .store
        .put(&state.tables.nellet_users, document)
        .await
        .map_err(AppError::store(CONTEXT))?;

    Ok(Json(RegisterResponse { id: user.id }))
}
