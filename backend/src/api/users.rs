//! Grubber user API handlers

use crate::api::utils::{not_found, JsonBody, SuccessResponse};
use crate::error::AppError;
use crate::grubber::{generate_id, GrubberUser, RecordId};
use crate::state::SharedState;
use crate::store::{to_document, Document};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;

/// Create user request
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    /// Display name
    pub name: Option<String>,
}

/// GET /grubber - List all Grubber users
pub async fn list_users(State(state): State<SharedState>) -> Result<Json<Vec<Document>>, AppError> {
    let items = state
        .store
        .scan(&state.tables.grubber_users)
        .await
        .map_err(AppError::store("Error fetching the grubber data -- users"))?;

    Ok(Json(items))
}

/// GET /grubber/:id - Get a specific Grubber user
pub async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Document>, AppError> {
    let item = state
        .store
        .get(&state.tables.grubber_users, &id)
        .await
        .map_err(AppError::store("Error retrieving grubber user"))?
        .ok_or_else(|| not_found("Grubber user", &id))?;

    Ok(Json(item))
}

/// POST /grubber - Create a Grubber user with a generated id
pub async fn create_user(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<Json<GrubberUser>, AppError> {
    const CONTEXT: &str = "Could not create Grubber user";

    let user = GrubberUser {
        id: generate_id(),
        name: request.name,
    };

    let document = to_document(&user).map_err(AppError::store(CONTEXT))?;
    state
        .store
        .put(&state.tables.grubber_users, document)
        .await
        .map_err(AppError::store(CONTEXT))?;

    tracing::debug!(user_id = %user.id, "Created Grubber user");
    Ok(Json(user))
}

/// DELETE /grubber/:id - Delete a Grubber user
pub async fn delete_user(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .store
        .delete(&state.tables.grubber_users, &id)
        .await
        .map_err(AppError::store("Could not delete Grubber user"))?;

    tracing::debug!(user_id = %id, "Deleted Grubber user");
    Ok(Json(SuccessResponse::ok()))
}
