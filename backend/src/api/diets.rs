//! Grubber diet API handlers
//!
//! Diets are read-only reference data seeded outside the API.

use crate::error::AppError;
use crate::state::SharedState;
use crate::store::Document;
use axum::{extract::State, response::Json};

/// GET /grubber/diets - List all diets
pub async fn list_diets(State(state): State<SharedState>) -> Result<Json<Vec<Document>>, AppError> {
    let items = state
        .store
        .scan(&state.tables.grubber_diets)
        .await
        .map_err(AppError::store("Error fetching the grubber data -- diets"))?;

    Ok(Json(items))
}
