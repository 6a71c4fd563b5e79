//! Grubber restaurant API handlers
//!
//! Contains HTTP request handlers for restaurant CRUD operations.

use crate::api::utils::{not_found, JsonBody, SuccessResponse};
use crate::error::AppError;
use crate::grubber::{generate_id, RecordId, Restaurant};
use crate::state::SharedState;
use crate::store::{to_document, Document};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;

/// Create restaurant request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    /// Free-form description
    pub description: Option<String>,
    /// Display name
    pub restaurant_name: Option<String>,
    /// Images, stored as sent
    pub restaurant_images: Option<Value>,
    /// Website
    pub url: Option<String>,
}

/// GET /grubber/restaurants - List all restaurants
pub async fn list_restaurants(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let items = state
        .store
        .scan(&state.tables.grubber_restaurants)
        .await
        .map_err(AppError::store(
            "Error fetching the grubber data -- restaurants",
        ))?;

    Ok(Json(items))
}

/// GET /grubber/restaurants/:id - Get a specific restaurant
pub async fn get_restaurant(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Document>, AppError> {
    let item = state
        .store
        .get(&state.tables.grubber_restaurants, &id)
        .await
        .map_err(AppError::store("Error retrieving grubber restaurant"))?
        .ok_or_else(|| not_found("Grubber restaurant", &id))?;

    Ok(Json(item))
}

/// POST /grubber/restaurants - Create a restaurant with a generated id
pub async fn create_restaurant(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<CreateRestaurantRequest>,
) -> Result<Json<Restaurant>, AppError> {
    const CONTEXT: &str = "Could not create Grubber restaurant";

    let restaurant = Restaurant {
        id: generate_id(),
        description: request.description,
        restaurant_name: request.restaurant_name,
        restaurant_images: request.restaurant_images,
        url: request.url,
    };

    let document = to_document(&restaurant).map_err(AppError::store(CONTEXT))?;
    state
        .store
        .put(&state.tables.grubber_restaurants, document)
        .await
        .map_err(AppError::store(CONTEXT))?;

    tracing::debug!(restaurant_id = %restaurant.id, "Created restaurant");
    Ok(Json(restaurant))
}

/// DELETE /grubber/restaurants/:id - Delete a restaurant
pub async fn delete_restaurant(
    State(state): State<SharedState>,
    Path(id): Path<RecordId>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .store
        .delete(&state.tables.grubber_restaurants, &id)
        .await
        .map_err(AppError::store("Could not delete Grubber restaurant"))?;

    tracing::debug!(restaurant_id = %id, "Deleted restaurant");
    Ok(Json(SuccessResponse::ok()))
}
