//! Router construction
//!
//! Wires every endpoint to its handler and applies the shared middleware.

use crate::api;
use crate::state::SharedState;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = start.elapsed().as_millis(),
        "Request completed"
    );

    response
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the application router
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Grubber restaurants
        .route(
            "/grubber/restaurants",
            get(api::restaurants::list_restaurants).post(api::restaurants::create_restaurant),
        )
        .route(
            "/grubber/restaurants/:id",
            get(api::restaurants::get_restaurant).delete(api::restaurants::delete_restaurant),
        )
        // Grubber diets (static segment takes priority over /grubber/:id)
        .route("/grubber/diets", get(api::diets::list_diets))
        // Grubber favorites
        .route("/grubber/favorites/add", put(api::favorites::add_favorite))
        .route(
            "/grubber/favorites/delete",
            put(api::favorites::delete_favorite),
        )
        // Grubber users
        .route(
            "/grubber",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route(
            "/grubber/:id",
            get(api::users::get_user).delete(api::users::delete_user),
        )
        // Nellet
        .route("/user/:id", get(api::nellet::get_nellet_user))
        .route(
            "/nellet/user/register",
            post(api::nellet::register_nellet_user),
        )
        // Plaid
        .route("/create_link_token", post(api::plaid::create_link_token))
        .route("/get_access_token", post(api::plaid::get_access_token))
        .route("/transactions", post(api::plaid::get_transactions))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
