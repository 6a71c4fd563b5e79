//! Error types and error handling for the application
//!
//! Every handler returns `Result<_, AppError>`, so an error short-circuits the
//! handler and exactly one response is written.

use crate::plaid::PlaidError;
use crate::store::StoreError;
use axum::{
    extract::rejection::{BytesRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A store operation failed; `context` is the client-facing message
    #[error("{context}")]
    Store {
        /// Fixed message for the failing route
        context: &'static str,
        /// Underlying store failure (logged, never sent to the client)
        #[source]
        source: StoreError,
    },

    /// The requested record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request is missing a required value or carries an invalid one
    #[error("{0}")]
    BadRequest(String),

    /// Request body is missing or is not the expected JSON
    #[error("{0}")]
    InvalidBody(String),

    /// The financial-data API call failed
    #[error("{0}")]
    ExternalApi(#[from] PlaidError),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a mapper from a store error to a route-specific error
    ///
    /// Used as `.map_err(AppError::store("Could not create Grubber user"))`.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Store { context, source }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Store { context, source } => {
                tracing::error!(error = %source, "{}", context);
                (StatusCode::BAD_REQUEST, json!({ "error": context }))
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "err": message })),
            AppError::InvalidBody(message) => {
                tracing::debug!(reason = %message, "Rejected request body");
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            AppError::ExternalApi(error) => {
                tracing::warn!(error = %error, "Financial data API call failed");
                (StatusCode::BAD_GATEWAY, json!({ "err": error.to_string() }))
            }
            AppError::Internal(error) => {
                tracing::error!(error = %error, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let store_error = AppError::store("Could not create Grubber user")(StoreError::MissingKey);
        assert_eq!(store_error.to_string(), "Could not create Grubber user");
        assert_eq!(store_error.into_response().status(), StatusCode::BAD_REQUEST);

        let not_found = AppError::NotFound("Grubber user with id: 1 not found".to_string());
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let bad_request = AppError::BadRequest("no access token".to_string());
        assert_eq!(bad_request.into_response().status(), StatusCode::BAD_REQUEST);

        let invalid_body = AppError::InvalidBody("expected a JSON object".to_string());
        assert_eq!(invalid_body.into_response().status(), StatusCode::BAD_REQUEST);

        let external = AppError::from(PlaidError::MissingCredentials);
        assert_eq!(external.into_response().status(), StatusCode::BAD_GATEWAY);

        let internal = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
