//! API utility functions
//!
//! Shared response types and helpers used by the API handlers.

use crate::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

/// JSON body extractor whose rejections are [`AppError::InvalidBody`]
///
/// Keeps error responses in the JSON shape of every other failure instead of
/// axum's plain-text rejection.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// JSON body extractor for requests whose fields are all optional
///
/// An empty body reads as `T::default()`, so a missing value reaches the
/// handler's own validation. The content type is not checked.
#[derive(Debug)]
pub struct JsonOrDefault<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonOrDefault<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(Self(value))
    }
}

/// Response of delete endpoints
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    /// Always true; failures are reported as errors
    pub success: bool,
}

impl SuccessResponse {
    /// Successful outcome
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Build the 404 error for a missing record
///
/// # Arguments
/// * `kind` - Human-readable record kind (e.g. "Grubber user")
/// * `id` - Requested id, echoed in the message
pub fn not_found(kind: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id: {} not found", kind, id))
}

/// Require a non-empty string field from a request body
///
/// # Returns
/// * `Ok(&str)` - The trimmed-non-empty value
/// * `Err(AppError::BadRequest)` - With `message` when missing or blank
pub fn require_field<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, AppError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(message.to_string())),
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> crate::state::SharedState {
    let plaid = crate::plaid::PlaidClient::new(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
        "client-id",
        "secret",
    );
    std::sync::Arc::new(crate::state::AppState::in_memory(plaid))
}
