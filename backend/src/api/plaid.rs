//! Plaid API handlers
//!
//! Link-token creation, public-token exchange and transaction retrieval.

use crate::api::utils::{require_field, JsonOrDefault};
use crate::error::AppError;
use crate::plaid::PublicTokenExchangeResponse;
use crate::state::SharedState;
use axum::{extract::State, response::Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// End-user id sent with every link token request
pub const LINK_CLIENT_USER_ID: &str = "1234-test-user-id";
/// Default start of the transactions window
pub const DEFAULT_START_DATE: &str = "2020-01-01";
/// Default end of the transactions window
pub const DEFAULT_END_DATE: &str = "2021-01-31";
/// Default and maximum page size accepted by Plaid
pub const DEFAULT_TRANSACTION_COUNT: u32 = 250;
const MAX_TRANSACTION_COUNT: u32 = 500;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Response of the link token endpoint
#[derive(Debug, Serialize)]
pub struct LinkTokenResponse {
    /// Token for the Link frontend
    pub link_token: String,
}

/// Access token exchange request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenRequest {
    /// Public token returned by Link
    pub public_token: Option<String>,
}

/// Transactions request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsRequest {
    /// Item access token
    pub access_token: Option<String>,
    /// Window start (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Window end (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// Page size
    pub count: Option<u32>,
    /// Page offset
    pub offset: Option<u32>,
}

/// Response of the transactions endpoint
#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    /// Transactions as returned by Plaid
    pub transactions: Vec<Value>,
}

/// POST /create_link_token - Start a Link session
pub async fn create_link_token(
    State(state): State<SharedState>,
) -> Result<Json<LinkTokenResponse>, AppError> {
    let response = state.plaid.create_link_token(LINK_CLIENT_USER_ID).await?;

    Ok(Json(LinkTokenResponse {
        link_token: response.link_token,
    }))
}

/// POST /get_access_token - Exchange a public token for an access token
pub async fn get_access_token(
    State(state): State<SharedState>,
    JsonOrDefault(request): JsonOrDefault<AccessTokenRequest>,
) -> Result<Json<PublicTokenExchangeResponse>, AppError> {
    let public_token = require_field(&request.public_token, "no public token")?;
    let response = state.plaid.exchange_public_token(public_token).await?;

    tracing::info!(item_id = %response.item_id, "Exchanged public token");
    Ok(Json(response))
}

/// POST /transactions - Fetch transactions for a linked item
pub async fn get_transactions(
    State(state): State<SharedState>,
    JsonOrDefault(request): JsonOrDefault<TransactionsRequest>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let access_token = require_field(&request.access_token, "no access token")?;
    let (start_date, end_date) = transaction_window(&request)?;
    let count = request.count.unwrap_or(DEFAULT_TRANSACTION_COUNT);
    if count == 0 || count > MAX_TRANSACTION_COUNT {
        return Err(AppError::BadRequest(format!(
            "count must be between 1 and {}",
            MAX_TRANSACTION_COUNT
        )));
    }

    let response = state
        .plaid
        .get_transactions(
            access_token,
            &start_date.format(DATE_FORMAT).to_string(),
            &end_date.format(DATE_FORMAT).to_string(),
            count,
            request.offset.unwrap_or(0),
        )
        .await?;

    Ok(Json(TransactionsResponse {
        transactions: response.transactions,
    }))
}

/// Parse and validate the requested date window, applying defaults
fn transaction_window(request: &TransactionsRequest) -> Result<(NaiveDate, NaiveDate), AppError> {
    let parse = |value: Option<&str>, default: &str, name: &str| {
        let raw = value.unwrap_or(default);
        NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
            AppError::BadRequest(format!("{} must be a YYYY-MM-DD date, got {:?}", name, raw))
        })
    };

    let start = parse(request.start_date.as_deref(), DEFAULT_START_DATE, "startDate")?;
    let end = parse(request.end_date.as_deref(), DEFAULT_END_DATE, "endDate")?;
    if start > end {
        return Err(AppError::BadRequest(
            "startDate must not be after endDate".to_string(),
        ));
    }

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::utils::test_state;

    #[test]
    fn test_transaction_window_defaults() {
        let (start, end) = transaction_window(&TransactionsRequest::default()).unwrap();
        assert_eq!(start.to_string(), DEFAULT_START_DATE);
        assert_eq!(end.to_string(), DEFAULT_END_DATE);
    }

    #[test]
    fn test_transaction_window_validation() {
        let request = TransactionsRequest {
            start_date: Some("2021-13-01".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            transaction_window(&request),
            Err(AppError::BadRequest(_))
        ));

        let request = TransactionsRequest {
            start_date: Some("2021-02-01".to_string()),
            end_date: Some("2021-01-01".to_string()),
            ..Default::default()
        };
        assert!(transaction_window(&request).is_err());
    }

    #[tokio::test]
    async fn test_missing_tokens_are_bad_requests() {
        let state = test_state();

        match get_access_token(State(state.clone()), JsonOrDefault(AccessTokenRequest::default()))
            .await
            .unwrap_err()
        {
            AppError::BadRequest(message) => assert_eq!(message, "no public token"),
            other => panic!("Expected BadRequest error, got: {:?}", other),
        }

        match get_transactions(State(state), JsonOrDefault(TransactionsRequest::default()))
            .await
            .unwrap_err()
        {
            AppError::BadRequest(message) => assert_eq!(message, "no access token"),
            other => panic!("Expected BadRequest error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_count_out_of_range() {
        let state = test_state();
        let request = TransactionsRequest {
            access_token: Some("access".to_string()),
            count: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            get_transactions(State(state), JsonOrDefault(request)).await,
            Err(AppError::BadRequest(_))
        ));
    }
}
