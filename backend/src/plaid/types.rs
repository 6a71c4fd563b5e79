//! Plaid API request and response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User block of a link token request
#[derive(Debug, Serialize)]
pub struct LinkTokenUser {
    /// Stable identifier of the end user in this application
    pub client_user_id: String,
}

/// Depository account filter
#[derive(Debug, Serialize)]
pub struct DepositoryFilter {
    /// Allowed account subtypes
    pub account_subtypes: Vec<String>,
}

/// Account filters of a link token request
#[derive(Debug, Serialize)]
pub struct AccountFilters {
    /// Filter for depository accounts
    pub depository: DepositoryFilter,
}

/// Body of `POST /link/token/create`
#[derive(Debug, Serialize)]
pub struct LinkTokenCreateRequest {
    /// Owner of the link session
    pub user: LinkTokenUser,
    /// Name shown in the Link UI
    pub client_name: String,
    /// Plaid products to enable
    pub products: Vec<String>,
    /// ISO country codes
    pub country_codes: Vec<String>,
    /// Link UI language
    pub language: String,
    /// Webhook receiving item updates
    pub webhook: String,
    /// Restrict selectable accounts
    pub account_filters: AccountFilters,
}

/// Response of `POST /link/token/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTokenCreateResponse {
    /// Token passed to the Link frontend
    pub link_token: String,
    /// Expiration timestamp
    #[serde(default)]
    pub expiration: Option<String>,
    /// Plaid request identifier
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Body of `POST /item/public_token/exchange`
#[derive(Debug, Serialize)]
pub struct PublicTokenExchangeRequest {
    /// Public token returned by Link
    pub public_token: String,
}

/// Response of `POST /item/public_token/exchange`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicTokenExchangeResponse {
    /// Long-lived access token for the item
    pub access_token: String,
    /// Linked item identifier
    pub item_id: String,
    /// Plaid request identifier
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Paging options of a transactions request
#[derive(Debug, Serialize)]
pub struct TransactionsOptions {
    /// Number of transactions to fetch
    pub count: u32,
    /// Number of transactions to skip
    pub offset: u32,
}

/// Body of `POST /transactions/get`
#[derive(Debug, Serialize)]
pub struct TransactionsGetRequest {
    /// Item access token
    pub access_token: String,
    /// Inclusive start date (YYYY-MM-DD)
    pub start_date: String,
    /// Inclusive end date (YYYY-MM-DD)
    pub end_date: String,
    /// Paging
    pub options: TransactionsOptions,
}

/// Response of `POST /transactions/get`
///
/// Transactions are passed through to clients without interpretation.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsGetResponse {
    /// Transactions in the requested window
    pub transactions: Vec<Value>,
    /// Total number of transactions available for the window
    #[serde(default)]
    pub total_transactions: Option<u64>,
}

/// Error body returned by Plaid on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct PlaidErrorBody {
    /// Broad error category
    #[serde(default)]
    pub error_type: Option<String>,
    /// Specific error code
    pub error_code: String,
    /// Developer-facing message
    pub error_message: String,
}
