//! Plaid API client
//!
//! Thin HTTP wrapper over the three Plaid endpoints the service uses.
//! Credentials are sent as `PLAID-CLIENT-ID` / `PLAID-SECRET` headers.

use crate::plaid::types::{
    AccountFilters, DepositoryFilter, LinkTokenCreateRequest, LinkTokenCreateResponse,
    LinkTokenUser, PlaidErrorBody, PublicTokenExchangeRequest, PublicTokenExchangeResponse,
    TransactionsGetRequest, TransactionsGetResponse, TransactionsOptions,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// Name shown to the user in the Link flow
pub const CLIENT_NAME: &str = "Plaid Test App";
/// Webhook registered on new link tokens
pub const WEBHOOK_URL: &str = "https://sample-web-hook.com";

/// Errors returned by the Plaid client
#[derive(Error, Debug)]
pub enum PlaidError {
    /// Client id or secret is empty
    #[error("Plaid credentials are not configured")]
    MissingCredentials,

    /// The HTTP request could not be completed
    #[error("Failed to reach Plaid: {0}")]
    Transport(#[from] reqwest::Error),

    /// Plaid answered with an error body
    #[error("{message}")]
    Api {
        /// HTTP status returned by Plaid
        status: u16,
        /// Plaid error code (e.g. `INVALID_ACCESS_TOKEN`)
        code: String,
        /// Plaid error message
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Invalid response from Plaid: {0}")]
    InvalidResponse(String),
}

/// Plaid deployment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaidEnvironment {
    /// Test data, no real institutions
    #[default]
    Sandbox,
    /// Limited live institutions
    Development,
    /// Live
    Production,
}

impl PlaidEnvironment {
    /// Base URL of the environment's API
    pub fn base_url(&self) -> &'static str {
        match self {
            PlaidEnvironment::Sandbox => "https://sandbox.plaid.com",
            PlaidEnvironment::Development => "https://development.plaid.com",
            PlaidEnvironment::Production => "https://production.plaid.com",
        }
    }
}

impl FromStr for PlaidEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(PlaidEnvironment::Sandbox),
            "development" => Ok(PlaidEnvironment::Development),
            "production" => Ok(PlaidEnvironment::Production),
            other => Err(format!("unknown Plaid environment: {}", other)),
        }
    }
}

/// Client for the Plaid REST API
#[derive(Clone)]
pub struct PlaidClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    secret: String,
}

impl std::fmt::Debug for PlaidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaidClient")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl PlaidClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `http` - Shared HTTP client (connection pooling)
    /// * `base_url` - API base URL, without trailing slash
    /// * `client_id` - Plaid client id
    /// * `secret` - Plaid secret for the environment
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            secret: secret.into(),
        }
    }

    /// Create a link token for the Link frontend
    pub async fn create_link_token(
        &self,
        client_user_id: &str,
    ) -> Result<LinkTokenCreateResponse, PlaidError> {
        let request = LinkTokenCreateRequest {
            user: LinkTokenUser {
                client_user_id: client_user_id.to_string(),
            },
            client_name: CLIENT_NAME.to_string(),
            products: vec!["auth".to_string(), "transactions".to_string()],
            country_codes: vec!["US".to_string()],
            language: "en".to_string(),
            webhook: WEBHOOK_URL.to_string(),
            account_filters: AccountFilters {
                depository: DepositoryFilter {
                    account_subtypes: vec!["checking".to_string(), "savings".to_string()],
                },
            },
        };

        self.post("/link/token/create", &request).await
    }

    /// Exchange a Link public token for an access token
    pub async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<PublicTokenExchangeResponse, PlaidError> {
        let request = PublicTokenExchangeRequest {
            public_token: public_token.to_string(),
        };

        self.post("/item/public_token/exchange", &request).await
    }

    /// Fetch transactions for an item within a date window
    pub async fn get_transactions(
        &self,
        access_token: &str,
        start_date: &str,
        end_date: &str,
        count: u32,
        offset: u32,
    ) -> Result<TransactionsGetResponse, PlaidError> {
        let request = TransactionsGetRequest {
            access_token: access_token.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            options: TransactionsOptions { count, offset },
        };

        self.post("/transactions/get", &request).await
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, PlaidError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        if self.client_id.is_empty() || self.secret.is_empty() {
            return Err(PlaidError::MissingCredentials);
        }

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Calling Plaid API");

        let response = self
            .http
            .post(&url)
            .header("PLAID-CLIENT-ID", &self.client_id)
            .header("PLAID-SECRET", &self.secret)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status_code = status.as_u16(),
                error_body = %response_body,
                "Plaid API returned error status"
            );

            return Err(match serde_json::from_str::<PlaidErrorBody>(&response_body) {
                Ok(error) => PlaidError::Api {
                    status: status.as_u16(),
                    code: error.error_code,
                    message: error.error_message,
                },
                Err(_) => PlaidError::Api {
                    status: status.as_u16(),
                    code: "UNKNOWN".to_string(),
                    message: format!("Plaid returned HTTP {}", status.as_u16()),
                },
            });
        }

        serde_json::from_str(&response_body)
            .map_err(|e| PlaidError::InvalidResponse(format!("{} - Response body: {}", e, response_body)))
    }
}
