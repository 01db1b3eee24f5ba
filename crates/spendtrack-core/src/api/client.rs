//! API client for the spendtrack backend.
//!
//! Every data request runs through the session pipeline: the held token
//! is attached before sending (or the request aborted if it expired),
//! and 401 responses end the session before the error reaches the
//! caller.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::Session;
use crate::models::{
    AnnualSpending, Budget, Category, DashboardSummary, Me, NewBudget, NewCategory,
    NewTransaction, Profile, Transaction,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct TokenPairResponse {
    access: String,
    refresh: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// API client for the spendtrack backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a new API client against `base_url`.
    pub fn new(base_url: impl Into<String>, session: Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// The session this client attaches to requests.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange credentials for a token pair and establish the session.
    ///
    /// Sent outside the request hook: this is the call that creates the
    /// session, so there is never a bearer token to attach, and a 401
    /// here means bad credentials rather than an expired session.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let url = self.url("token/");
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .context("Failed to send login request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body).into());
        }

        let tokens: TokenPairResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;
        debug!("Token pair received");
        self.session.establish(&tokens.access, &tokens.refresh)?;
        Ok(())
    }

    /// Bearer header for the current session, if one should be sent.
    ///
    /// Runs the session's request hook: an expired token aborts the
    /// request here, before anything reaches the network.
    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        let token = self
            .session
            .token_for_request(Utc::now())
            .map_err(ApiError::from)?;
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check a completed response, mapping failures to `ApiError`.
    ///
    /// Runs the session's response hook first, so a 401 ends the
    /// session before the error is returned.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        self.session.observe_status(response.status());
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        self.check_response(response).await?;
        Ok(())
    }

    // ===== Transactions =====

    pub async fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        self.get("transactions/").await
    }

    pub async fn fetch_transaction(&self, id: i64) -> Result<Transaction> {
        self.get(&format!("transactions/{}/", id)).await
    }

    pub async fn create_transaction(&self, new: &NewTransaction) -> Result<Transaction> {
        self.post("transactions/", new).await
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        update: &NewTransaction,
    ) -> Result<Transaction> {
        self.put(&format!("transactions/{}/", id), update).await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        self.delete(&format!("transactions/{}/", id)).await
    }

    // ===== Budgets =====

    pub async fn fetch_budgets(&self) -> Result<Vec<Budget>> {
        self.get("budgets/").await
    }

    pub async fn create_budget(&self, new: &NewBudget) -> Result<Budget> {
        self.post("budgets/", new).await
    }

    pub async fn update_budget(&self, id: i64, update: &NewBudget) -> Result<Budget> {
        self.put(&format!("budgets/{}/", id), update).await
    }

    pub async fn delete_budget(&self, id: i64) -> Result<()> {
        self.delete(&format!("budgets/{}/", id)).await
    }

    // ===== Categories =====

    pub async fn fetch_categories(&self) -> Result<Vec<Category>> {
        self.get("categories/").await
    }

    pub async fn create_category(&self, new: &NewCategory) -> Result<Category> {
        self.post("categories/", new).await
    }

    pub async fn update_category(&self, id: i64, update: &NewCategory) -> Result<Category> {
        self.put(&format!("categories/{}/", id), update).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        self.delete(&format!("categories/{}/", id)).await
    }

    // ===== Dashboard & analytics =====

    pub async fn fetch_dashboard(&self) -> Result<DashboardSummary> {
        self.get("dashboard/").await
    }

    pub async fn fetch_annual_spending(&self) -> Result<Vec<AnnualSpending>> {
        self.get("analytics/annual-spending/").await
    }

    // ===== Account =====

    pub async fn fetch_me(&self) -> Result<Me> {
        self.get("me/").await
    }

    pub async fn fetch_profile(&self) -> Result<Profile> {
        self.get("profile/").await
    }

    pub async fn update_profile(&self, profile: &Profile) -> Result<Profile> {
        self.put("profile/", profile).await
    }

    /// Change the account password. The response carries no body.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<()> {
        let url = self.url("users/set_password/");
        let body = serde_json::json!({
            "current_password": current,
            "new_password": new,
        });
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        self.check_response(response).await?;
        Ok(())
    }
}
