//! HTTP access to the dashboard API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ClientError, ClientResult};
use crate::api::types::{LoginRequest, LoginResponse, ProfileResponse};
use crate::domain::DashboardData;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The server calls a page makes.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `POST /api/login`.
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse>;

    /// `GET /api/profile`, the session verification call.
    async fn profile(&self, token: &str) -> ClientResult<ProfileResponse>;

    /// `GET /api/dashboard`.
    async fn dashboard(&self, token: &str) -> ClientResult<DashboardData>;

    /// Fetch an HTML fragment such as the shared header.
    async fn fragment(&self, path: &str) -> ClientResult<String>;
}

/// reqwest-backed client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpDashboardApi {
    client: Client,
    base_url: String,
}

impl HttpDashboardApi {
    /// Create a client for the server at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_authenticated<T: DeserializeOwned>(&self, path: &str, token: &str) -> ClientResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Turn non-success statuses into errors.
    async fn check_response(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, "Request rejected");
        Err(ClientError::from_status(status, &body))
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(self.url("/api/login"))
            .json(&request)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn profile(&self, token: &str) -> ClientResult<ProfileResponse> {
        self.get_authenticated("/api/profile", token).await
    }

    async fn dashboard(&self, token: &str) -> ClientResult<DashboardData> {
        self.get_authenticated("/api/dashboard", token).await
    }

    async fn fragment(&self, path: &str) -> ClientResult<String> {
        let response = self
            .client
            .get(self.url(path))
            .header(header::ACCEPT, "text/html")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Ok(response.text().await?)
    }
}
