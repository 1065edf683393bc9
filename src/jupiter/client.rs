//! HTTP client for the Jupiter REST APIs.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, Result};

/// JSON-over-HTTP client shared by the Ultra and Trigger services.
#[derive(Debug, Clone)]
pub struct JupiterClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl JupiterClient {
    /// Wrap a shared `reqwest::Client` built with `timeout`.
    pub fn new(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// GET `url` with `query` and decode the JSON body.
    pub async fn get_json<Q, T>(&self, url: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(url, "Jupiter GET");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::from_http(e, self.timeout))?;

        self.decode(url, response).await
    }

    /// POST `body` as JSON to `url` and decode the JSON response.
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(url, "Jupiter POST");

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::from_http(e, self.timeout))?;

        self.decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(&self, url: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await.map_err(|e| AppError::from_http(e, self.timeout))?;

        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "Jupiter request failed");
            return Err(AppError::Upstream { status: status.as_u16(), body: text });
        }

        serde_json::from_str(&text).map_err(|e| AppError::Parse(format!("{url}: {e}")))
    }
}

/// Empty query string.
pub const NO_QUERY: &[(&str, &str)] = &[];

/// Join a base URL and an endpoint path.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
