// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thin JSON-over-HTTP client for the campus exchange REST backend.
//!
//! Maps every failure onto the transport family of [`BarterError`]:
//! unreachable backend, non-2xx status, or a body that does not decode.
//! It never retries; retry policy belongs to the caller.

use std::sync::Arc;
use std::time::Duration;

use barter_core::{BarterError, TokenSource};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// HTTP client bound to one backend origin.
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl RestClient {
    /// Creates a client for `base_url`.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, BarterError> {
        let base = reqwest::Url::parse(base_url)
            .map_err(|e| BarterError::Config(format!("invalid backend URL `{base_url}`: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| BarterError::Transport {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Origin all request paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET path?query` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BarterError> {
        let request = self.client.get(self.url(path)).query(query);
        let response = self.execute(request).await?;
        decode(response).await
    }

    /// `POST path` with a JSON body and decode the JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BarterError> {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.execute(request).await?;
        decode(response).await
    }

    /// `PUT path?query`, ignoring the response body.
    pub async fn put(&self, path: &str, query: &[(&str, &str)]) -> Result<(), BarterError> {
        let request = self.client.put(self.url(path)).query(query);
        self.execute(request).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attaches the bearer token (when one exists), sends, and rejects non-2xx.
    async fn execute(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, BarterError> {
        if let Some(token) = self.tokens.bearer_token() {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| BarterError::Transport {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        debug!(status = %status, url = %response.url(), "backend response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(BarterError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BarterError> {
    let body = response.text().await.map_err(|e| BarterError::Transport {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| BarterError::Decode {
        message: format!("unexpected response shape: {e}"),
        source: Some(Box::new(e)),
    })
}
