//! `reqwest` transport for native targets.
//!
//! Lets the same handlers run outside the browser, against a real server,
//! for headless smoke checks and the integration test suite.

use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::csrf::CSRF_HEADER;
use crate::error::ClientError;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Transport backed by a `reqwest::Client`.
///
/// Request paths are resolved against `base_url`. Redirects are followed
/// (reqwest's default policy) and detected by comparing the final URL with
/// the requested one.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Create a transport with a default client.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a transport with a preconfigured client (cookie store, timeouts).
    #[must_use]
    pub const fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The origin requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| ClientError::Transport(format!("invalid path {:?}: {e}", request.path)))?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
        };
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        if let Some(token) = &request.csrf {
            builder = builder.header(CSRF_HEADER, token.expose());
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        debug!(
            method = request.method.as_str(),
            url = %url,
            status,
            "Storefront request completed"
        );

        Ok(ApiResponse {
            status,
            redirected: final_url != url,
            url: final_url.to_string(),
            content_type,
            body,
        })
    }
}
