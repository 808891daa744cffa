//! `fetch` transport.

use gloo_net::http::Request;
use tracing::debug;

use crate::api::{ApiRequest, ApiResponse, Method, Transport};
use crate::csrf::CSRF_HEADER;
use crate::error::ClientError;

impl From<gloo_net::Error> for ClientError {
    fn from(err: gloo_net::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Sends requests with the browser's `fetch`, relative to the page origin.
///
/// Cookies go along (same-origin) and redirects are followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.path),
            Method::Post => Request::post(&request.path),
        };
        if let Some(token) = &request.csrf {
            builder = builder.header(CSRF_HEADER, token.expose());
        }

        let outgoing = match request.body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(body)?,
            None => builder.build()?,
        };

        let response = outgoing.send().await?;
        let status = response.status();
        debug!(method = request.method.as_str(), path = %request.path, status, "fetch completed");

        Ok(ApiResponse {
            status,
            redirected: response.redirected(),
            url: response.url(),
            content_type: response.headers().get("content-type"),
            body: response.text().await?,
        })
    }
}
