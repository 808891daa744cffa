//! HTTP seam between the handlers and the storefront server.
//!
//! Handlers talk to [`ApiClient`], which speaks in domain types. The client
//! hands plain [`ApiRequest`] values to a [`Transport`] and reads plain
//! [`ApiResponse`] values back, so the browser `fetch` binding, the native
//! `reqwest` binding and the test fakes are interchangeable.

mod client;
#[cfg(not(target_arch = "wasm32"))]
mod native;

pub use client::ApiClient;
#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestTransport;

use serde::de::DeserializeOwned;

use crate::csrf::CsrfToken;
use crate::error::ClientError;

/// HTTP method used by the storefront endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the page origin, e.g. `/api/cart/count/`.
    pub path: String,
    /// Serialized JSON body. Sent with `Content-Type: application/json`.
    pub body: Option<String>,
    /// CSRF token for the `X-CSRFToken` header.
    pub csrf: Option<CsrfToken>,
}

impl ApiRequest {
    /// A `GET` without body or token.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            csrf: None,
        }
    }

    /// A `POST` without body.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: None,
            csrf: None,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Parse` if `body` cannot be serialized.
    pub fn json<B: serde::Serialize>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Attach the CSRF token, if there is one.
    #[must_use]
    pub fn csrf(mut self, token: Option<CsrfToken>) -> Self {
        self.csrf = token;
        self
    }
}

/// What came back from the server, after redirects were followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Final HTTP status.
    pub status: u16,
    /// Whether one or more redirects were followed.
    pub redirected: bool,
    /// Final URL after redirects.
    pub url: String,
    /// `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// A 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Whether the server labelled the body as JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }

    /// Decode the body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Parse` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends requests to the storefront server.
///
/// Implementations must follow redirects and report whether they did.
/// Only transport-level failures are errors; any HTTP status is a response.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Send `request` and wait for the full response body.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError>;
}
