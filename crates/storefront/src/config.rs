//! Client configuration.
//!
//! The page may embed a JSON object in
//! `<script type="application/json" id="storefront-config">`. Every field is
//! optional; anything left out keeps its default. Without the element the
//! defaults below are used as-is.
//!
//! # Defaults
//!
//! - `endpoints.cart_count` - `/api/cart/count/`
//! - `endpoints.add_to_cart` - `/add_to_cart/`
//! - `endpoints.wishlist_toggle` - `/wishlist/add/{product_id}/`
//! - `endpoints.newsletter_subscribe` - `/api/newsletter/subscribe/`
//! - `csrf_cookie` - `csrftoken`
//! - `login_path` - `/accounts/login/`
//! - `cart_storage_key` - `cart`
//! - `log_filter` - `technest_storefront=info`
//! - `toast` - entry delay 10ms, exit 300ms, durations 4000/5000/4500/4000ms

use std::time::Duration;

use serde::Deserialize;
use technest_core::ProductId;
use thiserror::Error;

use crate::toast::ToastKind;

/// Placeholder substituted with the product ID in the wishlist endpoint.
pub const PRODUCT_ID_PLACEHOLDER: &str = "{product_id}";

/// Element ID of the embedded configuration blob.
pub const CONFIG_ELEMENT_ID: &str = "storefront-config";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server endpoints the client talks to
    pub endpoints: Endpoints,
    /// Name of the cookie holding the CSRF token
    pub csrf_cookie: String,
    /// Login page used when the wishlist endpoint answers with HTML
    pub login_path: String,
    /// localStorage key of the offline cart snapshot
    pub cart_storage_key: String,
    /// `tracing` filter directive for the browser console
    pub log_filter: String,
    /// Toast timings
    pub toast: ToastConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            csrf_cookie: "csrftoken".to_string(),
            login_path: "/accounts/login/".to_string(),
            cart_storage_key: "cart".to_string(),
            log_filter: "technest_storefront=info".to_string(),
            toast: ToastConfig::default(),
        }
    }
}

/// Server endpoint paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// `GET` current cart item count
    pub cart_count: String,
    /// `POST` add a product to the cart
    pub add_to_cart: String,
    /// `POST` toggle wishlist membership; must contain `{product_id}`
    pub wishlist_toggle: String,
    /// `POST` subscribe an email address to the newsletter
    pub newsletter_subscribe: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cart_count: "/api/cart/count/".to_string(),
            add_to_cart: "/add_to_cart/".to_string(),
            wishlist_toggle: format!("/wishlist/add/{PRODUCT_ID_PLACEHOLDER}/"),
            newsletter_subscribe: "/api/newsletter/subscribe/".to_string(),
        }
    }
}

impl Endpoints {
    /// Wishlist endpoint for a specific product.
    #[must_use]
    pub fn wishlist_for(&self, product_id: ProductId) -> String {
        self.wishlist_toggle
            .replace(PRODUCT_ID_PLACEHOLDER, &product_id.to_string())
    }
}

/// Toast animation and display timings, in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToastConfig {
    /// Delay before the entry transition starts
    pub enter_delay_ms: u32,
    /// Length of the exit animation before the node is removed
    pub exit_ms: u32,
    /// Default duration of success toasts
    pub success_ms: u32,
    /// Default duration of error toasts
    pub error_ms: u32,
    /// Default duration of warning toasts
    pub warning_ms: u32,
    /// Default duration of info toasts
    pub info_ms: u32,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: 10,
            exit_ms: 300,
            success_ms: 4000,
            error_ms: 5000,
            warning_ms: 4500,
            info_ms: 4000,
        }
    }
}

impl ToastConfig {
    /// Delay before a toast gets its `show` class.
    #[must_use]
    pub fn enter_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.enter_delay_ms))
    }

    /// Time between `hiding` and removal.
    #[must_use]
    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.exit_ms))
    }

    /// Default display duration for a kind.
    #[must_use]
    pub fn duration_for(&self, kind: ToastKind) -> Duration {
        let ms = match kind {
            ToastKind::Success => self.success_ms,
            ToastKind::Error => self.error_ms,
            ToastKind::Warning => self.warning_ms,
            ToastKind::Info => self.info_ms,
        };
        Duration::from_millis(u64::from(ms))
    }
}

impl ClientConfig {
    /// Parse and validate a JSON configuration blob.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the JSON is malformed or a value fails
    /// validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("endpoints.cart_count", &self.endpoints.cart_count),
            ("endpoints.add_to_cart", &self.endpoints.add_to_cart),
            ("endpoints.wishlist_toggle", &self.endpoints.wishlist_toggle),
            (
                "endpoints.newsletter_subscribe",
                &self.endpoints.newsletter_subscribe,
            ),
            ("login_path", &self.login_path),
        ];
        for (name, path) in paths {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidValue(
                    name,
                    format!("{path:?} must start with '/'"),
                ));
            }
        }

        if !self
            .endpoints
            .wishlist_toggle
            .contains(PRODUCT_ID_PLACEHOLDER)
        {
            return Err(ConfigError::InvalidValue(
                "endpoints.wishlist_toggle",
                format!("must contain {PRODUCT_ID_PLACEHOLDER}"),
            ));
        }

        if self.csrf_cookie.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "csrf_cookie",
                "cannot be empty".to_string(),
            ));
        }

        if self.cart_storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "cart_storage_key",
                "cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
