//! JSON bodies exchanged with the storefront server.
//!
//! | Endpoint | Request | Response |
//! |---|---|---|
//! | `GET /api/cart/count/` | - | [`CartCountResponse`] |
//! | `POST /add_to_cart/` | [`AddToCartRequest`] | [`StatusResponse`] |
//! | `POST /wishlist/add/{id}/` | - | [`WishlistResponse`] |
//! | `POST /api/newsletter/subscribe/` | [`SubscribeRequest`] | [`StatusResponse`] |
//!
//! Response types are deliberately forgiving: every field is optional so a
//! partial body still decodes and the caller decides what a missing field
//! means.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{CartCount, Email, ProductId, Quantity};

/// Status string the server uses for a successful mutation.
pub const STATUS_SUCCESS: &str = "success";

/// Body of `GET /api/cart/count/`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CartCountResponse {
    /// Total items in the cart, as sent. Kept raw so a string or fractional
    /// count still decodes.
    #[serde(default)]
    pub count: Value,
}

impl CartCountResponse {
    /// The count, coerced the way the badge coerces text: `"5"` and `5.7`
    /// are 5; missing, null, negative or unreadable values are zero.
    #[must_use]
    pub fn cart_count(&self) -> CartCount {
        match &self.count {
            Value::String(text) => CartCount::parse_lenient(text),
            Value::Number(number) => CartCount::parse_lenient(&number.to_string()),
            _ => CartCount::ZERO,
        }
    }
}

/// Body of `POST /add_to_cart/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddToCartRequest {
    /// Product being added.
    pub product_id: ProductId,
    /// How many units to add.
    pub quantity: Quantity,
}

/// Generic `{status, message}` body returned by mutating endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct StatusResponse {
    /// `"success"` on success; anything else is a failure.
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable explanation, usually present on failure.
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    /// Whether the server reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    /// The server message, if it is non-empty.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// What a wishlist toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WishlistAction {
    /// The product is now in the wishlist.
    Added,
    /// The product was removed from the wishlist.
    Removed,
    /// Any other action string.
    #[serde(other)]
    Other,
}

/// Body of `POST /wishlist/add/{id}/`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct WishlistResponse {
    /// `"success"` on success.
    #[serde(default)]
    pub status: Option<String>,
    /// The action taken, present on success.
    #[serde(default)]
    pub action: Option<WishlistAction>,
    /// Message to show the visitor.
    #[serde(default)]
    pub message: Option<String>,
}

impl WishlistResponse {
    /// Whether the server reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    /// The server message, if it is non-empty.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Body of `POST /api/newsletter/subscribe/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscribeRequest {
    /// Address to subscribe.
    pub email: Email,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cart_count_defaults_to_zero() {
        let body: CartCountResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.cart_count(), CartCount::ZERO);

        let body: CartCountResponse = serde_json::from_str(r#"{"count": null}"#).unwrap();
        assert_eq!(body.cart_count(), CartCount::ZERO);

        let body: CartCountResponse = serde_json::from_str(r#"{"count": 4}"#).unwrap();
        assert_eq!(body.cart_count().get(), 4);
    }

    #[test]
    fn test_cart_count_coerces_loose_values() {
        let count = |raw: &str| {
            serde_json::from_str::<CartCountResponse>(raw)
                .unwrap()
                .cart_count()
                .get()
        };
        assert_eq!(count(r#"{"count": "5"}"#), 5);
        assert_eq!(count(r#"{"count": "12 items"}"#), 12);
        assert_eq!(count(r#"{"count": 5.7}"#), 5);
        assert_eq!(count(r#"{"count": -2}"#), 0);
        assert_eq!(count(r#"{"count": "abc"}"#), 0);
        assert_eq!(count(r#"{"count": true}"#), 0);
    }

    #[test]
    fn test_add_to_cart_request_shape() {
        let body = AddToCartRequest {
            product_id: ProductId::new(12),
            quantity: Quantity::new(3).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"product_id": 12, "quantity": 3})
        );
    }

    #[test]
    fn test_status_response() {
        let ok: StatusResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(ok.is_success());
        assert!(ok.message().is_none());

        let err: StatusResponse =
            serde_json::from_str(r#"{"status":"error","message":"Out of stock"}"#).unwrap();
        assert!(!err.is_success());
        assert_eq!(err.message(), Some("Out of stock"));

        let blank: StatusResponse = serde_json::from_str(r#"{"message":"  "}"#).unwrap();
        assert!(blank.message().is_none());
    }

    #[test]
    fn test_wishlist_actions() {
        let added: WishlistResponse =
            serde_json::from_str(r#"{"status":"success","action":"added","message":"Saved"}"#)
                .unwrap();
        assert!(added.is_success());
        assert_eq!(added.action, Some(WishlistAction::Added));

        let other: WishlistResponse =
            serde_json::from_str(r#"{"status":"success","action":"moved"}"#).unwrap();
        assert_eq!(other.action, Some(WishlistAction::Other));
    }

    #[test]
    fn test_subscribe_request_shape() {
        let body = SubscribeRequest {
            email: Email::parse("a@b.co").unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"email": "a@b.co"})
        );
    }
}
