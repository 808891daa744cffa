//! Wishlist heart buttons.
//!
//! The toggle endpoint sits behind the login wall, so an anonymous visitor
//! gets a redirect to the login page (followed by `fetch`) or an HTML page
//! instead of JSON. Both cases send the visitor to log in. Only a JSON body
//! is ever parsed.

use std::rc::Rc;

use technest_core::ProductId;
use technest_core::api::{WishlistAction, WishlistResponse};
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiResponse, Transport};
use crate::error::GENERIC_ERROR_MESSAGE;
use crate::navigation::{Navigator, login_url};
use crate::toast::ToastManager;

/// Toast for a 401 JSON answer.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login to add items to wishlist";

const ADDED_FALLBACK: &str = "Added to wishlist";
const REMOVED_FALLBACK: &str = "Removed from wishlist";

/// The heart icon inside a wishlist button.
pub trait WishlistIcon {
    /// Add or remove the `active` class.
    fn set_active(&self, active: bool);
}

/// How a toggle response must be handled, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistReply {
    /// `fetch` followed a redirect; go where it ended.
    Redirected(String),
    /// Not JSON: an HTML login or error page.
    NotJson,
    /// JSON with a 401 status.
    Unauthorized,
    /// A JSON body to act on.
    Body(WishlistResponse),
    /// Labelled JSON but unreadable.
    Malformed,
}

impl WishlistReply {
    /// Classify a response without parsing more than needed.
    #[must_use]
    pub fn classify(response: &ApiResponse) -> Self {
        if response.redirected {
            return Self::Redirected(response.url.clone());
        }
        if !response.is_json() {
            return Self::NotJson;
        }
        if response.status == 401 {
            return Self::Unauthorized;
        }
        response
            .json::<WishlistResponse>()
            .map_or(Self::Malformed, Self::Body)
    }
}

/// What a toggle ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistOutcome {
    /// Left the page for this URL.
    Navigated(String),
    /// Told the visitor to log in.
    Unauthorized,
    /// The product is now in the wishlist.
    Added,
    /// The product is no longer in the wishlist.
    Removed,
    /// The server refused or the request failed.
    Failed,
    /// The button had no usable product ID.
    MissingProduct,
}

/// Toggles wishlist membership.
pub struct WishlistToggler<T> {
    api: Rc<ApiClient<T>>,
    toasts: ToastManager,
    navigator: Rc<dyn Navigator>,
    login_path: String,
}

impl<T> Clone for WishlistToggler<T> {
    fn clone(&self) -> Self {
        Self {
            api: Rc::clone(&self.api),
            toasts: self.toasts.clone(),
            navigator: Rc::clone(&self.navigator),
            login_path: self.login_path.clone(),
        }
    }
}

impl<T: Transport> WishlistToggler<T> {
    #[must_use]
    pub fn new(
        api: Rc<ApiClient<T>>,
        toasts: ToastManager,
        navigator: Rc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            api,
            toasts,
            navigator,
            login_path: login_path.into(),
        }
    }

    /// Toggle using a `data-product-id` value straight from the page.
    pub async fn toggle_raw(&self, product_id: &str, icon: Option<&dyn WishlistIcon>) -> WishlistOutcome {
        match product_id.parse::<ProductId>() {
            Ok(product_id) => self.toggle(product_id, icon).await,
            Err(e) => {
                warn!(error = %e, "Wishlist button without a valid product ID");
                WishlistOutcome::MissingProduct
            }
        }
    }

    /// Toggle `product_id` and reflect the result on `icon`.
    ///
    /// The icon only changes on a successful JSON answer.
    #[instrument(skip(self, icon))]
    pub async fn toggle(&self, product_id: ProductId, icon: Option<&dyn WishlistIcon>) -> WishlistOutcome {
        let response = match self.api.toggle_wishlist(product_id).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Wishlist request failed");
                self.toasts.error(GENERIC_ERROR_MESSAGE);
                return WishlistOutcome::Failed;
            }
        };

        match WishlistReply::classify(&response) {
            WishlistReply::Redirected(url) => {
                info!(url = %url, "Wishlist redirected, following");
                self.navigator.navigate(&url);
                WishlistOutcome::Navigated(url)
            }
            WishlistReply::NotJson => {
                let url = login_url(&self.login_path, &self.navigator.current_path());
                info!(url = %url, status = response.status, "Wishlist answered with a page, sending to login");
                self.navigator.navigate(&url);
                WishlistOutcome::Navigated(url)
            }
            WishlistReply::Unauthorized => {
                self.toasts.error(LOGIN_REQUIRED_MESSAGE);
                WishlistOutcome::Unauthorized
            }
            WishlistReply::Malformed => {
                warn!(status = response.status, "Unreadable wishlist response");
                self.toasts.error(GENERIC_ERROR_MESSAGE);
                WishlistOutcome::Failed
            }
            WishlistReply::Body(body) if body.is_success() => {
                let added = body.action == Some(WishlistAction::Added);
                if let Some(icon) = icon {
                    icon.set_active(added);
                }
                if added {
                    self.toasts
                        .success(body.message().unwrap_or(ADDED_FALLBACK).to_owned());
                    WishlistOutcome::Added
                } else {
                    self.toasts
                        .info(body.message().unwrap_or(REMOVED_FALLBACK).to_owned());
                    WishlistOutcome::Removed
                }
            }
            WishlistReply::Body(body) => {
                warn!(status = response.status, message = ?body.message, "Wishlist toggle refused");
                self.toasts
                    .error(body.message().unwrap_or(GENERIC_ERROR_MESSAGE).to_owned());
                WishlistOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ClientError;
    use crate::testing::{
        FakeIcon, Harness, ScriptedTransport, json_response, redirect_response, text_response,
    };
    use crate::toast::ToastKind;

    async fn toggle(reply: crate::testing::Reply) -> (WishlistOutcome, Harness<ScriptedTransport>, FakeIcon) {
        let harness = Harness::new(ScriptedTransport::new([reply]));
        let icon = FakeIcon::default();
        let outcome = harness
            .storefront
            .wishlist()
            .toggle(ProductId::new(7), Some(&icon))
            .await;
        (outcome, harness, icon)
    }

    #[tokio::test]
    async fn test_added_sets_icon_and_success_toast() {
        let (outcome, harness, icon) = toggle(json_response(
            200,
            &json!({"status": "success", "action": "added", "message": "Added Phone"}),
        ))
        .await;
        assert_eq!(outcome, WishlistOutcome::Added);
        assert_eq!(icon.active(), Some(true));
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Success, "Added Phone".to_string())]
        );
    }

    #[tokio::test]
    async fn test_removed_clears_icon_and_info_toast() {
        let (outcome, harness, icon) = toggle(json_response(
            200,
            &json!({"status": "success", "action": "removed", "message": "Removed Phone"}),
        ))
        .await;
        assert_eq!(outcome, WishlistOutcome::Removed);
        assert_eq!(icon.active(), Some(false));
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Info, "Removed Phone".to_string())]
        );
    }

    #[tokio::test]
    async fn test_redirect_navigates_without_parsing() {
        let (outcome, harness, icon) = toggle(redirect_response(
            "http://shop.test/accounts/login/?next=/wishlist/add/7/",
            "{not json",
        ))
        .await;
        assert_eq!(
            outcome,
            WishlistOutcome::Navigated("http://shop.test/accounts/login/?next=/wishlist/add/7/".to_string())
        );
        assert_eq!(
            harness.navigator.visits(),
            vec!["http://shop.test/accounts/login/?next=/wishlist/add/7/".to_string()]
        );
        assert_eq!(icon.active(), None);
        assert!(harness.surface.shown().is_empty());
    }

    #[tokio::test]
    async fn test_html_page_sends_to_login_with_return_path() {
        let (outcome, harness, _icon) = toggle(text_response(200, "<html>Login</html>")).await;
        let expected = "/accounts/login/?next=%2Fshop%2Fphones".to_string();
        assert_eq!(outcome, WishlistOutcome::Navigated(expected.clone()));
        assert_eq!(harness.navigator.visits(), vec![expected]);
    }

    #[tokio::test]
    async fn test_json_401_toasts_without_navigating() {
        let (outcome, harness, icon) = toggle(json_response(401, &json!({"detail": "auth"}))).await;
        assert_eq!(outcome, WishlistOutcome::Unauthorized);
        assert!(harness.navigator.visits().is_empty());
        assert_eq!(icon.active(), None);
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Error, LOGIN_REQUIRED_MESSAGE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_refusal_uses_server_message() {
        let (outcome, harness, icon) = toggle(json_response(
            200,
            &json!({"status": "error", "message": "Product not found"}),
        ))
        .await;
        assert_eq!(outcome, WishlistOutcome::Failed);
        assert_eq!(icon.active(), None);
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Error, "Product not found".to_string())]
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_generic() {
        let (outcome, harness, _icon) =
            toggle(Err(ClientError::Transport("offline".to_string()))).await;
        assert_eq!(outcome, WishlistOutcome::Failed);
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Error, GENERIC_ERROR_MESSAGE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_success_without_message_uses_fallback_text() {
        let (_, harness, _) = toggle(json_response(200, &json!({"status": "success", "action": "added"}))).await;
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Success, ADDED_FALLBACK.to_string())]
        );
    }

    #[tokio::test]
    async fn test_invalid_product_id_sends_nothing() {
        let harness = Harness::new(ScriptedTransport::new([]));
        let outcome = harness.storefront.wishlist().toggle_raw("", None).await;
        assert_eq!(outcome, WishlistOutcome::MissingProduct);
        assert!(harness.storefront.api().transport().requests().is_empty());
    }

    #[test]
    fn test_classify_priority() {
        let mut response = ApiResponse {
            status: 401,
            redirected: true,
            url: "http://shop.test/login/".to_string(),
            content_type: Some("application/json".to_string()),
            body: "{}".to_string(),
        };
        assert!(matches!(WishlistReply::classify(&response), WishlistReply::Redirected(_)));

        response.redirected = false;
        response.content_type = Some("text/html".to_string());
        assert_eq!(WishlistReply::classify(&response), WishlistReply::NotJson);

        response.content_type = Some("application/json".to_string());
        assert_eq!(WishlistReply::classify(&response), WishlistReply::Unauthorized);

        response.status = 200;
        response.body = "oops".to_string();
        assert_eq!(WishlistReply::classify(&response), WishlistReply::Malformed);
    }
}
