//! Quantity steppers and add-to-cart buttons on product cards.

use std::rc::Rc;

use technest_core::{ProductId, Quantity, QuantityBounds, QuantityError, Step};
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, Transport};
use crate::error::ClientError;
use crate::signals::{Signal, SignalBus};
use crate::toast::ToastManager;

/// Shown after a successful add.
pub const ADDED_TO_CART_MESSAGE: &str = "Product added to cart!";

/// Shown when the add fails and the server gave no message.
pub const ADD_TO_CART_FAILED_MESSAGE: &str = "Error adding product to cart";

/// Selector of the quantity input inside a card.
pub const QUANTITY_INPUT_SELECTOR: &str = ".quantity-input";

/// Product card markup variants that carry quantity and add-to-cart controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLayout {
    /// Cart and product-page rows.
    Generic,
    /// Catalogue grid cards.
    Futuristic,
    /// Older catalogue cards still served by a few templates.
    Legacy,
}

impl CardLayout {
    /// Every layout, in lookup order.
    pub const ALL: [Self; 3] = [Self::Generic, Self::Futuristic, Self::Legacy];

    /// Selector of the card's outer element.
    #[must_use]
    pub const fn container_selector(self) -> &'static str {
        match self {
            Self::Generic => ".quantity-container",
            Self::Futuristic => ".product-card-futuristic",
            Self::Legacy => ".brand_box",
        }
    }

    /// Selector list matching any card, for `closest()` lookups.
    #[must_use]
    pub fn any_container_selector() -> String {
        Self::ALL
            .iter()
            .map(|layout| layout.container_selector())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A quantity input.
pub trait QuantityField {
    /// Current `value`.
    fn raw_value(&self) -> String;
    /// The `max` attribute, if set.
    fn max_attr(&self) -> Option<String>;
    /// Write a new value.
    fn set_value(&self, quantity: Quantity);
}

/// A product card as seen by the add-to-cart button.
pub trait ProductCard {
    /// The card's `data-product-id`.
    fn product_id(&self) -> Option<String>;
    /// Value of the card's quantity input, if it has one.
    fn quantity_value(&self) -> Option<String>;
    /// `max` attribute of the card's quantity input.
    fn max_attr(&self) -> Option<String>;
}

/// Apply one +/- click to `field` and return the value written.
///
/// The result stays within `[1, max]`, `max` coming from the field's
/// attribute (999 when absent or unreadable).
pub fn step_quantity(field: &dyn QuantityField, step: Step) -> Quantity {
    let bounds = QuantityBounds::from_max_attr(field.max_attr().as_deref());
    let quantity = bounds.step(&field.raw_value(), step);
    field.set_value(quantity);
    quantity
}

/// Result of an add-to-cart click.
#[derive(Debug)]
pub enum AddToCartOutcome {
    /// The server accepted the item.
    Added {
        product_id: ProductId,
        quantity: Quantity,
    },
    /// The card has no usable product ID; nothing was sent.
    MissingProduct,
    /// The quantity failed validation; nothing was sent.
    InvalidQuantity(QuantityError),
    /// The request failed or the server refused.
    Failed(ClientError),
}

/// Handles add-to-cart clicks.
pub struct CartActions<T> {
    api: Rc<ApiClient<T>>,
    toasts: ToastManager,
    signals: Rc<dyn SignalBus>,
}

impl<T> Clone for CartActions<T> {
    fn clone(&self) -> Self {
        Self {
            api: Rc::clone(&self.api),
            toasts: self.toasts.clone(),
            signals: Rc::clone(&self.signals),
        }
    }
}

impl<T: Transport> CartActions<T> {
    #[must_use]
    pub fn new(api: Rc<ApiClient<T>>, toasts: ToastManager, signals: Rc<dyn SignalBus>) -> Self {
        Self {
            api,
            toasts,
            signals,
        }
    }

    /// Add the card's product to the cart.
    ///
    /// On success shows a toast and raises exactly one
    /// [`Signal::CartUpdated`]. On failure shows an error toast and raises
    /// nothing. The badge is never touched directly.
    #[instrument(skip_all)]
    pub async fn add_to_cart(&self, card: &dyn ProductCard) -> AddToCartOutcome {
        let Some(product_id) = card
            .product_id()
            .and_then(|raw| raw.parse::<ProductId>().ok())
        else {
            warn!(raw = ?card.product_id(), "Add to cart clicked on a card without a product ID");
            return AddToCartOutcome::MissingProduct;
        };

        let quantity = match card.quantity_value() {
            None => Quantity::ONE,
            Some(raw) => {
                let bounds = QuantityBounds::from_max_attr(card.max_attr().as_deref());
                match bounds.validate(&raw) {
                    Ok(quantity) => quantity,
                    Err(e) => {
                        warn!(%product_id, raw = %raw, error = %e, "Rejected quantity");
                        self.toasts.error(ClientError::from(e.clone()).user_message());
                        return AddToCartOutcome::InvalidQuantity(e);
                    }
                }
            }
        };

        match self.api.add_to_cart(product_id, quantity).await {
            Ok(()) => {
                info!(%product_id, %quantity, "Added to cart");
                self.toasts.success(ADDED_TO_CART_MESSAGE);
                self.signals.emit(Signal::CartUpdated);
                AddToCartOutcome::Added {
                    product_id,
                    quantity,
                }
            }
            Err(e) => {
                warn!(%product_id, error = %e, "Add to cart failed");
                let message = match &e {
                    ClientError::Status {
                        message: Some(message),
                        ..
                    } => message.clone(),
                    _ => ADD_TO_CART_FAILED_MESSAGE.to_string(),
                };
                self.toasts.error(message);
                AddToCartOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{FakeCard, FakeField, Harness, ScriptedTransport, json_response, text_response};
    use crate::toast::ToastKind;

    #[test]
    fn test_layout_selectors() {
        assert_eq!(
            CardLayout::any_container_selector(),
            ".quantity-container, .product-card-futuristic, .brand_box"
        );
    }

    #[test]
    fn test_step_stays_within_bounds() {
        let field = FakeField::new("1", Some("3"));

        step_quantity(&field, Step::Down);
        assert_eq!(field.value(), "1");

        for _ in 0..10 {
            step_quantity(&field, Step::Up);
        }
        assert_eq!(field.value(), "3");

        step_quantity(&field, Step::Down);
        assert_eq!(field.value(), "2");
    }

    #[test]
    fn test_step_defaults_max_to_999() {
        let field = FakeField::new("998", Some("lots"));
        step_quantity(&field, Step::Up);
        step_quantity(&field, Step::Up);
        assert_eq!(field.value(), "999");

        let field = FakeField::new("5", None);
        assert_eq!(step_quantity(&field, Step::Up).get(), 6);
    }

    #[test]
    fn test_step_repairs_out_of_range_values() {
        let field = FakeField::new("", None);
        assert_eq!(step_quantity(&field, Step::Up), Quantity::ONE);

        let field = FakeField::new("50", Some("10"));
        assert_eq!(step_quantity(&field, Step::Up).get(), 10);

        let field = FakeField::new("-4", None);
        assert_eq!(step_quantity(&field, Step::Down), Quantity::ONE);
    }

    #[tokio::test]
    async fn test_success_toasts_and_signals_once() {
        let harness = Harness::new(ScriptedTransport::new([json_response(
            200,
            &json!({"status": "success"}),
        )]));
        let card = FakeCard::new(Some("12"), Some("2"), None);

        let outcome = harness.storefront.cart_actions().add_to_cart(&card).await;
        assert!(matches!(outcome, AddToCartOutcome::Added { .. }));
        assert_eq!(harness.signals.emitted(), vec![Signal::CartUpdated]);
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Success, ADDED_TO_CART_MESSAGE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_server_message_is_shown_and_no_signal() {
        let harness = Harness::new(ScriptedTransport::new([json_response(
            400,
            &json!({"status": "error", "message": "Out of stock"}),
        )]));
        let card = FakeCard::new(Some("12"), Some("1"), None);

        let outcome = harness.storefront.cart_actions().add_to_cart(&card).await;
        assert!(matches!(outcome, AddToCartOutcome::Failed(_)));
        assert!(harness.signals.emitted().is_empty());
        assert_eq!(
            harness.surface.shown(),
            vec![(ToastKind::Error, "Out of stock".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failures_without_message_use_default_text() {
        for reply in [
            Err(ClientError::Transport("offline".to_string())),
            text_response(500, "Server Error"),
            json_response(200, &json!({"status": "error"})),
        ] {
            let harness = Harness::new(ScriptedTransport::new([reply]));
            let card = FakeCard::new(Some("3"), None, None);
            harness.storefront.cart_actions().add_to_cart(&card).await;

            assert!(harness.signals.emitted().is_empty());
            assert_eq!(
                harness.surface.shown(),
                vec![(ToastKind::Error, ADD_TO_CART_FAILED_MESSAGE.to_string())]
            );
        }
    }

    #[tokio::test]
    async fn test_missing_quantity_input_sends_one() {
        let harness = Harness::new(ScriptedTransport::new([json_response(
            200,
            &json!({"status": "success"}),
        )]));
        let card = FakeCard::new(Some("4"), None, None);
        harness.storefront.cart_actions().add_to_cart(&card).await;

        let sent = harness.storefront.api().transport().requests();
        let body: serde_json::Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"product_id": 4, "quantity": 1}));
    }

    #[tokio::test]
    async fn test_invalid_quantity_is_rejected_locally() {
        let harness = Harness::new(ScriptedTransport::new([]));
        let card = FakeCard::new(Some("4"), Some("12"), Some("10"));

        let outcome = harness.storefront.cart_actions().add_to_cart(&card).await;
        assert!(matches!(
            outcome,
            AddToCartOutcome::InvalidQuantity(QuantityError::AboveMaximum { max: 10 })
        ));
        assert!(harness.storefront.api().transport().requests().is_empty());
        let expected = ClientError::from(QuantityError::AboveMaximum { max: 10 }).user_message();
        assert_eq!(harness.surface.shown(), vec![(ToastKind::Error, expected)]);
    }

    #[tokio::test]
    async fn test_missing_product_id_sends_nothing() {
        let harness = Harness::new(ScriptedTransport::new([]));
        for id in [None, Some("abc")] {
            let card = FakeCard::new(id, Some("1"), None);
            let outcome = harness.storefront.cart_actions().add_to_cart(&card).await;
            assert!(matches!(outcome, AddToCartOutcome::MissingProduct));
        }
        assert!(harness.storefront.api().transport().requests().is_empty());
        assert!(harness.surface.shown().is_empty());
    }
}
