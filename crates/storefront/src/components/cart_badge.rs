//! Header cart badge.
//!
//! The badge is refreshed from the server on page load and on every
//! [`Signal::CartUpdated`] (see [`CartBadge::attach`]). When the
//! count endpoint fails, the count is rebuilt from the offline cart snapshot
//! in localStorage instead of surfacing an error.
//!
//! Overlapping refreshes are not deduplicated: each request writes the badge
//! when it resolves, so the last response to arrive wins.

use std::rc::Rc;

use technest_core::CartCount;
use tracing::{debug, warn};

use crate::api::{ApiClient, Transport};
use crate::scheduler::Spawner;
use crate::signals::{Signal, SignalBus};

/// The badge element.
pub trait BadgeView {
    /// Text currently rendered in the badge.
    fn text(&self) -> String;

    /// Render `text`, make the badge visible and mark it `has-items`.
    fn show(&self, text: &str);

    /// Hide the badge and drop `has-items`. The text is left as is.
    fn hide(&self);
}

/// Read access to the offline cart snapshot.
pub trait CartCache {
    /// Raw stored value, if any.
    fn snapshot(&self) -> Option<String>;
}

/// Sum the quantities in an offline cart snapshot.
///
/// The snapshot is a JSON object mapping product IDs to quantities.
/// Non-numeric quantities are skipped; anything that is not an object
/// counts as an empty cart.
///
/// ```
/// use technest_storefront::components::cached_cart_count;
///
/// assert_eq!(cached_cart_count(Some(r#"{"3": 2, "7": 1}"#)).get(), 3);
/// assert_eq!(cached_cart_count(Some("not json")).get(), 0);
/// assert_eq!(cached_cart_count(None).get(), 0);
/// ```
#[must_use]
pub fn cached_cart_count(snapshot: Option<&str>) -> CartCount {
    let Some(snapshot) = snapshot else {
        return CartCount::ZERO;
    };
    let Ok(items) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(snapshot)
    else {
        return CartCount::ZERO;
    };
    let total = items
        .values()
        .filter_map(serde_json::Value::as_i64)
        .fold(0_i64, i64::saturating_add);
    CartCount::from_signed(total)
}

/// Keeps the badge in sync with the server-side cart.
pub struct CartBadge<T> {
    view: Option<Rc<dyn BadgeView>>,
    api: Rc<ApiClient<T>>,
    cache: Rc<dyn CartCache>,
}

impl<T> Clone for CartBadge<T> {
    fn clone(&self) -> Self {
        Self {
            view: self.view.clone(),
            api: Rc::clone(&self.api),
            cache: Rc::clone(&self.cache),
        }
    }
}

impl<T: Transport> CartBadge<T> {
    /// Create a badge manager. With no view every operation is a no-op.
    #[must_use]
    pub fn new(
        view: Option<Rc<dyn BadgeView>>,
        api: Rc<ApiClient<T>>,
        cache: Rc<dyn CartCache>,
    ) -> Self {
        Self { view, api, cache }
    }

    /// Whether the page has a badge to manage.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.view.is_some()
    }

    /// Fetch the count and render it, falling back to the offline snapshot.
    ///
    /// Returns the rendered count, or `None` when there is no badge.
    pub async fn update_cart_count(&self) -> Option<CartCount> {
        self.view.as_ref()?;

        let count = match self.api.cart_count().await {
            Ok(count) => count,
            Err(e) => {
                let fallback = cached_cart_count(self.cache.snapshot().as_deref());
                warn!(error = %e, fallback = fallback.get(), "Cart count unavailable, using cached cart");
                fallback
            }
        };
        self.set_count(count);
        Some(count)
    }

    /// Render `count`. Zero hides the badge.
    pub fn set_count(&self, count: CartCount) {
        let Some(view) = &self.view else {
            return;
        };
        debug!(count = count.get(), "Rendering cart badge");
        match count.badge_text() {
            Some(text) => view.show(&text),
            None => view.hide(),
        }
    }

    /// Render a count given as text; anything unreadable is zero.
    pub fn set_count_lenient(&self, raw: &str) {
        self.set_count(CartCount::parse_lenient(raw));
    }

    /// Add `amount` to the count currently rendered in the badge.
    ///
    /// Works from the badge text, so a capped `"99+"` reads back as 99.
    pub fn increment(&self, amount: u64) {
        if let Some(current) = self.rendered() {
            self.set_count(current.saturating_add(amount));
        }
    }

    /// Subtract `amount` from the rendered count, stopping at zero.
    pub fn decrement(&self, amount: u64) {
        if let Some(current) = self.rendered() {
            self.set_count(current.saturating_sub(amount));
        }
    }

    fn rendered(&self) -> Option<CartCount> {
        self.view
            .as_ref()
            .map(|view| CartCount::parse_lenient(&view.text()))
    }
}

impl<T: Transport + 'static> CartBadge<T> {
    /// Refresh now, then again on every [`Signal::CartUpdated`].
    ///
    /// Without a badge nothing is fetched or subscribed.
    pub fn attach(&self, signals: &dyn SignalBus, spawner: Rc<dyn Spawner>) {
        if !self.is_bound() {
            debug!("No cart badge to attach");
            return;
        }
        let badge = self.clone();
        let refresh = move || {
            let badge = badge.clone();
            spawner.spawn(Box::pin(async move {
                badge.update_cart_count().await;
            }));
        };
        refresh();
        signals.subscribe(Signal::CartUpdated, Box::new(refresh));
    }
}
