//! Composition root.
//!
//! [`Storefront`] is built once per page from a [`ClientConfig`] and the
//! platform [`Ports`]. It owns the shared services (toasts, API client,
//! signal bus, navigator) and hands out components wired to them.

use std::rc::Rc;

use technest_core::Step;
use tracing::info;

use crate::api::{ApiClient, Transport};
use crate::components::{
    BadgeView, CartActions, CartBadge, CartCache, Crumb, FlashMessage, NewsletterForm,
    WishlistToggler, breadcrumb_trail, flash, step_quantity,
};
use crate::config::ClientConfig;
use crate::csrf::CsrfSource;
use crate::navigation::Navigator;
use crate::registry::{ControlFuture, ControlRegistry, ControlRole, ControlTarget};
use crate::scheduler::{Scheduler, Spawner};
use crate::signals::SignalBus;
use crate::toast::{ToastId, ToastManager, ToastSurface};

/// Platform services the storefront runs on.
pub struct Ports {
    pub csrf: Rc<dyn CsrfSource>,
    pub toast_surface: Box<dyn ToastSurface>,
    pub scheduler: Rc<dyn Scheduler>,
    pub spawner: Rc<dyn Spawner>,
    pub signals: Rc<dyn SignalBus>,
    pub navigator: Rc<dyn Navigator>,
}

/// Shared services for one page.
pub struct Storefront<T> {
    config: Rc<ClientConfig>,
    toasts: ToastManager,
    api: Rc<ApiClient<T>>,
    spawner: Rc<dyn Spawner>,
    signals: Rc<dyn SignalBus>,
    navigator: Rc<dyn Navigator>,
}

impl<T> Clone for Storefront<T> {
    fn clone(&self) -> Self {
        Self {
            config: Rc::clone(&self.config),
            toasts: self.toasts.clone(),
            api: Rc::clone(&self.api),
            spawner: Rc::clone(&self.spawner),
            signals: Rc::clone(&self.signals),
            navigator: Rc::clone(&self.navigator),
        }
    }
}

impl<T: Transport + 'static> Storefront<T> {
    /// Wire the services together.
    #[must_use]
    pub fn new(config: ClientConfig, transport: T, ports: Ports) -> Self {
        let toasts = ToastManager::new(ports.toast_surface, ports.scheduler, config.toast);
        let api = Rc::new(ApiClient::new(
            transport,
            config.endpoints.clone(),
            ports.csrf,
        ));
        info!(
            cart_count = %config.endpoints.cart_count,
            add_to_cart = %config.endpoints.add_to_cart,
            "Storefront initialized"
        );
        Self {
            config: Rc::new(config),
            toasts,
            api,
            spawner: ports.spawner,
            signals: ports.signals,
            navigator: ports.navigator,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    #[must_use]
    pub const fn api(&self) -> &Rc<ApiClient<T>> {
        &self.api
    }

    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Cart badge manager for `view` (`None` when the page has no badge).
    #[must_use]
    pub fn cart_badge(
        &self,
        view: Option<Rc<dyn BadgeView>>,
        cache: Rc<dyn CartCache>,
    ) -> CartBadge<T> {
        CartBadge::new(view, Rc::clone(&self.api), cache)
    }

    /// Cart badge that refreshes now and on every cart change.
    pub fn attach_cart_badge(
        &self,
        view: Option<Rc<dyn BadgeView>>,
        cache: Rc<dyn CartCache>,
    ) -> CartBadge<T> {
        let badge = self.cart_badge(view, cache);
        badge.attach(&*self.signals, Rc::clone(&self.spawner));
        badge
    }

    #[must_use]
    pub fn cart_actions(&self) -> CartActions<T> {
        CartActions::new(
            Rc::clone(&self.api),
            self.toasts.clone(),
            Rc::clone(&self.signals),
        )
    }

    #[must_use]
    pub fn wishlist(&self) -> WishlistToggler<T> {
        WishlistToggler::new(
            Rc::clone(&self.api),
            self.toasts.clone(),
            Rc::clone(&self.navigator),
            self.config.login_path.clone(),
        )
    }

    #[must_use]
    pub fn newsletter(&self) -> NewsletterForm<T> {
        NewsletterForm::new(Rc::clone(&self.api), self.toasts.clone())
    }

    /// Breadcrumb trail for the current page.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        breadcrumb_trail(&self.navigator.current_path())
    }

    /// Re-show server flash messages as toasts.
    pub fn relay_flash_messages(
        &self,
        messages: impl IntoIterator<Item = FlashMessage>,
    ) -> Vec<ToastId> {
        flash::relay(&self.toasts, messages)
    }

    /// Registry with the storefront's handler for every control role.
    #[must_use]
    pub fn controls<C: ControlTarget + 'static>(&self) -> ControlRegistry<C> {
        let mut registry = ControlRegistry::new();

        registry.register(ControlRole::QuantityIncrement, |target: C| -> ControlFuture {
            if let Some(field) = target.quantity_field() {
                step_quantity(&*field, Step::Up);
            }
            Box::pin(async {})
        });

        registry.register(ControlRole::QuantityDecrement, |target: C| -> ControlFuture {
            if let Some(field) = target.quantity_field() {
                step_quantity(&*field, Step::Down);
            }
            Box::pin(async {})
        });

        let actions = self.cart_actions();
        registry.register(ControlRole::AddToCart, move |target: C| -> ControlFuture {
            let actions = actions.clone();
            Box::pin(async move {
                if let Some(card) = target.product_card() {
                    actions.add_to_cart(&*card).await;
                }
            })
        });

        let wishlist = self.wishlist();
        registry.register(ControlRole::WishlistToggle, move |target: C| -> ControlFuture {
            let wishlist = wishlist.clone();
            Box::pin(async move {
                if let Some(product_id) = target.product_id() {
                    let icon = target.icon();
                    wishlist.toggle_raw(&product_id, icon.as_deref()).await;
                }
            })
        });

        registry
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::signals::Signal;
    use crate::testing::{FakeCard, FakeField, FakeIcon, FakeTarget, Harness, ScriptedTransport, json_response};

    #[tokio::test]
    async fn test_controls_drive_components() {
        let harness = Harness::new(ScriptedTransport::new([
            json_response(200, &json!({"status": "success"})),
            json_response(200, &json!({"status": "success", "action": "added", "message": "Saved"})),
        ]));
        let field = Rc::new(FakeField::new("1", Some("2")));
        let icon = Rc::new(FakeIcon::default());
        let target = FakeTarget {
            field: Some(Rc::clone(&field)),
            card: Some(Rc::new(FakeCard::new(Some("5"), Some("2"), Some("2")))),
            product_id: Some("5".to_string()),
            icon: Some(Rc::clone(&icon)),
        };
        let controls = harness.storefront.controls::<FakeTarget>();

        for _ in 0..3 {
            controls
                .dispatch(ControlRole::QuantityIncrement, target.clone())
                .unwrap()
                .await;
        }
        assert_eq!(field.value(), "2");

        controls
            .dispatch(ControlRole::QuantityDecrement, target.clone())
            .unwrap()
            .await;
        assert_eq!(field.value(), "1");

        controls
            .dispatch(ControlRole::AddToCart, target.clone())
            .unwrap()
            .await;
        assert_eq!(harness.signals.emitted(), vec![Signal::CartUpdated]);

        controls
            .dispatch(ControlRole::WishlistToggle, target)
            .unwrap()
            .await;
        assert_eq!(icon.active(), Some(true));

        let paths: Vec<_> = harness
            .storefront
            .api()
            .transport()
            .requests()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["/add_to_cart/", "/wishlist/add/5/"]);
    }

    #[tokio::test]
    async fn test_controls_without_elements_do_nothing() {
        let harness = Harness::new(ScriptedTransport::new([]));
        let controls = harness.storefront.controls::<FakeTarget>();
        for role in ControlRole::ALL {
            controls.dispatch(role, FakeTarget::default()).unwrap().await;
        }
        assert!(harness.storefront.api().transport().requests().is_empty());
        assert!(harness.surface.shown().is_empty());
    }

    #[tokio::test]
    async fn test_controls_built_after_boot_share_page_services() {
        let harness = Harness::new(ScriptedTransport::new([
            json_response(200, &json!({"status": "success"})),
            json_response(200, &json!({"status": "success"})),
        ]));
        let at_boot = harness.storefront.controls::<FakeTarget>();
        let later = harness.storefront.clone().controls::<FakeTarget>();
        let target = |id: &str| FakeTarget {
            card: Some(Rc::new(FakeCard::new(Some(id), Some("1"), None))),
            ..FakeTarget::default()
        };

        at_boot
            .dispatch(ControlRole::AddToCart, target("1"))
            .unwrap()
            .await;
        let handler = later.handler(ControlRole::AddToCart).unwrap();
        drop(later);
        handler(target("2")).await;

        assert_eq!(
            harness.signals.emitted(),
            vec![Signal::CartUpdated, Signal::CartUpdated]
        );
        assert_eq!(harness.surface.shown().len(), 2);
        assert_eq!(harness.storefront.api().transport().requests().len(), 2);
    }

    #[test]
    fn test_breadcrumbs_follow_navigator() {
        let harness = Harness::new(ScriptedTransport::new([]));
        let labels: Vec<_> = harness
            .storefront
            .breadcrumbs()
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["Home", "Shop", "Phones"]);
    }
}
