//! Control roles and their handlers.
//!
//! Each clickable control on a card has a [`ControlRole`]. The page binding
//! looks the role's handler up once and attaches it to every rendered
//! control of that role, instead of sniffing class names on every click.

use std::collections::HashMap;
use std::rc::Rc;

use crate::components::{ProductCard, QuantityField, WishlistIcon};
use crate::scheduler::LocalFuture;

/// Work a handler leaves running after the click returns.
pub type ControlFuture = LocalFuture;

/// What a clicked control does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRole {
    QuantityIncrement,
    QuantityDecrement,
    AddToCart,
    WishlistToggle,
}

impl ControlRole {
    pub const ALL: [Self; 4] = [
        Self::QuantityIncrement,
        Self::QuantityDecrement,
        Self::AddToCart,
        Self::WishlistToggle,
    ];

    /// Selector of the rendered controls with this role.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::QuantityIncrement => ".plus-btn",
            Self::QuantityDecrement => ".minus-btn",
            Self::AddToCart => ".add-to-cart-btn",
            Self::WishlistToggle => ".wishlist-btn",
        }
    }
}

/// Everything a handler can reach from the clicked control.
pub trait ControlTarget {
    /// Quantity input of the row the control sits in.
    fn quantity_field(&self) -> Option<Rc<dyn QuantityField>>;
    /// Product card enclosing the control.
    fn product_card(&self) -> Option<Rc<dyn ProductCard>>;
    /// The control's own `data-product-id`.
    fn product_id(&self) -> Option<String>;
    /// Icon inside the control.
    fn icon(&self) -> Option<Rc<dyn WishlistIcon>>;
}

type Handler<C> = Rc<dyn Fn(C) -> ControlFuture>;

/// Maps each role to at most one handler.
pub struct ControlRegistry<C> {
    handlers: HashMap<ControlRole, Handler<C>>,
}

impl<C> Default for ControlRegistry<C> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<C> ControlRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handler for `role`, replacing any previous one.
    pub fn register<F>(&mut self, role: ControlRole, handler: F)
    where
        F: Fn(C) -> ControlFuture + 'static,
    {
        self.handlers.insert(role, Rc::new(handler));
    }

    /// Whether `role` has a handler.
    #[must_use]
    pub fn contains(&self, role: ControlRole) -> bool {
        self.handlers.contains_key(&role)
    }

    /// Shared handle to the handler for `role`, for attaching to controls.
    #[must_use]
    pub fn handler(&self, role: ControlRole) -> Option<Rc<dyn Fn(C) -> ControlFuture>> {
        self.handlers.get(&role).cloned()
    }

    /// Run the handler for `role`.
    ///
    /// Returns the work it started, or `None` when no handler is registered.
    pub fn dispatch(&self, role: ControlRole, target: C) -> Option<ControlFuture> {
        self.handlers.get(&role).map(|handler| handler(target))
    }

    /// Registered roles, in [`ControlRole::ALL`] order.
    pub fn roles(&self) -> impl Iterator<Item = ControlRole> + '_ {
        ControlRole::ALL
            .into_iter()
            .filter(|role| self.handlers.contains_key(role))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[tokio::test]
    async fn test_dispatch_runs_registered_handler() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ControlRegistry::<u32>::new();

        let seen = Rc::clone(&log);
        registry.register(ControlRole::AddToCart, move |n| -> ControlFuture {
            let seen = Rc::clone(&seen);
            Box::pin(async move { seen.borrow_mut().push(n) })
        });

        registry.dispatch(ControlRole::AddToCart, 5).unwrap().await;
        assert_eq!(*log.borrow(), vec![5]);
        assert!(registry.dispatch(ControlRole::WishlistToggle, 6).is_none());
    }

    #[tokio::test]
    async fn test_register_replaces() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ControlRegistry::<()>::new();

        for tag in ["first", "second"] {
            let seen = Rc::clone(&log);
            registry.register(ControlRole::QuantityIncrement, move |()| -> ControlFuture {
                seen.borrow_mut().push(tag);
                Box::pin(async {})
            });
        }

        registry.dispatch(ControlRole::QuantityIncrement, ()).unwrap().await;
        assert_eq!(*log.borrow(), vec!["second"]);
        assert_eq!(registry.roles().collect::<Vec<_>>(), vec![ControlRole::QuantityIncrement]);
    }

    #[test]
    fn test_selectors() {
        let selectors: Vec<_> = ControlRole::ALL.iter().map(|r| r.selector()).collect();
        assert_eq!(
            selectors,
            vec![".plus-btn", ".minus-btn", ".add-to-cart-btn", ".wishlist-btn"]
        );
    }
}
