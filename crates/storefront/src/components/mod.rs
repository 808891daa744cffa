//! Page components.
//!
//! Each component is written against small view traits so it runs the same
//! on a real page and in tests. The `web` module supplies the DOM-backed
//! views.

mod breadcrumbs;
mod cart_badge;
mod cart_controls;
pub mod flash;
mod newsletter;
mod password;
mod skeleton;
mod wishlist;

pub use breadcrumbs::{Crumb, breadcrumb_trail, display_name};
pub use cart_badge::{BadgeView, CartBadge, CartCache, cached_cart_count};
pub use cart_controls::{
    ADD_TO_CART_FAILED_MESSAGE, ADDED_TO_CART_MESSAGE, AddToCartOutcome, CardLayout, CartActions,
    ProductCard, QUANTITY_INPUT_SELECTOR, QuantityField, step_quantity,
};
pub use flash::FlashMessage;
pub use newsletter::{
    NewsletterForm, NewsletterView, SUBSCRIBE_FAILED_MESSAGE, SUBSCRIBE_REFUSED_MESSAGE,
    SUBSCRIBED_MESSAGE, SUBSCRIBING_LABEL, SubscribeOutcome,
};
pub use password::{
    MIN_PASSWORD_LENGTH, PasswordMeter, PasswordMeterView, PasswordReport, Requirement,
    StrengthTier,
};
pub use skeleton::{DEFAULT_SKELETON_COUNT, skeleton_markup};
pub use wishlist::{
    LOGIN_REQUIRED_MESSAGE, WishlistIcon, WishlistOutcome, WishlistReply, WishlistToggler,
};
