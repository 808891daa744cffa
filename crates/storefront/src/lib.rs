//! Technest storefront browser runtime.
//!
//! Client-side behaviour for the server-rendered storefront: the header cart
//! badge, quantity and add-to-cart controls, wishlist hearts, toasts, the
//! newsletter form, the signup password meter, breadcrumbs and flash
//! messages.
//!
//! Everything except the [`web`] module is plain Rust written against the
//! small traits in [`api`], [`scheduler`], [`signals`], [`navigation`] and
//! [`components`], so it runs natively in tests. Enable the `wasm` feature to
//! build the DOM bindings and the `boot` entry point.

#![cfg_attr(not(feature = "wasm"), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod csrf;
pub mod error;
pub mod navigation;
pub mod registry;
pub mod scheduler;
pub mod signals;
pub mod toast;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(feature = "wasm")]
pub mod web;

pub use app::{Ports, Storefront};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use toast::{ToastKind, ToastManager};
