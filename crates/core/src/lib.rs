//! Technest Core - Shared types library.
//!
//! This crate provides the types shared by the storefront client runtime and
//! its tests:
//! - `storefront` - Browser runtime (cart badge, cart controls, wishlist, toasts)
//! - `integration-tests` - End-to-end flows against a fixture HTTP server
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no DOM
//! access, no HTTP clients. This keeps it lightweight and lets every rule it
//! encodes be tested natively.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, product IDs, quantities and cart counts
//! - [`api`] - JSON request/response bodies exchanged with the storefront server

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod types;

pub use types::*;
