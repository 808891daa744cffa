//! Core types for the Technest storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_count;
pub mod email;
pub mod id;
pub mod number;
pub mod quantity;

pub use cart_count::CartCount;
pub use email::{Email, EmailError};
pub use id::*;
pub use number::parse_int_prefix;
pub use quantity::{Quantity, QuantityBounds, QuantityError, Step};
