//! Per-row purchase quantity.
//!
//! A quantity always lies in `[1, max]`, where `max` comes from the row's
//! `max` attribute and defaults to [`QuantityBounds::DEFAULT_MAX`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::number::parse_int_prefix;

/// Errors that can occur when validating a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not a number.
    #[error("quantity must be a number")]
    NotANumber,
    /// The value is below the minimum.
    #[error("quantity must be at least {min}")]
    BelowMinimum {
        /// Minimum allowed quantity.
        min: u32,
    },
    /// The value exceeds the row's maximum.
    #[error("quantity must be at most {max}")]
    AboveMaximum {
        /// Maximum allowed quantity.
        max: u32,
    },
}

/// Direction of a +/- click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The `+` control.
    Up,
    /// The `-` control.
    Down,
}

/// A validated purchase quantity (at least 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Smallest purchasable quantity.
    pub const MIN: u32 = 1;

    /// A quantity of one.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::BelowMinimum` for zero.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value < Self::MIN {
            return Err(QuantityError::BelowMinimum { min: Self::MIN });
        }
        Ok(Self(value))
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upper bound for a single product row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBounds {
    max: u32,
}

impl QuantityBounds {
    /// Maximum used when the row has no usable `max` attribute.
    pub const DEFAULT_MAX: u32 = 999;

    /// Bounds with an explicit maximum. A maximum of zero falls back to the default.
    #[must_use]
    pub const fn new(max: u32) -> Self {
        if max == 0 {
            Self {
                max: Self::DEFAULT_MAX,
            }
        } else {
            Self { max }
        }
    }

    /// Read bounds from a `max` attribute.
    ///
    /// Missing, unparsable, zero or negative values all mean
    /// [`Self::DEFAULT_MAX`].
    #[must_use]
    pub fn from_max_attr(attr: Option<&str>) -> Self {
        let max = attr
            .and_then(parse_int_prefix)
            .filter(|max| *max > 0)
            .map_or(Self::DEFAULT_MAX, |max| {
                u32::try_from(max).unwrap_or(u32::MAX)
            });
        Self::new(max)
    }

    /// The row's maximum.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Clamp any integer into `[1, max]`.
    #[must_use]
    pub fn clamp(&self, value: i64) -> Quantity {
        let clamped = value.clamp(i64::from(Quantity::MIN), i64::from(self.max));
        // In range by construction.
        Quantity(u32::try_from(clamped).unwrap_or(Quantity::MIN))
    }

    /// Apply one +/- click to the displayed value.
    ///
    /// The result is always within `[1, max]`. An unreadable current value
    /// resets the field to the minimum instead of stepping from garbage.
    #[must_use]
    pub fn step(&self, current: &str, step: Step) -> Quantity {
        let Some(current) = parse_int_prefix(current) else {
            return Quantity::ONE;
        };
        let next = match step {
            Step::Up => current.saturating_add(1),
            Step::Down => current.saturating_sub(1),
        };
        self.clamp(next)
    }

    /// Validate a quantity typed or stepped into a row before it is submitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a number or is outside `[1, max]`.
    pub fn validate(&self, raw: &str) -> Result<Quantity, QuantityError> {
        let value = parse_int_prefix(raw).ok_or(QuantityError::NotANumber)?;
        if value < i64::from(Quantity::MIN) {
            return Err(QuantityError::BelowMinimum { min: Quantity::MIN });
        }
        if value > i64::from(self.max) {
            return Err(QuantityError::AboveMaximum { max: self.max });
        }
        Ok(self.clamp(value))
    }
}

impl Default for QuantityBounds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX)
    }
}
