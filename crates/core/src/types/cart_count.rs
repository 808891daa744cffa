//! Cart item count shown in the header badge.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::number::parse_int_prefix;

/// Total number of items in the visitor's cart.
///
/// Never negative. Counts above [`CartCount::DISPLAY_CAP`] render as `"99+"`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CartCount(u64);

impl CartCount {
    /// Largest count rendered verbatim.
    pub const DISPLAY_CAP: u64 = 99;

    /// An empty cart.
    pub const ZERO: Self = Self(0);

    /// Create a count.
    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    /// Coerce a signed value, mapping negatives to zero.
    #[must_use]
    pub fn from_signed(count: i64) -> Self {
        Self(u64::try_from(count).unwrap_or(0))
    }

    /// Coerce arbitrary text the way a browser would (`"12abc"` is 12).
    ///
    /// Unreadable or negative input becomes zero.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        parse_int_prefix(text).map_or(Self::ZERO, Self::from_signed)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether the cart is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Text for the badge, or `None` when the badge should be hidden.
    ///
    /// ```
    /// use technest_core::CartCount;
    ///
    /// assert_eq!(CartCount::new(0).badge_text(), None);
    /// assert_eq!(CartCount::new(7).badge_text().as_deref(), Some("7"));
    /// assert_eq!(CartCount::new(150).badge_text().as_deref(), Some("99+"));
    /// ```
    #[must_use]
    pub fn badge_text(self) -> Option<String> {
        match self.0 {
            0 => None,
            n if n > Self::DISPLAY_CAP => Some(format!("{}+", Self::DISPLAY_CAP)),
            n => Some(n.to_string()),
        }
    }

    /// Add items, saturating at `u64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, amount: u64) -> Self {
        Self(self.0.saturating_add(amount))
    }

    /// Remove items, flooring at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u64) -> Self {
        Self(self.0.saturating_sub(amount))
    }
}

impl fmt::Display for CartCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CartCount {
    fn from(count: u64) -> Self {
        Self(count)
    }
}
