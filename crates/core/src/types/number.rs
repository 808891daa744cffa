//! Lenient integer parsing for values read back from the page.
//!
//! Input values, `max` attributes and badge text are all user-visible strings.
//! They are parsed the way browsers coerce them: leading whitespace is
//! skipped, an optional sign is accepted, and parsing stops at the first
//! non-digit. `"12abc"` is 12, `"99+"` is 99, `"abc"` is nothing.

/// Parse the leading integer of `input`.
///
/// Returns `None` when no digit follows the optional sign. Values that
/// overflow `i64` saturate.
///
/// ```
/// use technest_core::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix("  42 items"), Some(42));
/// assert_eq!(parse_int_prefix("99+"), Some(99));
/// assert_eq!(parse_int_prefix("-3"), Some(-3));
/// assert_eq!(parse_int_prefix("n/a"), None);
/// ```
#[must_use]
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..).unwrap_or("")),
        Some(b'+') => (false, trimmed.get(1..).unwrap_or("")),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(10) else {
            break;
        };
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit));
    }

    if !seen_digit {
        return None;
    }

    Some(if negative { -value } else { value })
}
