//! CSRF token lookup.
//!
//! The server issues the token as a cookie; every mutating request echoes it
//! back in the [`CSRF_HEADER`] header.

use std::borrow::Cow;

use secrecy::{ExposeSecret, SecretString};

/// Header carrying the CSRF token on mutating requests.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// A CSRF token. Redacted in `Debug` output so it never reaches the logs.
#[derive(Clone)]
pub struct CsrfToken(SecretString);

impl CsrfToken {
    /// Wrap a raw token value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// The raw token, for placing in a request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CsrfToken([REDACTED])")
    }
}

/// Source of the current CSRF token.
pub trait CsrfSource {
    /// The token, or `None` if the cookie is not set.
    fn csrf_token(&self) -> Option<CsrfToken>;
}

/// A token fixed at construction, for headless clients.
#[derive(Debug, Clone, Default)]
pub struct FixedCsrf(Option<CsrfToken>);

impl FixedCsrf {
    /// Always answer with `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(CsrfToken::new(token)))
    }

    /// Never answer with a token.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }
}

impl CsrfSource for FixedCsrf {
    fn csrf_token(&self) -> Option<CsrfToken> {
        self.0.clone()
    }
}

/// Read a named cookie out of a `document.cookie` style string.
///
/// Pairs are separated by `;`. The value is percent-decoded; a value that is
/// not valid percent-encoding is returned as-is.
///
/// ```
/// use technest_storefront::csrf::read_cookie;
///
/// let jar = "theme=dark; csrftoken=abc%2B123; session=x";
/// assert_eq!(read_cookie(jar, "csrftoken").as_deref(), Some("abc+123"));
/// assert_eq!(read_cookie(jar, "missing"), None);
/// ```
#[must_use]
pub fn read_cookie(cookies: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }

    cookies.split(';').find_map(|pair| {
        let value = pair.trim().strip_prefix(name)?.strip_prefix('=')?;
        let decoded = urlencoding::decode(value).unwrap_or(Cow::Borrowed(value));
        Some(decoded.into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cookie_first_match() {
        let jar = "csrftoken=first; csrftoken=second";
        assert_eq!(read_cookie(jar, "csrftoken").as_deref(), Some("first"));
    }

    #[test]
    fn test_read_cookie_requires_exact_name() {
        let jar = "xcsrftoken=nope; csrftokenx=nope; csrftoken=yes";
        assert_eq!(read_cookie(jar, "csrftoken").as_deref(), Some("yes"));
    }

    #[test]
    fn test_read_cookie_empty_inputs() {
        assert_eq!(read_cookie("", "csrftoken"), None);
        assert_eq!(read_cookie("a=b", ""), None);
    }

    #[test]
    fn test_read_cookie_empty_value() {
        assert_eq!(read_cookie("csrftoken=", "csrftoken").as_deref(), Some(""));
    }

    #[test]
    fn test_read_cookie_keeps_malformed_encoding() {
        assert_eq!(read_cookie("t=%zz", "t").as_deref(), Some("%zz"));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = CsrfToken::new("s3cret");
        assert_eq!(format!("{token:?}"), "CsrfToken([REDACTED])");
        assert_eq!(token.expose(), "s3cret");
    }

    #[test]
    fn test_fixed_source() {
        assert!(FixedCsrf::none().csrf_token().is_none());
        let token = FixedCsrf::new("abc").csrf_token();
        assert_eq!(token.as_ref().map(CsrfToken::expose), Some("abc"));
    }
}
