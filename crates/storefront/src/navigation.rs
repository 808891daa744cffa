//! Whole-page navigation.

/// Reads and changes the page location.
pub trait Navigator {
    /// Path of the current page, e.g. `/shop/phones`.
    fn current_path(&self) -> String;

    /// Leave the page for `url`.
    fn navigate(&self, url: &str);
}

/// Login page URL that returns the visitor to `return_path` afterwards.
///
/// ```
/// use technest_storefront::navigation::login_url;
///
/// assert_eq!(
///     login_url("/accounts/login/", "/shop/phones"),
///     "/accounts/login/?next=%2Fshop%2Fphones"
/// );
/// ```
#[must_use]
pub fn login_url(login_path: &str, return_path: &str) -> String {
    format!("{login_path}?next={}", urlencoding::encode(return_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_encodes_query_characters() {
        assert_eq!(
            login_url("/login/", "/search?q=a b"),
            "/login/?next=%2Fsearch%3Fq%3Da%20b"
        );
    }
}
