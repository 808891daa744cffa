//! Breadcrumb trail derived from the page path.

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    /// Link target; `None` for the current page.
    pub href: Option<String>,
}

impl Crumb {
    fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
        }
    }

    /// Whether this is the current page.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        self.href.is_none()
    }
}

/// Human label for a path segment: first letter upper-cased, hyphens
/// after it turned into spaces.
///
/// ```
/// use technest_storefront::components::display_name;
///
/// assert_eq!(display_name("smart-home"), "Smart home");
/// ```
#[must_use]
pub fn display_name(segment: &str) -> String {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    first
        .to_uppercase()
        .chain(chars.map(|c| if c == '-' { ' ' } else { c }))
        .collect()
}

/// Build the trail for `path`.
///
/// Always starts with a linked "Home". Every non-empty segment adds an
/// entry linking to its cumulative prefix, except the last, which is
/// unlinked.
#[must_use]
pub fn breadcrumb_trail(path: &str) -> Vec<Crumb> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut trail = Vec::with_capacity(segments.len() + 1);
    trail.push(Crumb::link("Home", "/"));

    let mut prefix = String::new();
    for (i, segment) in segments.iter().enumerate() {
        prefix.push('/');
        prefix.push_str(segment);
        let label = display_name(segment);
        if i + 1 == segments.len() {
            trail.push(Crumb { label, href: None });
        } else {
            trail.push(Crumb::link(label, prefix.clone()));
        }
    }
    trail
}
