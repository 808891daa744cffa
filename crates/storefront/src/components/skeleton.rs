//! Placeholder cards shown while product lists load.

/// Cards rendered when the caller gives no count.
pub const DEFAULT_SKELETON_COUNT: usize = 3;

const SKELETON_CARD: &str = concat!(
    r#"<div class="skeleton-card">"#,
    r#"<div class="skeleton skeleton-image"></div>"#,
    r#"<div class="skeleton skeleton-text title"></div>"#,
    r#"<div class="skeleton skeleton-text medium"></div>"#,
    r#"<div class="skeleton skeleton-text short"></div>"#,
    "</div>",
);

/// Markup for `count` placeholder cards.
#[must_use]
pub fn skeleton_markup(count: usize) -> String {
    SKELETON_CARD.repeat(count)
}
