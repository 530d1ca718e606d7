//! Widgets and helpers shared across features.

pub mod scrollbar;
pub mod text;

pub use scrollbar::Scrollbar;
pub use text::{sanitize_for_display, truncate_with_ellipsis};
