//! Built-in CV extensions.
//!
//! Registered by [`Markdown::cv`](crate::Markdown::cv) in this order:
//!
//! | Name                   | Level  | Syntax                  |
//! |------------------------|--------|-------------------------|
//! | `lrn`                  | block  | title line + `~ col`    |
//! | `centerline`           | block  | `% text`                |
//! | `iconify-inline`       | inline | `icon=name trailing`    |
//! | `strong-adjacency-fix` | inline | `**text**`              |

mod centerline;
mod equal_split;
mod icon;
mod strong;

pub use centerline::CenterLine;
pub use equal_split::EqualSplitRow;
pub use icon::IconInline;
pub use strong::StrongAdjacencyFix;

use crate::extension::Extension;

/// Names of the built-in extensions in registration order.
pub const BUILTIN_NAMES: [&str; 4] = [
    EqualSplitRow::NAME,
    CenterLine::NAME,
    IconInline::NAME,
    StrongAdjacencyFix::NAME,
];

/// All built-in extensions in registration order.
#[must_use]
pub fn builtin() -> Vec<Box<dyn Extension>> {
    BUILTIN_NAMES.iter().filter_map(|name| by_name(name)).collect()
}

/// Look up a built-in extension by name.
///
/// # Example
///
/// ```
/// use cv_markdown::extensions;
///
/// assert!(extensions::by_name("centerline").is_some());
/// assert!(extensions::by_name("tabs").is_none());
/// ```
#[must_use]
pub fn by_name(name: &str) -> Option<Box<dyn Extension>> {
    match name {
        EqualSplitRow::NAME => Some(Box::new(EqualSplitRow)),
        CenterLine::NAME => Some(Box::new(CenterLine)),
        IconInline::NAME => Some(Box::new(IconInline)),
        StrongAdjacencyFix::NAME => Some(Box::new(StrongAdjacencyFix)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_order() {
        let names: Vec<_> = builtin().iter().map(|e| e.name()).collect();
        assert_eq!(names, BUILTIN_NAMES);
    }

    #[test]
    fn test_builtin_levels() {
        let levels: Vec<_> = builtin().iter().map(|e| e.level()).collect();
        assert_eq!(levels, vec![Level::Block, Level::Block, Level::Inline, Level::Inline]);
    }

    #[test]
    fn test_unknown_name() {
        assert!(by_name("LRN").is_none());
    }
}
