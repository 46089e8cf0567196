//! Markdown renderer for CV documents.
//!
//! This crate provides a [`Markdown`] engine with an ordered list of grammar
//! [`Extension`]s layered on `pulldown-cmark` (`CommonMark` plus GFM tables,
//! strikethrough and task lists).
//!
//! # Architecture
//!
//! Rendering is a preprocess, parse, post-process pipeline:
//! - a line pass tries every block extension (in registration order) at the
//!   start of each line outside fenced code and swaps matches for marker
//!   lines
//! - an inline pass does the same for inline extensions at every position of
//!   the inline content the host parser reports
//! - `pulldown-cmark` parses what is left and the HTML renderer walks its
//!   events; extension fragments are then substituted for their markers
//!
//! Built-in CV extensions live in [`extensions`]:
//! - equal-split rows (`Title` + `~ column` lines)
//! - centered lines (`% text`)
//! - inline icons (`icon=mdi:email me@example.com`)
//! - lenient strong emphasis (`**"quoted"**text`)
//!
//! # Example
//!
//! ```
//! use cv_markdown::Markdown;
//!
//! let md = Markdown::cv();
//! let html = md.parse("Acme Corp\n~ Engineer\n~ 2020\n");
//! assert_eq!(
//!     html,
//!     r#"<div class="lr"><div class="lr-item">Acme Corp</div><div class="lr-item">Engineer</div><div class="lr-item">2020</div></div>"#
//! );
//! ```

mod engine;
mod extension;
pub mod extensions;
mod fence;
mod html;
mod processor;
mod renderer;
mod replacements;
mod spans;
mod util;

use std::sync::LazyLock;

pub use engine::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_BYTES, Markdown, RenderOptions};
pub use extension::{Extension, ExtensionToken, Level, Payload, RenderContext};
pub use html::escape_html;

static CV: LazyLock<Markdown> = LazyLock::new(Markdown::cv);

/// Render a CV document with all built-in extensions.
#[must_use]
pub fn render(src: &str) -> String {
    CV.parse(src)
}

/// Render inline CV Markdown with all built-in extensions.
#[must_use]
pub fn render_inline(src: &str) -> String {
    CV.parse_inline(src)
}
