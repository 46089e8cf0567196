//! Inline icon: `icon=name trailing text`.
//!
//! Emits an `<iconify-icon>` custom element; the page is expected to load the
//! Iconify web component.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::extension::{Extension, ExtensionToken, Level, Payload, RenderContext};
use crate::html::escape_html;

static ICON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^icon=(\S+)(?:[ \t]+([^\n]+))?").unwrap());

/// Inline extension rendering `icon=name` as an icon line.
#[derive(Clone, Copy, Debug, Default)]
pub struct IconInline;

impl IconInline {
    pub const NAME: &'static str = "iconify-inline";
}

impl Extension for IconInline {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn level(&self) -> Level {
        Level::Inline
    }

    fn start(&self, src: &str) -> Option<usize> {
        src.find("icon=")
    }

    fn tokenize(&self, src: &str) -> Option<ExtensionToken> {
        let caps = ICON.captures(src)?;
        let name = caps[1].trim().to_owned();
        let text = caps.get(2).map_or("", |m| m.as_str()).trim().to_owned();
        Some(ExtensionToken::new(Self::NAME, &caps[0], Payload::Icon { name, text }))
    }

    fn render(&self, token: &ExtensionToken, ctx: &RenderContext<'_>) -> String {
        let Payload::Icon { name, text } = &token.payload else {
            return String::new();
        };
        let name = escape_html(name);
        let mut html = format!(
            r#"<p class="icon-line"><iconify-icon icon="{name}" class="{name}"></iconify-icon>"#
        );
        if !text.is_empty() {
            write!(html, r#"<span class="icon-text">{}</span>"#, ctx.render_inline(text)).unwrap();
        }
        html.push_str("</p>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Markdown;
    use pretty_assertions::assert_eq;

    fn icon(src: &str) -> Option<(String, String, String)> {
        let token = IconInline.tokenize(src)?;
        match token.payload {
            Payload::Icon { name, text } => Some((token.raw, name, text)),
            _ => None,
        }
    }

    #[test]
    fn test_name_and_text() {
        assert_eq!(
            icon("icon=mdi:email me@x.dev\nnext"),
            Some(("icon=mdi:email me@x.dev".to_owned(), "mdi:email".to_owned(), "me@x.dev".to_owned()))
        );
    }

    #[test]
    fn test_name_only() {
        assert_eq!(
            icon("icon=mdi:phone\nnext"),
            Some(("icon=mdi:phone".to_owned(), "mdi:phone".to_owned(), String::new()))
        );
    }

    #[test]
    fn test_text_does_not_cross_lines() {
        let (raw, _, text) = icon("icon=a \nb").unwrap();
        assert_eq!(raw, "icon=a");
        assert_eq!(text, "");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(icon("icon= x").is_none());
        assert!(icon("icon=").is_none());
    }

    #[test]
    fn test_render_with_text() {
        assert_eq!(
            Markdown::cv().parse_inline("icon=mdi:github **me**"),
            concat!(
                r#"<p class="icon-line"><iconify-icon icon="mdi:github" class="mdi:github"></iconify-icon>"#,
                r#"<span class="icon-text"><strong>me</strong></span></p>"#
            )
        );
    }

    #[test]
    fn test_render_without_text() {
        assert_eq!(
            Markdown::cv().parse_inline("icon=mdi:web"),
            r#"<p class="icon-line"><iconify-icon icon="mdi:web" class="mdi:web"></iconify-icon></p>"#
        );
    }

    #[test]
    fn test_name_is_attribute_escaped() {
        let html = Markdown::cv().parse_inline(r#"icon=a"onload="x"#);
        assert!(html.contains(r#"icon="a&quot;onload=&quot;x""#));
    }
}
