//! Strong emphasis that binds to adjacent punctuation.
//!
//! Standard flanking rules reject `**"quoted"**text` and similar CV idioms.
//! This extension accepts any `**x**` whose opener is followed by a
//! non-whitespace character and closes at the nearest `**`.

use crate::extension::{Extension, ExtensionToken, Level, Payload, RenderContext};

/// Inline extension for lenient `**strong**`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrongAdjacencyFix;

impl StrongAdjacencyFix {
    pub const NAME: &'static str = "strong-adjacency-fix";
}

impl Extension for StrongAdjacencyFix {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn level(&self) -> Level {
        Level::Inline
    }

    fn start(&self, src: &str) -> Option<usize> {
        src.find("**")
    }

    fn tokenize(&self, src: &str) -> Option<ExtensionToken> {
        let rest = src.strip_prefix("**")?;
        let first = rest.chars().next().filter(|c| !c.is_whitespace())?;
        // The body holds at least its first character
        let from = first.len_utf8();
        let end = from + rest[from..].find("**")?;
        let text = &rest[..end];
        Some(ExtensionToken::new(Self::NAME, &src[..end + 4], Payload::Text(text.to_owned())))
    }

    fn render(&self, token: &ExtensionToken, ctx: &RenderContext<'_>) -> String {
        format!("<strong>{}</strong>", ctx.render_inline(token.text().unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Markdown;
    use pretty_assertions::assert_eq;

    fn text(src: &str) -> Option<String> {
        StrongAdjacencyFix.tokenize(src).and_then(|t| t.text().map(str::to_owned))
    }

    #[test]
    fn test_nearest_closer() {
        let token = StrongAdjacencyFix.tokenize("**a** b **c**").unwrap();
        assert_eq!(token.raw, "**a**");
        assert_eq!(token.text(), Some("a"));
    }

    #[test]
    fn test_whitespace_after_opener_rejected() {
        assert_eq!(text("** a**"), None);
        assert_eq!(text("**\na**"), None);
    }

    #[test]
    fn test_empty_body_rejected() {
        assert_eq!(text("****"), None);
        assert_eq!(text("**"), None);
        assert_eq!(text("**a"), None);
    }

    #[test]
    fn test_body_may_span_lines_and_end_in_space() {
        assert_eq!(text("**a\nb **"), Some("a\nb ".to_owned()));
    }

    #[test]
    fn test_adjacent_punctuation() {
        assert_eq!(
            Markdown::cv().parse_inline(r#"**"Rust"**-based"#),
            "<strong>&quot;Rust&quot;</strong>-based"
        );
        assert_eq!(
            Markdown::new().parse_inline(r#"x**"Rust"**y"#),
            r#"x**&quot;Rust&quot;**y"#
        );
    }

    #[test]
    fn test_multibyte_first_char() {
        assert_eq!(text("**é**"), Some("é".to_owned()));
    }
}
