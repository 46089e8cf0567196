//! Centered line: `% text`.

use std::sync::LazyLock;

use regex::Regex;

use crate::extension::{Extension, ExtensionToken, Level, Payload, RenderContext};

static CENTER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*%[ \t]+(.+?)(?:\r?\n|$)").unwrap());

/// Block extension rendering `% text` as a centered line.
#[derive(Clone, Copy, Debug, Default)]
pub struct CenterLine;

impl CenterLine {
    pub const NAME: &'static str = "centerline";
}

impl Extension for CenterLine {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn level(&self) -> Level {
        Level::Block
    }

    /// Offset of the first `%` that begins a line (after optional blanks).
    fn start(&self, src: &str) -> Option<usize> {
        let mut line_start = 0;
        for line in src.split('\n') {
            let blanks = line.len() - line.trim_start_matches([' ', '\t']).len();
            if line[blanks..].starts_with('%') {
                return Some(line_start + blanks);
            }
            line_start += line.len() + 1;
        }
        None
    }

    fn tokenize(&self, src: &str) -> Option<ExtensionToken> {
        let caps = CENTER_LINE.captures(src)?;
        let text = caps[1].trim();
        Some(ExtensionToken::new(Self::NAME, &caps[0], Payload::Text(text.to_owned())))
    }

    fn render(&self, token: &ExtensionToken, ctx: &RenderContext<'_>) -> String {
        format!(
            r#"<div class="centerline">{}</div>"#,
            ctx.render_inline(token.text().unwrap_or_default())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Markdown;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_consumes_newline() {
        let token = CenterLine.tokenize("% Jane Doe\nnext").unwrap();
        assert_eq!(token.raw, "% Jane Doe\n");
        assert_eq!(token.text(), Some("Jane Doe"));
    }

    #[test]
    fn test_tokenize_crlf_and_end_of_input() {
        assert_eq!(CenterLine.tokenize("% A\r\nB").unwrap().raw, "% A\r\n");
        assert_eq!(CenterLine.tokenize("  %\tB  ").unwrap().text(), Some("B"));
    }

    #[test]
    fn test_requires_whitespace_and_text() {
        assert!(CenterLine.tokenize("%A").is_none());
        assert!(CenterLine.tokenize("% ").is_none());
        assert!(CenterLine.tokenize("%\nA").is_none());
        assert!(CenterLine.tokenize("50% off").is_none());
    }

    #[test]
    fn test_start_hint() {
        assert_eq!(CenterLine.start("% a"), Some(0));
        assert_eq!(CenterLine.start("a\n% b"), Some(2));
        assert_eq!(CenterLine.start("a\n  % b"), Some(4));
        assert_eq!(CenterLine.start("50% off"), None);
    }

    #[test]
    fn test_render() {
        assert_eq!(
            Markdown::cv().parse("% *Curriculum* Vitae"),
            r#"<div class="centerline"><em>Curriculum</em> Vitae</div>"#
        );
    }
}
