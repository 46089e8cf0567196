//! Equal-split row: a title line followed by `~ column` lines.
//!
//! ```text
//! Acme Corp
//! ~ Senior Engineer
//! ~ 2020 – 2024
//! ```
//!
//! renders as a flex row with one `lr-item` per column.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::extension::{Extension, ExtensionToken, Level, Payload, RenderContext};

static COLUMN_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*~\s+(.+)$").unwrap());

/// Block extension for equal-split rows.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqualSplitRow;

impl EqualSplitRow {
    pub const NAME: &'static str = "lrn";
}

impl Extension for EqualSplitRow {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn level(&self) -> Level {
        Level::Block
    }

    /// Offset of the first newline followed by optional blanks and `~`, or 0
    /// when `src` itself starts with a `~` line.
    fn start(&self, src: &str) -> Option<usize> {
        if src.trim_start_matches([' ', '\t']).starts_with('~') {
            return Some(0);
        }
        src.match_indices('\n')
            .map(|(i, _)| i)
            .find(|&i| src[i + 1..].trim_start_matches([' ', '\t']).starts_with('~'))
    }

    fn tokenize(&self, src: &str) -> Option<ExtensionToken> {
        let mut lines = src.split('\n');
        let title = lines.next()?;
        if title.trim().is_empty() {
            return None;
        }

        let mut items = vec![title.trim().to_owned()];
        let mut raw_len = title.len();
        for line in lines {
            // Whitespace-only lines end the row
            if line.trim().is_empty() {
                break;
            }
            let Some(caps) = COLUMN_LINE.captures(line) else {
                break;
            };
            items.push(caps[1].trim().to_owned());
            raw_len += 1 + line.len();
        }

        if items.len() < 2 {
            return None;
        }
        Some(ExtensionToken::new(Self::NAME, &src[..raw_len], Payload::Items(items)))
    }

    fn render(&self, token: &ExtensionToken, ctx: &RenderContext<'_>) -> String {
        let mut html = String::from(r#"<div class="lr">"#);
        for item in token.items().unwrap_or_default() {
            write!(html, r#"<div class="lr-item">{}</div>"#, ctx.render_inline(item)).unwrap();
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Markdown;
    use pretty_assertions::assert_eq;

    fn items(src: &str) -> Option<Vec<String>> {
        EqualSplitRow.tokenize(src).and_then(|t| t.items().map(<[String]>::to_vec))
    }

    #[test]
    fn test_title_and_columns() {
        let token = EqualSplitRow.tokenize("Acme\n~ Engineer\n~ 2020\nnext").unwrap();
        assert_eq!(token.raw, "Acme\n~ Engineer\n~ 2020");
        assert_eq!(token.items().unwrap(), ["Acme", "Engineer", "2020"]);
    }

    #[test]
    fn test_lone_title_not_captured() {
        assert_eq!(items("Acme\nnext line"), None);
        assert_eq!(items("Acme"), None);
    }

    #[test]
    fn test_empty_title_rejected() {
        assert_eq!(items("\n~ a"), None);
        assert_eq!(items("   \n~ a"), None);
    }

    #[test]
    fn test_whitespace_line_terminates() {
        let token = EqualSplitRow.tokenize("A\n~ b\n  \n~ c").unwrap();
        assert_eq!(token.raw, "A\n~ b");
        assert_eq!(token.items().unwrap(), ["A", "b"]);
    }

    #[test]
    fn test_tilde_requires_whitespace() {
        assert_eq!(items("A\n~b"), None);
    }

    #[test]
    fn test_indented_tilde_and_trimmed_items() {
        assert_eq!(items("  A  \n   ~   b  "), Some(vec!["A".to_owned(), "b".to_owned()]));
    }

    #[test]
    fn test_start_hint() {
        assert_eq!(EqualSplitRow.start("abc\n~ d"), Some(3));
        assert_eq!(EqualSplitRow.start("abc\n  ~ d"), Some(3));
        assert_eq!(EqualSplitRow.start("~ d"), Some(0));
        assert_eq!(EqualSplitRow.start("abc"), None);
    }

    #[test]
    fn test_render_columns_inline() {
        let md = Markdown::cv();
        assert_eq!(
            md.parse("**Acme**\n~ *Lead*"),
            r#"<div class="lr"><div class="lr-item"><strong>Acme</strong></div><div class="lr-item"><em>Lead</em></div></div>"#
        );
    }
}
