//! Placeholder table for extension fragments.
//!
//! Extension output never goes through the host parser. Each fragment is
//! registered here and a short placeholder takes its place in the source;
//! [`Replacements::apply`] swaps every placeholder for its fragment in one
//! pass over the rendered HTML.
//!
//! Placeholders are `U+E000`, the decimal index, `U+E001`. Both delimiters
//! are private-use characters, which the host parser treats as plain text
//! and which never appear in escaped output of their own accord.

use std::fmt::Write;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

/// Extension fragments waiting to be substituted into rendered HTML.
#[derive(Debug, Default)]
pub(crate) struct Replacements {
    fragments: Vec<String>,
}

impl Replacements {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a fragment and return the placeholder standing in for it.
    pub(crate) fn add(&mut self, fragment: String) -> String {
        let mut placeholder = String::with_capacity(12);
        write!(placeholder, "{OPEN}{}{CLOSE}", self.fragments.len()).unwrap();
        self.fragments.push(fragment);
        placeholder
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Replace every known placeholder in `html` with its fragment.
    ///
    /// Text that only looks like a placeholder (unknown index, missing
    /// delimiter) is kept as is. Consumes the table to prevent reuse.
    pub(crate) fn apply(self, html: &mut String) {
        if self.is_empty() || !html.contains(OPEN) {
            return;
        }

        let mut out = String::with_capacity(html.len() + self.fragments.iter().map(String::len).sum::<usize>());
        let mut rest = html.as_str();
        while let Some(open) = rest.find(OPEN) {
            out.push_str(&rest[..open]);
            let after = &rest[open + OPEN.len_utf8()..];
            match self.lookup(after) {
                Some((fragment, consumed)) => {
                    out.push_str(fragment);
                    rest = &after[consumed..];
                }
                None => {
                    out.push(OPEN);
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        *html = out;
    }

    /// Fragment for the index at the start of `s`, and the bytes the index
    /// and closing delimiter span.
    fn lookup(&self, s: &str) -> Option<(&str, usize)> {
        let digits = s.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || digits > 9 || !s[digits..].starts_with(CLOSE) {
            return None;
        }
        let index: usize = s[..digits].parse().ok()?;
        let fragment = self.fragments.get(index)?;
        Some((fragment, digits + CLOSE.len_utf8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_substitutes_fragments() {
        let mut replacements = Replacements::new();
        let first = replacements.add("<b>one</b>".to_owned());
        let second = replacements.add("<i>two</i>".to_owned());

        let mut html = format!("<p>{first} and {second}</p>");
        replacements.apply(&mut html);

        assert_eq!(html, "<p><b>one</b> and <i>two</i></p>");
    }

    #[test]
    fn test_fragments_are_not_rescanned() {
        let mut replacements = Replacements::new();
        let inner = replacements.add("x".to_owned());
        let outer = replacements.add(format!("[{inner}]"));

        let mut html = outer;
        replacements.apply(&mut html);

        assert_eq!(html, "[\u{E000}0\u{E001}]");
    }

    #[test]
    fn test_unknown_placeholders_kept() {
        let mut replacements = Replacements::new();
        replacements.add("x".to_owned());

        let mut html = "\u{E000}7\u{E001} \u{E000}0 \u{E000}".to_owned();
        replacements.apply(&mut html);

        assert_eq!(html, "\u{E000}7\u{E001} \u{E000}0 \u{E000}");
    }

    #[test]
    fn test_empty_table_leaves_html() {
        let mut html = "<p>a</p>".to_owned();
        Replacements::new().apply(&mut html);
        assert_eq!(html, "<p>a</p>");
    }
}
