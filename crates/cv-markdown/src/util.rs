//! Shared line and text helpers.

use std::borrow::Cow;

use pulldown_cmark::HeadingLevel;

/// Normalize `\r\n` and lone `\r` line endings to `\n`.
pub(crate) fn normalize_newlines(src: &str) -> Cow<'_, str> {
    if src.contains('\r') {
        Cow::Owned(src.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(src)
    }
}

/// Truncate `src` to at most `max_bytes`, preferring the last line boundary.
///
/// Returns the input unchanged when it already fits.
pub(crate) fn truncate_at_line(src: &str, max_bytes: usize) -> &str {
    if src.len() <= max_bytes {
        return src;
    }
    let mut end = max_bytes;
    while !src.is_char_boundary(end) {
        end -= 1;
    }
    match src[..end].rfind('\n') {
        Some(newline) => &src[..newline],
        None => &src[..end],
    }
}

/// First line of `src` (without newline) and the number of bytes it spans,
/// newline included.
pub(crate) fn first_line(src: &str) -> (&str, usize) {
    match src.find('\n') {
        Some(end) => (&src[..end], end + 1),
        None => (src, src.len()),
    }
}

/// Leading indentation in columns (tabs advance to the next multiple of 4).
pub(crate) fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

/// Byte length of the first character of `src` (0 when empty).
pub(crate) fn first_char_len(src: &str) -> usize {
    src.chars().next().map_or(0, char::len_utf8)
}

/// Leading whitespace of `line` if it is less than an indented code block
/// deep, otherwise three spaces.
pub(crate) fn block_indent(line: &str) -> &str {
    let end = line.len() - line.trim_start_matches([' ', '\t']).len();
    if indent_width(line) < 4 { &line[..end] } else { "   " }
}

/// Whether the byte at `pos` is escaped by an odd run of backslashes
/// starting no earlier than `floor`.
pub(crate) fn is_escaped(src: &str, floor: usize, pos: usize) -> bool {
    let backslashes = src.as_bytes()[floor..pos].iter().rev().take_while(|&&b| b == b'\\').count();
    backslashes % 2 == 1
}

/// Backslash-escape line starts the host parser would read as block syntax
/// (headings, quotes, list markers, rules, setext underlines, fences, link
/// reference definitions), so inline text renders as one paragraph.
///
/// Leading whitespace of every line is dropped, which also rules out
/// indented code.
pub(crate) fn escape_block_starts(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let line = line.trim_start_matches([' ', '\t']);
        match block_marker(line) {
            Some(at) => {
                out.push_str(&line[..at]);
                out.push('\\');
                out.push_str(&line[at..]);
            }
            None => out.push_str(line),
        }
    }
    out
}

/// Byte offset of the character to escape when `line` opens a block.
fn block_marker(line: &str) -> Option<usize> {
    let first = line.chars().next()?;
    let rest = &line[first.len_utf8()..];
    let spaced = rest.is_empty() || rest.starts_with([' ', '\t']);
    let only_marker = line.trim_end().chars().all(|c| c == first || c == ' ' || c == '\t');
    let marker = match first {
        '#' | '>' | '=' | '|' => true,
        '+' => spaced,
        '-' => spaced || only_marker,
        '*' | '_' => (first == '*' && spaced) || (only_marker && line.matches(first).count() >= 3),
        '`' => line.starts_with("```"),
        '~' => line.starts_with("~~~"),
        '[' => line.contains("]:"),
        '0'..='9' => {
            let digits = line.bytes().take_while(u8::is_ascii_digit).count();
            let after = &line[digits..];
            if digits <= 9 && after.starts_with(['.', ')']) && (after.len() == 1 || after[1..].starts_with([' ', '\t'])) {
                return Some(digits);
            }
            false
        }
        _ => false,
    };
    marker.then_some(0)
}

/// Convert a heading level to its number.
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
