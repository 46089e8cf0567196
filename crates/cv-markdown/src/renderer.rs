//! HTML renderer for host parser events.
//!
//! Walks the `pulldown-cmark` event stream and writes HTML the way common
//! Markdown renderers do (`<p>`, `<pre><code>`, `<ul>`, ...). Extension
//! markers left by the block pass come through as HTML comments and are
//! unwrapped back into their placeholders.

use std::fmt::Write;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, LinkType, Options, Tag, TagEnd};

use crate::html::{encode_href, escape_html};
use crate::util::heading_level_to_num;

/// Parser options for the default grammar: `CommonMark` plus GFM tables,
/// strikethrough and task lists.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Image being rendered; alt text is collected from its children.
struct PendingImage {
    src: String,
    title: String,
    alt: String,
    /// Images nested in the alt text.
    nested: usize,
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    cell: usize,
    in_head: bool,
    body_open: bool,
}

impl TableState {
    fn alignment_attr(&self) -> &'static str {
        match self.alignments.get(self.cell) {
            Some(Alignment::Left) => r#" align="left""#,
            Some(Alignment::Center) => r#" align="center""#,
            Some(Alignment::Right) => r#" align="right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Event-to-HTML renderer.
pub(crate) struct HtmlRenderer {
    output: String,
    /// Drop paragraph tags, for inline-only rendering.
    inline_only: bool,
    image: Option<PendingImage>,
    table: TableState,
}

impl HtmlRenderer {
    pub(crate) fn new() -> Self {
        Self {
            output: String::new(),
            inline_only: false,
            image: None,
            table: TableState::default(),
        }
    }

    /// Render without `<p>` wrappers around paragraphs.
    pub(crate) fn inline_only(mut self) -> Self {
        self.inline_only = true;
        self
    }

    pub(crate) fn render<'a, I>(mut self, events: I) -> String
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }
        self.output
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>\n"),
            Event::Rule => self.output.push_str("<hr>\n"),
            Event::TaskListMarker(checked) => {
                let checked = if checked { " checked" } else { "" };
                write!(self.output, r#"<input type="checkbox" disabled{checked}> "#).unwrap();
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        if let Some(image) = &mut self.image {
            if matches!(tag, Tag::Image { .. }) {
                image.nested += 1;
            }
            return;
        }

        match tag {
            Tag::Paragraph => {
                if !self.inline_only {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                write!(self.output, "<h{}>", heading_level_to_num(level)).unwrap();
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next(),
                    CodeBlockKind::Indented => None,
                };
                match lang {
                    Some(lang) => write!(self.output, r#"<pre><code class="language-{}">"#, escape_html(lang)).unwrap(),
                    None => self.output.push_str("<pre><code>"),
                }
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>\n"),
                Some(n) => write!(self.output, "<ol start=\"{n}\">\n").unwrap(),
                None => self.output.push_str("<ul>\n"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                self.output.push_str("<table>\n");
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell = 0;
                self.output.push_str("<thead>\n<tr>\n");
            }
            Tag::TableRow => {
                if !self.table.body_open {
                    self.table.body_open = true;
                    self.output.push_str("<tbody>\n");
                }
                self.table.cell = 0;
                self.output.push_str("<tr>\n");
            }
            Tag::TableCell => {
                let tag = if self.table.in_head { "th" } else { "td" };
                let align = self.table.alignment_attr();
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let href = if link_type == LinkType::Email {
                    format!("mailto:{dest_url}")
                } else {
                    dest_url.to_string()
                };
                write!(self.output, r#"<a href="{}""#, encode_href(&href)).unwrap();
                if !title.is_empty() {
                    write!(self.output, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                self.output.push('>');
            }
            Tag::Image { dest_url, title, .. } => {
                self.image = Some(PendingImage {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                    nested: 0,
                });
            }
            Tag::FootnoteDefinition(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if let Some(image) = &mut self.image {
            if tag == TagEnd::Image {
                if image.nested == 0 {
                    self.finish_image();
                } else {
                    image.nested -= 1;
                }
            }
            return;
        }

        match tag {
            TagEnd::Paragraph => {
                if !self.inline_only {
                    self.output.push_str("</p>\n");
                }
            }
            TagEnd::Heading(level) => {
                writeln!(self.output, "</h{}>", heading_level_to_num(level)).unwrap();
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => self.output.push_str("</code></pre>\n"),
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>\n" } else { "</ul>\n" }),
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::Table => {
                if self.table.body_open {
                    self.output.push_str("</tbody>\n");
                }
                self.output.push_str("</table>\n");
                self.table = TableState::default();
            }
            TagEnd::TableHead => {
                self.table.in_head = false;
                self.output.push_str("</tr>\n</thead>\n");
            }
            TagEnd::TableRow => self.output.push_str("</tr>\n"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.in_head { "</th>\n" } else { "</td>\n" });
                self.table.cell += 1;
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image
            | TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition => {}
        }
    }

    fn finish_image(&mut self) {
        let Some(image) = self.image.take() else {
            return;
        };
        write!(
            self.output,
            r#"<img src="{}" alt="{}""#,
            encode_href(&image.src),
            escape_html(&image.alt)
        )
        .unwrap();
        if !image.title.is_empty() {
            write!(self.output, r#" title="{}""#, escape_html(&image.title)).unwrap();
        }
        self.output.push('>');
    }

    fn push_inline(&mut self, html: &str) {
        self.output.push_str(html);
    }

    fn text(&mut self, text: &str) {
        if let Some(image) = &mut self.image {
            image.alt.push_str(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(image) = &mut self.image {
            image.alt.push_str(code);
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn raw_html(&mut self, html: &str) {
        if self.image.is_some() {
            return;
        }
        match unwrap_marker(html) {
            Some(placeholder) => self.output.push_str(placeholder),
            None => self.output.push_str(html),
        }
    }

    fn soft_break(&mut self) {
        match &mut self.image {
            Some(image) => image.alt.push(' '),
            None => self.output.push('\n'),
        }
    }
}

/// Placeholder inside a block extension marker (`<!--placeholder-->`).
fn unwrap_marker(html: &str) -> Option<&str> {
    let placeholder = html.trim().strip_prefix("<!--")?.strip_suffix("-->")?;
    placeholder.starts_with('\u{E000}').then_some(placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Markdown;
    use pretty_assertions::assert_eq;

    fn render(src: &str) -> String {
        Markdown::new().parse(src)
    }

    #[test]
    fn test_paragraph_and_heading() {
        assert_eq!(render("# Jane\n\nHello"), "<h1>Jane</h1>\n<p>Hello</p>\n");
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            render("```js\na < b\n```"),
            "<pre><code class=\"language-js\">a &lt; b\n</code></pre>\n"
        );
    }

    #[test]
    fn test_tight_list() {
        assert_eq!(render("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
    }

    #[test]
    fn test_loose_ordered_list_with_start() {
        assert_eq!(
            render("2. a\n\n3. b"),
            "<ol start=\"2\">\n<li><p>a</p>\n</li>\n<li><p>b</p>\n</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(render("> hi"), "<blockquote>\n<p>hi</p>\n</blockquote>\n");
    }

    #[test]
    fn test_table() {
        assert_eq!(
            render("| A | B |\n|:-:|---|\n| 1 | 2 |"),
            "<table>\n<thead>\n<tr>\n<th align=\"center\">A</th>\n<th>B</th>\n</tr>\n</thead>\n\
             <tbody>\n<tr>\n<td align=\"center\">1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn test_inline_constructs() {
        assert_eq!(
            Markdown::new().parse_inline(r#"`x` ~~y~~ [l](/p "T") ![i *j*](a.png)"#),
            r#"<code>x</code> <del>y</del> <a href="/p" title="T">l</a> <img src="a.png" alt="i j">"#
        );
    }

    #[test]
    fn test_email_autolink() {
        assert_eq!(
            Markdown::new().parse_inline("<jane@example.com>"),
            r#"<a href="mailto:jane@example.com">jane@example.com</a>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(render("a < b & \"c\""), "<p>a &lt; b &amp; &quot;c&quot;</p>\n");
    }

    #[test]
    fn test_html_passthrough() {
        assert!(render("<div>\nx\n</div>").starts_with("<div>\nx\n</div>"));
    }

    #[test]
    fn test_unwrap_marker() {
        assert_eq!(unwrap_marker("<!--\u{E000}3\u{E001}-->\n"), Some("\u{E000}3\u{E001}"));
        assert_eq!(unwrap_marker("<!-- note -->"), None);
    }
}
