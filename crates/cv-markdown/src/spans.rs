//! Inline content located by the host parser.
//!
//! The inline extension pass needs to know where inline Markdown lives
//! (paragraphs, headings, tight list items, table cells) and which parts of
//! it are verbatim: code spans, raw HTML, autolinks, images and the
//! destination half of links. Rather than re-deriving the grammar, the
//! document is parsed once and the source ranges of the events are read off.

use std::ops::Range;

use pulldown_cmark::{Event, LinkType, Parser, Tag, TagEnd};

use crate::renderer::parser_options;

/// Inline content of one leaf block.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct InlineRun {
    /// Source range of the run.
    pub(crate) range: Range<usize>,
    /// Ranges extensions must not start in, sorted and disjoint.
    verbatim: Vec<Range<usize>>,
}

impl InlineRun {
    fn new(range: Range<usize>) -> Self {
        Self {
            range,
            verbatim: Vec::new(),
        }
    }

    /// End of the verbatim range containing `pos`.
    pub(crate) fn verbatim_end(&self, pos: usize) -> Option<usize> {
        let index = self.verbatim.partition_point(|range| range.end <= pos);
        self.verbatim
            .get(index)
            .filter(|range| range.start <= pos)
            .map(|range| range.end)
    }

    /// Sort and merge verbatim ranges; nested ones (a code span inside an
    /// image) collapse into their parent.
    fn finish(mut self) -> Self {
        self.verbatim.sort_by_key(|range| range.start);
        let mut merged: Vec<Range<usize>> = Vec::with_capacity(self.verbatim.len());
        for range in self.verbatim {
            match merged.last_mut() {
                Some(last) if range.start < last.end => last.end = last.end.max(range.end),
                _ => merged.push(range),
            }
        }
        self.verbatim = merged;
        self
    }
}

/// Link whose text is still being read.
struct OpenLink {
    range: Range<usize>,
    /// End of the link text seen so far.
    text_end: usize,
    /// Autolinks are verbatim as a whole.
    auto: bool,
}

/// Collect the inline runs of `src` in source order.
pub(crate) fn inline_runs(src: &str) -> Vec<InlineRun> {
    let mut runs = Vec::new();
    let mut current: Option<InlineRun> = None;
    let mut links: Vec<OpenLink> = Vec::new();
    let mut in_code_block = false;

    for (event, range) in Parser::new_ext(src, parser_options()).into_offset_iter() {
        match &event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            _ => {}
        }
        if in_code_block || !is_inline(&event) {
            if let Some(run) = current.take() {
                runs.push(run.finish());
            }
            links.clear();
            continue;
        }

        let run = current.get_or_insert_with(|| InlineRun::new(range.clone()));
        run.range.start = run.range.start.min(range.start);
        run.range.end = run.range.end.max(range.end);

        match event {
            Event::Code(_) | Event::InlineHtml(_) | Event::InlineMath(_) | Event::Start(Tag::Image { .. }) => {
                run.verbatim.push(range.clone());
            }
            Event::Start(Tag::Link { link_type, .. }) => {
                links.push(OpenLink {
                    text_end: range.start + 1,
                    range,
                    auto: matches!(link_type, LinkType::Autolink | LinkType::Email),
                });
                continue;
            }
            Event::End(TagEnd::Link) => {
                if let Some(link) = links.pop() {
                    let tail = if link.auto { link.range } else { link.text_end..link.range.end };
                    run.verbatim.push(tail);
                }
                continue;
            }
            _ => {}
        }
        if let Some(link) = links.last_mut() {
            link.text_end = link.text_end.max(range.end);
        }
    }
    if let Some(run) = current {
        runs.push(run.finish());
    }
    runs
}

/// Whether an event belongs to inline content.
fn is_inline(event: &Event<'_>) -> bool {
    match event {
        Event::Text(_)
        | Event::Code(_)
        | Event::InlineHtml(_)
        | Event::InlineMath(_)
        | Event::SoftBreak
        | Event::HardBreak
        | Event::FootnoteReference(_) => true,
        Event::Start(tag) => matches!(
            tag,
            Tag::Emphasis
                | Tag::Strong
                | Tag::Strikethrough
                | Tag::Superscript
                | Tag::Subscript
                | Tag::Link { .. }
                | Tag::Image { .. }
        ),
        Event::End(tag) => matches!(
            tag,
            TagEnd::Emphasis
                | TagEnd::Strong
                | TagEnd::Strikethrough
                | TagEnd::Superscript
                | TagEnd::Subscript
                | TagEnd::Link
                | TagEnd::Image
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn runs(src: &str) -> Vec<&str> {
        inline_runs(src).iter().map(|run| &src[run.range.clone()]).collect()
    }

    #[test]
    fn test_runs_per_leaf_block() {
        assert_eq!(runs("# Title\n\nsome *text*\n\n- a\n- b"), vec!["Title", "some *text*", "a", "b"]);
    }

    #[test]
    fn test_code_blocks_are_not_runs() {
        assert_eq!(runs("```\n**a**\n```\n\n    **b**\n\nc"), vec!["c"]);
    }

    #[test]
    fn test_code_span_is_verbatim() {
        let src = "a `**b**` c";
        let run = &inline_runs(src)[0];
        assert_eq!(run.verbatim_end(3), Some(9));
        assert_eq!(run.verbatim_end(2), Some(9));
        assert_eq!(run.verbatim_end(10), None);
    }

    #[test]
    fn test_link_destination_is_verbatim() {
        let src = "[**a**](/x**y**)";
        let run = &inline_runs(src)[0];
        assert_eq!(run.verbatim_end(1), None);
        assert_eq!(run.verbatim_end(9), Some(src.len()));
    }

    #[test]
    fn test_autolink_is_verbatim() {
        let src = "see <https://x.dev/**a**>";
        let run = &inline_runs(src)[0];
        assert_eq!(run.verbatim_end(4), Some(src.len()));
        assert_eq!(run.verbatim_end(0), None);
    }

    #[test]
    fn test_nested_verbatim_ranges_merge() {
        let src = "![`a`](b.png) c";
        let run = &inline_runs(src)[0];
        assert_eq!(run.verbatim_end(2), Some(13));
        assert_eq!(run.verbatim_end(14), None);
    }
}
