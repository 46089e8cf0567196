//! Extension passes over the Markdown source.
//!
//! Extensions run before the host parser sees the document, in two passes:
//!
//! 1. **Blocks.** Line by line, outside fenced code, the block extensions
//!    are tried in registration order. A match replaces the lines it
//!    consumed with a marker line, `<!--placeholder-->`. An HTML comment
//!    starts an HTML block that ends on the same line, so the marker cuts
//!    the surrounding paragraph exactly where the consumed lines did.
//! 2. **Inlines.** The host parser locates inline content; at every
//!    position outside verbatim ranges the inline extensions are tried in
//!    registration order. A match replaces the consumed text with a bare
//!    placeholder, which the host parser reads as plain text.
//!
//! Lines and positions that no extension claims reach the host parser
//! unchanged. Fragments are rendered on the spot and substituted into the
//! HTML afterwards by [`Replacements::apply`].
//!
//! Each extension's start hint is cached as an absolute offset and only
//! recomputed once the cursor has passed it, so a document is scanned a
//! bounded number of times per extension.

use crate::Markdown;
use crate::extension::{Extension, ExtensionToken, Level, RenderContext};
use crate::fence::FenceTracker;
use crate::replacements::Replacements;
use crate::spans::inline_runs;
use crate::util::{block_indent, first_char_len, first_line, is_escaped};

/// Runs the extension passes for one render call.
pub(crate) struct ExtensionProcessor<'a> {
    markdown: &'a Markdown,
    /// Nesting depth of the content being processed.
    depth: usize,
}

impl<'a> ExtensionProcessor<'a> {
    pub(crate) fn new(markdown: &'a Markdown, depth: usize) -> Self {
        Self { markdown, depth }
    }

    /// Replace block extension matches with marker lines.
    pub(crate) fn process_blocks(&self, src: &str, replacements: &mut Replacements) -> String {
        let mut hints = StartHints::new(self.markdown, Level::Block);
        if hints.is_empty() {
            return src.to_owned();
        }

        let mut output = String::with_capacity(src.len());
        let mut fence = FenceTracker::new();
        let mut pos = 0;

        while pos < src.len() {
            let (line, span) = first_line(&src[pos..]);
            let in_code = fence.update(line) || fence.in_fence();

            if !in_code
                && hints.earliest(src, pos).is_some_and(|hint| hint < pos + span)
                && let Some((index, token)) = self.markdown.match_extension(Level::Block, &src[pos..])
            {
                let placeholder = replacements.add(self.render(index, &token));
                output.push_str(block_indent(line));
                output.push_str("<!--");
                output.push_str(&placeholder);
                output.push_str("-->");

                pos += token.raw.len();
                // The marker must end its line
                if token.raw.ends_with('\n') || !(pos == src.len() || src[pos..].starts_with('\n')) {
                    output.push('\n');
                }
                continue;
            }

            output.push_str(&src[pos..pos + span]);
            pos += span;
        }
        output
    }

    /// Replace inline extension matches with placeholders.
    pub(crate) fn process_inlines(&self, src: &str, replacements: &mut Replacements) -> String {
        if StartHints::new(self.markdown, Level::Inline).is_empty() {
            return src.to_owned();
        }

        let mut output = String::with_capacity(src.len());
        let mut copied = 0;

        for run in inline_runs(src) {
            // Hints are only valid within the run they were computed for
            let bounded = &src[..run.range.end];
            let mut hints = StartHints::new(self.markdown, Level::Inline);
            let mut pos = run.range.start.max(copied);

            while let Some(candidate) = hints.earliest(bounded, pos) {
                if let Some(end) = run.verbatim_end(candidate) {
                    pos = end;
                    continue;
                }
                if is_escaped(bounded, run.range.start, candidate) {
                    pos = candidate + first_char_len(&bounded[candidate..]);
                    continue;
                }
                match self.markdown.match_extension(Level::Inline, &bounded[candidate..]) {
                    Some((index, token)) => {
                        output.push_str(&src[copied..candidate]);
                        output.push_str(&replacements.add(self.render(index, &token)));
                        copied = candidate + token.raw.len();
                        pos = copied;
                    }
                    None => pos = candidate + first_char_len(&bounded[candidate..]),
                }
            }
        }
        output.push_str(&src[copied..]);
        output
    }

    fn render(&self, index: usize, token: &ExtensionToken) -> String {
        let ctx = RenderContext::new(self.markdown, self.depth);
        self.markdown.extension(index).render(token, &ctx)
    }
}

/// Cached start hints of one level's extensions.
struct StartHints<'a> {
    extensions: Vec<&'a dyn Extension>,
    hints: Vec<Hint>,
}

#[derive(Clone, Copy)]
enum Hint {
    Stale,
    At(usize),
    Never,
}

impl<'a> StartHints<'a> {
    fn new(markdown: &'a Markdown, level: Level) -> Self {
        let extensions: Vec<_> = markdown.extensions().filter(|e| e.level() == level).collect();
        let hints = vec![Hint::Stale; extensions.len()];
        Self { extensions, hints }
    }

    fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Earliest absolute offset at or after `pos` where an extension could
    /// start in `src`.
    fn earliest(&mut self, src: &str, pos: usize) -> Option<usize> {
        if pos >= src.len() {
            return None;
        }
        let rest = &src[pos..];
        let mut earliest: Option<usize> = None;
        for (extension, hint) in self.extensions.iter().zip(&mut self.hints) {
            if let Hint::At(at) = *hint
                && at < pos
            {
                *hint = Hint::Stale;
            }
            if let Hint::Stale = *hint {
                *hint = match extension.start(rest) {
                    Some(offset) if rest.is_char_boundary(offset) => Hint::At(pos + offset),
                    Some(offset) => {
                        tracing::warn!(extension = extension.name(), offset, "Start hint is out of range, ignoring");
                        Hint::Never
                    }
                    None => Hint::Never,
                };
            }
            if let Hint::At(at) = *hint {
                earliest = Some(earliest.map_or(at, |e| e.min(at)));
            }
        }
        earliest
    }
}
