//! Markdown engine with an ordered extension list.

use std::borrow::Cow;
use std::fmt;

use pulldown_cmark::Parser;

use crate::extension::{Extension, ExtensionToken, Level};
use crate::extensions;
use crate::html::escape_html;
use crate::processor::ExtensionProcessor;
use crate::renderer::{HtmlRenderer, parser_options};
use crate::replacements::Replacements;
use crate::util::{escape_block_starts, normalize_newlines, truncate_at_line};

/// Default input size limit (1 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1 << 20;

/// Default nesting limit for extensions rendering inline Markdown.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Resource limits applied while rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Inputs longer than this are truncated at the last line boundary.
    pub max_input_bytes: usize,
    /// Maximum extension nesting depth; deeper content is emitted as
    /// escaped text.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderOptions {
    /// Set the input size limit.
    #[must_use]
    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    /// Set the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Markdown engine.
///
/// Holds an ordered list of extensions layered on `pulldown-cmark`. At the
/// start of every line outside fenced code the block-level extensions are
/// tried in registration order before the host parser sees the line;
/// inline-level extensions likewise run at every position of inline content.
/// The first extension whose tokenizer matches wins. Everything no extension
/// claims is rendered by the host parser.
///
/// The engine is immutable once built and can be shared across threads.
///
/// # Example
///
/// ```
/// use cv_markdown::Markdown;
///
/// let md = Markdown::cv();
/// assert_eq!(md.parse("% Jane Doe"), r#"<div class="centerline">Jane Doe</div>"#);
/// ```
pub struct Markdown {
    extensions: Vec<Box<dyn Extension>>,
    options: RenderOptions,
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Markdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.extensions.iter().map(|e| e.name()).collect();
        f.debug_struct("Markdown")
            .field("extensions", &names)
            .field("options", &self.options)
            .finish()
    }
}

impl Markdown {
    /// Create an engine with the default grammar and no extensions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
            options: RenderOptions::default(),
        }
    }

    /// Create an engine with every built-in CV extension registered.
    #[must_use]
    pub fn cv() -> Self {
        extensions::builtin()
            .into_iter()
            .fold(Self::new(), Self::with_boxed_extension)
    }

    /// Register an extension after the already registered ones.
    #[must_use]
    pub fn with_extension<E: Extension + 'static>(self, extension: E) -> Self {
        self.with_boxed_extension(Box::new(extension))
    }

    /// Register a boxed extension after the already registered ones.
    #[must_use]
    pub fn with_boxed_extension(mut self, extension: Box<dyn Extension>) -> Self {
        if self.extensions.iter().any(|e| e.name() == extension.name()) {
            tracing::warn!(
                extension = extension.name(),
                "Extension registered twice, later registration never matches first"
            );
        }
        self.extensions.push(extension);
        self
    }

    /// Set resource limits.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Resource limits in effect.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Registered extensions in precedence order.
    pub fn extensions(&self) -> impl Iterator<Item = &dyn Extension> {
        self.extensions.iter().map(|extension| &**extension)
    }

    /// Render a Markdown document to an HTML fragment.
    #[must_use]
    pub fn parse(&self, src: &str) -> String {
        let src = normalize_newlines(src);
        let src = self.limit_input(&src);
        self.render_source(src, 0, false)
    }

    /// Render inline Markdown (no block constructs) to HTML.
    #[must_use]
    pub fn parse_inline(&self, src: &str) -> String {
        let src = normalize_newlines(src);
        let src = self.limit_input(&src);
        self.render_inline_at(src, 0)
    }

    /// Render inline Markdown at a nesting depth.
    ///
    /// Line starts that would open a block are escaped, and surrounding
    /// whitespace is kept as is.
    pub(crate) fn render_inline_at(&self, src: &str, depth: usize) -> String {
        if depth > self.options.max_depth {
            tracing::debug!(depth, "Inline nesting limit reached, emitting escaped text");
            return escape_html(src);
        }
        let body = src.trim();
        if body.is_empty() {
            return src.to_owned();
        }
        let lead = &src[..src.len() - src.trim_start().len()];
        let trail = &src[src.trim_end().len()..];

        let mut html = String::with_capacity(src.len() + 16);
        html.push_str(lead);
        html.push_str(&self.render_source(&escape_block_starts(body), depth, true));
        html.push_str(trail);
        html
    }

    /// Run the extension passes and the host parser over `src`.
    fn render_source(&self, src: &str, depth: usize, inline_only: bool) -> String {
        let processor = ExtensionProcessor::new(self, depth);
        let mut replacements = Replacements::new();

        let src = if inline_only {
            Cow::Borrowed(src)
        } else {
            Cow::Owned(processor.process_blocks(src, &mut replacements))
        };
        let src = processor.process_inlines(&src, &mut replacements);

        let renderer = if inline_only {
            HtmlRenderer::new().inline_only()
        } else {
            HtmlRenderer::new()
        };
        let mut html = renderer.render(Parser::new_ext(&src, parser_options()));
        replacements.apply(&mut html);
        html
    }

    fn limit_input<'s>(&self, src: &'s str) -> &'s str {
        let limited = truncate_at_line(src, self.options.max_input_bytes);
        if limited.len() < src.len() {
            tracing::warn!(
                input_bytes = src.len(),
                max_input_bytes = self.options.max_input_bytes,
                "Input exceeds size limit, truncating"
            );
        }
        limited
    }

    /// Try the extensions of `level` at the start of `src`, in order.
    ///
    /// Returns the index of the matching extension and its token. Tokens with
    /// an empty `raw`, or a `raw` that is not a prefix of `src`, are discarded.
    pub(crate) fn match_extension(&self, level: Level, src: &str) -> Option<(usize, ExtensionToken)> {
        self.extensions
            .iter()
            .enumerate()
            .filter(|(_, extension)| extension.level() == level)
            .find_map(|(index, extension)| {
                let token = extension.tokenize(src)?;
                if token.raw.is_empty() || !src.starts_with(token.raw.as_str()) {
                    tracing::warn!(
                        extension = extension.name(),
                        raw_len = token.raw.len(),
                        "Extension token does not consume a prefix of the input, ignoring"
                    );
                    return None;
                }
                tracing::trace!(
                    extension = extension.name(),
                    level = level.as_str(),
                    raw_len = token.raw.len(),
                    "Extension matched"
                );
                Some((index, token))
            })
    }

    /// Extension at `index` in registration order.
    pub(crate) fn extension(&self, index: usize) -> &dyn Extension {
        self.extensions[index].as_ref()
    }
}
