//! Extension descriptors for the Markdown engine.
//!
//! An extension is a self-contained (recognize, consume, render) unit:
//!
//! - [`Extension::start`] is a fast-path hint telling the engine where the
//!   construct could begin, so positions before it are never tried.
//! - [`Extension::tokenize`] either declines (`None`) or returns an
//!   [`ExtensionToken`] whose `raw` is the exact prefix it consumed.
//! - [`Extension::render`] turns the token into an HTML fragment, using
//!   [`RenderContext::render_inline`] for any nested inline Markdown.

use crate::Markdown;

/// Where an extension is considered by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// Tried at the start of every line outside fenced code, before the
    /// host parser sees the document.
    Block,
    /// Tried at every position of inline content (paragraphs, headings,
    /// list items, table cells) outside code spans, raw HTML and link
    /// destinations.
    Inline,
}

impl Level {
    /// Lowercase label used in logs and listings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Inline => "inline",
        }
    }
}

/// Extension-specific data carried by a token.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Payload {
    /// Ordered list of items (e.g. row columns).
    Items(Vec<String>),
    /// A single text span.
    Text(String),
    /// An icon name with optional trailing text (empty when absent).
    Icon {
        /// Icon identifier, also used as CSS class.
        name: String,
        /// Trailing inline text.
        text: String,
    },
}

/// Token produced by a successful [`Extension::tokenize`] call.
///
/// `raw` must be exactly the prefix of the input that was consumed: the
/// engine advances its cursor by `raw.len()`. Tokens whose `raw` is empty or
/// not a prefix of the input are discarded by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionToken {
    /// Type tag, normally the producing extension's name.
    pub name: &'static str,
    /// Exact consumed source text.
    pub raw: String,
    /// Extension-specific payload.
    pub payload: Payload,
}

impl ExtensionToken {
    /// Create a token.
    ///
    /// # Example
    ///
    /// ```
    /// use cv_markdown::{ExtensionToken, Payload};
    ///
    /// let token = ExtensionToken::new("centerline", "% Hi\n", Payload::Text("Hi".to_owned()));
    /// assert_eq!(token.raw, "% Hi\n");
    /// ```
    #[must_use]
    pub fn new(name: &'static str, raw: impl Into<String>, payload: Payload) -> Self {
        Self {
            name,
            raw: raw.into(),
            payload,
        }
    }

    /// Text payload, if this token carries one.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Item payload, if this token carries one.
    #[must_use]
    pub fn items(&self) -> Option<&[String]> {
        match &self.payload {
            Payload::Items(items) => Some(items),
            _ => None,
        }
    }
}

/// A grammar extension plugged into [`Markdown`].
///
/// Extensions are stateless: every method is a pure function of its input, so
/// one engine can be shared across threads and documents.
///
/// # Example
///
/// ```
/// use cv_markdown::{Extension, ExtensionToken, Level, Markdown, Payload, RenderContext};
///
/// struct Shout;
///
/// impl Extension for Shout {
///     fn name(&self) -> &'static str { "shout" }
///     fn level(&self) -> Level { Level::Inline }
///
///     fn start(&self, src: &str) -> Option<usize> {
///         src.find("!!")
///     }
///
///     fn tokenize(&self, src: &str) -> Option<ExtensionToken> {
///         let rest = src.strip_prefix("!!")?;
///         let end = rest.find("!!")?;
///         let raw = &src[..end + 4];
///         Some(ExtensionToken::new("shout", raw, Payload::Text(rest[..end].to_owned())))
///     }
///
///     fn render(&self, token: &ExtensionToken, ctx: &RenderContext<'_>) -> String {
///         format!("<mark>{}</mark>", ctx.render_inline(token.text().unwrap_or_default()))
///     }
/// }
///
/// let md = Markdown::new().with_extension(Shout);
/// assert_eq!(md.parse_inline("a !!b!! c"), "a <mark>b</mark> c");
/// ```
pub trait Extension: Send + Sync {
    /// Unique name, used as the token type tag and in configuration.
    fn name(&self) -> &'static str;

    /// Whether the extension is block- or inline-level.
    fn level(&self) -> Level;

    /// Byte offset in `src` before which the construct cannot start, `None`
    /// if it cannot appear at all.
    ///
    /// Block extensions are tried on the line containing the offset, so a
    /// multi-line construct may point anywhere into its first line.
    fn start(&self, src: &str) -> Option<usize>;

    /// Try to recognize the construct at the beginning of `src`.
    fn tokenize(&self, src: &str) -> Option<ExtensionToken>;

    /// Render a token produced by [`tokenize`](Self::tokenize).
    fn render(&self, token: &ExtensionToken, ctx: &RenderContext<'_>) -> String;
}

/// Handle given to [`Extension::render`] for recursive inline rendering.
pub struct RenderContext<'a> {
    markdown: &'a Markdown,
    depth: usize,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(markdown: &'a Markdown, depth: usize) -> Self {
        Self { markdown, depth }
    }

    /// Render `text` as inline Markdown with the same extension set.
    ///
    /// Reentrant: extensions reached from here may call back into it. Past
    /// the engine's nesting limit the text is emitted escaped.
    #[must_use]
    pub fn render_inline(&self, text: &str) -> String {
        self.markdown.render_inline_at(text, self.depth + 1)
    }

    /// Current nesting depth (0 for top-level content).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}
