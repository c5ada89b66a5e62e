//! Inline node variants and their constructors.

use super::autolink::clean_autolink;
use super::chain::InlineChain;
use crate::Chunk;
use crate::error::{ModelError, Result};

/// Discriminant of an [`Inline`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineTag {
    Text,
    SoftBreak,
    LineBreak,
    Code,
    RawHtml,
    Emph,
    Strong,
    Link,
    Image,
}

impl InlineTag {
    /// Lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::SoftBreak => "softbreak",
            Self::LineBreak => "linebreak",
            Self::Code => "code",
            Self::RawHtml => "raw_html",
            Self::Emph => "emph",
            Self::Strong => "strong",
            Self::Link => "link",
            Self::Image => "image",
        }
    }
}

/// Payload shared by links and images.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Linkable {
    /// Link text, or image description.
    pub label: InlineChain,
    /// Owned destination.
    pub url: Vec<u8>,
    /// Owned title, if any.
    pub title: Option<Vec<u8>>,
}

/// One inline node. Siblings are the neighbours in the owning
/// [`InlineChain`]; a node never refers to its siblings itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text run.
    Text(Chunk),
    /// Soft line break (newline in source).
    SoftBreak,
    /// Hard line break.
    LineBreak,
    /// Code span content.
    Code(Chunk),
    /// Raw inline HTML, passed through untouched.
    RawHtml(Chunk),
    /// Emphasis wrapping a child chain.
    Emph(InlineChain),
    /// Strong emphasis wrapping a child chain.
    Strong(InlineChain),
    /// Link `[label](url "title")`.
    Link(Linkable),
    /// Image `![label](url "title")`.
    Image(Linkable),
}

impl Inline {
    pub fn tag(&self) -> InlineTag {
        match self {
            Self::Text(_) => InlineTag::Text,
            Self::SoftBreak => InlineTag::SoftBreak,
            Self::LineBreak => InlineTag::LineBreak,
            Self::Code(_) => InlineTag::Code,
            Self::RawHtml(_) => InlineTag::RawHtml,
            Self::Emph(_) => InlineTag::Emph,
            Self::Strong(_) => InlineTag::Strong,
            Self::Link(_) => InlineTag::Link,
            Self::Image(_) => InlineTag::Image,
        }
    }

    /// Inline with a literal payload: `Text`, `Code`, or `RawHtml`.
    pub fn literal(tag: InlineTag, chunk: Chunk) -> Result<Self> {
        match tag {
            InlineTag::Text => Ok(Self::Text(chunk)),
            InlineTag::Code => Ok(Self::Code(chunk)),
            InlineTag::RawHtml => Ok(Self::RawHtml(chunk)),
            _ => Err(mismatch("literal", tag)),
        }
    }

    /// Inline wrapping a child chain: `Emph` or `Strong`.
    pub fn wrap(tag: InlineTag, contents: InlineChain) -> Result<Self> {
        match tag {
            InlineTag::Emph => Ok(Self::Emph(contents)),
            InlineTag::Strong => Ok(Self::Strong(contents)),
            _ => Err(mismatch("wrap", tag)),
        }
    }

    /// Inline with no payload: `SoftBreak` or `LineBreak`.
    pub fn simple(tag: InlineTag) -> Result<Self> {
        match tag {
            InlineTag::SoftBreak => Ok(Self::SoftBreak),
            InlineTag::LineBreak => Ok(Self::LineBreak),
            _ => Err(mismatch("simple", tag)),
        }
    }

    /// Link taking ownership of its label chain, destination and title.
    pub fn link(label: InlineChain, url: Vec<u8>, title: Option<Vec<u8>>) -> Self {
        Self::Link(Linkable { label, url, title })
    }

    /// Image taking ownership of its description chain, destination and title.
    pub fn image(label: InlineChain, url: Vec<u8>, title: Option<Vec<u8>>) -> Self {
        Self::Image(Linkable { label, url, title })
    }

    /// Autolink `<url>` or `<email>`.
    ///
    /// `url` is resolved against `source` and cleaned into an owned
    /// destination (see [`clean_autolink`]). The destination is never
    /// missing; malformed input is kept as-is.
    pub fn autolink(label: InlineChain, source: &[u8], url: Chunk, is_email: bool) -> Result<Self> {
        let url = clean_autolink(source, url, is_email)?;
        Ok(Self::link(label, url, None))
    }

    #[inline]
    pub fn text(chunk: Chunk) -> Self {
        Self::Text(chunk)
    }

    #[inline]
    pub fn code(chunk: Chunk) -> Self {
        Self::Code(chunk)
    }

    #[inline]
    pub fn raw_html(chunk: Chunk) -> Self {
        Self::RawHtml(chunk)
    }

    #[inline]
    pub fn softbreak() -> Self {
        Self::SoftBreak
    }

    #[inline]
    pub fn linebreak() -> Self {
        Self::LineBreak
    }

    #[inline]
    pub fn emph(contents: InlineChain) -> Self {
        Self::Emph(contents)
    }

    #[inline]
    pub fn strong(contents: InlineChain) -> Self {
        Self::Strong(contents)
    }

    /// Literal payload, if this is a text, code or raw HTML node.
    pub fn chunk(&self) -> Option<Chunk> {
        match self {
            Self::Text(c) | Self::Code(c) | Self::RawHtml(c) => Some(*c),
            _ => None,
        }
    }

    /// Nested chain: the wrapped contents of emphasis, or a link label.
    pub fn children(&self) -> Option<&InlineChain> {
        match self {
            Self::Emph(c) | Self::Strong(c) => Some(c),
            Self::Link(l) | Self::Image(l) => Some(&l.label),
            _ => None,
        }
    }

    pub fn linkable(&self) -> Option<&Linkable> {
        match self {
            Self::Link(l) | Self::Image(l) => Some(l),
            _ => None,
        }
    }
}

fn mismatch(constructor: &'static str, tag: InlineTag) -> ModelError {
    ModelError::TagMismatch {
        constructor,
        tag: tag.name(),
    }
}
