//! Block node variants and per-node state.

use super::tree::NodeId;
use crate::inline::InlineChain;
use crate::refmap::ReferenceMap;

/// List marker family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListType {
    /// `-`, `+` or `*` markers.
    #[default]
    Bullet,
    /// `1.` or `1)` markers.
    Ordered,
}

/// Delimiter after an ordered list number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// `1.`
    #[default]
    Period,
    /// `1)`
    Parens,
}

/// Metadata shared by lists and list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListData {
    pub list_type: ListType,
    /// Column of the list marker.
    pub marker_offset: u32,
    /// Width of marker plus following spaces.
    pub padding: u32,
    /// First number of an ordered list.
    pub start: u32,
    pub delimiter: Delimiter,
    /// Marker byte of a bullet list.
    pub bullet_char: u8,
    /// Set when the list is closed.
    pub tight: bool,
}

impl ListData {
    pub fn bullet(bullet_char: u8, marker_offset: u32, padding: u32) -> Self {
        Self {
            list_type: ListType::Bullet,
            marker_offset,
            padding,
            bullet_char,
            ..Self::default()
        }
    }

    pub fn ordered(start: u32, delimiter: Delimiter, marker_offset: u32, padding: u32) -> Self {
        Self {
            list_type: ListType::Ordered,
            marker_offset,
            padding,
            start,
            delimiter,
            ..Self::default()
        }
    }

    /// Whether an item with marker `other` continues a list with this marker.
    pub fn matches(&self, other: &ListData) -> bool {
        self.list_type == other.list_type
            && self.delimiter == other.delimiter
            && self.bullet_char == other.bullet_char
    }
}

/// Opening fence of a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FencedCodeData {
    pub fence_length: u32,
    pub fence_offset: u32,
    /// `` ` `` or `~`.
    pub fence_char: u8,
    /// Info string following the fence.
    pub info: Vec<u8>,
}

/// Discriminant of a [`BlockValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Document,
    BlockQuote,
    List,
    ListItem,
    FencedCode,
    IndentedCode,
    Html,
    Paragraph,
    AtxHeading,
    SetextHeading,
    ThematicBreak,
    ReferenceDef,
}

impl BlockTag {
    /// Lowercase name used by [`Document::dump`](super::Document::dump).
    pub fn name(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::BlockQuote => "block_quote",
            Self::List => "list",
            Self::ListItem => "list_item",
            Self::FencedCode => "fenced_code",
            Self::IndentedCode => "indented_code",
            Self::Html => "html",
            Self::Paragraph => "paragraph",
            Self::AtxHeading => "atx_heading",
            Self::SetextHeading => "setext_heading",
            Self::ThematicBreak => "thematic_break",
            Self::ReferenceDef => "reference_def",
        }
    }

    /// Containers may have child blocks; everything else is a leaf.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Document | Self::BlockQuote | Self::List | Self::ListItem)
    }

    /// Whether a block of this tag may directly hold a `child` block.
    pub fn can_contain(self, child: BlockTag) -> bool {
        match self {
            Self::Document | Self::BlockQuote | Self::ListItem => child != Self::Document,
            Self::List => child == Self::ListItem,
            _ => false,
        }
    }

    /// Blocks that keep accumulating lines while open.
    pub fn accepts_lines(self) -> bool {
        matches!(
            self,
            Self::Paragraph | Self::IndentedCode | Self::FencedCode | Self::Html
        )
    }

    /// Blocks that carry raw text content at all.
    pub fn holds_text(self) -> bool {
        self.accepts_lines()
            || matches!(self, Self::AtxHeading | Self::SetextHeading | Self::ReferenceDef)
    }

    /// Blocks whose text is parsed into inline content.
    pub fn holds_inlines(self) -> bool {
        matches!(self, Self::Paragraph | Self::AtxHeading | Self::SetextHeading)
    }

    /// Blocks that start a new list/quote chain for `top`.
    pub fn starts_chain(self) -> bool {
        matches!(self, Self::Document | Self::BlockQuote | Self::List)
    }
}

/// Tag plus tag-specific payload of a block.
#[derive(Debug, Clone)]
pub enum BlockValue {
    /// Root of the tree; owns the document's reference table.
    Document(Box<ReferenceMap>),
    BlockQuote,
    List(ListData),
    ListItem(ListData),
    FencedCode(FencedCodeData),
    IndentedCode,
    /// Raw HTML block.
    Html,
    Paragraph,
    AtxHeading {
        level: u8,
    },
    SetextHeading {
        level: u8,
    },
    ThematicBreak,
    ReferenceDef,
}

impl BlockValue {
    pub fn tag(&self) -> BlockTag {
        match self {
            Self::Document(_) => BlockTag::Document,
            Self::BlockQuote => BlockTag::BlockQuote,
            Self::List(_) => BlockTag::List,
            Self::ListItem(_) => BlockTag::ListItem,
            Self::FencedCode(_) => BlockTag::FencedCode,
            Self::IndentedCode => BlockTag::IndentedCode,
            Self::Html => BlockTag::Html,
            Self::Paragraph => BlockTag::Paragraph,
            Self::AtxHeading { .. } => BlockTag::AtxHeading,
            Self::SetextHeading { .. } => BlockTag::SetextHeading,
            Self::ThematicBreak => BlockTag::ThematicBreak,
            Self::ReferenceDef => BlockTag::ReferenceDef,
        }
    }
}

/// One node of the block tree.
///
/// Structural links are read-only from outside the crate; the tree is
/// grown through [`DocParser`](super::DocParser) so the sibling and
/// parent links stay consistent.
#[derive(Debug, Clone)]
pub struct Block {
    pub(crate) value: BlockValue,
    pub(crate) start_line: u32,
    pub(crate) start_column: u32,
    pub(crate) end_line: u32,
    pub(crate) open: bool,
    pub(crate) last_line_blank: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) top: NodeId,
    pub(crate) string_content: Vec<u8>,
    pub(crate) inline_content: Option<InlineChain>,
}

impl Block {
    pub(crate) fn new(value: BlockValue, start_line: u32, start_column: u32, top: NodeId) -> Self {
        Self {
            value,
            start_line,
            start_column,
            end_line: start_line,
            open: true,
            last_line_blank: false,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
            top,
            string_content: Vec::new(),
            inline_content: None,
        }
    }

    #[inline]
    pub fn tag(&self) -> BlockTag {
        self.value.tag()
    }

    pub fn value(&self) -> &BlockValue {
        &self.value
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    pub fn start_column(&self) -> u32 {
        self.start_column
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    /// Whether the block may still accept input.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn last_line_blank(&self) -> bool {
        self.last_line_blank
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Root of the tightest enclosing list or block quote chain.
    pub fn top(&self) -> NodeId {
        self.top
    }

    /// Raw accumulated text.
    pub fn string_content(&self) -> &[u8] {
        &self.string_content
    }

    pub fn inline_content(&self) -> Option<&InlineChain> {
        self.inline_content.as_ref()
    }

    pub fn list_data(&self) -> Option<&ListData> {
        match &self.value {
            BlockValue::List(data) | BlockValue::ListItem(data) => Some(data),
            _ => None,
        }
    }

    pub fn fenced_code(&self) -> Option<&FencedCodeData> {
        match &self.value {
            BlockValue::FencedCode(data) => Some(data),
            _ => None,
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self.value {
            BlockValue::AtxHeading { level } | BlockValue::SetextHeading { level } => Some(level),
            _ => None,
        }
    }
}
