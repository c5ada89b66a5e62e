//! Error types for tree construction and reference tables.

use crate::block::{BlockTag, NodeId};
use thiserror::Error;

/// Errors reported by the document model.
///
/// `Alloc` is a resource condition and must be propagated. Every other
/// variant means the caller broke a construction contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A fallible reservation could not obtain memory.
    #[error("allocation failed")]
    Alloc,

    /// Link label is empty after normalization or longer than the limit.
    #[error("invalid link label ({len} bytes)")]
    InvalidLabel {
        /// Length of the raw label in bytes.
        len: usize,
    },

    /// Node id does not belong to this document.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// Only the current open block may be closed.
    #[error("block {block:?} is not the current open block {current:?}")]
    NotCurrent {
        /// Block the caller tried to close.
        block: NodeId,
        /// Innermost open block.
        current: NodeId,
    },

    /// Block is already closed.
    #[error("block {0:?} is already closed")]
    AlreadyClosed(NodeId),

    /// Parent tag cannot hold a child of the given tag.
    #[error("{parent:?} cannot contain {child:?}")]
    CannotContain {
        /// Tag of the would-be parent.
        parent: BlockTag,
        /// Tag of the rejected child.
        child: BlockTag,
    },

    /// Inline content may only be attached to paragraphs and headings.
    #[error("{0:?} does not hold inline content")]
    NoInlines(BlockTag),

    /// Operation needs a leaf block.
    #[error("{0:?} is not a leaf block")]
    NotALeaf(BlockTag),

    /// Operation needs a list block.
    #[error("{0:?} is not a list")]
    NotAList(BlockTag),

    /// The document root is closed by finishing the parse.
    #[error("the document root can only be closed by finishing the parse")]
    CloseRoot,

    /// Heading level outside 1..=6.
    #[error("invalid heading level {0}")]
    InvalidHeadingLevel(u8),

    /// Block does not accept raw text lines.
    #[error("{0:?} does not accept text")]
    NoText(BlockTag),

    /// Chunk does not lie within the source it was applied to.
    #[error("chunk {start}..{end} is outside a source of {len} bytes")]
    ChunkOutOfRange {
        /// Chunk start offset.
        start: u32,
        /// Chunk end offset.
        end: u32,
        /// Length of the source.
        len: usize,
    },

    /// Open block chain exceeds the configured depth.
    #[error("block nesting exceeds {max}")]
    NestingTooDeep {
        /// Configured maximum depth.
        max: usize,
    },

    /// Constructor called with a tag outside its family.
    #[error("constructor `{constructor}` cannot build {tag}")]
    TagMismatch {
        /// Constructor that was called.
        constructor: &'static str,
        /// Name of the rejected tag.
        tag: &'static str,
    },
}

impl From<std::collections::TryReserveError> for ModelError {
    fn from(_: std::collections::TryReserveError) -> Self {
        Self::Alloc
    }
}

impl From<smallvec::CollectionAllocErr> for ModelError {
    fn from(_: smallvec::CollectionAllocErr) -> Self {
        Self::Alloc
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ModelError>;
