//! marktree: document model for a two-phase CommonMark parser
//!
//! This crate holds the shapes a block scanner, an inline scanner and a
//! renderer agree on. It does no scanning and produces no output itself.
//!
//! # Layout
//! - [`block`]: the block tree (`Document`) and the construction cursor
//!   (`DocParser`) the block scanner drives.
//! - [`inline`]: inline nodes chained per paragraph or heading.
//! - [`refmap`]: link reference definitions keyed by normalized label.
//! - [`Chunk`]: non-owning byte ranges used by literal inlines.
//!
//! # Example
//! ```
//! use marktree::{BlockValue, Chunk, DocParser, Inline, InlineChain};
//!
//! let mut parser = DocParser::new();
//! parser.feed_line(b"Hello World\n").unwrap();
//! let para = parser.open_block(BlockValue::Paragraph, 1).unwrap();
//! parser.add_line(0).unwrap();
//! let mut doc = parser.finish();
//!
//! let mut chain = InlineChain::new();
//! chain.push(Inline::text(Chunk::new(0, 5)));
//! chain.push(Inline::text(Chunk::new(6, 11)));
//! doc.attach_inlines(para, chain).unwrap();
//!
//! let text = doc.block(para).unwrap().string_content();
//! let first = doc.block(para).unwrap().inline_content().unwrap().first().unwrap();
//! assert_eq!(first.chunk().unwrap().slice(text), b"Hello");
//! ```

pub mod block;
pub mod chunk;
pub mod error;
pub mod inline;
pub mod limits;
pub mod refmap;

// Re-export primary types
pub use block::{Block, BlockTag, BlockValue, DocParser, Document, NodeId};
pub use chunk::Chunk;
pub use error::{ModelError, Result};
pub use inline::{Inline, InlineChain, InlineTag};
pub use refmap::{DuplicatePolicy, LabelNormalization, Reference, ReferenceMap};

/// Construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of open blocks below the document root.
    pub max_block_nesting: usize,
    /// How reference labels are normalized.
    pub label_normalization: LabelNormalization,
    /// Which of several definitions of one label is kept.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_block_nesting: limits::MAX_BLOCK_NESTING,
            label_normalization: LabelNormalization::default(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}
