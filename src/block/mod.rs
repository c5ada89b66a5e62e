//! Block-level document tree.
//!
//! The block scanner drives a [`DocParser`] line by line: it opens blocks
//! under the current one, appends their raw text, and closes them when a
//! line no longer continues them. [`DocParser::finish`] yields the
//! [`Document`], after which inline content is attached to paragraphs and
//! headings.

mod node;
mod parser;
mod tree;

pub use node::{Block, BlockTag, BlockValue, Delimiter, FencedCodeData, ListData, ListType};
pub use parser::DocParser;
pub use tree::{Ancestors, Children, Descendants, Document, NodeId};
