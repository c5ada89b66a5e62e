//! Inline content model.
//!
//! The inline scanner turns a block's raw text into an [`InlineChain`]
//! and attaches it to the block. Literal nodes hold [`Chunk`](crate::Chunk)s
//! into that text; links own their destination and title.

mod autolink;
mod chain;
mod node;

pub use autolink::clean_autolink;
pub use chain::InlineChain;
pub use node::{Inline, InlineTag, Linkable};
