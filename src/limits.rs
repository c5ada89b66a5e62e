//! Size constants for the document model.
//!
//! These bound what the tree will accept so a pathological scanner
//! cannot grow it without limit.

/// Number of hash buckets in a reference table (power of two).
pub const REFMAP_SIZE: usize = 16;

/// Maximum length in bytes of a link label, measured before normalization.
pub const MAX_LINK_LABEL_LENGTH: usize = 1000;

/// Default maximum nesting depth for open blocks below the document.
pub const MAX_BLOCK_NESTING: usize = 32;

/// Maximum heading level for ATX and setext headings.
pub const MAX_HEADING_LEVEL: u8 = 6;
