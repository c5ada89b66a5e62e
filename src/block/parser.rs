//! Construction state driven by the block scanner.

use memchr::memchr;

use super::node::BlockValue;
use super::tree::{Document, NodeId};
use crate::Options;
use crate::error::{ModelError, Result};
use crate::inline::InlineChain;

/// Mutable cursor over a document under construction.
///
/// The scanner feeds lines, opens and closes blocks, and appends raw text
/// to whatever block is current. Exactly the blocks on the path from the
/// root to [`DocParser::current`] are open at any time.
#[derive(Debug)]
pub struct DocParser {
    doc: Document,
    /// Innermost open block.
    current: NodeId,
    /// Open blocks below the root.
    depth: usize,
    max_nesting: usize,
    line_number: u32,
    curline: Vec<u8>,
}

impl Default for DocParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocParser {
    pub fn new() -> Self {
        Self::with_options(&Options::default())
    }

    pub fn with_options(options: &Options) -> Self {
        Self {
            doc: Document::new(options),
            current: NodeId::ROOT,
            depth: 0,
            max_nesting: options.max_block_nesting,
            line_number: 0,
            curline: Vec::with_capacity(256),
        }
    }

    /// Innermost open block.
    #[inline]
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// 1-based number of the line last passed to [`DocParser::feed_line`];
    /// 0 before the first line.
    #[inline]
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// The line last passed to [`DocParser::feed_line`], without its line
    /// ending.
    pub fn current_line(&self) -> &[u8] {
        &self.curline
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Start the next input line.
    ///
    /// Takes the bytes up to the first `\n` of `input` (dropping a trailing
    /// `\r`) as the current line and returns how many bytes of `input` were
    /// consumed, newline included.
    pub fn feed_line(&mut self, input: &[u8]) -> Result<usize> {
        let (line, consumed) = match memchr(b'\n', input) {
            Some(nl) => (&input[..nl], nl + 1),
            None => (input, input.len()),
        };
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        self.curline.clear();
        self.curline.try_reserve(line.len())?;
        self.curline.extend_from_slice(line);
        self.line_number += 1;
        Ok(consumed)
    }

    /// Open a new block as the last child of the current block and make
    /// it current.
    pub fn open_block(&mut self, value: BlockValue, start_column: u32) -> Result<NodeId> {
        if self.depth >= self.max_nesting {
            return Err(ModelError::NestingTooDeep {
                max: self.max_nesting,
            });
        }
        let tag = value.tag();
        let line = self.line_number.max(1);
        let id = self.doc.append_child(self.current, value, line, start_column)?;
        tracing::trace!(node = id.index(), tag = tag.name(), line, "open block");
        self.current = id;
        self.depth += 1;
        Ok(id)
    }

    /// Close the current block at the current line and move to its parent.
    ///
    /// Only the current block can be closed; close its open descendants
    /// first. Closing a list also settles its tight flag.
    pub fn close(&mut self, id: NodeId) -> Result<()> {
        if id == NodeId::ROOT {
            return Err(ModelError::CloseRoot);
        }
        if !self.doc.block(id)?.is_open() {
            return Err(ModelError::AlreadyClosed(id));
        }
        if id != self.current {
            return Err(ModelError::NotCurrent {
                block: id,
                current: self.current,
            });
        }

        self.doc.close_node(id, self.line_number)?;
        self.current = self.doc.parent(id).unwrap_or(NodeId::ROOT);
        self.depth -= 1;
        tracing::trace!(node = id.index(), line = self.line_number, "close block");
        Ok(())
    }

    /// Close the current block.
    pub fn close_current(&mut self) -> Result<()> {
        self.close(self.current)
    }

    /// Close open blocks until `ancestor` is current. `ancestor` itself
    /// stays open.
    pub fn close_until(&mut self, ancestor: NodeId) -> Result<()> {
        let on_path = ancestor == self.current || self.doc.ancestors(self.current).any(|a| a == ancestor);
        if !on_path || !self.doc.block(ancestor)?.is_open() {
            return Err(ModelError::NotCurrent {
                block: ancestor,
                current: self.current,
            });
        }
        while self.current != ancestor {
            self.close_current()?;
        }
        Ok(())
    }

    /// Recompute the tight flag of a list.
    pub fn finalize_tightness(&mut self, list: NodeId) -> Result<bool> {
        self.doc.finalize_tightness(list)
    }

    /// Record whether the last line seen by `id` was blank.
    pub fn set_last_line_blank(&mut self, id: NodeId, blank: bool) -> Result<()> {
        self.doc.set_last_line_blank(id, blank)
    }

    /// Append raw bytes to the current block's text.
    pub fn append_text(&mut self, text: &[u8]) -> Result<()> {
        let block = self.doc.text_block_mut(self.current)?;
        block.string_content.try_reserve(text.len())?;
        block.string_content.extend_from_slice(text);
        Ok(())
    }

    /// Append the current line from byte `offset` on, plus a newline, to
    /// the current block.
    pub fn add_line(&mut self, offset: usize) -> Result<()> {
        let block = self.doc.text_block_mut(self.current)?;
        let rest = self.curline.get(offset..).unwrap_or_default();
        block.string_content.try_reserve(rest.len() + 1)?;
        block.string_content.extend_from_slice(rest);
        block.string_content.push(b'\n');
        Ok(())
    }

    /// Replace the raw text of `id`.
    pub fn set_text(&mut self, id: NodeId, text: &[u8]) -> Result<()> {
        let block = self.doc.text_block_mut(id)?;
        let mut content = Vec::new();
        content.try_reserve_exact(text.len())?;
        content.extend_from_slice(text);
        block.string_content = content;
        Ok(())
    }

    /// Turn a leaf into another kind of leaf, e.g. a paragraph into a
    /// setext heading once its underline is seen.
    pub fn convert_leaf(&mut self, id: NodeId, value: BlockValue) -> Result<()> {
        self.doc.replace_leaf(id, value)
    }

    /// Append to the info string of a fenced code block.
    pub fn append_fence_info(&mut self, id: NodeId, info: &[u8]) -> Result<()> {
        match self.doc.value_mut(id)? {
            BlockValue::FencedCode(code) => {
                code.info.try_reserve(info.len())?;
                code.info.extend_from_slice(info);
                Ok(())
            }
            other => Err(ModelError::NoText(other.tag())),
        }
    }

    /// See [`Document::attach_inlines`].
    pub fn attach_inlines(&mut self, id: NodeId, chain: InlineChain) -> Result<()> {
        self.doc.attach_inlines(id, chain)
    }

    /// Record a link reference definition in the document's table.
    /// Returns whether the table changed.
    pub fn add_reference(&mut self, label: &[u8], url: Vec<u8>, title: Option<Vec<u8>>) -> Result<bool> {
        self.doc.refmap_mut().insert(label, url, title)
    }

    /// Close every open block, the root last, and hand over the document.
    pub fn finish(mut self) -> Document {
        // The open chain always runs from the root to `current`, so none of
        // these closes can fail.
        while self.current != NodeId::ROOT {
            let closed = self.close_current();
            debug_assert!(closed.is_ok(), "closing an open block failed: {closed:?}");
            if closed.is_err() {
                break;
            }
        }
        let closed = self.doc.close_node(NodeId::ROOT, self.line_number);
        debug_assert!(closed.is_ok(), "closing the document root failed: {closed:?}");
        tracing::debug!(
            blocks = self.doc.len(),
            lines = self.line_number,
            references = self.doc.refmap().len(),
            "document finished"
        );
        self.doc
    }
}
