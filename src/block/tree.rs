//! Arena-backed block tree.
//!
//! Every block of a document lives in one `Vec<Block>` owned by the
//! [`Document`]. Parent, sibling and `top` links are [`NodeId`] indices
//! into that arena, so they never own anything and dropping the document
//! is the single path that frees blocks, their text, their inline chains
//! and the reference table.

use std::fmt::Write as _;

use super::node::{Block, BlockTag, BlockValue, ListType};
use crate::Options;
use crate::error::{ModelError, Result};
use crate::inline::InlineChain;
use crate::limits::MAX_HEADING_LEVEL;
use crate::refmap::{Reference, ReferenceMap};

/// Index of a block inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The document root.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Result<Self> {
        u32::try_from(index).map(NodeId).map_err(|_| ModelError::Alloc)
    }
}

/// A block tree rooted at a `Document` block.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

impl Document {
    /// Empty document whose root is open at line 1, column 1.
    pub fn new(options: &Options) -> Self {
        let refmap = ReferenceMap::with_policy(options.label_normalization, options.duplicate_policy);
        let root = Block::new(BlockValue::Document(Box::new(refmap)), 1, 1, NodeId::ROOT);
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of blocks, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a document has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Block> {
        self.nodes.get(id.index())
    }

    /// Like [`Document::get`], but reports a foreign id as an error.
    pub fn block(&self, id: NodeId) -> Result<&Block> {
        self.get(id).ok_or(ModelError::UnknownNode(id))
    }

    fn block_mut(&mut self, id: NodeId) -> Result<&mut Block> {
        self.nodes.get_mut(id.index()).ok_or(ModelError::UnknownNode(id))
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Block {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev
    }

    pub fn top(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|b| b.top)
    }

    /// Whether the block may have children. False for unknown ids.
    pub fn is_container(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|b| b.tag().is_container())
    }

    /// Tight flag of a list, `None` if `id` is not a list.
    pub fn is_list_tight(&self, id: NodeId) -> Option<bool> {
        match self.get(id)?.value() {
            BlockValue::List(data) => Some(data.tight),
            _ => None,
        }
    }

    /// Direct children of `id`, first to last.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Parent, grandparent, ... up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// `id` and everything below it, in document (preorder) order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.get(id).map(|_| id),
        }
    }

    /// The document's reference table.
    pub fn refmap(&self) -> &ReferenceMap {
        match &self.node(NodeId::ROOT).value {
            BlockValue::Document(map) => map,
            _ => unreachable!("root block is always a document"),
        }
    }

    pub(crate) fn refmap_mut(&mut self) -> &mut ReferenceMap {
        match &mut self.nodes[NodeId::ROOT.index()].value {
            BlockValue::Document(map) => map,
            _ => unreachable!("root block is always a document"),
        }
    }

    /// Resolve a link label against the reference table.
    pub fn lookup(&self, label: &[u8]) -> Option<&Reference> {
        self.refmap().lookup(label)
    }

    /// Attach a finished inline chain to a paragraph or heading, dropping
    /// whatever chain it held before.
    pub fn attach_inlines(&mut self, id: NodeId, chain: InlineChain) -> Result<()> {
        let block = self.block_mut(id)?;
        let tag = block.tag();
        if !tag.holds_inlines() {
            return Err(ModelError::NoInlines(tag));
        }
        tracing::trace!(node = id.index(), inlines = chain.len(), "attach inlines");
        block.inline_content = Some(chain);
        Ok(())
    }

    /// Free the whole tree. Consuming `self` makes a second destroy
    /// impossible.
    pub fn destroy(self) {
        tracing::trace!(blocks = self.nodes.len(), "destroy document");
        drop(self);
    }

    pub(crate) fn append_child(
        &mut self,
        parent: NodeId,
        value: BlockValue,
        start_line: u32,
        start_column: u32,
    ) -> Result<NodeId> {
        let parent_block = self.block(parent)?;
        let parent_tag = parent_block.tag();
        let tag = value.tag();
        if !parent_block.open {
            return Err(ModelError::AlreadyClosed(parent));
        }
        if !parent_tag.can_contain(tag) {
            return Err(ModelError::CannotContain {
                parent: parent_tag,
                child: tag,
            });
        }
        check_heading_level(&value)?;

        let id = NodeId::from_index(self.nodes.len())?;
        let top = if tag.starts_chain() { id } else { parent_block.top };
        let prev = parent_block.last_child;

        self.nodes.try_reserve(1)?;
        let mut block = Block::new(value, start_line, start_column, top);
        block.parent = Some(parent);
        block.prev = prev;
        self.nodes.push(block);

        match prev {
            Some(prev) => self.nodes[prev.index()].next = Some(id),
            None => self.nodes[parent.index()].first_child = Some(id),
        }
        self.nodes[parent.index()].last_child = Some(id);
        Ok(id)
    }

    pub(crate) fn close_node(&mut self, id: NodeId, end_line: u32) -> Result<()> {
        let block = self.block_mut(id)?;
        if !block.open {
            return Err(ModelError::AlreadyClosed(id));
        }
        block.open = false;
        block.end_line = end_line.max(block.start_line);
        if block.tag() == BlockTag::List {
            self.finalize_tightness(id)?;
        }
        Ok(())
    }

    pub(crate) fn set_last_line_blank(&mut self, id: NodeId, blank: bool) -> Result<()> {
        self.block_mut(id)?.last_line_blank = blank;
        Ok(())
    }

    pub(crate) fn text_block_mut(&mut self, id: NodeId) -> Result<&mut Block> {
        let block = self.block_mut(id)?;
        let tag = block.tag();
        if !tag.holds_text() {
            return Err(ModelError::NoText(tag));
        }
        Ok(block)
    }

    pub(crate) fn replace_leaf(&mut self, id: NodeId, value: BlockValue) -> Result<()> {
        let block = self.block_mut(id)?;
        let from = block.tag();
        let to = value.tag();
        if from.is_container() {
            return Err(ModelError::NotALeaf(from));
        }
        if to.is_container() {
            return Err(ModelError::NotALeaf(to));
        }
        check_heading_level(&value)?;
        if !to.holds_inlines() {
            block.inline_content = None;
        }
        block.value = value;
        Ok(())
    }

    pub(crate) fn value_mut(&mut self, id: NodeId) -> Result<&mut BlockValue> {
        Ok(&mut self.block_mut(id)?.value)
    }

    /// Decide whether a list is tight and store the result in its
    /// [`ListData`](super::ListData).
    ///
    /// A list is loose when an item other than the last ends with a blank
    /// line, or when any block inside an item ends with a blank line and
    /// is followed by another block in that item or by another item.
    pub fn finalize_tightness(&mut self, list: NodeId) -> Result<bool> {
        let tag = self.block(list)?.tag();
        if tag != BlockTag::List {
            return Err(ModelError::NotAList(tag));
        }

        let mut tight = true;
        let mut item = self.node(list).first_child;
        'items: while let Some(item_id) = item {
            let item_block = self.node(item_id);
            if item_block.last_line_blank && item_block.next.is_some() {
                tight = false;
                break;
            }
            let mut sub = item_block.first_child;
            while let Some(sub_id) = sub {
                let sub_block = self.node(sub_id);
                if self.ends_with_blank_line(sub_id)
                    && (item_block.next.is_some() || sub_block.next.is_some())
                {
                    tight = false;
                    break 'items;
                }
                sub = sub_block.next;
            }
            item = item_block.next;
        }

        if let BlockValue::List(data) = &mut self.nodes[list.index()].value {
            data.tight = tight;
        }
        tracing::trace!(node = list.index(), tight, "list tightness");
        Ok(tight)
    }

    fn ends_with_blank_line(&self, mut id: NodeId) -> bool {
        loop {
            let block = self.node(id);
            if block.last_line_blank {
                return true;
            }
            match (block.tag(), block.last_child) {
                (BlockTag::List | BlockTag::ListItem, Some(last)) => id = last,
                _ => return false,
            }
        }
    }

    /// Check the structural invariants: consistent sibling and parent
    /// links, leaves without children, `top` pointing at self or an
    /// ancestor, open blocks forming a single chain from the root, and
    /// every block reachable from the root exactly once.
    pub fn is_well_formed(&self) -> bool {
        if self.node(NodeId::ROOT).parent.is_some() || self.node(NodeId::ROOT).tag() != BlockTag::Document {
            return false;
        }

        let mut reached = 0usize;
        for id in self.descendants(NodeId::ROOT) {
            reached += 1;
            let block = self.node(id);

            if block.first_child.is_some() != block.last_child.is_some() {
                return false;
            }
            if block.first_child.is_some() && !block.tag().is_container() {
                return false;
            }

            let top_ok = block.top == id || self.ancestors(id).any(|a| a == block.top);
            if !top_ok {
                return false;
            }

            if block.open && id != NodeId::ROOT {
                let Some(parent) = block.parent else {
                    return false;
                };
                let parent_block = self.node(parent);
                if !parent_block.open || parent_block.last_child != Some(id) {
                    return false;
                }
            }

            let mut prev = None;
            let mut child = block.first_child;
            while let Some(c) = child {
                let Some(child_block) = self.get(c) else {
                    return false;
                };
                if child_block.parent != Some(id) || child_block.prev != prev {
                    return false;
                }
                prev = Some(c);
                child = child_block.next;
            }
            if prev != block.last_child {
                return false;
            }
        }
        reached == self.nodes.len()
    }

    /// Indented listing of the tree, one block per line. Meant for tests
    /// and debugging.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(NodeId::ROOT, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let block = self.node(id);
        let _ = write!(out, "{:indent$}{}", "", block.tag().name(), indent = depth * 2);
        match &block.value {
            BlockValue::List(data) => {
                let kind = match data.list_type {
                    ListType::Bullet => "bullet",
                    ListType::Ordered => "ordered",
                };
                let spacing = if data.tight { "tight" } else { "loose" };
                let _ = write!(out, " ({kind}, {spacing})");
            }
            BlockValue::AtxHeading { level } | BlockValue::SetextHeading { level } => {
                let _ = write!(out, " (level {level})");
            }
            BlockValue::FencedCode(code) if !code.info.is_empty() => {
                let _ = write!(out, " ({})", String::from_utf8_lossy(&code.info));
            }
            _ => {}
        }
        let _ = write!(
            out,
            " [{}:{}-{}]",
            block.start_line, block.start_column, block.end_line
        );
        if block.open {
            out.push_str(" open");
        }
        if let Some(inlines) = &block.inline_content {
            let _ = write!(out, " inlines={}", inlines.count_nodes());
        }
        if !block.string_content.is_empty() {
            let _ = write!(out, " {:?}", String::from_utf8_lossy(&block.string_content));
        }
        out.push('\n');

        for child in self.children(id) {
            self.dump_node(child, depth + 1, out);
        }
    }
}

fn check_heading_level(value: &BlockValue) -> Result<()> {
    match *value {
        BlockValue::AtxHeading { level } | BlockValue::SetextHeading { level }
            if !(1..=MAX_HEADING_LEVEL).contains(&level) =>
        {
            Err(ModelError::InvalidHeadingLevel(level))
        }
        _ => Ok(()),
    }
}

/// Iterator over the children of a block.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.next_sibling(id);
        Some(id)
    }
}

/// Iterator from a block's parent up to the root.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.parent(id);
        Some(id)
    }
}

/// Preorder iterator over a subtree.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.first_child(id).or_else(|| {
            let mut cur = id;
            loop {
                if cur == self.root {
                    return None;
                }
                if let Some(sibling) = self.doc.next_sibling(cur) {
                    return Some(sibling);
                }
                cur = self.doc.parent(cur)?;
            }
        });
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{FencedCodeData, ListData};

    fn doc() -> Document {
        Document::default()
    }

    #[test]
    fn test_new_document() {
        let d = doc();
        assert_eq!(d.len(), 1);
        let root = d.block(d.root()).unwrap();
        assert_eq!(root.tag(), BlockTag::Document);
        assert_eq!(root.top(), NodeId::ROOT);
        assert!(root.is_open());
        assert!(d.refmap().is_empty());
        assert!(d.is_well_formed());
    }

    #[test]
    fn test_append_links_siblings() {
        let mut d = doc();
        let a = d.append_child(NodeId::ROOT, BlockValue::Paragraph, 1, 1).unwrap();
        d.close_node(a, 1).unwrap();
        let b = d.append_child(NodeId::ROOT, BlockValue::ThematicBreak, 2, 1).unwrap();
        d.close_node(b, 2).unwrap();
        let c = d.append_child(NodeId::ROOT, BlockValue::Paragraph, 3, 1).unwrap();

        assert_eq!(d.first_child(NodeId::ROOT), Some(a));
        assert_eq!(d.last_child(NodeId::ROOT), Some(c));
        assert_eq!(d.next_sibling(a), Some(b));
        assert_eq!(d.prev_sibling(c), Some(b));
        assert_eq!(d.prev_sibling(a), None);
        assert_eq!(d.next_sibling(c), None);
        assert_eq!(d.children(NodeId::ROOT).collect::<Vec<_>>(), vec![a, b, c]);
        assert!(d.is_well_formed());
    }

    #[test]
    fn test_top_follows_chains() {
        let mut d = doc();
        let quote = d.append_child(NodeId::ROOT, BlockValue::BlockQuote, 1, 1).unwrap();
        let list = d
            .append_child(quote, BlockValue::List(ListData::bullet(b'-', 2, 2)), 1, 3)
            .unwrap();
        let item = d
            .append_child(list, BlockValue::ListItem(ListData::bullet(b'-', 2, 2)), 1, 3)
            .unwrap();
        let para = d.append_child(item, BlockValue::Paragraph, 1, 5).unwrap();

        assert_eq!(d.top(quote), Some(quote));
        assert_eq!(d.top(list), Some(list));
        assert_eq!(d.top(item), Some(list));
        assert_eq!(d.top(para), Some(list));
        assert_eq!(d.ancestors(para).collect::<Vec<_>>(), vec![item, list, quote, NodeId::ROOT]);
        assert!(d.is_well_formed());
    }

    #[test]
    fn test_rejects_bad_children() {
        let mut d = doc();
        let list = d
            .append_child(NodeId::ROOT, BlockValue::List(ListData::default()), 1, 1)
            .unwrap();
        assert_eq!(
            d.append_child(list, BlockValue::Paragraph, 1, 1),
            Err(ModelError::CannotContain {
                parent: BlockTag::List,
                child: BlockTag::Paragraph
            })
        );
        let para_parent = d
            .append_child(list, BlockValue::ListItem(ListData::default()), 1, 1)
            .unwrap();
        let para = d.append_child(para_parent, BlockValue::Paragraph, 1, 3).unwrap();
        assert!(d.append_child(para, BlockValue::Paragraph, 2, 1).is_err());
        assert_eq!(
            d.append_child(para_parent, BlockValue::AtxHeading { level: 7 }, 2, 1),
            Err(ModelError::InvalidHeadingLevel(7))
        );
        assert!(d.append_child(NodeId(99), BlockValue::Paragraph, 1, 1).is_err());
    }

    #[test]
    fn test_descendants_preorder() {
        let mut d = doc();
        let quote = d.append_child(NodeId::ROOT, BlockValue::BlockQuote, 1, 1).unwrap();
        let p1 = d.append_child(quote, BlockValue::Paragraph, 1, 3).unwrap();
        d.close_node(p1, 1).unwrap();
        d.close_node(quote, 1).unwrap();
        let p2 = d.append_child(NodeId::ROOT, BlockValue::Paragraph, 3, 1).unwrap();

        let all: Vec<_> = d.descendants(NodeId::ROOT).collect();
        assert_eq!(all, vec![NodeId::ROOT, quote, p1, p2]);
        let sub: Vec<_> = d.descendants(quote).collect();
        assert_eq!(sub, vec![quote, p1]);
    }

    #[test]
    fn test_replace_leaf() {
        let mut d = doc();
        let p = d.append_child(NodeId::ROOT, BlockValue::Paragraph, 1, 1).unwrap();
        d.replace_leaf(p, BlockValue::SetextHeading { level: 1 }).unwrap();
        assert_eq!(d.block(p).unwrap().heading_level(), Some(1));
        assert_eq!(
            d.replace_leaf(p, BlockValue::BlockQuote),
            Err(ModelError::NotALeaf(BlockTag::BlockQuote))
        );
        assert_eq!(
            d.replace_leaf(NodeId::ROOT, BlockValue::Paragraph),
            Err(ModelError::NotALeaf(BlockTag::Document))
        );
    }

    #[test]
    fn test_dump() {
        let mut d = doc();
        let code = d
            .append_child(
                NodeId::ROOT,
                BlockValue::FencedCode(FencedCodeData {
                    fence_length: 3,
                    fence_offset: 0,
                    fence_char: b'`',
                    info: b"rust".to_vec(),
                }),
                1,
                1,
            )
            .unwrap();
        d.text_block_mut(code).unwrap().string_content.extend_from_slice(b"fn main() {}\n");
        d.close_node(code, 3).unwrap();
        let expected = "document [1:1-1] open\n  fenced_code (rust) [1:1-3] \"fn main() {}\\n\"\n";
        assert_eq!(d.dump(), expected);
    }
}
