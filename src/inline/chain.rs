//! Ordered sibling chains of inline nodes.

use super::node::Inline;
use crate::error::Result;

/// An owned run of sibling inlines, in document order.
///
/// The chain exclusively owns its nodes; dropping it drops every node and
/// every nested chain reachable through them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineChain {
    nodes: Vec<Inline>,
}

impl InlineChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, reporting allocation failure instead of aborting.
    /// The chain is unchanged when this fails.
    pub fn try_push(&mut self, node: Inline) -> Result<()> {
        self.nodes.try_reserve(1)?;
        self.nodes.push(node);
        Ok(())
    }

    /// Append a node.
    pub fn push(&mut self, node: Inline) {
        self.nodes.push(node);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<&Inline> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&Inline> {
        self.nodes.last()
    }

    pub fn get(&self, index: usize) -> Option<&Inline> {
        self.nodes.get(index)
    }

    /// Sibling following the node at `index`.
    pub fn next_of(&self, index: usize) -> Option<&Inline> {
        self.nodes.get(index.checked_add(1)?)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Inline> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[Inline] {
        &self.nodes
    }

    /// Total number of nodes including those in nested chains.
    pub fn count_nodes(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_, _| n += 1);
        n
    }

    /// Visit every node depth-first in document order. `depth` is 0 for
    /// nodes of this chain, 1 for their children, and so on.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&Inline, usize),
    {
        self.walk_at(0, f);
    }

    fn walk_at<F>(&self, depth: usize, f: &mut F)
    where
        F: FnMut(&Inline, usize),
    {
        for node in &self.nodes {
            f(node, depth);
            if let Some(children) = node.children() {
                children.walk_at(depth + 1, f);
            }
        }
    }
}

impl From<Vec<Inline>> for InlineChain {
    fn from(nodes: Vec<Inline>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<Inline> for InlineChain {
    fn from_iter<I: IntoIterator<Item = Inline>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for InlineChain {
    type Item = Inline;
    type IntoIter = std::vec::IntoIter<Inline>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a InlineChain {
    type Item = &'a Inline;
    type IntoIter = std::slice::Iter<'a, Inline>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
