//! Utilities to traverse the KDTree structure.

use std::fmt;

use crate::kdtree::index::Entry;
use crate::r#type::IndexablePoint;

/// A node in the KDTree.
///
/// Every node holds exactly one point, the median of its subtree along [`axis`][Node::axis].
pub struct Node<'t, 'a, P: IndexablePoint, T> {
    /// The kd-sorted entries of the whole tree
    entries: &'t [Entry<'a, P, T>],

    /// Half-open range of `entries` covered by this subtree
    start: usize,
    end: usize,

    depth: usize,
}

impl<'t, 'a, P: IndexablePoint, T> Node<'t, 'a, P, T> {
    pub(crate) fn from_root(entries: &'t [Entry<'a, P, T>]) -> Option<Self> {
        Self::new(entries, 0, entries.len(), 0)
    }

    #[inline]
    fn new(entries: &'t [Entry<'a, P, T>], start: usize, end: usize, depth: usize) -> Option<Self> {
        if start < end {
            Some(Self {
                entries,
                start,
                end,
                depth,
            })
        } else {
            None
        }
    }

    /// Note: this is the index into the kd-sorted entries, not the insertion index.
    #[inline]
    pub(crate) fn middle_index(&self) -> usize {
        self.start + (self.end - self.start) / 2
    }

    #[inline]
    pub(crate) fn entry(&self) -> &'t Entry<'a, P, T> {
        &self.entries[self.middle_index()]
    }

    /// The point stored at this node.
    #[inline]
    pub fn point(&self) -> &'a P {
        self.entry().point
    }

    /// The payload of the point stored at this node.
    #[inline]
    pub fn data(&self) -> &'a T {
        self.entry().data
    }

    /// The axis this node splits its children on.
    #[inline]
    pub fn axis(&self) -> usize {
        self.depth % P::DIMENSIONS
    }

    /// Distance from the root, which has depth 0.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The number of points in this subtree, including this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// The child holding points not greater than this node's point along [`axis`][Node::axis].
    pub fn left_child(&self) -> Option<Self> {
        Self::new(self.entries, self.start, self.middle_index(), self.depth + 1)
    }

    /// The child holding points not smaller than this node's point along [`axis`][Node::axis].
    pub fn right_child(&self) -> Option<Self> {
        Self::new(
            self.entries,
            self.middle_index() + 1,
            self.end,
            self.depth + 1,
        )
    }

    /// Returns `true` if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.len() == 1
    }

    /// The points of this subtree, in kd-sorted order.
    pub fn points(&self) -> impl Iterator<Item = &'a P> + 't {
        self.entries[self.start..self.end].iter().map(|e| e.point)
    }
}

impl<P: IndexablePoint, T> Clone for Node<'_, '_, P, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: IndexablePoint, T> Copy for Node<'_, '_, P, T> {}

impl<P: IndexablePoint + fmt::Debug, T: fmt::Debug> fmt::Debug for Node<'_, '_, P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("entry", self.entry())
            .field("axis", &self.axis())
            .field("depth", &self.depth)
            .field("len", &self.len())
            .finish()
    }
}
