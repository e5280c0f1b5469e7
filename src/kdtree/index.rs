use std::fmt;

use log::trace;

use crate::r#type::IndexablePoint;

/// A point registered in a [`KDTree`], together with its payload.
///
/// Both are borrowed: the tree never copies or owns caller data.
pub struct Entry<'a, P, T> {
    pub(crate) point: &'a P,
    pub(crate) data: &'a T,
}

impl<'a, P, T> Entry<'a, P, T> {
    /// The indexed point.
    #[inline]
    pub fn point(&self) -> &'a P {
        self.point
    }

    /// The payload associated with the point.
    #[inline]
    pub fn data(&self) -> &'a T {
        self.data
    }
}

// Derives would require `P: Clone` and `T: Clone`, but only references are copied.
impl<P, T> Clone for Entry<'_, P, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, T> Copy for Entry<'_, P, T> {}

impl<P: fmt::Debug, T: fmt::Debug> fmt::Debug for Entry<'_, P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("point", self.point)
            .field("data", self.data)
            .finish()
    }
}

/// A static k-d tree over borrowed points.
///
/// Points are registered with [`add`][KDTree::add] and become searchable once
/// [`build`][KDTree::build] has been called. Queries live on the
/// [`KDTreeIndex`][crate::kdtree::KDTreeIndex] trait.
///
/// The tree is stored implicitly: after a build, the entry vector is kd-sorted so that the split
/// entry of every subtree sits in the middle of that subtree's range.
pub struct KDTree<'a, P: IndexablePoint, T> {
    /// Built entries followed by pending adds.
    pub(crate) entries: Vec<Entry<'a, P, T>>,

    /// Number of leading entries that make up the built tree.
    pub(crate) num_items: usize,
}

impl<'a, P: IndexablePoint, T> KDTree<'a, P, T> {
    /// Create a new, empty tree.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            num_items: 0,
        }
    }

    /// Create a new, empty tree with room for `capacity` points before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            num_items: 0,
        }
    }

    /// The number of points in the built tree.
    ///
    /// Points added since the last build are not counted.
    pub fn len(&self) -> usize {
        self.num_items
    }

    /// Returns `true` if the built tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// The number of points added since the last build.
    pub fn num_pending(&self) -> usize {
        self.entries.len() - self.num_items
    }

    /// Discard the tree and every pending point, returning to the initial empty state.
    pub fn clear(&mut self) {
        trace!(
            "clearing k-d tree with {} built and {} pending points",
            self.num_items,
            self.num_pending()
        );
        self.entries.clear();
        self.num_items = 0;
    }

    /// Borrow the built tree as an immutable [`KDTreeRef`].
    ///
    /// The tree cannot be modified while the returned view is alive.
    pub fn as_ref(&self) -> KDTreeRef<'_, 'a, P, T> {
        KDTreeRef {
            entries: &self.entries[..self.num_items],
        }
    }
}

impl<P: IndexablePoint, T> Default for KDTree<'_, P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: IndexablePoint + fmt::Debug, T: fmt::Debug> fmt::Debug for KDTree<'_, P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KDTree")
            .field("entries", &self.entries)
            .field("num_items", &self.num_items)
            .finish()
    }
}

/// An immutable view onto a built [`KDTree`].
///
/// Usually this will be created via [`KDTree::as_ref`]. It is `Copy`, and `Send + Sync` whenever
/// the points and payloads are `Sync`, so it can be handed to any number of reader threads.
pub struct KDTreeRef<'t, 'a, P: IndexablePoint, T> {
    pub(crate) entries: &'t [Entry<'a, P, T>],
}

impl<'t, 'a, P: IndexablePoint, T> KDTreeRef<'t, 'a, P, T> {
    /// The number of points in the tree.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: IndexablePoint, T> Clone for KDTreeRef<'_, '_, P, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: IndexablePoint, T> Copy for KDTreeRef<'_, '_, P, T> {}

impl<P: IndexablePoint + fmt::Debug, T: fmt::Debug> fmt::Debug for KDTreeRef<'_, '_, P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KDTreeRef")
            .field("entries", &self.entries)
            .finish()
    }
}
