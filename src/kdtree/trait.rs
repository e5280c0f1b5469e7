use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use geo_traits::CoordTrait;
use num_traits::Zero;
use tinyvec::TinyVec;

use crate::kdtree::distance::{comparable_distance, difference, Distance};
use crate::kdtree::index::Entry;
use crate::kdtree::{KDTree, KDTreeRef, Node};
use crate::r#type::{Coord, IndexablePoint};

/// A trait for searching and accessing data out of a KDTree.
pub trait KDTreeIndex<'a, P: IndexablePoint + 'a, T: 'a>: Sized {
    /// The kd-sorted entries of the built tree
    fn entries(&self) -> &[Entry<'a, P, T>];

    /// Access the root node of the KDTree for manual traversal.
    ///
    /// Returns `None` when the tree is empty.
    fn root(&self) -> Option<Node<'_, 'a, P, T>> {
        Node::from_root(self.entries())
    }

    /// The number of levels of the tree; 0 when the tree is empty.
    fn height(&self) -> usize {
        let mut height = 0;

        // Use TinyVec to avoid heap allocations
        let mut stack: TinyVec<[(usize, usize, usize); 32]> = TinyVec::new();
        if !self.entries().is_empty() {
            stack.push((0, self.entries().len(), 1));
        }

        while let Some((start, end, depth)) = stack.pop() {
            height = height.max(depth);
            let m = start + (end - start) / 2;
            if start < m {
                stack.push((start, m, depth + 1));
            }
            if m + 1 < end {
                stack.push((m + 1, end, depth + 1));
            }
        }

        height
    }

    /// Find the payload of the point closest to `query`, using a depth-first branch-and-bound
    /// search.
    ///
    /// Returns `None` if the tree is empty. When several points are equally close, the first one
    /// visited wins.
    ///
    /// ```
    /// use kd_index::kdtree::{KDTree, KDTreeIndex};
    ///
    /// let points = [[0., 0.], [5., 5.], [1., 1.], [9., 1.]];
    /// let names = ["A", "B", "C", "D"];
    ///
    /// let mut tree = KDTree::new();
    /// for (point, name) in points.iter().zip(names.iter()) {
    ///     tree.add(point, name);
    /// }
    /// tree.build().unwrap();
    ///
    /// assert_eq!(tree.nearest(&[0.9, 0.9]), Some(&"C"));
    /// ```
    fn nearest(&self, query: &P) -> Option<&'a T> {
        let mut best = None;
        nearest_recursive(query, self.root(), &mut best);
        best.map(|(node, _)| node.data())
    }

    /// Find the payload of the point closest to `query`, visiting subtrees best-first in order of
    /// their distance lower bound.
    ///
    /// Gives the same answer as [`nearest`][KDTreeIndex::nearest] (up to ties), but can stop
    /// earlier once no queued subtree can hold a closer point.
    fn nearest_iterative(&self, query: &P) -> Option<&'a T> {
        let root = self.root()?;

        let mut queue = BinaryHeap::new();
        let mut best: Option<Candidate<'_, 'a, P, T>> = None;

        queue.push(Reverse(Candidate {
            dist: <Distance<P> as Zero>::zero(),
            node: root,
        }));

        while let Some(Reverse(current)) = queue.pop() {
            if best.is_some_and(|best| current.dist >= best.dist) {
                break;
            }

            let node = current.node;
            let split = node.point();
            let d = comparable_distance(query, split);
            let dx = difference(query, split, node.axis());

            if best.map_or(true, |best| d < best.dist) {
                best = Some(Candidate { dist: d, node });
            }

            let (near, far) = children(node, dx);
            if let Some(far) = far {
                queue.push(Reverse(Candidate { dist: dx * dx, node: far }));
            }
            if let Some(near) = near {
                queue.push(Reverse(Candidate {
                    dist: <Distance<P> as Zero>::zero(),
                    node: near,
                }));
            }
        }

        best.map(|best| best.node.data())
    }

    /// Find the payloads of the `k` points closest to `query`, nearest first.
    ///
    /// Returns fewer than `k` payloads when the tree holds fewer than `k` points, and nothing when
    /// `k` is 0. Among points tied at the `k`-th distance, the first one visited is kept.
    ///
    /// ```
    /// use kd_index::kdtree::{KDTree, KDTreeIndex};
    ///
    /// let points = [[0., 0.], [5., 5.], [1., 1.], [9., 1.]];
    /// let names = ["A", "B", "C", "D"];
    ///
    /// let mut tree = KDTree::new();
    /// for (point, name) in points.iter().zip(names.iter()) {
    ///     tree.add(point, name);
    /// }
    /// tree.build().unwrap();
    ///
    /// assert_eq!(tree.knearest(&[0., 0.], 2), vec![&"A", &"C"]);
    /// ```
    fn knearest(&self, query: &P, k: usize) -> Vec<&'a T> {
        if k < 1 {
            return vec![];
        }

        let mut queue = BinaryHeap::with_capacity(k.min(self.entries().len()) + 1);
        knearest_recursive(query, self.root(), k, &mut queue);

        queue
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| candidate.node.data())
            .collect()
    }

    /// Find the payload of the point closest to a [`CoordTrait`] coordinate.
    fn nearest_coord(&self, coord: &impl CoordTrait<T = P::Scalar>) -> Option<&'a T>
    where
        P: From<Coord<P::Scalar>>,
    {
        self.nearest(&P::from(Coord::from_coord(coord)))
    }

    /// Find the payloads of the `k` points closest to a [`CoordTrait`] coordinate, nearest first.
    fn knearest_coord(&self, coord: &impl CoordTrait<T = P::Scalar>, k: usize) -> Vec<&'a T>
    where
        P: From<Coord<P::Scalar>>,
    {
        self.knearest(&P::from(Coord::from_coord(coord)), k)
    }

    /// Run [`nearest`][KDTreeIndex::nearest] for every query in parallel.
    #[cfg(feature = "rayon")]
    fn nearest_batch(&self, queries: &[P]) -> Vec<Option<&'a T>>
    where
        Self: Sync,
        P: Sync,
        T: Sync,
    {
        use rayon::prelude::*;

        queries.par_iter().map(|query| self.nearest(query)).collect()
    }

    /// Run [`knearest`][KDTreeIndex::knearest] for every query in parallel.
    #[cfg(feature = "rayon")]
    fn knearest_batch(&self, queries: &[P], k: usize) -> Vec<Vec<&'a T>>
    where
        Self: Sync,
        P: Sync,
        T: Sync,
    {
        use rayon::prelude::*;

        queries
            .par_iter()
            .map(|query| self.knearest(query, k))
            .collect()
    }
}

impl<'a, P: IndexablePoint + 'a, T: 'a> KDTreeIndex<'a, P, T> for KDTree<'a, P, T> {
    fn entries(&self) -> &[Entry<'a, P, T>] {
        &self.entries[..self.num_items]
    }
}

impl<'a, P: IndexablePoint + 'a, T: 'a> KDTreeIndex<'a, P, T> for KDTreeRef<'_, 'a, P, T> {
    fn entries(&self) -> &[Entry<'a, P, T>] {
        self.entries
    }
}

/// A node and its distance to the query, for use in the priority queues.
///
/// Ordered by distance only. The max-heap of k-nearest search uses it directly; the min-heap of
/// best-first search wraps it in [`Reverse`].
struct Candidate<'t, 'a, P: IndexablePoint, T> {
    dist: Distance<P>,
    node: Node<'t, 'a, P, T>,
}

impl<P: IndexablePoint, T> Clone for Candidate<'_, '_, P, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: IndexablePoint, T> Copy for Candidate<'_, '_, P, T> {}

impl<P: IndexablePoint, T> PartialEq for Candidate<'_, '_, P, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P: IndexablePoint, T> Eq for Candidate<'_, '_, P, T> {}

impl<P: IndexablePoint, T> Ord for Candidate<'_, '_, P, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // NaN only arises from NaN queries; treat it as a tie rather than panicking
        self.dist
            .partial_cmp(&other.dist)
            .unwrap_or(Ordering::Equal)
    }
}

impl<P: IndexablePoint, T> PartialOrd for Candidate<'_, '_, P, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split the children of `node` into the one on the query's side of the splitting plane and the
/// one across it.
#[inline]
#[allow(clippy::type_complexity)]
fn children<'t, 'a, P: IndexablePoint, T>(
    node: Node<'t, 'a, P, T>,
    dx: Distance<P>,
) -> (Option<Node<'t, 'a, P, T>>, Option<Node<'t, 'a, P, T>>) {
    if dx <= <Distance<P> as Zero>::zero() {
        (node.left_child(), node.right_child())
    } else {
        (node.right_child(), node.left_child())
    }
}

fn nearest_recursive<'t, 'a, P: IndexablePoint, T>(
    query: &P,
    node: Option<Node<'t, 'a, P, T>>,
    best: &mut Option<(Node<'t, 'a, P, T>, Distance<P>)>,
) {
    let Some(node) = node else {
        return;
    };

    let split = node.point();
    let d = comparable_distance(query, split); // no square root
    let dx = difference(query, split, node.axis());

    if best.map_or(true, |(_, best_dist)| d < best_dist) {
        *best = Some((node, d));
    }

    let (near, far) = children(node, dx);

    nearest_recursive(query, near, best);

    if best.is_some_and(|(_, best_dist)| dx * dx >= best_dist) {
        return;
    }

    nearest_recursive(query, far, best);
}

fn knearest_recursive<'t, 'a, P: IndexablePoint, T>(
    query: &P,
    node: Option<Node<'t, 'a, P, T>>,
    k: usize,
    result: &mut BinaryHeap<Candidate<'t, 'a, P, T>>,
) {
    let Some(node) = node else {
        return;
    };

    let split = node.point();
    let d = comparable_distance(query, split); // no square root
    let dx = difference(query, split, node.axis());

    // Once the queue is full, equally distant points keep the one found first
    if result.len() < k || result.peek().is_some_and(|worst| d < worst.dist) {
        result.push(Candidate { dist: d, node });

        if result.len() > k {
            result.pop();
        }
    }

    let (near, far) = children(node, dx);

    knearest_recursive(query, near, k, result);

    // Nothing can be pruned until k candidates have been found
    if result.len() >= k && result.peek().is_some_and(|worst| dx * dx >= worst.dist) {
        return;
    }

    knearest_recursive(query, far, k, result);
}
