use std::cmp;

use log::debug;

use crate::error::{KDIndexError, Result};
use crate::kdtree::index::Entry;
use crate::kdtree::KDTree;
use crate::r#type::{IndexableNum, IndexablePoint};

impl<'a, P: IndexablePoint, T> KDTree<'a, P, T> {
    /// Register a point and its payload for the next [`build`][KDTree::build].
    ///
    /// The point is not searchable until the tree is rebuilt. Returns the number of registered
    /// points, built and pending.
    pub fn add(&mut self, point: &'a P, data: &'a T) -> usize {
        self.entries.push(Entry { point, data });
        self.entries.len()
    }

    /// Perform the k-d sort over every registered point, replacing any previously built tree.
    ///
    /// Each level of the tree is split at the median along `depth % P::DIMENSIONS`. The registered
    /// points are reordered in place.
    ///
    /// On error the tree and the pending points are left untouched.
    pub fn build(&mut self) -> Result<()> {
        if P::DIMENSIONS == 0 {
            return Err(KDIndexError::ZeroDimensions);
        }
        validate(&self.entries)?;

        // kd-sort the entries so that the tree is implicit in their order
        sort(&mut self.entries, 0);
        self.num_items = self.entries.len();

        debug!(
            "built k-d tree with {} points in {} dimensions",
            self.num_items,
            P::DIMENSIONS
        );
        Ok(())
    }
}

/// Reject coordinates that cannot be ordered before any entry is moved.
fn validate<P: IndexablePoint, T>(entries: &[Entry<'_, P, T>]) -> Result<()> {
    for entry in entries {
        for axis in 0..P::DIMENSIONS {
            if !entry.point.nth(axis).is_comparable() {
                return Err(KDIndexError::IncomparableCoordinate { axis });
            }
        }
    }
    Ok(())
}

fn sort<P: IndexablePoint, T>(entries: &mut [Entry<'_, P, T>], depth: usize) {
    if entries.len() <= 1 {
        return;
    }

    let axis = depth % P::DIMENSIONS;
    let m = entries.len() / 2;

    // partition around the middle index so that the halves lie on either side of the split
    // plane of this level (cycling through the axes)
    select(entries, m, 0, entries.len() - 1, axis);

    let (left, rest) = entries.split_at_mut(m);
    sort(left, depth + 1);
    sort(&mut rest[1..], depth + 1);
}

/// Floyd-Rivest selection: reorder `entries[left..=right]` so that every item before `k` is not
/// greater than the `k`-th item along `axis`, and every item after it is not smaller.
fn select<P: IndexablePoint, T>(
    entries: &mut [Entry<'_, P, T>],
    k: usize,
    mut left: usize,
    mut right: usize,
    axis: usize,
) {
    while right > left {
        if right - left > 600 {
            let n = (right - left + 1) as f64;
            let m = (k - left + 1) as f64;
            let z = f64::ln(n);
            let s = 0.5 * f64::exp((2.0 * z) / 3.0);
            let sd = 0.5
                * f64::sqrt((z * s * (n - s)) / n)
                * (if m - n / 2.0 < 0.0 { -1.0 } else { 1.0 });
            let new_left = cmp::max(left, f64::floor(k as f64 - (m * s) / n + sd) as usize);
            let new_right = cmp::min(
                right,
                f64::floor(k as f64 + ((n - m) * s) / n + sd) as usize,
            );
            select(entries, k, new_left, new_right, axis);
        }

        let t = coord(entries, k, axis);
        let mut i = left;
        let mut j = right;

        entries.swap(left, k);
        if coord(entries, right, axis) > t {
            entries.swap(left, right);
        }

        while i < j {
            entries.swap(i, j);
            i += 1;
            j -= 1;
            while coord(entries, i, axis) < t {
                i += 1;
            }
            while coord(entries, j, axis) > t {
                j -= 1;
            }
        }

        if coord(entries, left, axis) == t {
            entries.swap(left, j);
        } else {
            j += 1;
            entries.swap(j, right);
        }

        if j <= k {
            left = j + 1;
        }
        if k <= j {
            right = j - 1;
        }
    }
}

#[inline]
fn coord<P: IndexablePoint, T>(entries: &[Entry<'_, P, T>], i: usize, axis: usize) -> P::Scalar {
    entries[i].point.nth(axis)
}

#[cfg(test)]
mod test {
    use super::*;

    fn entries<'a>(points: &'a [[f64; 1]], data: &'a [usize]) -> Vec<Entry<'a, [f64; 1], usize>> {
        points
            .iter()
            .zip(data)
            .map(|(point, data)| Entry { point, data })
            .collect()
    }

    #[test]
    fn select_partitions_around_k() {
        let points: Vec<[f64; 1]> = (0..2000).map(|i| [((i * 7919) % 2000) as f64]).collect();
        let data: Vec<usize> = (0..points.len()).collect();
        let mut items = entries(&points, &data);

        let k = 1000;
        let last = items.len() - 1;
        select(&mut items, k, 0, last, 0);

        let t = items[k].point[0];
        assert_eq!(t, 1000.0);
        assert!(items[..k].iter().all(|e| e.point[0] <= t));
        assert!(items[k + 1..].iter().all(|e| e.point[0] >= t));
    }

    #[test]
    fn select_handles_duplicates() {
        let points: Vec<[f64; 1]> = (0..50).map(|i| [(i % 3) as f64]).collect();
        let data: Vec<usize> = (0..points.len()).collect();
        let mut items = entries(&points, &data);

        let k = 25;
        select(&mut items, k, 0, 49, 0);

        let t = items[k].point[0];
        assert!(items[..k].iter().all(|e| e.point[0] <= t));
        assert!(items[k + 1..].iter().all(|e| e.point[0] >= t));
    }
}
