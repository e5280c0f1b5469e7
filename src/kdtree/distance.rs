//! Coordinate differences and distances between points.

use num_traits::Zero;

use crate::r#type::{IndexableNum, IndexablePoint};

/// The type distances between points of type `P` are measured in.
pub type Distance<P> = <<P as IndexablePoint>::Scalar as IndexableNum>::Distance;

/// Signed difference `p1[axis] - p2[axis]`, widened to the distance type.
#[inline]
pub fn difference<P: IndexablePoint>(p1: &P, p2: &P, axis: usize) -> Distance<P> {
    p1.nth(axis).to_distance() - p2.nth(axis).to_distance()
}

/// Squared Euclidean distance between two points.
///
/// This preserves the ordering of the true Euclidean distance without taking a square root, and
/// is the only distance used for comparisons inside the tree.
#[inline]
pub fn comparable_distance<P: IndexablePoint>(p1: &P, p2: &P) -> Distance<P> {
    let mut sum = <Distance<P> as Zero>::zero();
    for axis in 0..P::DIMENSIONS {
        let d = difference(p1, p2, axis);
        sum = sum + d * d;
    }
    sum
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Coord;

    #[test]
    fn difference_is_signed() {
        let a = [1.0, 5.0, -2.0];
        let b = [3.0, 1.0, -2.0];
        assert_eq!(difference(&a, &b, 0), -2.0);
        assert_eq!(difference(&a, &b, 1), 4.0);
        assert_eq!(difference(&a, &b, 2), 0.0);
    }

    #[test]
    fn distance_is_squared() {
        let a = Coord::new(0, 0);
        let b = Coord::new(3, 4);
        assert_eq!(comparable_distance(&a, &b), 25);
        assert_eq!(comparable_distance(&b, &a), 25);
        assert_eq!(comparable_distance(&a, &a), 0);
    }

    #[test]
    fn integer_distance_does_not_overflow() {
        let a = (i32::MIN, i32::MIN);
        let b = (i32::MAX, i32::MAX);
        let span = i32::MAX as i128 - i32::MIN as i128;
        assert_eq!(difference(&b, &a, 0), span);
        assert_eq!(comparable_distance(&a, &b), 2 * span * span);
    }
}
