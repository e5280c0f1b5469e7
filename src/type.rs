use std::fmt::Debug;

use geo_traits::{CoordTrait, Dimensions};
use num_traits::{Bounded, Num, NumCast, ToPrimitive};

/// A trait for types that can be used for indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Coordinate differences and
/// squared distances are computed in the wider [`Distance`][IndexableNum::Distance] type, so
/// every pair of representable coordinates has an exact, non-overflowing squared distance.
pub trait IndexableNum:
    private::Sealed + Num + NumCast + ToPrimitive + PartialOrd + Copy + Debug + Send + Sync + Bounded
{
    /// The type differences and squared distances between coordinates are computed in.
    type Distance: Num + PartialOrd + Copy + Debug + Send + Sync;

    /// Widen this coordinate into the distance type.
    fn to_distance(self) -> Self::Distance;

    /// Whether this value takes part in a total order with every other value of its type.
    ///
    /// Returns `false` only for NaN.
    fn is_comparable(&self) -> bool;
}

// A squared i32 difference needs up to 64 bits, so sums of them only fit in i128.
impl IndexableNum for i32 {
    type Distance = i128;

    #[inline]
    fn to_distance(self) -> i128 {
        self.into()
    }

    #[inline]
    fn is_comparable(&self) -> bool {
        true
    }
}

impl IndexableNum for f32 {
    type Distance = f32;

    #[inline]
    fn to_distance(self) -> f32 {
        self
    }

    #[inline]
    fn is_comparable(&self) -> bool {
        !self.is_nan()
    }
}

impl IndexableNum for f64 {
    type Distance = f64;

    #[inline]
    fn to_distance(self) -> f64 {
        self
    }

    #[inline]
    fn is_comparable(&self) -> bool {
        !self.is_nan()
    }
}

/// A point with a fixed number of coordinates that can be stored in a
/// [`KDTree`][crate::kdtree::KDTree].
///
/// The number of dimensions is fixed by the type, but the axis is chosen at runtime while the
/// tree is built and searched.
pub trait IndexablePoint {
    /// The numeric type of each coordinate.
    type Scalar: IndexableNum;

    /// The number of coordinates of every point of this type.
    const DIMENSIONS: usize;

    /// The coordinate along `axis`.
    ///
    /// # Panics
    ///
    /// May panic if `axis >= Self::DIMENSIONS`.
    fn nth(&self, axis: usize) -> Self::Scalar;
}

impl<N: IndexableNum, const D: usize> IndexablePoint for [N; D] {
    type Scalar = N;
    const DIMENSIONS: usize = D;

    #[inline]
    fn nth(&self, axis: usize) -> N {
        self[axis]
    }
}

impl<N: IndexableNum> IndexablePoint for (N, N) {
    type Scalar = N;
    const DIMENSIONS: usize = 2;

    #[inline]
    fn nth(&self, axis: usize) -> N {
        match axis {
            0 => self.0,
            1 => self.1,
            _ => panic!("axis {} out of bounds for a 2D point", axis),
        }
    }
}

impl<N: IndexableNum> IndexablePoint for (N, N, N) {
    type Scalar = N;
    const DIMENSIONS: usize = 3;

    #[inline]
    fn nth(&self, axis: usize) -> N {
        match axis {
            0 => self.0,
            1 => self.1,
            2 => self.2,
            _ => panic!("axis {} out of bounds for a 3D point", axis),
        }
    }
}

/// A 2D coordinate that interoperates with [`geo_traits`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord<N: IndexableNum> {
    pub x: N,
    pub y: N,
}

impl<N: IndexableNum> Coord<N> {
    /// Create a new coordinate.
    pub fn new(x: N, y: N) -> Self {
        Self { x, y }
    }

    /// Copy the x and y values out of any [`CoordTrait`] implementation.
    pub fn from_coord(coord: &impl CoordTrait<T = N>) -> Self {
        Self {
            x: coord.x(),
            y: coord.y(),
        }
    }
}

impl<N: IndexableNum> IndexablePoint for Coord<N> {
    type Scalar = N;
    const DIMENSIONS: usize = 2;

    #[inline]
    fn nth(&self, axis: usize) -> N {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => panic!("axis {} out of bounds for a 2D point", axis),
        }
    }
}

impl<N: IndexableNum> CoordTrait for Coord<N> {
    type T = N;

    fn dim(&self) -> Dimensions {
        Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        IndexablePoint::nth(self, n)
    }
}

impl<N: IndexableNum> From<Coord<N>> for [N; 2] {
    fn from(value: Coord<N>) -> Self {
        [value.x, value.y]
    }
}

impl<N: IndexableNum> From<Coord<N>> for (N, N) {
    fn from(value: Coord<N>) -> Self {
        (value.x, value.y)
    }
}

impl<N: IndexableNum> From<[N; 2]> for Coord<N> {
    fn from(value: [N; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
