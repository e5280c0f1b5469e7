use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KDIndexError {
    /// The point type declares zero coordinates, so no splitting axis exists.
    #[error("Points must have at least one dimension.")]
    ZeroDimensions,

    /// A registered point has a coordinate that cannot be ordered (NaN).
    #[error("Point has an incomparable coordinate on axis {axis}.")]
    IncomparableCoordinate { axis: usize },
}

pub type Result<T> = std::result::Result<T, KDIndexError>;
