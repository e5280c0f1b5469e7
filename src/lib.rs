#![doc = include_str!("../README.md")]

mod error;
pub mod kdtree;
mod r#type;

pub use error::{KDIndexError, Result};
pub use r#type::{Coord, IndexableNum, IndexablePoint};

#[cfg(test)]
pub(crate) mod test;
