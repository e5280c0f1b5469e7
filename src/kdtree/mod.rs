//! An implementation of a static, exact nearest-neighbor K-D Tree over borrowed points.

#![warn(missing_docs)]

mod builder;
pub mod distance;
mod index;
mod r#trait;
mod traversal;

pub use index::{Entry, KDTree, KDTreeRef};
pub use r#trait::KDTreeIndex;
pub use traversal::Node;
