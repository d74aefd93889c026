//! Grid math: placement transforms and integer bounds

pub mod bounds;
pub mod transform;

pub use bounds::GridBounds;
pub use transform::{GridSpace, GridTransform};
