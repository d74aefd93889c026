//! Voxel data structures and the per-layer merge

pub mod edge;
pub mod grid;
pub mod merge;
pub mod palette;
pub mod procgen;
pub mod rect;
pub mod source;

pub use edge::{Edge, EdgeCorners, EdgeDir, EdgeMarkers};
pub use grid::{VoxelGrid, EMPTY};
pub use merge::{merge_instance, MergeConfig, MergeMode, MergeOutput};
pub use palette::{Palette, Rgba, PALETTE_SIZE};
pub use procgen::generate_box;
pub use rect::VoxelRect;
pub use source::{Instance, VoxelScene, VoxelSource};
