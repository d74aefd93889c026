//! Voxquad - compiles voxel scenes into merged quad meshes for the GPU

pub mod core;
pub mod math;
pub mod voxel;
pub mod scene;
pub mod mesh;
pub mod render;
