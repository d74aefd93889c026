//! Vertex buffer packing for merged rectangles and edge trim

pub mod builder;
pub mod edge_quads;
pub mod vertex;
pub mod writer;

pub use builder::{AreaRange, MeshBuffers, MeshBuilder};
pub use edge_quads::{Corner, EdgeQuad};
pub use vertex::{EdgeVertex, VoxelVertex, VERTICES_PER_QUAD};
pub use writer::VertexWriter;
