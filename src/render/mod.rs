//! View transform and GPU submission of packed meshes

pub mod gpu;
pub mod submission;
pub mod view;

pub use gpu::{edge_vertex_layout, record_draws, voxel_vertex_layout, QuadPipelines, ViewBuffer, WgpuSink};
pub use submission::{BufferKind, DrawCall, MeshRenderer, VertexSink};
pub use view::{view_matrix, ViewSettings, ViewUniform};
