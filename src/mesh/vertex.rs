//! Packed vertex records shared with the GPU pipelines
//!
//! Both formats start with four signed 16-bit position fields: x, y, z in
//! 12.4 fixed point, and a constant 1. The colour word carries the palette
//! index in its top byte where a shader would expect alpha.

use bytemuck::{Pod, Zeroable};

use crate::voxel::Rgba;
use super::writer::VertexWriter;

/// Corner-snapping flags carried in the top byte of the edge word
pub const ALIGN_LEFT: u8 = 1;
pub const ALIGN_RIGHT: u8 = 2;
pub const ALIGN_BOTTOM: u8 = 4;
pub const ALIGN_TOP: u8 = 8;

/// Fourth position field
pub const POSITION_PAD: i16 = 1;

/// Fixed-point scale of the z field
pub const Z_SCALE: f32 = 16.0;

/// Vertices per quad: two triangles, no index buffer
pub const VERTICES_PER_QUAD: usize = 6;

/// Z in 12.4 fixed point, truncated toward zero and saturated to i16
pub fn fixed_z(z: f32) -> i16 {
    (z * Z_SCALE) as i16
}

/// `(index << 24) | (b << 16) | (g << 8) | r`
pub fn pack_color(index: u8, color: Rgba) -> u32 {
    (index as u32) << 24 | (color.b as u32) << 16 | (color.g as u32) << 8 | color.r as u32
}

/// `(align << 24) | (height << 16) | (spacing << 8) | width`, each saturated to a byte
pub fn pack_edge_params(align: u8, height: i32, spacing: i32, width: i32) -> u32 {
    (align as u32) << 24
        | (saturate_u8(height) as u32) << 16
        | (saturate_u8(spacing) as u32) << 8
        | saturate_u8(width) as u32
}

pub(crate) fn saturate_u8(v: i32) -> u8 {
    v.clamp(0, u8::MAX as i32) as u8
}

fn pack_position(x: f32, y: f32, z: f32) -> [i16; 4] {
    [x as i16, y as i16, fixed_z(z), POSITION_PAD]
}

/// Plain voxel vertex (12 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct VoxelVertex {
    pub position: [i16; 4],
    pub color: u32,
}

impl VoxelVertex {
    pub const SIZE: usize = std::mem::size_of::<VoxelVertex>();

    pub fn new(x: f32, y: f32, z: f32, color: u32) -> Self {
        Self { position: pack_position(x, y, z), color }
    }

    pub fn write(&self, w: &mut VertexWriter) {
        for p in self.position {
            w.write_i16(p);
        }
        w.write_u32(self.color);
    }
}

/// Edge trim vertex (16 bytes): a voxel vertex plus the packed edge word
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct EdgeVertex {
    pub position: [i16; 4],
    pub color: u32,
    pub edge: u32,
}

impl EdgeVertex {
    pub const SIZE: usize = std::mem::size_of::<EdgeVertex>();

    pub fn new(x: f32, y: f32, z: f32, color: u32, edge: u32) -> Self {
        Self { position: pack_position(x, y, z), color, edge }
    }

    pub fn write(&self, w: &mut VertexWriter) {
        for p in self.position {
            w.write_i16(p);
        }
        w.write_u32(self.color);
        w.write_u32(self.edge);
    }

    /// Alignment flags from the top byte of the edge word
    pub fn align(&self) -> u8 {
        (self.edge >> 24) as u8
    }
}

/// Which corner of a quad a vertex sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadCorner {
    pub end_x: bool,
    pub end_z: bool,
}

/// Quad corners in emission order: (start,start), (end,end), (start,end),
/// (end,start), (end,end), (start,start)
pub const QUAD_CORNERS: [QuadCorner; VERTICES_PER_QUAD] = [
    QuadCorner { end_x: false, end_z: false },
    QuadCorner { end_x: true, end_z: true },
    QuadCorner { end_x: false, end_z: true },
    QuadCorner { end_x: true, end_z: false },
    QuadCorner { end_x: true, end_z: true },
    QuadCorner { end_x: false, end_z: false },
];
