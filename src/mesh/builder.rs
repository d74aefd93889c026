//! Packs a compiled scene into the voxel and edge vertex buffers
//!
//! Each rectangle becomes one quad; each edge becomes up to four quads per
//! drawn layer. Both buffers are sized exactly before packing and rebuilt
//! wholesale whenever the scene changes.

use std::ops::Range;

use crate::scene::{Area, Scene};
use crate::voxel::{Edge, Palette, VoxelRect};
use super::edge_quads::{edge_quad_count, edge_quads};
use super::vertex::{
    pack_color, pack_edge_params, EdgeVertex, VoxelVertex, QUAD_CORNERS, VERTICES_PER_QUAD,
};
use super::writer::VertexWriter;

/// Vertex ranges of one area in both buffers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AreaRange {
    pub no: i32,
    pub voxel_vertices: Range<u32>,
    pub edge_vertices: Range<u32>,
}

/// Packed vertex data ready for upload
///
/// Owned by whoever built it until handed to a renderer; not `Clone`, so a
/// stale copy can never be uploaded next to a fresh one.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MeshBuffers {
    voxel_bytes: Vec<u8>,
    edge_bytes: Vec<u8>,
    voxel_quads: usize,
    edge_quads: usize,
    areas: Vec<AreaRange>,
    revision: u64,
}

impl MeshBuffers {
    /// Pack the current state of `scene`
    pub fn from_scene(scene: &Scene) -> Self {
        MeshBuilder::new(scene.palette()).build(
            scene.voxels(),
            scene.edges(),
            scene.areas(),
            scene.revision(),
        )
    }

    pub fn voxel_bytes(&self) -> &[u8] {
        &self.voxel_bytes
    }

    pub fn edge_bytes(&self) -> &[u8] {
        &self.edge_bytes
    }

    pub fn voxel_quad_count(&self) -> usize {
        self.voxel_quads
    }

    pub fn edge_quad_count(&self) -> usize {
        self.edge_quads
    }

    pub fn voxel_vertex_count(&self) -> u32 {
        (self.voxel_quads * VERTICES_PER_QUAD) as u32
    }

    pub fn edge_vertex_count(&self) -> u32 {
        (self.edge_quads * VERTICES_PER_QUAD) as u32
    }

    pub fn areas(&self) -> &[AreaRange] {
        &self.areas
    }

    /// Vertex ranges of area `no`
    pub fn area(&self, no: i32) -> Option<&AreaRange> {
        self.areas.iter().find(|a| a.no == no)
    }

    /// Scene revision the buffers were packed from
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.voxel_quads == 0 && self.edge_quads == 0
    }

    /// Total packed size in bytes
    pub fn byte_len(&self) -> usize {
        self.voxel_bytes.len() + self.edge_bytes.len()
    }
}

/// Packs rectangles and edges using one palette
pub struct MeshBuilder<'a> {
    palette: &'a Palette,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self { palette }
    }

    /// Pack everything; `areas` index into `voxels` and `edges`
    pub fn build(
        &self,
        voxels: &[VoxelRect],
        edges: &[Edge],
        areas: &[Area],
        revision: u64,
    ) -> MeshBuffers {
        let voxel_bytes = self.pack_voxels(voxels);
        let (edge_bytes, edge_offsets) = self.pack_edges(edges);
        let edge_quads = edge_offsets.last().copied().unwrap_or(0);

        let vertex = |quads: usize| (quads * VERTICES_PER_QUAD) as u32;
        let areas = areas
            .iter()
            .map(|a| {
                let edge_at = |i: usize| edge_offsets.get(i).copied().unwrap_or(edge_quads);
                AreaRange {
                    no: a.no,
                    voxel_vertices: vertex(a.rects.start)..vertex(a.rects.end),
                    edge_vertices: vertex(edge_at(a.edges.start))..vertex(edge_at(a.edges.end)),
                }
            })
            .collect();

        log::info!(
            "Packed {} voxel quads ({} bytes), {} edge quads ({} bytes)",
            voxels.len(),
            voxel_bytes.len(),
            edge_quads,
            edge_bytes.len()
        );

        MeshBuffers {
            voxel_bytes,
            edge_bytes,
            voxel_quads: voxels.len(),
            edge_quads,
            areas,
            revision,
        }
    }

    /// Six vertices per rectangle
    pub fn pack_voxels(&self, voxels: &[VoxelRect]) -> Vec<u8> {
        let mut w = VertexWriter::with_len(voxels.len() * VERTICES_PER_QUAD * VoxelVertex::SIZE);
        for r in voxels {
            let color = pack_color(r.color, self.palette.get(r.color));
            let y = r.y as f32;
            let (sx, ex) = (r.sx as f32, r.ex as f32 + 1.0);
            let (sz, ez) = (r.sz as f32, r.ez as f32 + 1.0);
            for at in QUAD_CORNERS {
                let x = if at.end_x { ex } else { sx };
                let z = if at.end_z { ez } else { sz };
                VoxelVertex::new(x, y, z, color).write(&mut w);
            }
        }
        w.finish()
    }

    /// Visible edge pieces, plus the running quad offset before each edge
    /// (one extra entry holds the total)
    pub fn pack_edges(&self, edges: &[Edge]) -> (Vec<u8>, Vec<usize>) {
        let mut offsets = Vec::with_capacity(edges.len() + 1);
        let mut total = 0;
        for edge in edges {
            offsets.push(total);
            total += edge_quad_count(edge, self.palette);
        }
        offsets.push(total);

        let mut w = VertexWriter::with_len(total * VERTICES_PER_QUAD * EdgeVertex::SIZE);
        for edge in edges {
            if edge.width > 255 || edge.height > 255 || edge.spacing > 255 {
                log::warn!(
                    "edge {} parameters ({}, {}, {}) exceed a byte and are clamped",
                    edge.id,
                    edge.width,
                    edge.height,
                    edge.spacing
                );
            }
            for quad in edge_quads(edge, self.palette) {
                let color = pack_color(quad.color, self.palette.get(quad.color));
                for at in QUAD_CORNERS {
                    let params = pack_edge_params(
                        quad.align(edge.dir, at),
                        edge.height,
                        edge.spacing,
                        edge.width,
                    );
                    EdgeVertex::new(quad.x(at), quad.y, quad.z(at), color, params).write(&mut w);
                }
            }
        }
        (w.finish(), offsets)
    }
}
