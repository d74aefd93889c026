//! Corner sub-quads of an edge trim segment
//!
//! Each drawn layer of an [`Edge`] splits its rectangle into four pieces at
//! the edge width along X and the edge height along Z. A piece whose sampled
//! colour is fully transparent is skipped.

use crate::voxel::{Edge, EdgeDir, Palette};
use super::vertex::{QuadCorner, ALIGN_BOTTOM, ALIGN_LEFT, ALIGN_RIGHT, ALIGN_TOP};

/// One of the four pieces of a trim segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Emission order within a layer
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Sides of the piece that face the split lines
    pub fn inner_sides(self) -> u8 {
        match self {
            Corner::TopLeft => ALIGN_BOTTOM | ALIGN_RIGHT,
            Corner::TopRight => ALIGN_BOTTOM | ALIGN_LEFT,
            Corner::BottomLeft => ALIGN_TOP | ALIGN_RIGHT,
            Corner::BottomRight => ALIGN_TOP | ALIGN_LEFT,
        }
    }

    /// Colour sampled for this piece
    pub fn color(self, edge: &Edge) -> u8 {
        let c = &edge.corners;
        match self {
            Corner::TopLeft => c.top_left,
            Corner::TopRight => c.top_right,
            Corner::BottomLeft => c.bottom_left,
            Corner::BottomRight => c.bottom_right,
        }
    }
}

/// One piece of one trim layer, in world cell units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeQuad {
    pub corner: Corner,
    pub color: u8,
    pub y: f32,
    pub sx: f32,
    pub ex: f32,
    pub sz: f32,
    pub ez: f32,
}

impl EdgeQuad {
    /// Alignment flags for the vertex at `at`: the Z side it touches plus
    /// the edge direction flag when its X side faces the split
    pub fn align(&self, dir: EdgeDir, at: QuadCorner) -> u8 {
        let sides = self.corner.inner_sides();
        let dir_flag = match dir {
            EdgeDir::Left => ALIGN_RIGHT,
            EdgeDir::Right => ALIGN_LEFT,
        };
        let z_flag = if at.end_z { sides & ALIGN_TOP } else { sides & ALIGN_BOTTOM };
        let x_side = if at.end_x { ALIGN_RIGHT } else { ALIGN_LEFT };
        let x_flag = if sides & x_side != 0 { dir_flag } else { 0 };
        z_flag | x_flag
    }

    pub fn x(&self, at: QuadCorner) -> f32 {
        if at.end_x { self.ex } else { self.sx }
    }

    pub fn z(&self, at: QuadCorner) -> f32 {
        if at.end_z { self.ez } else { self.sz }
    }
}

/// Pieces of `edge` that produce geometry with `palette`
pub fn visible_corners(edge: &Edge, palette: &Palette) -> Vec<Corner> {
    Corner::ALL
        .into_iter()
        .filter(|c| !palette.get(c.color(edge)).is_transparent())
        .collect()
}

/// Number of pieces `edge` emits over all of its layers
pub fn edge_quad_count(edge: &Edge, palette: &Palette) -> usize {
    edge.step_count() * visible_corners(edge, palette).len()
}

/// Every visible piece of every layer of `edge`, layer by layer
pub fn edge_quads(edge: &Edge, palette: &Palette) -> Vec<EdgeQuad> {
    let corners = visible_corners(edge, palette);
    let mut quads = Vec::with_capacity(edge.step_count() * corners.len());

    let split_x = match edge.dir {
        EdgeDir::Left => edge.sx + edge.width,
        EdgeDir::Right => edge.ex + 1 - edge.width,
    } as f32;
    let split_z = (edge.ez + 1 - edge.height) as f32;
    let (sx, ex) = (edge.sx as f32, (edge.ex + 1) as f32);
    let (sz, ez) = (edge.sz as f32, (edge.ez + 1) as f32);

    for y in edge.layers() {
        for &corner in &corners {
            let (qsx, qex) = match corner {
                Corner::TopLeft | Corner::BottomLeft => (sx, split_x),
                Corner::TopRight | Corner::BottomRight => (split_x, ex),
            };
            let (qsz, qez) = match corner {
                Corner::TopLeft | Corner::TopRight => (split_z, ez),
                Corner::BottomLeft | Corner::BottomRight => (sz, split_z),
            };
            quads.push(EdgeQuad {
                corner,
                color: corner.color(edge),
                y: y as f32,
                sx: qsx,
                ex: qex,
                sz: qsz,
                ez: qez,
            });
        }
    }
    quads
}
