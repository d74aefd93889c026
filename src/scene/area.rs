//! Areas: one placed model instance in the compiled scene

use std::ops::Range;

use glam::IVec3;

use crate::math::GridBounds;

/// Area number assigned to the first unnamed instance; later ones count up
pub const FIRST_AREA_NO: i32 = 100;

/// One placed instance and the slice of scene geometry it produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Area {
    /// Sequential from [`FIRST_AREA_NO`], or parsed from a two-digit name
    pub no: i32,
    pub name: Option<String>,
    /// World coordinate of the area's first cell
    pub origin: IVec3,
    /// World-aligned extent of the placed model
    pub size: IVec3,
    /// Bounds of the emitted rectangles; `None` when the area is empty
    pub bounds: Option<GridBounds>,
    /// Range in the scene's flat rectangle list
    pub rects: Range<usize>,
    /// Range in the scene's flat edge list
    pub edges: Range<usize>,
}

impl Area {
    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty() && self.edges.is_empty()
    }
}
