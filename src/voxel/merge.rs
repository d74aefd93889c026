//! Greedy per-layer merge of a placed voxel model into rectangles and edge trim
//!
//! One pass walks the model's world-aligned space with Y outermost, then Z,
//! then X. Every non-empty cell either starts an edge-marker strip, which is
//! consumed into a single [`Edge`], or starts a rectangle: a run along +X,
//! optionally grown along +Z while each next row is the same colour across the
//! whole run. Layers are never merged with each other.
//!
//! The pass works on a private copy of the cells and zeroes what it consumes,
//! so the caller's grid is never touched.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::math::{GridSpace, GridTransform};
use super::edge::{Edge, EdgeCorners, EdgeDir, EdgeMarkers};
use super::grid::{VoxelGrid, EMPTY};
use super::rect::{check_packable, VoxelRect};

/// How aggressively runs are combined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Runs along X only
    Lines,
    /// Runs along X, then grown along Z into rectangles
    #[default]
    Rectangles,
}

/// Merge settings shared by every area of a scene
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub mode: MergeMode,
    /// Reserved marker colours; `None` disables edge detection
    #[serde(default)]
    pub edge_markers: Option<EdgeMarkers>,
}

impl MergeConfig {
    /// Rectangle merging with the default edge markers enabled
    pub fn with_edges() -> Self {
        Self {
            mode: MergeMode::Rectangles,
            edge_markers: Some(EdgeMarkers::default()),
        }
    }
}

/// Geometry produced by merging one placed model
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOutput {
    pub rects: Vec<VoxelRect>,
    /// Edges carry the area number; ids are assigned by the scene
    pub edges: Vec<Edge>,
    /// World coordinate of space cell (0, 0, 0)
    pub origin: IVec3,
    /// Extent of the world-aligned space that was walked
    pub size: IVec3,
}

/// Merge one placed model into rectangles and edges
pub fn merge_instance(
    grid: &VoxelGrid,
    transform: &GridTransform,
    area_no: i32,
    config: &MergeConfig,
) -> Result<MergeOutput> {
    let mut merger = GridMerger::new(grid, transform, config);
    let (rects, edges) = merger.merge_layers(area_no)?;
    log::debug!(
        "area {}: {} cells -> {} rects, {} edges",
        area_no,
        merger.space.volume(),
        rects.len(),
        edges.len()
    );
    Ok(MergeOutput {
        rects,
        edges,
        origin: merger.origin,
        size: merger.size,
    })
}

struct GridMerger<'a> {
    /// Scratch copy of the model cells, zeroed as they are consumed
    cells: Vec<u8>,
    space: GridSpace,
    size: IVec3,
    origin: IVec3,
    config: &'a MergeConfig,
}

impl<'a> GridMerger<'a> {
    fn new(grid: &VoxelGrid, transform: &GridTransform, config: &'a MergeConfig) -> Self {
        let space = transform.space(grid.size());
        Self {
            cells: grid.cells().to_vec(),
            size: space.size(),
            origin: transform.origin(&space),
            space,
            config,
        }
    }

    fn get(&self, x: i32, y: i32, z: i32) -> u8 {
        let p = IVec3::new(x, y, z);
        if !self.space.contains(p) {
            return EMPTY;
        }
        self.cells.get(self.space.offset(p)).copied().unwrap_or(EMPTY)
    }

    fn clear(&mut self, x: i32, y: i32, z: i32) {
        let p = IVec3::new(x, y, z);
        if !self.space.contains(p) {
            return;
        }
        let offset = self.space.offset(p);
        if let Some(cell) = self.cells.get_mut(offset) {
            *cell = EMPTY;
        }
    }

    fn row_is(&self, sx: i32, ex: i32, y: i32, z: i32, color: u8) -> bool {
        (sx..=ex).all(|x| self.get(x, y, z) == color)
    }

    fn clear_row(&mut self, sx: i32, ex: i32, y: i32, z: i32) {
        for x in sx..=ex {
            self.clear(x, y, z);
        }
    }

    fn merge_layers(&mut self, area_no: i32) -> Result<(Vec<VoxelRect>, Vec<Edge>)> {
        let mut rects = Vec::new();
        let mut edges = Vec::new();
        let o = self.origin;

        for y in 0..self.size.y {
            for z in 0..self.size.z {
                let mut x = 0;
                while x < self.size.x {
                    let color = self.get(x, y, z);
                    if color == EMPTY {
                        x += 1;
                        continue;
                    }

                    let marker = self.config.edge_markers.and_then(|m| m.direction(color));
                    if let Some(dir) = marker {
                        let (edge, ex) = self.consume_edge(x, y, z, color, dir, area_no)?;
                        edges.push(edge);
                        x = ex + 1;
                        continue;
                    }

                    let (ex, ez) = self.grow_rect(x, y, z, color);
                    rects.push(VoxelRect::from_world(
                        color,
                        x + o.x,
                        ex + o.x,
                        y + o.y,
                        z + o.z,
                        ez + o.z,
                    )?);
                    x = ex + 1;
                }
            }
        }

        Ok((rects, edges))
    }

    /// Returns the inclusive far corner (ex, ez) of the rectangle starting at (x, z)
    fn grow_rect(&mut self, x: i32, y: i32, z: i32, color: u8) -> (i32, i32) {
        let mut ex = x;
        while ex < self.size.x - 1 && self.get(ex + 1, y, z) == color {
            ex += 1;
        }

        let mut ez = z;
        if self.config.mode == MergeMode::Rectangles {
            while ez < self.size.z - 1 && self.row_is(x, ex, y, ez + 1, color) {
                self.clear_row(x, ex, y, ez + 1);
                ez += 1;
            }
        }
        (ex, ez)
    }

    /// Measure the marker strip starting at (sx, y, sz), sample the trim above
    /// it and zero the whole cube it spans. Returns the edge and the strip's
    /// last X cell, or an error when the cube cannot be packed into vertices.
    fn consume_edge(
        &mut self,
        sx: i32,
        y: i32,
        sz: i32,
        marker: u8,
        dir: EdgeDir,
        area_no: i32,
    ) -> Result<(Edge, i32)> {
        let size = self.size;

        let mut ex = sx;
        while ex < size.x - 1 && self.get(ex + 1, y, sz) == marker {
            ex += 1;
        }
        let mut ez = sz;
        while ez < size.z - 1 && self.row_is(sx, ex, y, ez + 1, marker) {
            ez += 1;
        }

        let above = y + 1;

        let mut spacing = 1;
        while above + spacing < size.y && self.get(ex, above + spacing, ez) == EMPTY {
            spacing += 1;
        }

        let corners = EdgeCorners {
            top_left: self.get(sx, above, ez),
            top_right: self.get(ex, above, ez),
            bottom_left: self.get(sx, above, sz),
            bottom_right: self.get(ex, above, sz),
        };

        let (edge_x, edge_color) = match dir {
            EdgeDir::Left => (sx, corners.top_left),
            EdgeDir::Right => (ex, corners.top_right),
        };

        let mut width = 0;
        match dir {
            EdgeDir::Left => {
                while sx + width < size.x && self.get(sx + width, above, ez) == edge_color {
                    width += 1;
                }
            }
            EdgeDir::Right => {
                while ex - width >= 0 && self.get(ex - width, above, ez) == edge_color {
                    width += 1;
                }
            }
        }
        if width >= ex - sx {
            // Trim colour runs across the whole strip, so the split is arbitrary.
            width = (ex - sx) / 2;
        }

        let mut height = 0;
        while ez - height >= 0 && self.get(edge_x, above, ez - height) == edge_color {
            height += 1;
        }

        let mut ey = above;
        while ey < size.y && self.get(sx, ey, sz) != marker {
            ey += 1;
        }
        if ey >= size.y {
            log::warn!(
                "area {}: edge marker at {} is never closed, drawing a single layer",
                area_no,
                IVec3::new(sx, y, sz) + self.origin
            );
            ey = above;
        }

        for ry in y..=ey.min(size.y - 1) {
            for rz in sz..=ez {
                self.clear_row(sx, ex, ry, rz);
            }
        }

        let o = self.origin;
        check_packable(
            IVec3::new(sx, above, sz) + o,
            IVec3::new(ex, ey, ez) + o,
        )?;
        let edge = Edge {
            id: 0,
            area_no,
            sx: sx + o.x,
            ex: ex + o.x,
            sy: above + o.y,
            ey: ey + o.y,
            sz: sz + o.z,
            ez: ez + o.z,
            dir,
            width,
            height,
            spacing,
            corners,
        };
        Ok((edge, ex))
    }
}
