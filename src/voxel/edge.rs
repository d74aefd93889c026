//! Decorative edge trim descriptors produced from edge-marker voxels

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::math::GridBounds;

/// Reserved palette indices that flag a strip as edge trim instead of geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMarkers {
    /// Marker colour for trim whose edge sits on the left (low X) side
    pub left: u8,
    /// Marker colour for trim whose edge sits on the right (high X) side
    pub right: u8,
}

impl Default for EdgeMarkers {
    fn default() -> Self {
        Self { left: 254, right: 255 }
    }
}

impl EdgeMarkers {
    /// Which side `color` marks, if it is a marker at all
    pub fn direction(&self, color: u8) -> Option<EdgeDir> {
        if color == self.left {
            Some(EdgeDir::Left)
        } else if color == self.right {
            Some(EdgeDir::Right)
        } else {
            None
        }
    }
}

/// Side of the rectangle on which the trim edge sits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDir {
    Left,
    Right,
}

/// Colours sampled from the layer above the marker strip, one per corner
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EdgeCorners {
    /// At (sx, ez)
    pub top_left: u8,
    /// At (ex, ez)
    pub top_right: u8,
    /// At (sx, sz)
    pub bottom_left: u8,
    /// At (ex, sz)
    pub bottom_right: u8,
}

/// Parametrized trim replacing a cube of marker and trim voxels
///
/// The trim is redrawn every `spacing` layers from `sy` to `ey` inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Sequential id within the scene
    pub id: u32,
    /// Number of the area that produced this edge
    pub area_no: i32,
    pub sx: i32,
    pub ex: i32,
    pub sy: i32,
    pub ey: i32,
    pub sz: i32,
    pub ez: i32,
    pub dir: EdgeDir,
    /// Run of the edge colour along X from the marked side
    pub width: i32,
    /// Run of the edge colour along -Z from the far Z side
    pub height: i32,
    /// Layer step between repeated trim segments, at least 1
    pub spacing: i32,
    pub corners: EdgeCorners,
}

impl Edge {
    /// Layers at which a trim segment is drawn
    pub fn layers(&self) -> std::iter::StepBy<std::ops::RangeInclusive<i32>> {
        (self.sy..=self.ey).step_by(self.spacing.max(1) as usize)
    }

    /// Number of trim segments
    pub fn step_count(&self) -> usize {
        if self.ey < self.sy {
            return 0;
        }
        ((self.ey - self.sy) / self.spacing.max(1) + 1) as usize
    }

    /// Cells spanned by the drawn trim layers
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(
            IVec3::new(self.sx, self.sy, self.sz),
            IVec3::new(self.ex, self.ey, self.ez),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(sy: i32, ey: i32, spacing: i32) -> Edge {
        Edge {
            id: 0,
            area_no: 100,
            sx: 0,
            ex: 2,
            sy,
            ey,
            sz: 0,
            ez: 0,
            dir: EdgeDir::Left,
            width: 1,
            height: 1,
            spacing,
            corners: EdgeCorners::default(),
        }
    }

    #[test]
    fn test_marker_direction() {
        let m = EdgeMarkers { left: 10, right: 11 };
        assert_eq!(m.direction(10), Some(EdgeDir::Left));
        assert_eq!(m.direction(11), Some(EdgeDir::Right));
        assert_eq!(m.direction(12), None);
        assert_eq!(m.direction(0), None);
    }

    #[test]
    fn test_layers_step_by_spacing() {
        let e = edge(1, 7, 3);
        assert_eq!(e.layers().collect::<Vec<_>>(), vec![1, 4, 7]);
        assert_eq!(e.step_count(), 3);

        let e = edge(1, 8, 3);
        assert_eq!(e.layers().collect::<Vec<_>>(), vec![1, 4, 7]);
        assert_eq!(e.step_count(), 3);
    }

    #[test]
    fn test_single_layer() {
        let e = edge(4, 4, 1);
        assert_eq!(e.layers().count(), 1);
        assert_eq!(e.step_count(), 1);
        assert_eq!(e.bounds().size(), IVec3::new(3, 1, 1));
    }
}
