//! Integer axis-aligned bounding box over voxel cells

use glam::IVec3;

/// Inclusive bounding box over integer cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridBounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl GridBounds {
    /// Create bounds from min and max corners (both inclusive)
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Number of cells along each axis
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Check if a cell is inside the bounds
    pub fn contains_point(&self, p: IVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Return merged bounds containing both
    pub fn merged(&self, other: &GridBounds) -> GridBounds {
        GridBounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Fold an optional accumulator with new bounds
    pub fn union(acc: Option<GridBounds>, other: GridBounds) -> GridBounds {
        match acc {
            Some(b) => b.merged(&other),
            None => other,
        }
    }
}
