//! Dense palette-indexed voxel grid

use glam::IVec3;

use crate::core::{Error, Result};

/// Colour index of an empty cell
pub const EMPTY: u8 = 0;

/// Dense 3D array of palette indices, x varying fastest, then y, then z
///
/// Immutable once built from a source; merging works on a private copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    size: IVec3,
    cells: Vec<u8>,
}

impl VoxelGrid {
    /// Create a grid from raw cells, validating the length against `size`
    pub fn new(size: IVec3, cells: Vec<u8>) -> Result<Self> {
        if size.cmplt(IVec3::ZERO).any() {
            return Err(Error::Voxel(format!("negative grid size {}", size)));
        }
        let expected = size.x as usize * size.y as usize * size.z as usize;
        if cells.len() != expected {
            return Err(Error::Voxel(format!(
                "grid {} needs {} cells, got {}",
                size,
                expected,
                cells.len()
            )));
        }
        Ok(Self { size, cells })
    }

    /// Create an all-empty grid
    pub fn empty(size: IVec3) -> Self {
        let size = size.max(IVec3::ZERO);
        let len = size.x as usize * size.y as usize * size.z as usize;
        Self { size, cells: vec![EMPTY; len] }
    }

    /// Build a grid by evaluating `f` at every cell
    pub fn from_fn(size: IVec3, mut f: impl FnMut(IVec3) -> u8) -> Self {
        let mut grid = Self::empty(size);
        for z in 0..grid.size.z {
            for y in 0..grid.size.y {
                for x in 0..grid.size.x {
                    let p = IVec3::new(x, y, z);
                    grid.set(p, f(p));
                }
            }
        }
        grid
    }

    pub fn size(&self) -> IVec3 {
        self.size
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Number of cells
    pub fn volume(&self) -> usize {
        self.cells.len()
    }

    /// True when there are no cells or every cell is empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| *c == EMPTY)
    }

    /// Linear index of an in-bounds cell
    pub fn index(&self, p: IVec3) -> Option<usize> {
        if p.cmplt(IVec3::ZERO).any() || p.cmpge(self.size).any() {
            return None;
        }
        Some(p.x as usize + p.y as usize * self.size.x as usize
            + p.z as usize * self.size.x as usize * self.size.y as usize)
    }

    /// Colour at `p`; out-of-bounds cells read as empty
    pub fn get(&self, p: IVec3) -> u8 {
        self.index(p).map(|i| self.cells[i]).unwrap_or(EMPTY)
    }

    /// Set the colour at `p`; out-of-bounds writes are ignored
    pub fn set(&mut self, p: IVec3, color: u8) {
        if let Some(i) = self.index(p) {
            self.cells[i] = color;
        }
    }

    /// Fill an inclusive box with one colour
    pub fn fill(&mut self, min: IVec3, max: IVec3, color: u8) {
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    self.set(IVec3::new(x, y, z), color);
                }
            }
        }
    }

    /// Count of non-empty cells
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != EMPTY).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert!(VoxelGrid::new(IVec3::new(2, 2, 2), vec![0; 7]).is_err());
        assert!(VoxelGrid::new(IVec3::new(-1, 2, 2), vec![]).is_err());
        let g = VoxelGrid::new(IVec3::new(2, 1, 2), vec![1, 2, 3, 4]).unwrap();
        assert_eq!(g.get(IVec3::new(1, 0, 1)), 4);
    }

    #[test]
    fn test_layout_is_x_fastest() {
        let g = VoxelGrid::from_fn(IVec3::new(3, 2, 2), |p| (p.x + p.y * 3 + p.z * 6) as u8);
        assert_eq!(g.cells(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_out_of_bounds_reads_empty() {
        let mut g = VoxelGrid::empty(IVec3::splat(2));
        g.set(IVec3::new(5, 0, 0), 9);
        assert_eq!(g.get(IVec3::new(5, 0, 0)), EMPTY);
        assert_eq!(g.get(IVec3::new(-1, 0, 0)), EMPTY);
        assert!(g.is_empty());
    }

    #[test]
    fn test_fill() {
        let mut g = VoxelGrid::empty(IVec3::new(4, 1, 4));
        g.fill(IVec3::new(1, 0, 1), IVec3::new(2, 0, 3), 5);
        assert_eq!(g.solid_count(), 6);
        assert_eq!(g.get(IVec3::new(2, 0, 3)), 5);
        assert_eq!(g.get(IVec3::new(0, 0, 0)), EMPTY);
    }
}
