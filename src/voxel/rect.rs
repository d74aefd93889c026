//! Merged rectangles of same-coloured voxels within one Y layer

use glam::IVec3;

use crate::core::{Error, Result};
use crate::math::GridBounds;

/// Lowest world Z a vertex can hold; z is packed as 12.4 fixed point
pub const MIN_Z: i32 = i16::MIN as i32 / 16;

/// Highest world Z a vertex can hold, including the far side of a quad
pub const MAX_Z: i32 = i16::MAX as i32 / 16;

/// Axis-aligned rectangle of one colour covering `sx..=ex` by `sz..=ez` at layer `y`
///
/// Coordinates are world cells. X and Y must fit a signed 16-bit range and Z
/// must fit [`MIN_Z`]`..=`[`MAX_Z`] because they are packed directly into
/// vertex positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelRect {
    pub color: u8,
    pub sx: i16,
    pub ex: i16,
    pub y: i16,
    pub sz: i16,
    pub ez: i16,
}

impl VoxelRect {
    /// Create a rectangle from world cell coordinates, rejecting values that
    /// would not survive packing
    pub fn from_world(color: u8, sx: i32, ex: i32, y: i32, sz: i32, ez: i32) -> Result<Self> {
        Ok(Self {
            color,
            sx: narrow('x', sx)?,
            // The far corner of the quad sits one cell past `ex`/`ez`.
            ex: narrow('x', ex + 1).map(|v| v - 1)?,
            y: narrow('y', y)?,
            sz: narrow_z(sz)?,
            ez: narrow_z(ez + 1).map(|v| v - 1)?,
        })
    }

    /// Cells along X
    pub fn width(&self) -> i32 {
        self.ex as i32 - self.sx as i32 + 1
    }

    /// Cells along Z
    pub fn depth(&self) -> i32 {
        self.ez as i32 - self.sz as i32 + 1
    }

    /// Number of voxels covered
    pub fn cell_count(&self) -> usize {
        (self.width() * self.depth()) as usize
    }

    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(
            IVec3::new(self.sx as i32, self.y as i32, self.sz as i32),
            IVec3::new(self.ex as i32, self.y as i32, self.ez as i32),
        )
    }

    /// Every covered cell, X fastest
    pub fn cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        let y = self.y as i32;
        (self.sz as i32..=self.ez as i32).flat_map(move |z| {
            (self.sx as i32..=self.ex as i32).map(move |x| IVec3::new(x, y, z))
        })
    }
}

fn narrow(axis: char, value: i32) -> Result<i16> {
    i16::try_from(value).map_err(|_| Error::CoordinateOverflow { axis, value })
}

fn narrow_z(value: i32) -> Result<i16> {
    if !(MIN_Z..=MAX_Z).contains(&value) {
        return Err(Error::CoordinateOverflow { axis: 'z', value });
    }
    narrow('z', value)
}

/// Check that a cell box, including the far faces one cell past `max`, can
/// be packed into vertex positions
pub(crate) fn check_packable(min: IVec3, max: IVec3) -> Result<()> {
    narrow('x', min.x)?;
    narrow('x', max.x + 1)?;
    narrow('y', min.y)?;
    narrow('y', max.y)?;
    narrow_z(min.z)?;
    narrow_z(max.z + 1)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world() {
        let r = VoxelRect::from_world(3, 0, 1, 0, 0, 1).unwrap();
        assert_eq!(r, VoxelRect { color: 3, sx: 0, ex: 1, y: 0, sz: 0, ez: 1 });
        assert_eq!(r.cell_count(), 4);
        assert_eq!(r.bounds().size(), IVec3::new(2, 1, 2));
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert!(matches!(
            VoxelRect::from_world(1, 40000, 40000, 0, 0, 0),
            Err(Error::CoordinateOverflow { axis: 'x', value: 40000 })
        ));
        // ex + 1 must still fit
        assert!(VoxelRect::from_world(1, 0, i16::MAX as i32, 0, 0, 0).is_err());
        assert!(VoxelRect::from_world(1, i16::MIN as i32, 0, 0, 0, 0).is_ok());
    }

    #[test]
    fn test_z_must_survive_fixed_point() {
        assert!(VoxelRect::from_world(1, 0, 0, 0, MIN_Z, MAX_Z - 1).is_ok());
        assert!(matches!(
            VoxelRect::from_world(1, 0, 0, 0, 2999, 3000),
            Err(Error::CoordinateOverflow { axis: 'z', value: 2999 })
        ));
        // the far face of a quad ending on the last packable row overflows
        assert!(matches!(
            VoxelRect::from_world(1, 0, 0, 0, 0, MAX_Z),
            Err(Error::CoordinateOverflow { axis: 'z', value: 2048 })
        ));
        assert!(VoxelRect::from_world(1, 0, 0, 0, MIN_Z - 1, 0).is_err());
    }

    #[test]
    fn test_check_packable() {
        assert!(check_packable(IVec3::new(-5, 0, -5), IVec3::new(5, 300, 5)).is_ok());
        assert!(matches!(
            check_packable(IVec3::new(39999, 0, 0), IVec3::new(40001, 0, 0)),
            Err(Error::CoordinateOverflow { axis: 'x', value: 39999 })
        ));
        assert!(check_packable(IVec3::ZERO, IVec3::new(0, 40000, 0)).is_err());
        assert!(check_packable(IVec3::ZERO, IVec3::new(0, 0, MAX_Z)).is_err());
    }

    #[test]
    fn test_cells() {
        let r = VoxelRect::from_world(1, 2, 3, 5, -1, 0).unwrap();
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![
            IVec3::new(2, 5, -1),
            IVec3::new(3, 5, -1),
            IVec3::new(2, 5, 0),
            IVec3::new(3, 5, 0),
        ]);
    }
}
