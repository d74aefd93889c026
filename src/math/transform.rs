//! Placement transforms between a voxel model's local axes and the world grid
//!
//! Placements only ever rotate by quarter turns or mirror axes, so every
//! matrix entry is -1, 0 or 1 and integer round trips are exact. The linear
//! part maps local axes to world axes as column vectors: `world = M * local`.

use glam::{IVec3, Mat3, Vec3};

/// Linear placement (rotation/mirror) plus integer translation of one instance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTransform {
    linear: Mat3,
    translation: IVec3,
}

impl Default for GridTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GridTransform {
    /// No rotation, no mirror, no translation
    pub const IDENTITY: GridTransform = GridTransform {
        linear: Mat3::IDENTITY,
        translation: IVec3::ZERO,
    };

    /// Create a transform from a linear map and a translation
    pub fn new(linear: Mat3, translation: IVec3) -> Self {
        Self { linear, translation }
    }

    /// Pure translation
    pub fn from_translation(translation: IVec3) -> Self {
        Self { linear: Mat3::IDENTITY, translation }
    }

    /// Quarter turns around the Z axis (counter-clockwise looking down -Z)
    pub fn rotation_z(quarter_turns: i32, translation: IVec3) -> Self {
        let (c, s) = match quarter_turns.rem_euclid(4) {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        };
        let linear = Mat3::from_cols(
            Vec3::new(c, s, 0.0),
            Vec3::new(-s, c, 0.0),
            Vec3::Z,
        );
        Self { linear, translation }
    }

    /// Mirror along the given axes
    pub fn mirror(x: bool, y: bool, z: bool, translation: IVec3) -> Self {
        let sign = |m: bool| if m { -1.0 } else { 1.0 };
        let linear = Mat3::from_diagonal(Vec3::new(sign(x), sign(y), sign(z)));
        Self { linear, translation }
    }

    pub fn linear(&self) -> Mat3 {
        self.linear
    }

    pub fn translation(&self) -> IVec3 {
        self.translation
    }

    /// True when the linear part is the identity (translation is ignored)
    pub fn is_identity(&self) -> bool {
        self.linear == Mat3::IDENTITY
    }

    /// Apply only the linear part
    pub fn apply_linear(&self, v: IVec3) -> IVec3 {
        apply(&self.linear, v)
    }

    /// Map a local coordinate to world space: linear map, then translation
    pub fn to_world(&self, local: IVec3) -> IVec3 {
        self.apply_linear(local) + self.translation
    }

    /// Describe the world-aligned iteration space of a model of `model_size`
    /// placed with this transform
    pub fn space(&self, model_size: IVec3) -> GridSpace {
        let inverse = if self.is_identity() {
            None
        } else {
            Some(self.linear.inverse())
        };
        GridSpace {
            model_size,
            signed_size: self.apply_linear(model_size),
            inverse,
        }
    }

    /// World coordinate of space cell (0, 0, 0): the space is centred on the
    /// translation
    pub fn origin(&self, space: &GridSpace) -> IVec3 {
        self.translation - space.size() / 2
    }
}

/// World-aligned box of cells covering one placed model
///
/// Iteration happens over `0..size()` on each axis; [`GridSpace::local`]
/// maps a space cell back to the model's own index space for sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpace {
    model_size: IVec3,
    /// Model size pushed through the linear map; a negative axis is mirrored
    signed_size: IVec3,
    /// `None` when the placement is the identity
    inverse: Option<Mat3>,
}

impl GridSpace {
    /// Absolute extent of the space on each axis
    pub fn size(&self) -> IVec3 {
        self.signed_size.abs()
    }

    pub fn signed_size(&self) -> IVec3 {
        self.signed_size
    }

    pub fn model_size(&self) -> IVec3 {
        self.model_size
    }

    /// Number of cells in the space
    pub fn volume(&self) -> usize {
        let s = self.size();
        s.x as usize * s.y as usize * s.z as usize
    }

    /// Map a space cell back into the model's local index space
    pub fn local(&self, space: IVec3) -> IVec3 {
        let Some(inverse) = self.inverse else {
            return space;
        };

        let mut p = space;
        for axis in 0..3 {
            if self.signed_size[axis] < 0 {
                p[axis] = -self.signed_size[axis] - 1 - p[axis];
            }
        }
        apply(&inverse, p).abs()
    }

    /// Linear offset of a space cell in the model's x-fastest voxel array
    pub fn offset(&self, space: IVec3) -> usize {
        let l = self.local(space);
        let sx = self.model_size.x as i64;
        let sy = self.model_size.y as i64;
        (l.x as i64 + l.y as i64 * sx + l.z as i64 * sx * sy) as usize
    }

    /// True when `p` lies inside `0..size()` on every axis
    pub fn contains(&self, p: IVec3) -> bool {
        let s = self.size();
        p.cmpge(IVec3::ZERO).all() && p.cmplt(s).all()
    }
}

fn apply(m: &Mat3, v: IVec3) -> IVec3 {
    (*m * v.as_vec3()).round().as_ivec3()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_fast_path() {
        let t = GridTransform::from_translation(IVec3::new(5, 6, 7));
        assert!(t.is_identity());
        let space = t.space(IVec3::new(4, 3, 2));
        assert_eq!(space.size(), IVec3::new(4, 3, 2));
        assert_eq!(space.local(IVec3::new(1, 2, 1)), IVec3::new(1, 2, 1));
        assert_eq!(space.offset(IVec3::new(1, 2, 1)), 1 + 2 * 4 + 4 * 3);
    }

    #[test]
    fn test_to_world() {
        let t = GridTransform::rotation_z(1, IVec3::new(10, 0, 0));
        assert_eq!(t.to_world(IVec3::new(1, 0, 0)), IVec3::new(10, 1, 0));
        assert_eq!(t.to_world(IVec3::new(0, 1, 0)), IVec3::new(9, 0, 0));
        assert_eq!(t.to_world(IVec3::new(0, 0, 3)), IVec3::new(10, 0, 3));
    }

    #[test]
    fn test_mirror_remaps_indices() {
        let t = GridTransform::mirror(true, false, false, IVec3::ZERO);
        let space = t.space(IVec3::new(4, 2, 2));
        assert_eq!(space.signed_size(), IVec3::new(-4, 2, 2));
        assert_eq!(space.size(), IVec3::new(4, 2, 2));
        assert_eq!(space.local(IVec3::new(0, 1, 1)), IVec3::new(3, 1, 1));
        assert_eq!(space.local(IVec3::new(3, 0, 0)), IVec3::new(0, 0, 0));
    }

    #[test]
    fn test_mirror_uses_own_axis_size() {
        let t = GridTransform::mirror(false, true, false, IVec3::ZERO);
        let space = t.space(IVec3::new(5, 3, 2));
        assert_eq!(space.local(IVec3::new(0, 0, 0)), IVec3::new(0, 2, 0));
        assert_eq!(space.local(IVec3::new(4, 2, 1)), IVec3::new(4, 0, 1));
    }

    #[test]
    fn test_quarter_turn_visits_every_cell_once() {
        let model = IVec3::new(3, 2, 2);
        let space = GridTransform::rotation_z(1, IVec3::ZERO).space(model);
        assert_eq!(space.size(), IVec3::new(2, 3, 2));

        let mut seen = vec![false; 12];
        for z in 0..2 {
            for y in 0..3 {
                for x in 0..2 {
                    let off = space.offset(IVec3::new(x, y, z));
                    assert!(!seen[off], "offset {} visited twice", off);
                    seen[off] = true;
                }
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_origin_centres_space() {
        let t = GridTransform::from_translation(IVec3::new(10, 0, 4));
        let space = t.space(IVec3::new(4, 5, 2));
        assert_eq!(t.origin(&space), IVec3::new(8, -2, 3));
    }

    #[test]
    fn test_contains() {
        let space = GridTransform::IDENTITY.space(IVec3::new(2, 2, 2));
        assert!(space.contains(IVec3::new(1, 1, 1)));
        assert!(!space.contains(IVec3::new(2, 0, 0)));
        assert!(!space.contains(IVec3::new(0, -1, 0)));
    }
}
