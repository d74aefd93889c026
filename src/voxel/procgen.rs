//! Procedural "construct box": a room-shaped test scene of any size
//!
//! The room is split into models of at most 256 cells per axis, each placed
//! as its own instance. Only even Y layers are filled, which gives the merger
//! plenty of independent layers to work on.

use glam::IVec3;

use crate::math::GridTransform;
use super::grid::{VoxelGrid, EMPTY};
use super::palette::Palette;
use super::source::{Instance, VoxelScene};

/// Largest model extent on any axis
pub const MAX_MODEL_SIZE: i32 = 256;

// Palette indices into the stock palette
const CORNER: u8 = 16;
const FRAME: u8 = 8;
const LIGHT: u8 = 15;
const DARK: u8 = 13;
const ACCENT: u8 = 14;
const STRIPE: u8 = 7;

/// Generate a construct box with an interior of `size` cells surrounded by
/// `margin` cells of floor, walls and apron on every side
///
/// With `roof` set, the first layer above the interior is closed off.
pub fn generate_box(size: IVec3, roof: bool, margin: i32) -> VoxelScene {
    let margin = margin.max(0);
    let total = size.max(IVec3::ONE) + IVec3::splat(margin * 2);
    let mut scene = VoxelScene::new(Palette::magica_default());

    for ix in (0..total.x).step_by(MAX_MODEL_SIZE as usize) {
        for iy in (0..total.y).step_by(MAX_MODEL_SIZE as usize) {
            for iz in (0..total.z).step_by(MAX_MODEL_SIZE as usize) {
                let start = IVec3::new(ix, iy, iz);
                let dim = (total - start).min(IVec3::splat(MAX_MODEL_SIZE));
                let center = start + dim / 2 + dim % 2 - IVec3::splat(margin);

                let shape = BoxShape { dim, center, total, margin, roof };
                let model = scene.add_model(VoxelGrid::from_fn(dim, |v| shape.color(v)));

                let mut translation = center;
                if margin == 0 {
                    translation.y = 0;
                    translation.z -= total.z;
                }
                scene.place(Instance::new(model, GridTransform::from_translation(translation)));
            }
        }
    }

    log::debug!(
        "construct box {} (margin {}): {} models",
        size,
        margin,
        scene.models.len()
    );
    scene
}

struct BoxShape {
    dim: IVec3,
    center: IVec3,
    total: IVec3,
    margin: i32,
    roof: bool,
}

impl BoxShape {
    fn color(&self, v: IVec3) -> u8 {
        let (dim, total, margin) = (self.dim, self.total, self.margin);

        if v.y % 2 == 1 || v.y < margin / 2 {
            return EMPTY;
        }
        if v.z >= dim.z - margin {
            return if self.roof && v.z == dim.z - margin { DARK } else { EMPTY };
        }

        let abs_x = v.x + self.center.x - dim.x / 2;
        let y_edge = v.y == 0 || v.y == dim.y - 1;
        let z_edge = v.z == 0 || v.z == dim.z - 1;

        let floor = v.z < margin;
        let back_wall = margin == 0 || v.y >= dim.y - margin;
        let side_wall = abs_x < 2 || abs_x >= (total.x - margin * 2) - 2;

        let mut col = EMPTY;
        if y_edge && z_edge {
            col = CORNER;
        } else if floor {
            col = if abs_x < margin * 2 || abs_x >= total.x - 4 * margin {
                FRAME
            } else if v.y % 4 == 2 {
                LIGHT
            } else {
                DARK
            };
            if v.y == 4 {
                col = FRAME;
            }
            if v.y == 2 {
                col = ACCENT;
            }
        } else if back_wall || side_wall {
            col = wall_band(v.z, dim.z - margin);
        }

        if !floor && back_wall && (abs_x < margin || abs_x >= total.x - 3 * margin) {
            col = if v.z < margin { DARK } else { ACCENT };
        }

        if v.y == 2 {
            if abs_x < -margin / 2 || abs_x > total.x - 2 * margin + margin / 2 {
                col = DARK;
            } else if abs_x < 0 || abs_x > total.x - 2 * margin {
                col = ACCENT;
            }
            if v.z < margin / 2 {
                col = DARK;
            }
        }

        col
    }
}

/// Horizontal bands of a wall column; `top` is the first layer above the room
fn wall_band(z: i32, top: i32) -> u8 {
    if z >= top - 2 {
        ACCENT
    } else if z >= top - 6 {
        DARK
    } else if z >= top - 8 {
        ACCENT
    } else if z >= top - 10 {
        STRIPE
    } else if z >= top - 12 {
        ACCENT
    } else if z > 5 && z < 20 {
        STRIPE
    } else if z == 4 || z == 5 {
        ACCENT
    } else {
        LIGHT
    }
}
