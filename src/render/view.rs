//! View matrix for the quad pipelines
//!
//! A perspective frustum looking along +Y with Z up, optionally sheared so
//! that layers further away slide across the screen, and a final 1/16 Z scale
//! that undoes the 12.4 fixed-point z stored in the vertices.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::mesh::vertex::Z_SCALE;
use crate::scene::SceneParams;

/// Viewport and camera placement that do not belong to a scene
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub aspect_w: u32,
    pub aspect_h: u32,
    pub near: f32,
    pub far: f32,
    pub cam_x: f32,
    pub cam_y: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            aspect_w: 320,
            aspect_h: 168,
            near: 10.0,
            far: 300.0,
            cam_x: 0.0,
            cam_y: 0.0,
        }
    }
}

impl ViewSettings {
    pub fn aspect(&self) -> f32 {
        self.aspect_w as f32 / self.aspect_h.max(1) as f32
    }

    /// Look at the scene's target from its configured distance
    pub fn centered_on(params: &SceneParams) -> Self {
        Self {
            cam_x: params.cam_target.x,
            cam_y: params.cam_target.y,
            ..Default::default()
        }
    }
}

/// Shear X and Y proportionally to view-space Z
fn shear(z_x: f32, z_y: f32, w_x: f32, w_y: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::X,
        Vec4::Y,
        Vec4::new(z_x, z_y, 1.0, 0.0),
        Vec4::new(w_x, w_y, 0.0, 1.0),
    )
}

/// Combined projection, shear and camera transform applied to packed vertices
pub fn view_matrix(params: &SceneParams, view: &ViewSettings) -> Mat4 {
    let mut matrix = Mat4::perspective_rh_gl(
        params.fov.to_radians(),
        view.aspect(),
        view.near,
        view.far,
    );

    let eye = Vec3::new(view.cam_x, view.cam_y - params.cam_dist, params.cam_height);
    let target = Vec3::new(view.cam_x, view.cam_y, params.cam_height);
    let camera = Mat4::look_at_rh(eye, target, Vec3::Z);

    let s = params.shearing;
    if s.x != 0.0 || s.y != 0.0 {
        matrix *= shear(s.x, s.y, s.x * params.cam_dist, s.y * params.cam_dist);
    }

    let o = params.offset;
    if o.x != 0.0 || o.y != 0.0 {
        matrix *= shear(o.x, o.y, o.x * view.cam_y, 0.0);
    }

    matrix * camera * Mat4::from_scale(Vec3::new(1.0, 1.0, 1.0 / Z_SCALE))
}

/// Uniform block shared by the voxel and edge pipelines
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ViewUniform {
    /// Column-major view matrix (64 bytes, offset 0)
    pub view: [[f32; 4]; 4],
    /// Global opacity (4 bytes, offset 64)
    pub alpha: f32,
    /// Pad to 80 bytes
    pub _pad: [f32; 3],
}

impl ViewUniform {
    pub fn new(params: &SceneParams, view: &ViewSettings) -> Self {
        Self {
            view: view_matrix(params, view).to_cols_array_2d(),
            alpha: 1.0,
            _pad: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn project(m: Mat4, p: Vec3) -> Vec3 {
        m.project_point3(p)
    }

    fn flat_params() -> SceneParams {
        SceneParams {
            shearing: Vec2::ZERO,
            offset: Vec2::ZERO,
            ..Default::default()
        }
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<ViewUniform>(), 80);
    }

    #[test]
    fn test_target_projects_to_centre() {
        let params = flat_params();
        let view = ViewSettings { cam_x: 50.0, cam_y: 20.0, ..Default::default() };
        let m = view_matrix(&params, &view);
        // packed z is 16x world z
        let ndc = project(m, Vec3::new(50.0, 20.0, params.cam_height * Z_SCALE));
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "{:?}", ndc);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_shearing_keeps_target_fixed() {
        let mut params = flat_params();
        params.shearing = Vec2::new(0.3, -0.6);
        let view = ViewSettings { cam_x: 10.0, cam_y: 5.0, ..Default::default() };
        let m = view_matrix(&params, &view);
        let ndc = project(m, Vec3::new(10.0, 5.0, params.cam_height * Z_SCALE));
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "{:?}", ndc);

        // something closer to the camera moves
        let near = project(m, Vec3::new(10.0, -40.0, params.cam_height * Z_SCALE));
        let flat = project(view_matrix(&flat_params(), &view), Vec3::new(10.0, -40.0, params.cam_height * Z_SCALE));
        assert!((near - flat).length() > 1e-3);
    }

    #[test]
    fn test_offset_changes_matrix() {
        let view = ViewSettings { cam_y: 30.0, ..Default::default() };
        let mut with_offset = flat_params();
        with_offset.offset = Vec2::new(0.0, 0.1);
        assert_ne!(view_matrix(&with_offset, &view), view_matrix(&flat_params(), &view));
    }

    #[test]
    fn test_defaults() {
        let v = ViewSettings::centered_on(&SceneParams::default());
        assert_eq!((v.cam_x, v.cam_y), (127.0, 35.0));
        assert!((v.aspect() - 320.0 / 168.0).abs() < 1e-6);
        assert_eq!(ViewUniform::new(&SceneParams::default(), &v).alpha, 1.0);
    }
}
