//! Voxel sources: models, their placed instances and the palette

use glam::IVec3;

use crate::core::{Error, Result};
use crate::math::GridTransform;
use super::grid::VoxelGrid;
use super::palette::Palette;

/// One placement of a model in the scene
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    /// Index into the source's model list
    pub model: usize,
    /// Rotation/mirror and translation into world space
    pub transform: GridTransform,
    /// Optional short name; exactly two ASCII digits overrides the area number
    pub name: Option<String>,
}

impl Instance {
    /// Create an unnamed instance
    pub fn new(model: usize, transform: GridTransform) -> Self {
        Self { model, transform, name: None }
    }

    /// Attach a name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Area number encoded in the name, if the name is exactly two ASCII digits
    pub fn area_override(&self) -> Option<i32> {
        match self.name.as_deref()?.as_bytes() {
            [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
                Some(((a - b'0') * 10 + (b - b'0')) as i32)
            }
            _ => None,
        }
    }
}

/// Anything that can provide models, instances and a palette for import
pub trait VoxelSource {
    fn palette(&self) -> &Palette;
    fn models(&self) -> &[VoxelGrid];
    fn instances(&self) -> &[Instance];

    /// Model placed by `instance`
    fn model_of(&self, instance: &Instance) -> Result<&VoxelGrid> {
        self.models().get(instance.model).ok_or_else(|| {
            Error::Voxel(format!(
                "instance references model {} but only {} exist",
                instance.model,
                self.models().len()
            ))
        })
    }
}

/// In-memory voxel source
#[derive(Clone, Debug, Default)]
pub struct VoxelScene {
    pub palette: Palette,
    pub models: Vec<VoxelGrid>,
    pub instances: Vec<Instance>,
}

impl VoxelScene {
    /// Create an empty source with the given palette
    pub fn new(palette: Palette) -> Self {
        Self { palette, models: Vec::new(), instances: Vec::new() }
    }

    /// Source holding one model placed once at the origin
    pub fn single(grid: VoxelGrid, palette: Palette) -> Self {
        let mut scene = Self::new(palette);
        let model = scene.add_model(grid);
        scene.place(Instance::new(model, GridTransform::IDENTITY));
        scene
    }

    /// Add a model, returning its index
    pub fn add_model(&mut self, grid: VoxelGrid) -> usize {
        self.models.push(grid);
        self.models.len() - 1
    }

    /// Add an instance
    pub fn place(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    /// Total cells over all instances, the cost of one merge pass
    pub fn instanced_volume(&self) -> usize {
        self.instances
            .iter()
            .filter_map(|i| self.models.get(i.model))
            .map(|m| m.volume())
            .sum()
    }

    /// Size of the model behind an instance, if it exists
    pub fn instance_size(&self, instance: &Instance) -> Option<IVec3> {
        self.models.get(instance.model).map(|m| m.size())
    }
}

impl VoxelSource for VoxelScene {
    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn models(&self) -> &[VoxelGrid] {
        &self.models
    }

    fn instances(&self) -> &[Instance] {
        &self.instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_override() {
        let i = Instance::new(0, GridTransform::IDENTITY);
        assert_eq!(i.area_override(), None);
        assert_eq!(i.clone().with_name("07").area_override(), Some(7));
        assert_eq!(i.clone().with_name("42").area_override(), Some(42));
        assert_eq!(i.clone().with_name("7").area_override(), None);
        assert_eq!(i.clone().with_name("070").area_override(), None);
        assert_eq!(i.clone().with_name("a7").area_override(), None);
    }

    #[test]
    fn test_missing_model_is_error() {
        let scene = VoxelScene::new(Palette::default());
        let bad = Instance::new(3, GridTransform::IDENTITY);
        assert!(scene.model_of(&bad).is_err());
    }

    #[test]
    fn test_single() {
        let scene = VoxelScene::single(VoxelGrid::empty(IVec3::new(2, 3, 4)), Palette::default());
        assert_eq!(scene.instances().len(), 1);
        assert_eq!(scene.instanced_volume(), 24);
        assert_eq!(scene.instance_size(&scene.instances[0]), Some(IVec3::new(2, 3, 4)));
    }
}
