//! Scene assembly: merge every placed instance and collect the results
//!
//! The scene owns the palette, the flat rectangle and edge lists, and one
//! [`Area`] per instance recording which slice of those lists it produced.
//! Every import replaces all of it wholesale and takes a new revision, which
//! is how renderers notice that their buffers need a rebuild.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::Result;
use crate::math::GridBounds;
use crate::voxel::{merge_instance, Edge, MergeConfig, Palette, Rgba, VoxelRect, VoxelSource};
use super::area::{Area, FIRST_AREA_NO};
use super::config::SceneParams;

/// Revisions are drawn from one process-wide sequence, so two scenes never
/// share a revision unless one is a clone of the other.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Compiled scene: palette, areas and their merged geometry
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub params: SceneParams,
    palette: Palette,
    areas: Vec<Area>,
    voxels: Vec<VoxelRect>,
    edges: Vec<Edge>,
    revision: u64,
}

impl Scene {
    /// Create an empty scene
    pub fn new(params: SceneParams) -> Self {
        Self { params, ..Default::default() }
    }

    /// Merge every instance of `source`, replacing the palette, areas and
    /// geometry. On error the scene is left unchanged.
    pub fn import<S: VoxelSource + ?Sized>(&mut self, source: &S, config: &MergeConfig) -> Result<()> {
        let instances = source.instances();
        let mut areas = Vec::with_capacity(instances.len());
        let mut voxels = Vec::new();
        let mut edges: Vec<Edge> = Vec::new();

        for (index, instance) in instances.iter().enumerate() {
            let no = instance
                .area_override()
                .unwrap_or(FIRST_AREA_NO + index as i32);
            let grid = source.model_of(instance)?;
            let merged = merge_instance(grid, &instance.transform, no, config)?;

            let bounds = merged
                .rects
                .iter()
                .map(VoxelRect::bounds)
                .chain(merged.edges.iter().map(Edge::bounds))
                .fold(None, |acc, b| Some(GridBounds::union(acc, b)));

            let rect_start = voxels.len();
            let edge_start = edges.len();
            voxels.extend(merged.rects);
            for mut edge in merged.edges {
                edge.id = edges.len() as u32;
                edges.push(edge);
            }

            areas.push(Area {
                no,
                name: instance.name.clone(),
                origin: merged.origin,
                size: merged.size,
                bounds,
                rects: rect_start..voxels.len(),
                edges: edge_start..edges.len(),
            });
        }

        log::info!(
            "Imported {} areas: {} rects, {} edges",
            areas.len(),
            voxels.len(),
            edges.len()
        );

        self.palette = source.palette().clone();
        self.areas = areas;
        self.voxels = voxels;
        self.edges = edges;
        self.mark_updated();
        Ok(())
    }

    /// Flag the geometry as changed so the next render tick rebuilds
    pub fn mark_updated(&mut self) {
        self.revision = NEXT_REVISION.fetch_add(1, Ordering::Relaxed);
    }

    /// Identifies the current geometry: 0 for a scene that was never filled,
    /// otherwise a fresh value after every import and [`Scene::mark_updated`]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Change one palette entry; topology is unaffected, so a renderer
    /// update (not a rebuild) is enough to show it
    pub fn set_color(&mut self, index: u8, color: Rgba) {
        self.palette.set(index, color);
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Flat rectangle list over all areas
    pub fn voxels(&self) -> &[VoxelRect] {
        &self.voxels
    }

    /// Flat edge list over all areas, ids in order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// First area with number `no`
    pub fn find_area(&self, no: i32) -> Option<&Area> {
        self.areas.iter().find(|a| a.no == no)
    }

    /// Rectangles produced by area `no`
    pub fn area_rects(&self, no: i32) -> Option<&[VoxelRect]> {
        let area = self.find_area(no)?;
        self.voxels.get(area.rects.clone())
    }

    /// Edges produced by area `no`
    pub fn area_edges(&self, no: i32) -> Option<&[Edge]> {
        let area = self.find_area(no)?;
        self.edges.get(area.edges.clone())
    }

    /// Bounds of all geometry in the scene
    pub fn bounds(&self) -> Option<GridBounds> {
        self.areas
            .iter()
            .filter_map(|a| a.bounds)
            .reduce(|a, b| a.merged(&b))
    }

    /// Drop all geometry, keeping params and palette
    pub fn clear(&mut self) {
        self.areas.clear();
        self.voxels.clear();
        self.edges.clear();
        self.mark_updated();
    }
}
