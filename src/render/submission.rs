//! Upload-once, draw-many submission of packed mesh buffers
//!
//! [`MeshRenderer`] owns the most recent [`MeshBuffers`] and the device
//! buffers created from them. A scene revision change triggers a rebuild:
//! the old device buffers are released, the scene is re-packed and uploaded.
//! Otherwise every tick reuses what is already resident.

use std::ops::Range;

use crate::mesh::MeshBuffers;
use crate::scene::{Scene, SceneParams};

/// Which of the two vertex formats a buffer holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Voxel,
    Edge,
}

/// Destination for vertex data, normally GPU memory
pub trait VertexSink {
    type Buffer;

    /// Create a device buffer holding `bytes`
    fn upload(&mut self, kind: BufferKind, bytes: &[u8]) -> Self::Buffer;

    /// Overwrite an existing buffer with same-sized data
    fn rewrite(&mut self, buffer: &Self::Buffer, bytes: &[u8]);

    /// Free a buffer that will not be drawn again
    fn release(&mut self, buffer: Self::Buffer);
}

/// One non-indexed draw over a vertex range
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub kind: BufferKind,
    pub vertices: Range<u32>,
}

struct Resident<B> {
    mesh: MeshBuffers,
    voxel: Option<B>,
    edge: Option<B>,
}

/// Keeps packed buffers resident in a [`VertexSink`] and produces draw calls
pub struct MeshRenderer<S: VertexSink> {
    sink: S,
    params: SceneParams,
    resident: Option<Resident<S::Buffer>>,
}

impl<S: VertexSink> MeshRenderer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, params: SceneParams::default(), resident: None }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Parameters copied from the scene on the last tick or update
    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    /// Mesh currently resident, if any
    pub fn mesh(&self) -> Option<&MeshBuffers> {
        self.resident.as_ref().map(|r| &r.mesh)
    }

    /// Device buffer of `kind`; `None` before upload or when it would be empty
    pub fn buffer(&self, kind: BufferKind) -> Option<&S::Buffer> {
        let r = self.resident.as_ref()?;
        match kind {
            BufferKind::Voxel => r.voxel.as_ref(),
            BufferKind::Edge => r.edge.as_ref(),
        }
    }

    /// True when the resident mesh was not packed from the scene's current revision
    pub fn needs_rebuild(&self, scene: &Scene) -> bool {
        self.resident
            .as_ref()
            .is_none_or(|r| r.mesh.revision() != scene.revision())
    }

    /// Per-frame entry point: rebuild if the scene changed, copy its
    /// parameters, and return the draws for `area` (see [`Self::draw_calls`])
    pub fn render_tick(&mut self, scene: &Scene, area: Option<i32>) -> Vec<DrawCall> {
        if self.needs_rebuild(scene) {
            self.rebuild(MeshBuffers::from_scene(scene));
        }
        self.params = scene.params;
        self.draw_calls(area)
    }

    /// Take ownership of `mesh`, releasing the previous device buffers first
    pub fn rebuild(&mut self, mesh: MeshBuffers) {
        self.release_all();

        let voxel = (!mesh.voxel_bytes().is_empty())
            .then(|| self.sink.upload(BufferKind::Voxel, mesh.voxel_bytes()));
        let edge = (!mesh.edge_bytes().is_empty())
            .then(|| self.sink.upload(BufferKind::Edge, mesh.edge_bytes()));

        log::info!(
            "Uploaded mesh revision {}: {} voxel vertices, {} edge vertices",
            mesh.revision(),
            mesh.voxel_vertex_count(),
            mesh.edge_vertex_count()
        );
        self.resident = Some(Resident { mesh, voxel, edge });
    }

    /// Copy the scene parameters and re-pack into the resident buffers
    ///
    /// Used when only colours or camera settings changed. If the scene's
    /// topology moved on since the last upload this falls back to a rebuild.
    pub fn update(&mut self, scene: &Scene) {
        self.params = scene.params;
        if self.needs_rebuild(scene) {
            self.rebuild(MeshBuffers::from_scene(scene));
            return;
        }

        let mesh = MeshBuffers::from_scene(scene);
        let Some(resident) = self.resident.as_mut() else {
            return;
        };
        if mesh.voxel_bytes().len() != resident.mesh.voxel_bytes().len()
            || mesh.edge_bytes().len() != resident.mesh.edge_bytes().len()
        {
            // A palette change can hide or reveal edge pieces.
            self.rebuild(mesh);
            return;
        }
        if let Some(buffer) = &resident.voxel {
            self.sink.rewrite(buffer, mesh.voxel_bytes());
        }
        if let Some(buffer) = &resident.edge {
            self.sink.rewrite(buffer, mesh.edge_bytes());
        }
        resident.mesh = mesh;
    }

    /// Draws for the whole scene (`None` or area 0) or for one area number
    pub fn draw_calls(&self, area: Option<i32>) -> Vec<DrawCall> {
        let Some(resident) = self.resident.as_ref() else {
            return Vec::new();
        };
        let mesh = &resident.mesh;

        let (voxels, edges) = match area {
            None | Some(0) => (0..mesh.voxel_vertex_count(), 0..mesh.edge_vertex_count()),
            Some(no) => match mesh.area(no) {
                Some(range) => (range.voxel_vertices.clone(), range.edge_vertices.clone()),
                None => return Vec::new(),
            },
        };

        let mut calls = Vec::with_capacity(2);
        if !voxels.is_empty() && resident.voxel.is_some() {
            calls.push(DrawCall { kind: BufferKind::Voxel, vertices: voxels });
        }
        if !edges.is_empty() && resident.edge.is_some() {
            calls.push(DrawCall { kind: BufferKind::Edge, vertices: edges });
        }
        calls
    }

    /// Release every device buffer and forget the resident mesh
    pub fn release_all(&mut self) {
        if let Some(resident) = self.resident.take() {
            if let Some(buffer) = resident.voxel {
                self.sink.release(buffer);
            }
            if let Some(buffer) = resident.edge {
                self.sink.release(buffer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use crate::math::GridTransform;
    use crate::voxel::{EdgeMarkers, Instance, MergeConfig, Palette, Rgba, VoxelGrid, VoxelScene};

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Upload(usize, BufferKind, usize),
        Rewrite(usize, usize),
        Release(usize),
    }

    #[derive(Default)]
    struct RecordingSink {
        next: usize,
        events: Vec<Event>,
    }

    impl VertexSink for RecordingSink {
        type Buffer = usize;

        fn upload(&mut self, kind: BufferKind, bytes: &[u8]) -> usize {
            let id = self.next;
            self.next += 1;
            self.events.push(Event::Upload(id, kind, bytes.len()));
            id
        }

        fn rewrite(&mut self, buffer: &usize, bytes: &[u8]) {
            self.events.push(Event::Rewrite(*buffer, bytes.len()));
        }

        fn release(&mut self, buffer: usize) {
            self.events.push(Event::Release(buffer));
        }
    }

    fn source() -> VoxelScene {
        let mut source = VoxelScene::new(Palette::magica_default());
        let slab = source.add_model(VoxelGrid::new(IVec3::new(2, 1, 2), vec![3; 4]).unwrap());

        let m = EdgeMarkers::default();
        let mut strip = VoxelGrid::empty(IVec3::new(3, 3, 1));
        strip.fill(IVec3::ZERO, IVec3::new(2, 0, 0), m.left);
        strip.fill(IVec3::new(0, 1, 0), IVec3::new(2, 1, 0), 6);
        strip.fill(IVec3::new(0, 2, 0), IVec3::new(2, 2, 0), m.left);
        let strip = source.add_model(strip);

        source.place(Instance::new(slab, GridTransform::IDENTITY));
        source.place(Instance::new(strip, GridTransform::from_translation(IVec3::new(10, 0, 0))).with_name("05"));
        source
    }

    fn scene() -> Scene {
        let mut scene = Scene::default();
        scene.import(&source(), &MergeConfig::with_edges()).unwrap();
        scene
    }

    #[test]
    fn test_first_tick_uploads_once() {
        let scene = scene();
        let mut renderer = MeshRenderer::new(RecordingSink::default());
        assert!(renderer.needs_rebuild(&scene));

        let calls = renderer.render_tick(&scene, None);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], DrawCall { kind: BufferKind::Voxel, vertices: 0..6 });
        assert_eq!(calls[1].kind, BufferKind::Edge);

        renderer.render_tick(&scene, None);
        renderer.render_tick(&scene, Some(0));
        let uploads = renderer
            .sink()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Upload(..)))
            .count();
        assert_eq!(uploads, 2);
        assert!(!renderer.needs_rebuild(&scene));
    }

    #[test]
    fn test_revision_change_releases_then_uploads() {
        let mut scene = scene();
        let mut renderer = MeshRenderer::new(RecordingSink::default());
        renderer.render_tick(&scene, None);

        scene.mark_updated();
        renderer.render_tick(&scene, None);

        let events = &renderer.sink().events;
        assert_eq!(events[2], Event::Release(0));
        assert_eq!(events[3], Event::Release(1));
        assert!(matches!(events[4], Event::Upload(2, BufferKind::Voxel, 72)));
        assert_eq!(renderer.mesh().map(|m| m.revision()), Some(scene.revision()));
    }

    #[test]
    fn test_update_rewrites_in_place() {
        let mut scene = scene();
        let mut renderer = MeshRenderer::new(RecordingSink::default());
        renderer.render_tick(&scene, None);

        scene.set_color(3, Rgba::rgb(1, 2, 3));
        scene.params.fov = 60.0;
        renderer.update(&scene);

        let events = &renderer.sink().events;
        assert_eq!(events.len(), 4);
        assert_eq!(events[2], Event::Rewrite(0, 72));
        assert!(matches!(events[3], Event::Rewrite(1, _)));
        assert_eq!(renderer.params().fov, 60.0);

        let first = &renderer.mesh().unwrap().voxel_bytes()[8..12];
        assert_eq!(first, &[1, 2, 3, 3]);
    }

    #[test]
    fn test_update_with_hidden_edge_rebuilds() {
        let mut scene = scene();
        let mut renderer = MeshRenderer::new(RecordingSink::default());
        renderer.render_tick(&scene, None);

        scene.set_color(6, Rgba::TRANSPARENT);
        renderer.update(&scene);

        let events = &renderer.sink().events;
        assert!(events.contains(&Event::Release(1)));
        // every edge piece is now invisible, so no edge buffer is uploaded
        assert!(renderer.buffer(BufferKind::Edge).is_none());
        assert!(renderer.draw_calls(None).iter().all(|c| c.kind == BufferKind::Voxel));
    }

    #[test]
    fn test_area_draw() {
        let scene = scene();
        let mut renderer = MeshRenderer::new(RecordingSink::default());

        let calls = renderer.render_tick(&scene, Some(5));
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, BufferKind::Edge);
        assert_eq!(calls[0].vertices.start, 0);

        let calls = renderer.draw_calls(Some(100));
        assert_eq!(calls, vec![DrawCall { kind: BufferKind::Voxel, vertices: 0..6 }]);

        assert!(renderer.draw_calls(Some(77)).is_empty());
    }

    #[test]
    fn test_empty_scene_draws_nothing() {
        let mut renderer = MeshRenderer::new(RecordingSink::default());
        assert!(renderer.draw_calls(None).is_empty());

        let calls = renderer.render_tick(&Scene::default(), None);
        assert!(calls.is_empty());
        assert!(renderer.sink().events.is_empty());
        assert!(renderer.mesh().is_some());
    }

    #[test]
    fn test_switching_to_a_new_scene_rebuilds() {
        let a = scene();
        let mut row = VoxelScene::new(Palette::magica_default());
        let model = row.add_model(VoxelGrid::new(IVec3::new(4, 1, 1), vec![1, 2, 3, 4]).unwrap());
        row.place(Instance::new(model, GridTransform::IDENTITY));
        let mut b = Scene::default();
        b.import(&row, &MergeConfig::default()).unwrap();

        let mut renderer = MeshRenderer::new(RecordingSink::default());
        renderer.render_tick(&a, None);
        assert!(renderer.needs_rebuild(&b));

        let calls = renderer.render_tick(&b, None);
        assert_eq!(calls, vec![DrawCall { kind: BufferKind::Voxel, vertices: 0..24 }]);
        assert_eq!(renderer.mesh().map(|m| m.voxel_quad_count()), Some(4));
        assert!(renderer.sink().events.contains(&Event::Upload(2, BufferKind::Voxel, 24 * 12)));
    }

    #[test]
    fn test_release_all() {
        let scene = scene();
        let mut renderer = MeshRenderer::new(RecordingSink::default());
        renderer.render_tick(&scene, None);
        renderer.release_all();
        assert!(renderer.mesh().is_none());
        assert!(renderer.needs_rebuild(&scene));
        assert_eq!(renderer.sink().events.len(), 4);
    }
}
