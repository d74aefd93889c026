//! wgpu backing for mesh submission

use wgpu::util::DeviceExt;

use crate::mesh::{EdgeVertex, VoxelVertex};
use super::submission::{BufferKind, DrawCall, MeshRenderer, VertexSink};
use super::view::ViewUniform;

const VOXEL_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Sint16x4,
    1 => Unorm8x4
];

const EDGE_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Sint16x4,
    1 => Unorm8x4,
    2 => Uint8x4
];

/// Layout of [`VoxelVertex`]: position, then colour with the palette index in alpha
pub fn voxel_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: VoxelVertex::SIZE as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VOXEL_ATTRIBUTES,
    }
}

/// Layout of [`EdgeVertex`]: the voxel fields plus width, spacing, height, align
pub fn edge_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: EdgeVertex::SIZE as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &EDGE_ATTRIBUTES,
    }
}

/// [`VertexSink`] writing into device vertex buffers
pub struct WgpuSink<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl<'a> WgpuSink<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

impl VertexSink for WgpuSink<'_> {
    type Buffer = wgpu::Buffer;

    fn upload(&mut self, kind: BufferKind, bytes: &[u8]) -> wgpu::Buffer {
        let label = match kind {
            BufferKind::Voxel => "voxel_vertices",
            BufferKind::Edge => "edge_vertices",
        };
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn rewrite(&mut self, buffer: &wgpu::Buffer, bytes: &[u8]) {
        self.queue.write_buffer(buffer, 0, bytes);
    }

    fn release(&mut self, buffer: wgpu::Buffer) {
        buffer.destroy();
    }
}

/// Uniform buffer holding the [`ViewUniform`] for both pipelines
pub struct ViewBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ViewBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view_uniform"),
            size: std::mem::size_of::<ViewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("view_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("view_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group_layout, bind_group }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &ViewUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Pipelines the draw calls are recorded with
pub struct QuadPipelines<'a> {
    pub voxel: &'a wgpu::RenderPipeline,
    pub edge: &'a wgpu::RenderPipeline,
}

/// Record `calls` into `pass`, switching pipeline and vertex buffer per kind
pub fn record_draws(
    pass: &mut wgpu::RenderPass<'_>,
    renderer: &MeshRenderer<WgpuSink<'_>>,
    pipelines: &QuadPipelines<'_>,
    view: &ViewBuffer,
    calls: &[DrawCall],
) {
    for call in calls {
        let Some(buffer) = renderer.buffer(call.kind) else {
            continue;
        };
        let pipeline = match call.kind {
            BufferKind::Voxel => pipelines.voxel,
            BufferKind::Edge => pipelines.edge,
        };
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, view.bind_group(), &[]);
        pass.set_vertex_buffer(0, buffer.slice(..));
        pass.draw(call.vertices.clone(), 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_match_vertex_sizes() {
        let voxel = voxel_vertex_layout();
        assert_eq!(voxel.array_stride, 12);
        let offsets: Vec<u64> = voxel.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8]);

        let edge = edge_vertex_layout();
        assert_eq!(edge.array_stride, 16);
        let offsets: Vec<u64> = edge.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 12]);
        assert_eq!(edge.attributes[2].format, wgpu::VertexFormat::Uint8x4);
    }
}
