use wgpu::util::DeviceExt;

use super::MeshData;
use crate::render::TeardownReport;

/// Immutable GPU copies of a mesh's vertex and index streams.
///
/// Neither buffer is CPU-writable after creation; the usages carry no
/// `COPY_DST`.
pub struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl MeshBuffers {
    pub fn upload(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("nabu mesh vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("nabu mesh indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "uploaded mesh: {} B vertices, {} B indices",
            vertex_buffer.size(),
            index_buffer.size()
        );

        Self {
            vertex_buffer,
            index_buffer,
            vertex_count: mesh.vertex_count() as u32,
            index_count: mesh.index_count() as u32,
        }
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of indices in the index stream; the draw call count.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub(crate) fn release(self, report: &mut TeardownReport) {
        self.index_buffer.destroy();
        report.record("index buffer");
        self.vertex_buffer.destroy();
        report.record("vertex buffer");
    }
}
