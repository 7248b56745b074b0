//! Mesh models: vertex/index buffers with bind/draw operations.

use std::sync::Arc;

use ash::vk;

use ember_gpu::{GpuBuffer, GpuContext, Result};

/// A single mesh vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    /// Vertex buffer binding descriptions for the mesh pipeline.
    pub fn binding_descriptions() -> Vec<vk::VertexInputBindingDescription> {
        vec![vk::VertexInputBindingDescription::default()
            .binding(0)
            .stride(std::mem::size_of::<Self>() as u32)
            .input_rate(vk::VertexInputRate::VERTEX)]
    }

    /// Vertex attribute descriptions matching the shader interface.
    pub fn attribute_descriptions() -> Vec<vk::VertexInputAttributeDescription> {
        vec![
            vk::VertexInputAttributeDescription::default()
                .binding(0)
                .location(0)
                .format(vk::Format::R32G32B32_SFLOAT)
                .offset(std::mem::offset_of!(Self, position) as u32),
            vk::VertexInputAttributeDescription::default()
                .binding(0)
                .location(1)
                .format(vk::Format::R32G32B32_SFLOAT)
                .offset(std::mem::offset_of!(Self, color) as u32),
        ]
    }
}

/// CPU-side mesh description used to build a [`Model`].
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    /// Empty for non-indexed meshes.
    pub indices: Vec<u32>,
}

/// GPU-resident mesh with bind and draw operations.
pub struct Model {
    gpu: Arc<GpuContext>,
    vertex_buffer: GpuBuffer,
    vertex_count: u32,
    index_buffer: Option<GpuBuffer>,
    index_count: u32,
}

impl Model {
    /// Upload a mesh into device-local buffers.
    ///
    /// # Panics
    /// If the mesh has fewer than three vertices.
    pub fn new(gpu: Arc<GpuContext>, data: &MeshData) -> Result<Self> {
        assert!(
            data.vertices.len() >= 3,
            "Vertex count must be at least 3"
        );

        let vertex_buffer = gpu.upload_device_local(
            &data.vertices,
            vk::BufferUsageFlags::VERTEX_BUFFER,
            "vertex buffer",
        )?;
        let vertex_count = data.vertices.len() as u32;

        let index_count = data.indices.len() as u32;
        let index_buffer = if data.indices.is_empty() {
            None
        } else {
            Some(gpu.upload_device_local(
                &data.indices,
                vk::BufferUsageFlags::INDEX_BUFFER,
                "index buffer",
            )?)
        };

        Ok(Self {
            gpu,
            vertex_buffer,
            vertex_count,
            index_buffer,
            index_count,
        })
    }

    /// Bind the mesh buffers.
    ///
    /// # Safety
    /// The command buffer must be valid and recording.
    pub unsafe fn bind(&self, cmd: vk::CommandBuffer) {
        let device = self.gpu.device();
        unsafe {
            device.cmd_bind_vertex_buffers(cmd, 0, &[self.vertex_buffer.buffer], &[0]);
            if let Some(index_buffer) = &self.index_buffer {
                device.cmd_bind_index_buffer(cmd, index_buffer.buffer, 0, vk::IndexType::UINT32);
            }
        }
    }

    /// Draw the mesh. Must be called after [`Self::bind`].
    ///
    /// # Safety
    /// The command buffer must be valid, recording, and inside a render pass
    /// with a compatible pipeline bound.
    pub unsafe fn draw(&self, cmd: vk::CommandBuffer) {
        let device = self.gpu.device();
        unsafe {
            if self.index_buffer.is_some() {
                device.cmd_draw_indexed(cmd, self.index_count, 1, 0, 0, 0);
            } else {
                device.cmd_draw(cmd, self.vertex_count, 1, 0, 0);
            }
        }
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        let _ = self.gpu.wait_idle();
        let mut allocator = self.gpu.allocator().lock();
        let _ = allocator.free_buffer(&mut self.vertex_buffer);
        if let Some(index_buffer) = &mut self.index_buffer {
            let _ = allocator.free_buffer(index_buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout() {
        // Matches the shader interface: two tightly packed vec3s.
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(std::mem::offset_of!(Vertex, position), 0);
        assert_eq!(std::mem::offset_of!(Vertex, color), 12);
    }

    #[test]
    fn binding_stride_matches_vertex_size() {
        let bindings = Vertex::binding_descriptions();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].stride as usize, std::mem::size_of::<Vertex>());
        assert_eq!(bindings[0].input_rate, vk::VertexInputRate::VERTEX);
    }

    #[test]
    fn attributes_cover_all_fields() {
        let attributes = Vertex::attribute_descriptions();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].location, 0);
        assert_eq!(attributes[0].offset, 0);
        assert_eq!(attributes[1].location, 1);
        assert_eq!(attributes[1].offset, 12);
        for attribute in &attributes {
            assert_eq!(attribute.format, vk::Format::R32G32B32_SFLOAT);
            assert_eq!(attribute.binding, 0);
        }
    }
}
