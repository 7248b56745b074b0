//! Push-constant mesh render system.

use std::sync::Arc;

use ash::vk;
use bytemuck::{Pod, Zeroable};

use ember_gpu::{GpuContext, GraphicsPipeline, GraphicsPipelineConfig, Result};

use crate::frame::FrameInfo;
use crate::model::Vertex;
use crate::object::SceneObject;

/// Per-object push constant block.
///
/// Must stay within Vulkan's guaranteed 128-byte push constant budget and
/// match the shader's `Push` block layout.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct MeshPushConstants {
    /// projection * view * model
    transform: [[f32; 4]; 4],
    color: [f32; 4],
}

impl MeshPushConstants {
    const SIZE: u32 = std::mem::size_of::<Self>() as u32;
}

/// Renders scene objects with a single push-constant pipeline.
pub struct MeshRenderSystem {
    gpu: Arc<GpuContext>,
    pipeline: GraphicsPipeline,
}

impl MeshRenderSystem {
    /// Build the pipeline against the swapchain render pass.
    ///
    /// The pipeline survives swapchain recreation as long as the formats are
    /// stable, which recreation enforces.
    pub fn new(
        gpu: Arc<GpuContext>,
        render_pass: vk::RenderPass,
        vertex_spirv: Vec<u32>,
        fragment_spirv: Vec<u32>,
    ) -> Result<Self> {
        let push_ranges = [vk::PushConstantRange::default()
            .stage_flags(vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT)
            .offset(0)
            .size(MeshPushConstants::SIZE)];

        let config = GraphicsPipelineConfig {
            vertex_shader: vertex_spirv,
            fragment_shader: fragment_spirv,
            vertex_bindings: Vertex::binding_descriptions(),
            vertex_attributes: Vertex::attribute_descriptions(),
            render_pass,
            ..Default::default()
        };

        let pipeline = unsafe { GraphicsPipeline::new(gpu.device(), &config, &[], &push_ranges)? };

        Ok(Self { gpu, pipeline })
    }

    /// Record draw commands for every object carrying a model.
    ///
    /// Must be called inside the swapchain render pass on the frame's active
    /// command buffer.
    pub fn render(&self, frame: &FrameInfo<'_>, objects: &[SceneObject]) {
        let device = self.gpu.device();
        let cmd = frame.command_buffer;

        unsafe {
            self.pipeline.bind(device, cmd);
        }

        let projection_view = frame.camera.projection_view();

        for object in objects {
            let Some(model) = &object.model else {
                continue;
            };

            let push = MeshPushConstants {
                transform: (projection_view * object.transform.matrix()).to_cols_array_2d(),
                color: [object.color.x, object.color.y, object.color.z, 1.0],
            };

            unsafe {
                device.cmd_push_constants(
                    cmd,
                    self.pipeline.layout,
                    vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
                    0,
                    bytemuck::bytes_of(&push),
                );
                model.bind(cmd);
                model.draw(cmd);
            }
        }
    }
}

impl Drop for MeshRenderSystem {
    fn drop(&mut self) {
        let _ = self.gpu.wait_idle();
        unsafe {
            self.pipeline.destroy(self.gpu.device());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_constants_fit_the_guaranteed_budget() {
        assert!(MeshPushConstants::SIZE <= 128);
    }

    #[test]
    fn push_constants_layout() {
        // Verify offsets for shader compatibility
        assert_eq!(std::mem::offset_of!(MeshPushConstants, transform), 0);
        assert_eq!(std::mem::offset_of!(MeshPushConstants, color), 64);
        assert_eq!(MeshPushConstants::SIZE, 80);
    }
}
