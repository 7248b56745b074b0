//! Render-pass begin/end boilerplate coupled to the current extent.

use ash::vk;

use crate::frame::FrameController;

/// Begins and ends the swapchain render pass for the open frame.
///
/// Viewport and scissor are reset from the swapchain extent on every begin,
/// so draws stay full-window across recreations.
pub struct RenderPassRecorder {
    clear_color: [f32; 4],
}

impl RenderPassRecorder {
    /// Create a recorder clearing to the given background color.
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self { clear_color }
    }

    /// Begin the render pass on the open frame's framebuffer.
    ///
    /// # Panics
    /// If no frame is in progress or `cmd` is not the frame's active command
    /// buffer.
    pub fn begin(&self, frames: &FrameController, cmd: vk::CommandBuffer) {
        assert!(
            frames.is_frame_in_progress(),
            "Cannot begin a render pass when no frame is in progress"
        );
        assert!(
            cmd == frames.current_command_buffer(),
            "Cannot begin a render pass on another frame's command buffer"
        );

        let extent = frames.extent();

        let clear_values = [
            vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: self.clear_color,
                },
            },
            vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: 1.0,
                    stencil: 0,
                },
            },
        ];

        let begin_info = vk::RenderPassBeginInfo::default()
            .render_pass(frames.render_pass())
            .framebuffer(frames.current_framebuffer())
            .render_area(vk::Rect2D {
                offset: vk::Offset2D::default(),
                extent,
            })
            .clear_values(&clear_values);

        let device = frames.device();
        unsafe {
            device.cmd_begin_render_pass(cmd, &begin_info, vk::SubpassContents::INLINE);
            device.cmd_set_viewport(cmd, 0, &[full_viewport(extent)]);
            device.cmd_set_scissor(cmd, 0, &[full_scissor(extent)]);
        }
    }

    /// End the render pass.
    ///
    /// # Panics
    /// If no frame is in progress or `cmd` is not the frame's active command
    /// buffer.
    pub fn end(&self, frames: &FrameController, cmd: vk::CommandBuffer) {
        assert!(
            frames.is_frame_in_progress(),
            "Cannot end a render pass when no frame is in progress"
        );
        assert!(
            cmd == frames.current_command_buffer(),
            "Cannot end a render pass on another frame's command buffer"
        );

        unsafe {
            frames.device().cmd_end_render_pass(cmd);
        }
    }
}

/// Full-window viewport with depth range [0, 1].
fn full_viewport(extent: vk::Extent2D) -> vk::Viewport {
    vk::Viewport {
        x: 0.0,
        y: 0.0,
        width: extent.width as f32,
        height: extent.height as f32,
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

/// Full-window scissor rectangle.
fn full_scissor(extent: vk::Extent2D) -> vk::Rect2D {
    vk::Rect2D {
        offset: vk::Offset2D::default(),
        extent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_covers_extent() {
        let viewport = full_viewport(vk::Extent2D {
            width: 800,
            height: 600,
        });
        assert_eq!(viewport.x, 0.0);
        assert_eq!(viewport.y, 0.0);
        assert_eq!(viewport.width, 800.0);
        assert_eq!(viewport.height, 600.0);
        assert_eq!(viewport.min_depth, 0.0);
        assert_eq!(viewport.max_depth, 1.0);
    }

    #[test]
    fn scissor_covers_extent() {
        let extent = vk::Extent2D {
            width: 1280,
            height: 720,
        };
        let scissor = full_scissor(extent);
        assert_eq!(scissor.offset, vk::Offset2D::default());
        assert_eq!(scissor.extent, extent);
    }
}
