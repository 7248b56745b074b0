//! Frame lifecycle control.
//!
//! [`FrameController`] drives the begin-frame/end-frame protocol on top of
//! the swapchain: it owns the per-image command buffers, hands the active
//! buffer to rendering code, and triggers swapchain recreation when the
//! surface is resized or presentation reports staleness. Calling code never
//! touches the swapchain's lifetime directly.

use std::sync::Arc;

use ash::vk;

use ember_gpu::command;
use ember_gpu::swapchain::{AcquireResult, SurfaceStatus, MAX_FRAMES_IN_FLIGHT};
use ember_gpu::{GpuContext, Result, Swapchain};
use ember_platform::PresentationWindow;

use crate::camera::Camera;

/// Per-frame data handed to render systems.
pub struct FrameInfo<'a> {
    /// Frame slot label, cycling through `[0, MAX_FRAMES_IN_FLIGHT)`.
    pub frame_index: usize,
    /// Seconds since the previous frame.
    pub frame_time: f32,
    /// The command buffer being recorded this frame.
    pub command_buffer: vk::CommandBuffer,
    /// View/projection supplier for this frame.
    pub camera: &'a Camera,
}

/// Drives the acquire→record→submit→present protocol.
pub struct FrameController {
    gpu: Arc<GpuContext>,
    window: Arc<PresentationWindow>,
    swapchain: Option<Swapchain>,
    command_buffers: Vec<vk::CommandBuffer>,
    current_image_index: u32,
    frame_index: usize,
    frame_started: bool,
}

impl FrameController {
    /// Create the controller with a fresh swapchain for the window's current
    /// drawable size.
    pub fn new(gpu: Arc<GpuContext>, window: Arc<PresentationWindow>) -> Result<Self> {
        let (width, height) = window.drawable_size();
        let extent = vk::Extent2D {
            width: width.max(1),
            height: height.max(1),
        };

        let swapchain = Swapchain::new(gpu.clone(), extent)?;

        tracing::info!(
            "Swapchain created: {}x{} ({} images)",
            swapchain.extent().width,
            swapchain.extent().height,
            swapchain.image_count()
        );

        // One command buffer per swapchain image; recording targets a
        // specific image's framebuffer.
        let command_buffers = unsafe {
            gpu.command_pool()
                .allocate_command_buffers(gpu.device(), swapchain.image_count() as u32)?
        };

        Ok(Self {
            gpu,
            window,
            swapchain: Some(swapchain),
            command_buffers,
            current_image_index: 0,
            frame_index: 0,
            frame_started: false,
        })
    }

    /// Start a frame.
    ///
    /// Returns `None` when no frame can be rendered this tick: the surface
    /// has zero area, or acquisition found the swapchain out of date (it is
    /// recreated before returning, and the caller retries next iteration).
    /// On success the image's command buffer has begun recording.
    ///
    /// # Panics
    /// If a frame is already in progress.
    pub fn begin_frame(&mut self) -> Result<Option<vk::CommandBuffer>> {
        assert!(
            !self.frame_started,
            "Cannot begin a frame while one is in progress"
        );

        let (width, height) = self.window.drawable_size();
        if width == 0 || height == 0 {
            return Ok(None);
        }

        match self.swapchain_mut().acquire_next_image()? {
            AcquireResult::OutOfDate => {
                self.recreate_swapchain()?;
                Ok(None)
            }
            AcquireResult::Ready { image_index, .. } => {
                // A suboptimal acquire still renders this frame; the present
                // side reports it again and triggers recreation in end_frame.
                self.current_image_index = image_index;
                self.frame_started = true;

                let cmd = self.command_buffers[image_index as usize];
                unsafe {
                    command::begin_command_buffer(
                        self.gpu.device(),
                        cmd,
                        vk::CommandBufferUsageFlags::empty(),
                    )?;
                }

                Ok(Some(cmd))
            }
        }
    }

    /// Finish the frame: end recording, submit, present, and recreate the
    /// swapchain if presentation or the window reported staleness.
    ///
    /// The controller's frame-index cursor advances regardless of the
    /// present outcome. The window's resize flag is cleared only once a
    /// recreation attempt actually rebuilt the swapchain.
    ///
    /// # Panics
    /// If no frame is in progress.
    pub fn end_frame(&mut self) -> Result<()> {
        assert!(
            self.frame_started,
            "Cannot end a frame when none is in progress"
        );

        let cmd = self.command_buffers[self.current_image_index as usize];
        unsafe {
            command::end_command_buffer(self.gpu.device(), cmd)?;
        }

        let image_index = self.current_image_index;
        let status = self.swapchain_mut().submit_and_present(cmd, image_index)?;

        // The frame is closed once submission and present are done; the
        // cursor advances whatever the present outcome was.
        self.frame_started = false;
        self.frame_index = (self.frame_index + 1) % MAX_FRAMES_IN_FLIGHT;

        // A resize observed mid-frame is acted on here, never mid-recording.
        if should_recreate(status, self.window.was_resized()) {
            self.recreate_swapchain()?;
        }

        Ok(())
    }

    /// Whether a frame is currently open.
    pub fn is_frame_in_progress(&self) -> bool {
        self.frame_started
    }

    /// The command buffer of the open frame.
    ///
    /// # Panics
    /// If no frame is in progress.
    pub fn current_command_buffer(&self) -> vk::CommandBuffer {
        assert!(
            self.frame_started,
            "Cannot get the command buffer when no frame is in progress"
        );
        self.command_buffers[self.current_image_index as usize]
    }

    /// The swapchain image index of the open frame.
    ///
    /// # Panics
    /// If no frame is in progress.
    pub fn current_image_index(&self) -> u32 {
        assert!(
            self.frame_started,
            "Cannot get the image index when no frame is in progress"
        );
        self.current_image_index
    }

    /// The frame slot label of the open frame.
    ///
    /// # Panics
    /// If no frame is in progress.
    pub fn frame_index(&self) -> usize {
        assert!(
            self.frame_started,
            "Cannot get the frame index when no frame is in progress"
        );
        self.frame_index
    }

    /// The render pass of the current swapchain generation.
    pub fn render_pass(&self) -> vk::RenderPass {
        self.swapchain().render_pass()
    }

    /// The framebuffer of the open frame's image.
    ///
    /// # Panics
    /// If no frame is in progress.
    pub fn current_framebuffer(&self) -> vk::Framebuffer {
        self.swapchain().framebuffer(self.current_image_index())
    }

    /// Current swapchain extent.
    pub fn extent(&self) -> vk::Extent2D {
        self.swapchain().extent()
    }

    /// Aspect ratio of the current swapchain extent.
    pub fn aspect_ratio(&self) -> f32 {
        self.swapchain().aspect_ratio()
    }

    pub(crate) fn device(&self) -> &ash::Device {
        self.gpu.device()
    }

    fn swapchain(&self) -> &Swapchain {
        self.swapchain
            .as_ref()
            .expect("swapchain present outside recreation")
    }

    fn swapchain_mut(&mut self) -> &mut Swapchain {
        self.swapchain
            .as_mut()
            .expect("swapchain present outside recreation")
    }

    /// Replace the stale swapchain generation.
    ///
    /// While the drawable area is zero (minimized window) the swapchain is
    /// left stale and frames keep getting skipped; the event loop continues
    /// polling and this reruns once width and height are both nonzero.
    fn recreate_swapchain(&mut self) -> Result<()> {
        assert!(
            !self.frame_started,
            "Cannot recreate the swapchain while a frame is open"
        );

        let (width, height) = self.window.drawable_size();
        if width == 0 || height == 0 {
            return Ok(());
        }

        // All queues drain before any generation resource is destroyed.
        self.gpu.wait_idle()?;

        let old = self
            .swapchain
            .take()
            .expect("swapchain present outside recreation");
        let old_image_count = old.image_count();

        let new = Swapchain::recreate(old, vk::Extent2D { width, height })?;
        let image_count = new.image_count();
        self.swapchain = Some(new);

        // The pool tracks the image count, not the frames-in-flight count.
        if image_count != old_image_count {
            unsafe {
                self.gpu
                    .command_pool()
                    .free_command_buffers(self.gpu.device(), &self.command_buffers);
                self.command_buffers = self
                    .gpu
                    .command_pool()
                    .allocate_command_buffers(self.gpu.device(), image_count as u32)?;
            }
        }

        self.window.clear_resized();

        Ok(())
    }
}

impl Drop for FrameController {
    fn drop(&mut self) {
        let _ = self.gpu.wait_idle();
        unsafe {
            self.gpu
                .command_pool()
                .free_command_buffers(self.gpu.device(), &self.command_buffers);
        }
    }
}

/// Whether the generation must be replaced after presenting.
fn should_recreate(status: SurfaceStatus, resized: bool) -> bool {
    resized || matches!(status, SurfaceStatus::Suboptimal | SurfaceStatus::OutOfDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recreation_triggers() {
        assert!(should_recreate(SurfaceStatus::OutOfDate, false));
        assert!(should_recreate(SurfaceStatus::Suboptimal, false));
        assert!(should_recreate(SurfaceStatus::Optimal, true));
        assert!(should_recreate(SurfaceStatus::OutOfDate, true));
        assert!(!should_recreate(SurfaceStatus::Optimal, false));
    }
}
