//! Swapchain management.
//!
//! [`Swapchain`] owns one generation of presentable images together with
//! everything keyed to them: image views, per-image depth buffers, the render
//! pass, framebuffers, and the per-frame synchronization primitives. It
//! mediates the acquire→submit→present protocol against the surface and
//! reports when the generation has gone stale so the owner can recreate it.

use std::sync::Arc;

use ash::vk;
use gpu_allocator::MemoryLocation;

use crate::context::GpuContext;
use crate::error::{GpuError, Result};
use crate::memory::GpuImage;
use crate::sync::{self, FlightTracker, FrameSync};

/// Number of frames the CPU may record ahead of the GPU.
pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Bounded wait for image acquisition; a driver that never delivers an image
/// surfaces as [`GpuError::SyncTimeout`].
const ACQUIRE_TIMEOUT_NS: u64 = sync::FENCE_WAIT_TIMEOUT_NS;

/// Depth formats in preference order.
const DEPTH_FORMAT_CANDIDATES: [vk::Format; 3] = [
    vk::Format::D32_SFLOAT,
    vk::Format::D32_SFLOAT_S8_UINT,
    vk::Format::D24_UNORM_S8_UINT,
];

/// Post-present health of the swapchain generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceStatus {
    /// The swapchain matches the surface.
    Optimal,
    /// Presentation succeeded but the generation should be recreated soon.
    Suboptimal,
    /// The generation is stale; it must be recreated before further use.
    OutOfDate,
}

/// Result of acquiring the next presentable image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireResult {
    /// An image was acquired and the frame may proceed.
    Ready { image_index: u32, suboptimal: bool },
    /// No image was acquired; recreate the swapchain and retry next tick.
    OutOfDate,
}

/// Color and depth formats of a swapchain generation.
///
/// Formats must stay bit-identical across recreation; pipelines and render
/// passes built against one generation are reused with the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainFormats {
    pub color: vk::Format,
    pub depth: vk::Format,
}

impl SwapchainFormats {
    /// Whether both formats are identical to `other`'s.
    pub fn matches(&self, other: &Self) -> bool {
        self == other
    }
}

/// One generation of presentable images and their synchronization state.
pub struct Swapchain {
    gpu: Arc<GpuContext>,
    swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
    depth_images: Vec<GpuImage>,
    depth_views: Vec<vk::ImageView>,
    render_pass: vk::RenderPass,
    framebuffers: Vec<vk::Framebuffer>,
    frame_sync: Vec<FrameSync>,
    tracker: FlightTracker,
    formats: SwapchainFormats,
    extent: vk::Extent2D,
}

impl Swapchain {
    /// Create the first swapchain generation for the context's surface.
    pub fn new(gpu: Arc<GpuContext>, window_extent: vk::Extent2D) -> Result<Self> {
        Self::create(gpu, window_extent, None)
    }

    /// Replace a stale generation.
    ///
    /// Ownership of `old` moves in so its handle can seed `old_swapchain` in
    /// the create info; once the new generation is validated against it the
    /// old generation is released at end of scope. Format drift across
    /// generations is unsupported and fatal.
    pub fn recreate(old: Self, window_extent: vk::Extent2D) -> Result<Self> {
        let gpu = old.gpu.clone();
        let new = Self::create(gpu, window_extent, Some(old.swapchain))?;

        if !old.formats.matches(&new.formats) {
            return Err(GpuError::FormatChanged);
        }

        tracing::debug!(
            "Swapchain recreated: {}x{} ({} images)",
            new.extent.width,
            new.extent.height,
            new.images.len()
        );

        Ok(new)
    }

    fn create(
        gpu: Arc<GpuContext>,
        window_extent: vk::Extent2D,
        old_swapchain: Option<vk::SwapchainKHR>,
    ) -> Result<Self> {
        let support = gpu.swapchain_support()?;

        let surface_format = select_surface_format(&support.formats);
        let present_mode = select_present_mode(&support.present_modes);
        let extent = calculate_extent(&support.capabilities, window_extent);
        let image_count = desired_image_count(&support.capabilities);

        let families = gpu.queue_families();
        let family_indices = [families.graphics, families.present];

        let mut create_info = vk::SwapchainCreateInfoKHR::default()
            .surface(gpu.surface)
            .min_image_count(image_count)
            .image_format(surface_format.format)
            .image_color_space(surface_format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .pre_transform(support.capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(old_swapchain.unwrap_or(vk::SwapchainKHR::null()));

        // Images presented from a different family than they are rendered on
        // need concurrent sharing.
        create_info = if families.unified() {
            create_info.image_sharing_mode(vk::SharingMode::EXCLUSIVE)
        } else {
            create_info
                .image_sharing_mode(vk::SharingMode::CONCURRENT)
                .queue_family_indices(&family_indices)
        };

        let swapchain = unsafe {
            gpu.swapchain_loader
                .create_swapchain(&create_info, None)
                .map_err(|e| GpuError::SwapchainCreation(e.to_string()))?
        };

        let images = unsafe { gpu.swapchain_loader.get_swapchain_images(swapchain)? };

        let image_views = create_image_views(&gpu, &images, surface_format.format)?;

        let depth_format = gpu.find_supported_format(
            &DEPTH_FORMAT_CANDIDATES,
            vk::ImageTiling::OPTIMAL,
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
        )?;

        let render_pass = create_render_pass(&gpu, surface_format.format, depth_format)?;

        let (depth_images, depth_views) =
            create_depth_resources(&gpu, images.len(), depth_format, extent)?;

        let framebuffers =
            create_framebuffers(&gpu, render_pass, &image_views, &depth_views, extent)?;

        let frame_sync = (0..MAX_FRAMES_IN_FLIGHT)
            .map(|_| unsafe { FrameSync::new(&gpu.device) })
            .collect::<Result<Vec<_>>>()?;

        let tracker = FlightTracker::new(images.len(), MAX_FRAMES_IN_FLIGHT);

        Ok(Self {
            gpu,
            swapchain,
            images,
            image_views,
            depth_images,
            depth_views,
            render_pass,
            framebuffers,
            frame_sync,
            tracker,
            formats: SwapchainFormats {
                color: surface_format.format,
                depth: depth_format,
            },
            extent,
        })
    }

    /// Acquire the next presentable image.
    ///
    /// Blocks (bounded) on the current frame slot's fence so at most
    /// [`MAX_FRAMES_IN_FLIGHT`] submissions are outstanding, then requests an
    /// image signaling the slot's image-available semaphore.
    pub fn acquire_next_image(&mut self) -> Result<AcquireResult> {
        let slot = &self.frame_sync[self.tracker.current_frame()];

        unsafe { sync::wait_for_fence(&self.gpu.device, slot.in_flight)? };

        let result = unsafe {
            self.gpu.swapchain_loader.acquire_next_image(
                self.swapchain,
                ACQUIRE_TIMEOUT_NS,
                slot.image_available,
                vk::Fence::null(),
            )
        };

        classify_acquire(result)
    }

    /// Submit recorded work for `image_index` and present it.
    ///
    /// Waits on the image's prior in-flight fence if another slot still
    /// targets it, then follows the mandatory wait→reset→submit order on the
    /// current slot's fence. The frame cursor advances unconditionally after
    /// the present request, including when presentation fails fatally, so
    /// slot rotation never stalls.
    pub fn submit_and_present(
        &mut self,
        cmd: vk::CommandBuffer,
        image_index: u32,
    ) -> Result<SurfaceStatus> {
        let device = &self.gpu.device;
        let frame = self.tracker.current_frame();
        let slot_fence = self.frame_sync[frame].in_flight;

        // The frames-in-flight count and the image count may differ, so a
        // different slot's submission can still be reading this image.
        if let Some(prior) = self.tracker.begin_submit(image_index as usize, slot_fence) {
            unsafe { sync::wait_for_fence(device, prior)? };
        }

        // Resetting before the wait above could discard a signal that was
        // never observed.
        unsafe { sync::reset_fence(device, slot_fence)? };

        let slot = &self.frame_sync[frame];
        let wait_semaphores = [slot.image_available];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let signal_semaphores = [slot.render_finished];
        let command_buffers = [cmd];

        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            device.queue_submit(self.gpu.graphics_queue, &[submit_info], slot_fence)?;
        }

        let swapchains = [self.swapchain];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let present = unsafe {
            self.gpu
                .swapchain_loader
                .queue_present(self.gpu.present_queue, &present_info)
        };

        self.tracker.advance();

        classify_present(present)
    }

    /// Formats of this generation, for continuity checks across recreation.
    pub fn formats(&self) -> SwapchainFormats {
        self.formats
    }

    /// Current image extent.
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Width over height of the current extent.
    pub fn aspect_ratio(&self) -> f32 {
        self.extent.width as f32 / self.extent.height as f32
    }

    /// Number of presentable images in this generation.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// The render pass all framebuffers of this generation bind to.
    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass
    }

    /// Framebuffer for the given image index.
    pub fn framebuffer(&self, image_index: u32) -> vk::Framebuffer {
        self.framebuffers[image_index as usize]
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        // Recreation idle-waits before dropping the old generation; this
        // covers teardown paths that did not.
        let _ = self.gpu.wait_idle();

        let device = &self.gpu.device;
        unsafe {
            for slot in &self.frame_sync {
                slot.destroy(device);
            }

            for &framebuffer in &self.framebuffers {
                device.destroy_framebuffer(framebuffer, None);
            }

            for &view in &self.depth_views {
                device.destroy_image_view(view, None);
            }
            let mut allocator = self.gpu.allocator.lock();
            for image in &mut self.depth_images {
                let _ = allocator.free_image(image);
            }
            drop(allocator);

            device.destroy_render_pass(self.render_pass, None);

            for &view in &self.image_views {
                device.destroy_image_view(view, None);
            }

            self.gpu
                .swapchain_loader
                .destroy_swapchain(self.swapchain, None);
        }
    }
}

fn create_image_views(
    gpu: &GpuContext,
    images: &[vk::Image],
    format: vk::Format,
) -> Result<Vec<vk::ImageView>> {
    images
        .iter()
        .map(|&image| {
            let view_info = vk::ImageViewCreateInfo::default()
                .image(image)
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(format)
                .subresource_range(
                    vk::ImageSubresourceRange::default()
                        .aspect_mask(vk::ImageAspectFlags::COLOR)
                        .base_mip_level(0)
                        .level_count(1)
                        .base_array_layer(0)
                        .layer_count(1),
                );

            unsafe {
                gpu.device
                    .create_image_view(&view_info, None)
                    .map_err(GpuError::from)
            }
        })
        .collect()
}

fn create_render_pass(
    gpu: &GpuContext,
    color_format: vk::Format,
    depth_format: vk::Format,
) -> Result<vk::RenderPass> {
    let attachments = [
        vk::AttachmentDescription::default()
            .format(color_format)
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::STORE)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .final_layout(vk::ImageLayout::PRESENT_SRC_KHR),
        vk::AttachmentDescription::default()
            .format(depth_format)
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::DONT_CARE)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .final_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL),
    ];

    let color_refs = [vk::AttachmentReference::default()
        .attachment(0)
        .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL)];
    let depth_ref = vk::AttachmentReference::default()
        .attachment(1)
        .layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL);

    let subpasses = [vk::SubpassDescription::default()
        .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
        .color_attachments(&color_refs)
        .depth_stencil_attachment(&depth_ref)];

    let dependencies = [vk::SubpassDependency::default()
        .src_subpass(vk::SUBPASS_EXTERNAL)
        .dst_subpass(0)
        .src_stage_mask(
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
                | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
        )
        .src_access_mask(vk::AccessFlags::empty())
        .dst_stage_mask(
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
                | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
        )
        .dst_access_mask(
            vk::AccessFlags::COLOR_ATTACHMENT_WRITE
                | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
        )];

    let create_info = vk::RenderPassCreateInfo::default()
        .attachments(&attachments)
        .subpasses(&subpasses)
        .dependencies(&dependencies);

    unsafe {
        gpu.device
            .create_render_pass(&create_info, None)
            .map_err(GpuError::from)
    }
}

fn create_depth_resources(
    gpu: &GpuContext,
    count: usize,
    depth_format: vk::Format,
    extent: vk::Extent2D,
) -> Result<(Vec<GpuImage>, Vec<vk::ImageView>)> {
    let mut images = Vec::with_capacity(count);
    let mut views = Vec::with_capacity(count);

    for index in 0..count {
        let image_info = vk::ImageCreateInfo::default()
            .image_type(vk::ImageType::TYPE_2D)
            .format(depth_format)
            .extent(vk::Extent3D {
                width: extent.width,
                height: extent.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);

        let image = gpu.allocator.lock().create_image(
            &image_info,
            MemoryLocation::GpuOnly,
            &format!("depth image {index}"),
        )?;

        let view_info = vk::ImageViewCreateInfo::default()
            .image(image.image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(depth_format)
            .subresource_range(
                vk::ImageSubresourceRange::default()
                    .aspect_mask(vk::ImageAspectFlags::DEPTH)
                    .base_mip_level(0)
                    .level_count(1)
                    .base_array_layer(0)
                    .layer_count(1),
            );

        let view = unsafe { gpu.device.create_image_view(&view_info, None)? };

        images.push(image);
        views.push(view);
    }

    Ok((images, views))
}

fn create_framebuffers(
    gpu: &GpuContext,
    render_pass: vk::RenderPass,
    image_views: &[vk::ImageView],
    depth_views: &[vk::ImageView],
    extent: vk::Extent2D,
) -> Result<Vec<vk::Framebuffer>> {
    image_views
        .iter()
        .zip(depth_views)
        .map(|(&color, &depth)| {
            let attachments = [color, depth];
            let create_info = vk::FramebufferCreateInfo::default()
                .render_pass(render_pass)
                .attachments(&attachments)
                .width(extent.width)
                .height(extent.height)
                .layers(1);

            unsafe {
                gpu.device
                    .create_framebuffer(&create_info, None)
                    .map_err(GpuError::from)
            }
        })
        .collect()
}

/// Map an acquire result onto the retry/fatal taxonomy.
fn classify_acquire(result: std::result::Result<(u32, bool), vk::Result>) -> Result<AcquireResult> {
    match result {
        Ok((image_index, suboptimal)) => Ok(AcquireResult::Ready {
            image_index,
            suboptimal,
        }),
        Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(AcquireResult::OutOfDate),
        Err(vk::Result::TIMEOUT) => Err(GpuError::SyncTimeout),
        Err(e) => Err(GpuError::from(e)),
    }
}

/// Map a present result onto the retry/fatal taxonomy.
fn classify_present(result: std::result::Result<bool, vk::Result>) -> Result<SurfaceStatus> {
    match result {
        Ok(false) => Ok(SurfaceStatus::Optimal),
        Ok(true) => Ok(SurfaceStatus::Suboptimal),
        Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(SurfaceStatus::OutOfDate),
        Err(e) => Err(GpuError::from(e)),
    }
}

/// Select the best surface format, preferring SRGB.
pub fn select_surface_format(available: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
    for format in available {
        if format.format == vk::Format::B8G8R8A8_SRGB
            && format.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        {
            return *format;
        }
    }

    available[0]
}

/// Select the best present mode, preferring mailbox.
pub fn select_present_mode(available: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    for &mode in available {
        if mode == vk::PresentModeKHR::MAILBOX {
            return mode;
        }
    }

    // FIFO is always supported
    vk::PresentModeKHR::FIFO
}

/// Calculate the swapchain extent from the surface capabilities.
pub fn calculate_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    window_extent: vk::Extent2D,
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        vk::Extent2D {
            width: window_extent.width.clamp(
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
            ),
            height: window_extent.height.clamp(
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
            ),
        }
    }
}

/// Number of images to request: one more than the minimum, clamped to the
/// surface maximum (zero meaning unbounded).
pub fn desired_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let mut count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 && count > capabilities.max_image_count {
        count = capabilities.max_image_count;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capabilities(
        min_count: u32,
        max_count: u32,
        current: vk::Extent2D,
        min_extent: vk::Extent2D,
        max_extent: vk::Extent2D,
    ) -> vk::SurfaceCapabilitiesKHR {
        let mut caps = vk::SurfaceCapabilitiesKHR::default();
        caps.min_image_count = min_count;
        caps.max_image_count = max_count;
        caps.current_extent = current;
        caps.min_image_extent = min_extent;
        caps.max_image_extent = max_extent;
        caps
    }

    fn extent(width: u32, height: u32) -> vk::Extent2D {
        vk::Extent2D { width, height }
    }

    #[test]
    fn surface_format_prefers_srgb() {
        let formats = [
            vk::SurfaceFormatKHR {
                format: vk::Format::R8G8B8A8_UNORM,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            },
            vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_SRGB,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            },
        ];
        assert_eq!(select_surface_format(&formats).format, vk::Format::B8G8R8A8_SRGB);
    }

    #[test]
    fn surface_format_falls_back_to_first() {
        let formats = [vk::SurfaceFormatKHR {
            format: vk::Format::R8G8B8A8_UNORM,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        }];
        assert_eq!(select_surface_format(&formats).format, vk::Format::R8G8B8A8_UNORM);
    }

    #[test]
    fn present_mode_prefers_mailbox() {
        let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
        assert_eq!(select_present_mode(&modes), vk::PresentModeKHR::MAILBOX);
        assert_eq!(
            select_present_mode(&[vk::PresentModeKHR::FIFO]),
            vk::PresentModeKHR::FIFO
        );
    }

    #[test]
    fn extent_uses_surface_extent_when_fixed() {
        let caps = capabilities(2, 0, extent(800, 600), extent(1, 1), extent(4096, 4096));
        assert_eq!(calculate_extent(&caps, extent(1280, 720)), extent(800, 600));
    }

    #[test]
    fn extent_clamps_window_extent_when_flexible() {
        let caps = capabilities(
            2,
            0,
            extent(u32::MAX, u32::MAX),
            extent(100, 100),
            extent(1000, 1000),
        );
        assert_eq!(calculate_extent(&caps, extent(5000, 50)), extent(1000, 100));
        assert_eq!(calculate_extent(&caps, extent(640, 480)), extent(640, 480));
    }

    #[test]
    fn image_count_is_min_plus_one() {
        let caps = capabilities(2, 0, extent(1, 1), extent(1, 1), extent(1, 1));
        assert_eq!(desired_image_count(&caps), 3);
    }

    #[test]
    fn image_count_respects_surface_maximum() {
        let caps = capabilities(2, 2, extent(1, 1), extent(1, 1), extent(1, 1));
        assert_eq!(desired_image_count(&caps), 2);
    }

    #[test]
    fn format_continuity() {
        let a = SwapchainFormats {
            color: vk::Format::B8G8R8A8_SRGB,
            depth: vk::Format::D32_SFLOAT,
        };
        let b = SwapchainFormats {
            color: vk::Format::B8G8R8A8_SRGB,
            depth: vk::Format::D24_UNORM_S8_UINT,
        };
        assert!(a.matches(&a));
        assert!(!a.matches(&b));
    }

    #[test]
    fn acquire_classification() {
        assert_eq!(
            classify_acquire(Ok((1, false))).unwrap(),
            AcquireResult::Ready { image_index: 1, suboptimal: false }
        );
        assert_eq!(
            classify_acquire(Ok((0, true))).unwrap(),
            AcquireResult::Ready { image_index: 0, suboptimal: true }
        );
        assert_eq!(
            classify_acquire(Err(vk::Result::ERROR_OUT_OF_DATE_KHR)).unwrap(),
            AcquireResult::OutOfDate
        );
        assert!(matches!(
            classify_acquire(Err(vk::Result::TIMEOUT)),
            Err(GpuError::SyncTimeout)
        ));
        assert!(classify_acquire(Err(vk::Result::ERROR_DEVICE_LOST)).is_err());
    }

    #[test]
    fn present_classification() {
        assert_eq!(classify_present(Ok(false)).unwrap(), SurfaceStatus::Optimal);
        assert_eq!(classify_present(Ok(true)).unwrap(), SurfaceStatus::Suboptimal);
        assert_eq!(
            classify_present(Err(vk::Result::ERROR_OUT_OF_DATE_KHR)).unwrap(),
            SurfaceStatus::OutOfDate
        );
        assert!(classify_present(Err(vk::Result::ERROR_DEVICE_LOST)).is_err());
    }
}
