//! Synchronization primitives and frame/image flight bookkeeping.

use ash::vk;

use crate::error::{GpuError, Result};

/// How long a fence wait may block before the frame loop gives up.
///
/// The wait is bounded so a wedged driver surfaces as [`GpuError::SyncTimeout`]
/// instead of an unkillable hang.
pub const FENCE_WAIT_TIMEOUT_NS: u64 = 5_000_000_000;

/// Create a semaphore.
///
/// # Safety
/// The device must be valid.
pub unsafe fn create_semaphore(device: &ash::Device) -> Result<vk::Semaphore> {
    let create_info = vk::SemaphoreCreateInfo::default();
    let semaphore = unsafe { device.create_semaphore(&create_info, None)? };
    Ok(semaphore)
}

/// Create a fence.
///
/// # Safety
/// The device must be valid.
pub unsafe fn create_fence(device: &ash::Device, signaled: bool) -> Result<vk::Fence> {
    let flags = if signaled {
        vk::FenceCreateFlags::SIGNALED
    } else {
        vk::FenceCreateFlags::empty()
    };

    let create_info = vk::FenceCreateInfo::default().flags(flags);
    let fence = unsafe { device.create_fence(&create_info, None)? };
    Ok(fence)
}

/// Wait for a fence, bounded by [`FENCE_WAIT_TIMEOUT_NS`].
///
/// # Safety
/// The device and fence must be valid.
pub unsafe fn wait_for_fence(device: &ash::Device, fence: vk::Fence) -> Result<()> {
    match unsafe { device.wait_for_fences(&[fence], true, FENCE_WAIT_TIMEOUT_NS) } {
        Ok(()) => Ok(()),
        Err(vk::Result::TIMEOUT) => Err(GpuError::SyncTimeout),
        Err(e) => Err(GpuError::from(e)),
    }
}

/// Reset a fence to the unsignaled state.
///
/// # Safety
/// The device and fence must be valid, and the fence must not be associated
/// with a pending submission.
pub unsafe fn reset_fence(device: &ash::Device, fence: vk::Fence) -> Result<()> {
    unsafe { device.reset_fences(&[fence])? };
    Ok(())
}

/// Per-frame-slot synchronization primitives.
pub struct FrameSync {
    /// Semaphore signaled when the acquired image is available
    pub image_available: vk::Semaphore,
    /// Semaphore signaled when rendering is complete
    pub render_finished: vk::Semaphore,
    /// Fence signaled when this slot's submission completes
    pub in_flight: vk::Fence,
}

impl FrameSync {
    /// Create frame synchronization resources.
    ///
    /// The fence starts signaled so the first wait on a fresh slot passes.
    ///
    /// # Safety
    /// The device must be valid.
    pub unsafe fn new(device: &ash::Device) -> Result<Self> {
        unsafe {
            Ok(Self {
                image_available: create_semaphore(device)?,
                render_finished: create_semaphore(device)?,
                in_flight: create_fence(device, true)?,
            })
        }
    }

    /// Destroy synchronization resources.
    ///
    /// # Safety
    /// The device must be valid and the resources must not be in use.
    pub unsafe fn destroy(&self, device: &ash::Device) {
        unsafe {
            device.destroy_semaphore(self.image_available, None);
            device.destroy_semaphore(self.render_finished, None);
            device.destroy_fence(self.in_flight, None);
        }
    }
}

/// CPU-side bookkeeping for frame-slot rotation and per-image fence reuse.
///
/// Tracks which slot's fence last targeted each swapchain image. Before work
/// targeting image `i` is submitted, the fence recorded here for `i` (if any)
/// must have completed; otherwise a command buffer whose prior GPU work on
/// that image is still running could be rewritten. This is independent of the
/// per-slot fence wait because the frames-in-flight count and the image count
/// may differ.
pub struct FlightTracker {
    images_in_flight: Vec<vk::Fence>,
    current_frame: usize,
    slot_count: usize,
}

impl FlightTracker {
    /// Create a tracker for `image_count` images and `slot_count` frame slots.
    pub fn new(image_count: usize, slot_count: usize) -> Self {
        assert!(slot_count > 0, "at least one frame slot is required");
        Self {
            images_in_flight: vec![vk::Fence::null(); image_count],
            current_frame: 0,
            slot_count,
        }
    }

    /// Index of the frame slot the next submission will use.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Record that `fence` now guards `image_index`.
    ///
    /// Returns the fence previously guarding that image, which the caller
    /// must wait on before reusing resources tied to the image.
    pub fn begin_submit(&mut self, image_index: usize, fence: vk::Fence) -> Option<vk::Fence> {
        let prior = self.images_in_flight[image_index];
        self.images_in_flight[image_index] = fence;
        if prior == vk::Fence::null() {
            None
        } else {
            Some(prior)
        }
    }

    /// Advance to the next frame slot. Called once per submission,
    /// unconditionally.
    pub fn advance(&mut self) {
        self.current_frame = (self.current_frame + 1) % self.slot_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    fn fence(raw: u64) -> vk::Fence {
        vk::Fence::from_raw(raw)
    }

    #[test]
    fn cursor_cycles_through_slots() {
        let mut tracker = FlightTracker::new(3, 2);
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(tracker.current_frame());
            tracker.advance();
        }
        assert_eq!(seen, vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn fresh_image_needs_no_wait() {
        let mut tracker = FlightTracker::new(3, 2);
        assert_eq!(tracker.begin_submit(0, fence(1)), None);
        assert_eq!(tracker.begin_submit(1, fence(2)), None);
        assert_eq!(tracker.begin_submit(2, fence(1)), None);
    }

    #[test]
    fn reused_image_returns_prior_fence() {
        let mut tracker = FlightTracker::new(2, 2);
        assert_eq!(tracker.begin_submit(0, fence(1)), None);
        tracker.advance();
        assert_eq!(tracker.begin_submit(0, fence(2)), Some(fence(1)));
        tracker.advance();
        // Map holds the most recent fence, not the first.
        assert_eq!(tracker.begin_submit(0, fence(1)), Some(fence(2)));
    }

    #[test]
    fn images_are_tracked_independently() {
        let mut tracker = FlightTracker::new(3, 2);
        tracker.begin_submit(0, fence(1));
        tracker.advance();
        // Different image: no wait even though slot fences rotated.
        assert_eq!(tracker.begin_submit(1, fence(2)), None);
        tracker.advance();
        assert_eq!(tracker.begin_submit(0, fence(1)), Some(fence(1)));
    }

    #[test]
    fn advance_is_unconditional_per_submission() {
        // The cursor must rotate whether or not a prior fence was pending;
        // callers advance exactly once per submission attempt.
        let mut tracker = FlightTracker::new(2, 2);
        tracker.begin_submit(0, fence(1));
        tracker.advance();
        tracker.begin_submit(0, fence(2));
        tracker.advance();
        assert_eq!(tracker.current_frame(), 0);
    }
}
