//! Vulkan abstraction layer for the Ember renderer.
//!
//! This crate provides:
//! - Vulkan instance and device management, including present-queue selection
//! - Swapchain ownership and the acquire/submit/present protocol
//! - Frame and image flight tracking
//! - Command buffer management
//! - Memory allocation via gpu-allocator
//! - Graphics pipeline and SPIR-V loading

pub mod command;
pub mod context;
pub mod error;
pub mod instance;
pub mod memory;
pub mod pipeline;
pub mod shader;
pub mod swapchain;
pub mod sync;

pub use command::CommandPool;
pub use context::{GpuContext, GpuContextBuilder, SwapchainSupport};
pub use error::{GpuError, Result};
pub use instance::QueueFamilies;
pub use memory::{GpuAllocator, GpuBuffer, GpuImage};
pub use pipeline::{GraphicsPipeline, GraphicsPipelineConfig};
pub use shader::load_spirv;
pub use swapchain::{
    AcquireResult, SurfaceStatus, Swapchain, SwapchainFormats, MAX_FRAMES_IN_FLIGHT,
};
pub use sync::{FlightTracker, FrameSync};
