//! Frame loop and rendering systems for the Ember renderer.
//!
//! This crate provides:
//! - The frame controller driving the begin/end frame protocol and swapchain
//!   recreation
//! - The render-pass recorder coupled to the current swapchain extent
//! - Cameras, models, scene objects, and the mesh render system

pub mod camera;
pub mod frame;
pub mod model;
pub mod object;
pub mod recorder;
pub mod system;

pub use camera::Camera;
pub use frame::{FrameController, FrameInfo};
pub use model::{MeshData, Model, Vertex};
pub use object::{SceneObject, Transform};
pub use recorder::RenderPassRecorder;
pub use system::MeshRenderSystem;
