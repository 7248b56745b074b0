//! Ember demo viewer.
//!
//! Opens a window and renders a pair of spinning cubes through the frame
//! controller, exercising resize and minimize handling along the way.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p ember-viewer
//! ```
//!
//! Shaders are loaded as precompiled SPIR-V from the `shaders/` directory
//! next to this crate (`mesh.vert.spv`, `mesh.frag.spv`); set
//! `EMBER_SHADER_DIR` to load them from elsewhere. Compile the GLSL sources
//! with `glslc shaders/mesh.vert -o shaders/mesh.vert.spv` (and likewise for
//! the fragment stage).
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: log level filter (e.g. info, debug, trace)
//! - `EMBER_SHADER_DIR`: directory containing the compiled shaders

mod app;

use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use ember_platform::WindowConfig;

use crate::app::ViewerApp;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Ember viewer starting...");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(WindowConfig {
        title: "Ember Viewer".to_string(),
        width: WIDTH,
        height: HEIGHT,
        resizable: true,
    });

    event_loop.run_app(&mut app)?;

    // A fatal error inside the loop lands here; main is the sole place
    // user-facing error text is emitted.
    app.into_result()
}
