//! Viewer application: window lifecycle and the per-tick frame loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use ember_gpu::{load_spirv, GpuContextBuilder};
use ember_platform::{PresentationWindow, WindowConfig};
use ember_render::{
    Camera, FrameController, FrameInfo, MeshData, MeshRenderSystem, Model, RenderPassRecorder,
    SceneObject, Vertex,
};

const BACKGROUND_COLOR: [f32; 4] = [0.01, 0.01, 0.01, 1.0];

/// Top-level winit application handler.
pub struct ViewerApp {
    config: WindowConfig,
    state: Option<ViewerState>,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            state: None,
            error: None,
        }
    }

    /// Surface a fatal error recorded during the event loop.
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        error!("Fatal error: {error:#}");
        self.error = Some(error);
        self.state = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable);

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, anyhow::anyhow!("Failed to create window: {e}"));
                return;
            }
        };

        match ViewerState::new(&self.config, window) {
            Ok(state) => {
                info!("Viewer ready");
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                // Dropping the state idle-waits before releasing GPU resources
                self.state = None;
                event_loop.exit();
            }
            WindowEvent::Resized(_) => {
                if let Some(state) = &self.state {
                    state.window.mark_resized();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed()
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.state = None;
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                let result = self.state.as_mut().map(ViewerState::draw);
                if let Some(Err(e)) = result {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

/// Live rendering state, created once the window exists.
struct ViewerState {
    window: Arc<PresentationWindow>,
    frames: FrameController,
    recorder: RenderPassRecorder,
    mesh_system: MeshRenderSystem,
    camera: Camera,
    objects: Vec<SceneObject>,
    last_frame: Instant,
}

impl ViewerState {
    fn new(config: &WindowConfig, window: Arc<Window>) -> anyhow::Result<Self> {
        let window = Arc::new(PresentationWindow::new(window));

        let gpu = Arc::new(unsafe {
            GpuContextBuilder::new()
                .app_name(&config.title)
                .build(window.as_ref())?
        });

        let frames = FrameController::new(gpu.clone(), window.clone())?;

        let shader_dir = shader_dir();
        let vertex_spirv = load_spirv(shader_dir.join("mesh.vert.spv"))?;
        let fragment_spirv = load_spirv(shader_dir.join("mesh.frag.spv"))?;

        let mesh_system = MeshRenderSystem::new(
            gpu.clone(),
            frames.render_pass(),
            vertex_spirv,
            fragment_spirv,
        )?;

        let mut camera = Camera::new();
        camera.set_view_target(Vec3::new(0.0, -1.5, -4.0), Vec3::ZERO, Vec3::NEG_Y);

        let cube = Arc::new(Model::new(gpu.clone(), &cube_mesh())?);

        let mut left = SceneObject::with_model(cube.clone());
        left.transform.translation = Vec3::new(-1.2, 0.0, 0.0);
        left.transform.scale = Vec3::splat(0.8);
        left.color = Vec3::new(1.0, 0.6, 0.2);

        let mut right = SceneObject::with_model(cube);
        right.transform.translation = Vec3::new(1.2, 0.0, 0.0);
        right.transform.scale = Vec3::splat(0.8);
        right.color = Vec3::new(0.2, 0.6, 1.0);

        Ok(Self {
            window,
            frames,
            recorder: RenderPassRecorder::new(BACKGROUND_COLOR),
            mesh_system,
            camera,
            objects: vec![left, right],
            last_frame: Instant::now(),
        })
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        for (i, object) in self.objects.iter_mut().enumerate() {
            let speed = 0.6 + 0.3 * i as f32;
            object.transform.rotation.y =
                (object.transform.rotation.y + speed * dt) % std::f32::consts::TAU;
            object.transform.rotation.x =
                (object.transform.rotation.x + 0.5 * speed * dt) % std::f32::consts::TAU;
        }

        self.camera.set_perspective_projection(
            std::f32::consts::FRAC_PI_4,
            self.frames.aspect_ratio(),
            0.1,
            100.0,
        );

        // None means this tick has nothing to render (minimized or the
        // swapchain was just recreated); try again next redraw.
        let Some(cmd) = self.frames.begin_frame()? else {
            return Ok(());
        };

        let frame_info = FrameInfo {
            frame_index: self.frames.frame_index(),
            frame_time: dt,
            command_buffer: cmd,
            camera: &self.camera,
        };

        self.recorder.begin(&self.frames, cmd);
        self.mesh_system.render(&frame_info, &self.objects);
        self.recorder.end(&self.frames, cmd);

        self.frames.end_frame()?;

        Ok(())
    }
}

fn shader_dir() -> PathBuf {
    std::env::var_os("EMBER_SHADER_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders"))
}

/// Unit cube with one color per face.
fn cube_mesh() -> MeshData {
    let face = |normal_axis: usize, sign: f32, color: [f32; 3]| -> Vec<Vertex> {
        // Build the two in-plane axes for the face at `sign` along
        // `normal_axis`.
        let (u, v) = match normal_axis {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };

        [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)]
            .iter()
            .map(|&(a, b)| {
                let mut position = [0.0f32; 3];
                position[normal_axis] = 0.5 * sign;
                position[u] = a;
                position[v] = b;
                Vertex { position, color }
            })
            .collect()
    };

    let faces = [
        face(0, -1.0, [0.9, 0.9, 0.9]),
        face(0, 1.0, [0.8, 0.8, 0.1]),
        face(1, -1.0, [0.9, 0.6, 0.1]),
        face(1, 1.0, [0.8, 0.1, 0.1]),
        face(2, -1.0, [0.1, 0.1, 0.8]),
        face(2, 1.0, [0.1, 0.8, 0.1]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for face_vertices in faces {
        let base = vertices.len() as u32;
        vertices.extend(face_vertices);
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}
