//! Platform abstraction for the Ember renderer.
//!
//! Provides the presentation-surface side of the frame loop: a thin wrapper
//! around the winit window that reports the current drawable extent and a
//! "was resized" flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use thiserror::Error;
use winit::window::Window;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
    #[error("Event loop error: {0}")]
    EventLoop(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Ember".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

/// Presentation surface for the frame loop.
///
/// Owns the native window and tracks whether the compositor has resized it
/// since the flag was last cleared. The event loop sets the flag via
/// [`Self::mark_resized`]; the frame controller clears it after a successful
/// swapchain recreation.
pub struct PresentationWindow {
    window: Arc<Window>,
    resized: AtomicBool,
}

impl PresentationWindow {
    /// Wrap an already-created winit window.
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            resized: AtomicBool::new(false),
        }
    }

    /// Current drawable size in physical pixels.
    ///
    /// Either dimension may be zero while the window is minimized.
    pub fn drawable_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    /// Record that the compositor resized the window.
    pub fn mark_resized(&self) {
        self.resized.store(true, Ordering::Relaxed);
    }

    /// Whether a resize happened since the flag was last cleared.
    pub fn was_resized(&self) -> bool {
        self.resized.load(Ordering::Relaxed)
    }

    /// Clear the resize flag.
    pub fn clear_resized(&self) {
        self.resized.store(false, Ordering::Relaxed);
    }

    /// Ask for another redraw.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Access the underlying winit window.
    pub fn winit_window(&self) -> &Window {
        &self.window
    }
}

impl HasDisplayHandle for PresentationWindow {
    fn display_handle(
        &self,
    ) -> std::result::Result<raw_window_handle::DisplayHandle<'_>, raw_window_handle::HandleError>
    {
        self.window.display_handle()
    }
}

impl HasWindowHandle for PresentationWindow {
    fn window_handle(
        &self,
    ) -> std::result::Result<raw_window_handle::WindowHandle<'_>, raw_window_handle::HandleError>
    {
        self.window.window_handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = WindowConfig::default();
        assert!(config.width > 0);
        assert!(config.height > 0);
        assert!(config.resizable);
    }
}
