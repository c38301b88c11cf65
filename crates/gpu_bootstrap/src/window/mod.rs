//! Window system seam
//!
//! The bootstrap sequence only needs a handful of things from the window
//! system: the instance extensions it requires, a presentation surface, and
//! per-frame event polling with close and resize notifications.

use ash::vk;
use thiserror::Error;

mod glfw_window;

pub use glfw_window::GlfwWindow;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW could not be initialized
    #[error("GLFW initialization failed")]
    InitializationFailed,

    /// The native window could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// GLFW reported an error
    #[error("GLFW error: {0}")]
    GlfwError(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// New framebuffer size reported during event polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferResize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// What the bootstrap sequence needs from a window
pub trait Windowing {
    /// Instance extensions the window system needs to create surfaces
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>>;

    /// Create a presentation surface for this window against `instance`
    fn create_surface(&mut self, instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result>;

    /// Process pending events; returns the latest framebuffer resize, if any
    fn poll_events(&mut self) -> Option<FramebufferResize>;

    /// Whether the user asked to close the window
    fn should_close(&self) -> bool;
}
