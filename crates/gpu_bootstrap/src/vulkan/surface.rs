//! Vulkan surface management
//!
//! Binds the window to the instance for presentation. The surface is
//! created by the window system and released by the session's teardown.

use ash::vk;

use crate::window::Windowing;
use super::{BootstrapError, BootstrapResult, GpuDriver, GpuSession};

impl<D: GpuDriver> GpuSession<D> {
    /// Create the presentation surface for `window`
    pub fn bind_surface<W: Windowing>(&mut self, window: &mut W) -> BootstrapResult<vk::SurfaceKHR> {
        if self.instance == vk::Instance::null() {
            return Err(BootstrapError::SurfaceCreationFailed {
                status: vk::Result::ERROR_INITIALIZATION_FAILED,
            });
        }

        let surface = window
            .create_surface(self.instance)
            .map_err(|status| BootstrapError::SurfaceCreationFailed { status })?;

        self.surface = surface;
        log::info!("Presentation surface created");
        Ok(surface)
    }
}
