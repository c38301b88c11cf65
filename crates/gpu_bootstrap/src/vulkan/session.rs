//! Owned GPU session and its teardown
//!
//! `GpuSession` holds every driver object the bootstrap sequence creates.
//! Each handle has one creation site (the stage methods in the sibling
//! modules) and one destruction site, [`GpuSession::teardown`], which also
//! runs from `Drop`. Release order is the reverse of creation:
//! debug messenger, surface, instance.

use std::ptr;

use ash::vk;

use super::{DebugUtilsFns, DiagnosticsBridge, GpuDriver};

/// GPU instance, debug messenger and presentation surface for one run
pub struct GpuSession<D: GpuDriver> {
    pub(crate) driver: D,
    pub(crate) diagnostics: Option<Box<DiagnosticsBridge>>,
    pub(crate) instance: vk::Instance,
    pub(crate) debug_fns: DebugUtilsFns,
    pub(crate) messenger: vk::DebugUtilsMessengerEXT,
    pub(crate) surface: vk::SurfaceKHR,
    torn_down: bool,
}

impl<D: GpuDriver> GpuSession<D> {
    /// Start an empty session; nothing is created yet
    ///
    /// The bridge is boxed so its address stays fixed for the lifetime of
    /// the messenger that points at it.
    pub fn new(driver: D, diagnostics: Option<DiagnosticsBridge>) -> Self {
        Self {
            driver,
            diagnostics: diagnostics.map(Box::new),
            instance: vk::Instance::null(),
            debug_fns: DebugUtilsFns::default(),
            messenger: vk::DebugUtilsMessengerEXT::null(),
            surface: vk::SurfaceKHR::null(),
            torn_down: false,
        }
    }

    /// Instance handle, null until the context is created
    pub fn instance(&self) -> vk::Instance {
        self.instance
    }

    /// Surface handle, null until bound
    pub fn surface(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// Whether teardown has already run
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Release everything in reverse creation order
    ///
    /// Every step is best-effort and skips handles that were never created.
    /// Calling this again is a no-op.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if self.messenger != vk::DebugUtilsMessengerEXT::null() {
            match self.debug_fns.destroy {
                Some(destroy) => {
                    log::debug!("Destroying debug messenger");
                    unsafe { destroy(self.instance, self.messenger, ptr::null()) };
                }
                None => log::debug!("No destroy entry point; leaving debug messenger to the instance"),
            }
            self.messenger = vk::DebugUtilsMessengerEXT::null();
        }

        if self.surface != vk::SurfaceKHR::null() {
            log::debug!("Destroying surface");
            self.driver.destroy_surface(self.instance, self.surface);
            self.surface = vk::SurfaceKHR::null();
        }

        if self.instance != vk::Instance::null() {
            log::debug!("Destroying instance");
            self.driver.destroy_instance(self.instance);
            self.instance = vk::Instance::null();
        }

        // The create-time messenger chained on the instance may report up to
        // instance destruction, so the bridge goes last.
        self.debug_fns = DebugUtilsFns::default();
        self.diagnostics = None;
        log::info!("GPU session torn down");
    }
}

impl<D: GpuDriver> Drop for GpuSession<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
