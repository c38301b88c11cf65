//! GPU driver seam
//!
//! [`GpuDriver`] is the narrow set of driver entry points the bootstrap
//! sequence needs. Enumeration methods keep Vulkan's count/buffer calling
//! convention so [`super::enumerate_two_call`] can drive all of them the same
//! way. The production implementation is [`super::AshDriver`].

use std::fmt;

use ash::vk;
use serde::{Deserialize, Serialize};

use crate::config::AppIdentity;
use super::{BootstrapResult, DiagnosticsBridge, InstanceRequirements};

/// A three-component Vulkan version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApiVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl ApiVersion {
    /// Vulkan 1.3.0
    pub const VULKAN_1_3: Self = Self::new(1, 3, 0);

    /// Create a version from its components
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Decode a packed `VK_MAKE_API_VERSION` value (the variant is ignored)
    pub fn from_raw(raw: u32) -> Self {
        Self {
            major: vk::api_version_major(raw),
            minor: vk::api_version_minor(raw),
            patch: vk::api_version_patch(raw),
        }
    }

    /// Pack into a `VK_MAKE_API_VERSION` value with variant 0
    pub fn to_raw(self) -> u32 {
        vk::make_api_version(0, self.major, self.minor, self.patch)
    }

    /// Whether `major.minor` reaches `baseline`; patch level is not compared
    pub fn satisfies(self, baseline: Self) -> bool {
        (self.major, self.minor) >= (baseline.major, baseline.minor)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Debug utils messenger entry points, resolved by name after instance creation
///
/// Either pointer may be absent. A missing `create` is fatal when
/// diagnostics are enabled; a missing `destroy` turns detach into a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugUtilsFns {
    /// `vkCreateDebugUtilsMessengerEXT`
    pub create: Option<vk::PFN_vkCreateDebugUtilsMessengerEXT>,
    /// `vkDestroyDebugUtilsMessengerEXT`
    pub destroy: Option<vk::PFN_vkDestroyDebugUtilsMessengerEXT>,
}

/// Everything the driver needs to create the instance
pub struct InstanceRequest<'a> {
    /// Application and engine identity
    pub identity: &'a AppIdentity,
    /// API version the application targets
    pub api_version: ApiVersion,
    /// Validated extensions, layers and creation flags
    pub requirements: &'a InstanceRequirements,
    /// Bridge to chain onto the create call so instance creation and
    /// destruction are observable
    pub diagnostics: Option<&'a DiagnosticsBridge>,
}

/// Driver entry points used during bootstrap and teardown
pub trait GpuDriver {
    /// Highest instance-level API version the loader supports
    fn instance_version(&self) -> BootstrapResult<ApiVersion>;

    /// `vkEnumerateInstanceExtensionProperties` for the global layer
    fn enumerate_instance_extensions(
        &self,
        count: &mut u32,
        properties: Option<&mut [vk::ExtensionProperties]>,
    ) -> vk::Result;

    /// `vkEnumerateInstanceLayerProperties`
    fn enumerate_instance_layers(
        &self,
        count: &mut u32,
        properties: Option<&mut [vk::LayerProperties]>,
    ) -> vk::Result;

    /// Create the instance; creation is atomic on the driver side
    fn create_instance(&mut self, request: &InstanceRequest<'_>) -> Result<vk::Instance, vk::Result>;

    /// Resolve the debug utils messenger entry points for `instance`
    fn debug_utils_fns(&self, instance: vk::Instance) -> DebugUtilsFns;

    /// `vkEnumeratePhysicalDevices`
    fn enumerate_physical_devices(
        &self,
        instance: vk::Instance,
        count: &mut u32,
        devices: Option<&mut [vk::PhysicalDevice]>,
    ) -> vk::Result;

    /// Human-readable device name, for logging
    fn physical_device_name(&self, instance: vk::Instance, device: vk::PhysicalDevice) -> String;

    /// Destroy a presentation surface created against `instance`
    fn destroy_surface(&mut self, instance: vk::Instance, surface: vk::SurfaceKHR);

    /// Destroy the instance
    fn destroy_instance(&mut self, instance: vk::Instance);
}
