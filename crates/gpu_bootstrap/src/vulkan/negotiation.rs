//! Extension and layer negotiation
//!
//! Builds the instance extension list from the window system requirements,
//! the diagnostics switch and the host platform, then checks every entry
//! against what the driver reported. Negotiation fails closed: the first
//! missing name aborts before any driver object exists.

use ash::vk;

use super::{AvailableCapabilities, BootstrapError, BootstrapResult};

/// `VK_EXT_debug_utils`
pub const DEBUG_UTILS_EXTENSION: &str = "VK_EXT_debug_utils";
/// `VK_KHR_portability_enumeration`
pub const PORTABILITY_ENUMERATION_EXTENSION: &str = "VK_KHR_portability_enumeration";
/// `VK_KHR_get_physical_device_properties2`
pub const PHYSICAL_DEVICE_PROPERTIES_2_EXTENSION: &str = "VK_KHR_get_physical_device_properties2";
/// Khronos validation layer
pub const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Validation layers and the debug messenger are compiled into debug builds only
pub const DIAGNOSTICS_ENABLED: bool = cfg!(debug_assertions);

/// Host platform, as far as instance creation cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS on Apple silicon, where Vulkan runs through a portability driver
    MacOsArm64,
    /// Everything else
    Other,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
            Self::MacOsArm64
        } else {
            Self::Other
        }
    }

    /// Whether instance creation must opt into portability drivers
    pub fn requires_portability(self) -> bool {
        matches!(self, Self::MacOsArm64)
    }
}

/// Negotiated instance extensions, layers and creation flags
///
/// Extension order follows insertion and contains no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceRequirements {
    extensions: Vec<String>,
    layers: Vec<String>,
    flags: vk::InstanceCreateFlags,
}

impl InstanceRequirements {
    /// Assemble the requirement set
    pub fn assemble(window_extensions: &[String], diagnostics: bool, platform: Platform) -> Self {
        let mut requirements = Self::default();

        for name in window_extensions {
            requirements.push_extension(name);
        }

        if diagnostics {
            requirements.push_extension(DEBUG_UTILS_EXTENSION);
            requirements.layers.push(VALIDATION_LAYER.to_string());
        }

        if platform.requires_portability() {
            requirements.push_extension(PORTABILITY_ENUMERATION_EXTENSION);
            requirements.push_extension(PHYSICAL_DEVICE_PROPERTIES_2_EXTENSION);
            requirements.flags |= vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR;
        }

        requirements
    }

    fn push_extension(&mut self, name: &str) {
        if !self.extensions.iter().any(|existing| existing == name) {
            self.extensions.push(name.to_string());
        }
    }

    /// Check every extension, then every layer, against the driver's list
    ///
    /// Stops at the first name that is not available.
    pub fn validate(&self, available: &AvailableCapabilities) -> BootstrapResult<()> {
        if let Some(name) = self.extensions.iter().find(|name| !available.has_extension(name)) {
            return Err(BootstrapError::MissingExtension { name: name.clone() });
        }
        if let Some(name) = self.layers.iter().find(|name| !available.has_layer(name)) {
            return Err(BootstrapError::MissingLayer { name: name.clone() });
        }
        Ok(())
    }

    /// Extensions to enable
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Layers to enable
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Instance creation flags
    pub fn flags(&self) -> vk::InstanceCreateFlags {
        self.flags
    }

    /// Whether the debug utils extension was requested
    pub fn diagnostics_enabled(&self) -> bool {
        self.extensions.iter().any(|name| name == DEBUG_UTILS_EXTENSION)
    }
}

/// Assemble and validate the requirement set in one step
pub fn negotiate(
    window_extensions: &[String],
    diagnostics: bool,
    platform: Platform,
    available: &AvailableCapabilities,
) -> BootstrapResult<InstanceRequirements> {
    let requirements = InstanceRequirements::assemble(window_extensions, diagnostics, platform);
    requirements.validate(available)?;

    log::info!("Negotiated instance extensions: {:?}", requirements.extensions());
    if !requirements.layers().is_empty() {
        log::info!("Enabled layers: {:?}", requirements.layers());
    }
    Ok(requirements)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_diagnostics_adds_debug_utils_and_validation_layer() {
        let window = names(&["VK_KHR_surface", "VK_KHR_win32_surface"]);
        let requirements = InstanceRequirements::assemble(&window, true, Platform::Other);

        assert_eq!(requirements.extensions(), ["VK_KHR_surface", "VK_KHR_win32_surface", DEBUG_UTILS_EXTENSION]);
        assert_eq!(requirements.layers(), [VALIDATION_LAYER]);
        assert!(requirements.flags().is_empty());
        assert!(requirements.diagnostics_enabled());
    }

    #[test]
    fn test_release_build_has_no_layers() {
        let window = names(&["VK_KHR_surface"]);
        let requirements = InstanceRequirements::assemble(&window, false, Platform::Other);

        assert_eq!(requirements.extensions(), ["VK_KHR_surface"]);
        assert!(requirements.layers().is_empty());
        assert!(!requirements.diagnostics_enabled());
    }

    #[test]
    fn test_portability_platform_adds_extensions_and_flag() {
        let window = names(&["VK_KHR_surface", "VK_EXT_metal_surface"]);
        let requirements = InstanceRequirements::assemble(&window, false, Platform::MacOsArm64);

        assert_eq!(
            requirements.extensions(),
            [
                "VK_KHR_surface",
                "VK_EXT_metal_surface",
                PORTABILITY_ENUMERATION_EXTENSION,
                PHYSICAL_DEVICE_PROPERTIES_2_EXTENSION,
            ]
        );
        assert!(requirements.flags().contains(vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let window = names(&["VK_EXT_debug_utils", "VK_KHR_surface", "VK_KHR_surface"]);
        let requirements = InstanceRequirements::assemble(&window, true, Platform::Other);

        assert_eq!(requirements.extensions(), [DEBUG_UTILS_EXTENSION, "VK_KHR_surface"]);
    }

    #[test]
    fn test_first_missing_extension_is_reported() {
        let window = names(&["VK_KHR_surface", "VK_KHR_xcb_surface", "VK_KHR_wayland_surface"]);
        let available = AvailableCapabilities::new(names(&["VK_KHR_surface"]), Vec::new());

        let err = negotiate(&window, false, Platform::Other, &available).unwrap_err();
        assert!(matches!(err, BootstrapError::MissingExtension { ref name } if name == "VK_KHR_xcb_surface"));
    }

    #[test]
    fn test_missing_validation_layer_is_reported() {
        let window = names(&["VK_KHR_surface"]);
        let available = AvailableCapabilities::new(names(&["VK_KHR_surface", DEBUG_UTILS_EXTENSION]), Vec::new());

        let err = negotiate(&window, true, Platform::Other, &available).unwrap_err();
        assert!(matches!(err, BootstrapError::MissingLayer { ref name } if name == VALIDATION_LAYER));
    }
}
