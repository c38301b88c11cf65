//! Capability probing
//!
//! Queries what the installed driver supports before anything is created:
//! the instance API version and the globally exposed extensions and layers.

use std::os::raw::c_char;

use ash::vk;

use super::{enumerate_two_call, ApiVersion, BootstrapError, BootstrapResult, GpuDriver};

/// Lowest driver version this application runs on
pub const MIN_API_VERSION: ApiVersion = ApiVersion::VULKAN_1_3;

/// Extension and layer names reported by the driver
///
/// Queried once and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableCapabilities {
    extensions: Vec<String>,
    layers: Vec<String>,
}

impl AvailableCapabilities {
    /// Build from already-collected names
    pub fn new(extensions: Vec<String>, layers: Vec<String>) -> Self {
        Self { extensions, layers }
    }

    /// Installed instance extensions, in driver order
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Exact-match lookup of an extension name
    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|available| available == name)
    }

    /// Exact-match lookup of a layer name
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|available| available == name)
    }
}

/// Query the driver version and reject anything below [`MIN_API_VERSION`]
pub fn probe_version<D: GpuDriver>(driver: &D) -> BootstrapResult<ApiVersion> {
    let version = driver.instance_version()?;
    log::info!("Detected Vulkan version is: {}", version);

    if !version.satisfies(MIN_API_VERSION) {
        return Err(BootstrapError::UnsupportedDriver {
            found: version,
            required: MIN_API_VERSION,
        });
    }
    Ok(version)
}

/// Collect the globally available instance extensions, and layers when
/// `with_layers` is set
///
/// Without layers the returned set reports none available.
pub fn probe_capabilities<D: GpuDriver>(driver: &D, with_layers: bool) -> BootstrapResult<AvailableCapabilities> {
    let extensions = enumerate_two_call("instance extensions", |count, out: Option<&mut [vk::ExtensionProperties]>| {
        driver.enumerate_instance_extensions(count, out)
    })?;
    let layers = if with_layers {
        enumerate_two_call("instance layers", |count, out: Option<&mut [vk::LayerProperties]>| {
            driver.enumerate_instance_layers(count, out)
        })?
    } else {
        Vec::new()
    };

    let capabilities = AvailableCapabilities::new(
        extensions.iter().map(|ext| fixed_str(&ext.extension_name)).collect(),
        layers.iter().map(|layer| fixed_str(&layer.layer_name)).collect(),
    );
    log::debug!(
        "Driver exposes {} instance extensions and {} layers",
        capabilities.extensions.len(),
        capabilities.layers.len()
    );
    Ok(capabilities)
}

/// Read a NUL-terminated name out of a fixed-size Vulkan char array
///
/// Stops at the array end if the driver forgot the terminator.
pub(crate) fn fixed_str(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw.iter().take_while(|&&c| c != 0).map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{journal, MockDriver};

    #[test]
    fn test_fixed_str_stops_at_nul_or_end() {
        let mut raw = [0 as c_char; 8];
        for (slot, byte) in raw.iter_mut().zip(b"VK_abc") {
            *slot = *byte as c_char;
        }
        assert_eq!(fixed_str(&raw), "VK_abc");

        let unterminated = [b'x' as c_char; 4];
        assert_eq!(fixed_str(&unterminated), "xxxx");
    }

    #[test]
    fn test_old_driver_is_rejected() {
        let driver = MockDriver::new(journal()).with_version(ApiVersion::new(1, 2, 0));
        let err = probe_version(&driver).unwrap_err();
        assert!(matches!(err, BootstrapError::UnsupportedDriver { found, .. } if found == ApiVersion::new(1, 2, 0)));
    }

    #[test]
    fn test_capabilities_are_read_from_driver() {
        let driver = MockDriver::new(journal())
            .with_extensions(&["VK_KHR_surface", "VK_EXT_debug_utils"])
            .with_layers(&["VK_LAYER_KHRONOS_validation"]);

        let available = probe_capabilities(&driver, true).unwrap();
        assert_eq!(available.extensions(), ["VK_KHR_surface", "VK_EXT_debug_utils"]);
        assert!(available.has_extension("VK_EXT_debug_utils"));
        assert!(!available.has_extension("VK_EXT_debug"));
        assert!(available.has_layer("VK_LAYER_KHRONOS_validation"));
    }

    #[test]
    fn test_layers_are_skipped_when_not_wanted() {
        let driver = MockDriver::new(journal()).with_layer_status(vk::Result::ERROR_OUT_OF_HOST_MEMORY);

        let available = probe_capabilities(&driver, false).unwrap();
        assert!(available.has_extension("VK_KHR_surface"));
        assert!(!available.has_layer("VK_LAYER_KHRONOS_validation"));

        let err = probe_capabilities(&driver, true).unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::EnumerationFailed { what: "instance layers", status: vk::Result::ERROR_OUT_OF_HOST_MEMORY }
        ));
    }
}
