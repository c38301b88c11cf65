//! Physical device enumeration
//!
//! Only checks that at least one device is visible. Picking one is left to
//! whatever builds the logical device later.

use ash::vk;

use super::{enumerate_two_call, BootstrapError, BootstrapResult, GpuDriver, GpuSession};

impl<D: GpuDriver> GpuSession<D> {
    /// List the physical devices visible to the instance
    ///
    /// Fails with [`BootstrapError::NoCompatibleDevice`] when there are none.
    pub fn enumerate_devices(&self) -> BootstrapResult<Vec<vk::PhysicalDevice>> {
        let devices = enumerate_two_call("physical devices", |count, out: Option<&mut [vk::PhysicalDevice]>| {
            self.driver.enumerate_physical_devices(self.instance, count, out)
        })?;

        if devices.is_empty() {
            return Err(BootstrapError::NoCompatibleDevice);
        }

        for (index, device) in devices.iter().enumerate() {
            log::info!("GPU {}: {}", index, self.driver.physical_device_name(self.instance, *device));
        }
        if devices.len() > 1 {
            log::info!("{} physical devices available; selection happens later", devices.len());
        }

        Ok(devices)
    }
}
