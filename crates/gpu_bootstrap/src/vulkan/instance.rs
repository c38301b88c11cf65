//! Instance creation

use ash::vk;

use crate::config::AppIdentity;
use super::{ApiVersion, BootstrapError, BootstrapResult, GpuDriver, GpuSession, InstanceRequest, InstanceRequirements};

impl<D: GpuDriver> GpuSession<D> {
    /// Create the Vulkan instance from validated requirements
    ///
    /// When the session carries a diagnostics bridge its messenger info is
    /// chained onto the create call, so instance creation and destruction are
    /// reported too.
    pub fn create_context(
        &mut self,
        identity: &AppIdentity,
        requirements: &InstanceRequirements,
    ) -> BootstrapResult<vk::Instance> {
        debug_assert!(self.instance == vk::Instance::null(), "instance already created");

        let request = InstanceRequest {
            identity,
            api_version: ApiVersion::VULKAN_1_3,
            requirements,
            diagnostics: self.diagnostics.as_deref(),
        };

        log::info!("Creating instance");
        let instance = self
            .driver
            .create_instance(&request)
            .map_err(|status| BootstrapError::ContextCreationFailed { status })?;

        self.instance = instance;
        Ok(instance)
    }
}
