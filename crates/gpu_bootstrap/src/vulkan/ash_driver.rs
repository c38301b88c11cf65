//! `GpuDriver` backed by the system Vulkan loader through ash

use std::ffi::{CStr, CString};
use std::mem;
use std::os::raw::c_char;
use std::ptr;

use ash::extensions::khr::Surface;
use ash::{vk, Entry, Instance};

use super::capabilities::fixed_str;
use super::{ApiVersion, BootstrapError, BootstrapResult, DebugUtilsFns, DiagnosticsBridge, GpuDriver, InstanceRequest};

const CREATE_MESSENGER_NAME: &[u8] = b"vkCreateDebugUtilsMessengerEXT\0";
const DESTROY_MESSENGER_NAME: &[u8] = b"vkDestroyDebugUtilsMessengerEXT\0";

/// Vulkan loader plus the instance-level function tables once created
pub struct AshDriver {
    entry: Entry,
    instance: Option<Instance>,
    surface_loader: Option<Surface>,
}

impl AshDriver {
    /// Load the Vulkan loader library
    pub fn load() -> BootstrapResult<Self> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| BootstrapError::DriverUnavailable(format!("Failed to load Vulkan: {}", e)))?;

        Ok(Self {
            entry,
            instance: None,
            surface_loader: None,
        })
    }
}

fn to_cstrings(names: &[String], on_error: vk::Result) -> Result<Vec<CString>, vk::Result> {
    names
        .iter()
        .map(|name| CString::new(name.as_str()).map_err(|_| on_error))
        .collect()
}

fn buffer_ptr<T>(buffer: Option<&mut [T]>) -> *mut T {
    buffer.map_or(ptr::null_mut(), <[T]>::as_mut_ptr)
}

impl GpuDriver for AshDriver {
    fn instance_version(&self) -> BootstrapResult<ApiVersion> {
        let raw = self
            .entry
            .try_enumerate_instance_version()
            .map_err(|status| BootstrapError::EnumerationFailed {
                what: "instance version",
                status,
            })?;

        // A 1.0 loader has no vkEnumerateInstanceVersion
        Ok(raw.map_or(ApiVersion::new(1, 0, 0), ApiVersion::from_raw))
    }

    fn enumerate_instance_extensions(
        &self,
        count: &mut u32,
        properties: Option<&mut [vk::ExtensionProperties]>,
    ) -> vk::Result {
        unsafe {
            (self.entry.fp_v1_0().enumerate_instance_extension_properties)(ptr::null(), count, buffer_ptr(properties))
        }
    }

    fn enumerate_instance_layers(&self, count: &mut u32, properties: Option<&mut [vk::LayerProperties]>) -> vk::Result {
        unsafe { (self.entry.fp_v1_0().enumerate_instance_layer_properties)(count, buffer_ptr(properties)) }
    }

    fn create_instance(&mut self, request: &InstanceRequest<'_>) -> Result<vk::Instance, vk::Result> {
        let app_name = CString::new(request.identity.application_name.as_str())
            .map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)?;
        let engine_name =
            CString::new(request.identity.engine_name.as_str()).map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)?;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(request.identity.application_version.to_raw())
            .engine_name(&engine_name)
            .engine_version(request.identity.engine_version.to_raw())
            .api_version(request.api_version.to_raw());

        let extensions = to_cstrings(request.requirements.extensions(), vk::Result::ERROR_EXTENSION_NOT_PRESENT)?;
        let layers = to_cstrings(request.requirements.layers(), vk::Result::ERROR_LAYER_NOT_PRESENT)?;
        let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|name| name.as_ptr()).collect();
        let layer_ptrs: Vec<*const c_char> = layers.iter().map(|name| name.as_ptr()).collect();

        let mut messenger_info = request.diagnostics.map(DiagnosticsBridge::messenger_create_info);

        let mut create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs)
            .flags(request.requirements.flags());
        if let Some(info) = messenger_info.as_mut() {
            create_info = create_info.push_next(info);
        }

        let instance = unsafe { self.entry.create_instance(&create_info, None)? };
        let handle = instance.handle();
        self.surface_loader = Some(Surface::new(&self.entry, &instance));
        self.instance = Some(instance);
        Ok(handle)
    }

    fn debug_utils_fns(&self, instance: vk::Instance) -> DebugUtilsFns {
        unsafe {
            let create = self
                .entry
                .get_instance_proc_addr(instance, CStr::from_bytes_with_nul_unchecked(CREATE_MESSENGER_NAME).as_ptr());
            let destroy = self
                .entry
                .get_instance_proc_addr(instance, CStr::from_bytes_with_nul_unchecked(DESTROY_MESSENGER_NAME).as_ptr());

            DebugUtilsFns {
                create: create.map(|f| mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkCreateDebugUtilsMessengerEXT>(f)),
                destroy: destroy
                    .map(|f| mem::transmute::<unsafe extern "system" fn(), vk::PFN_vkDestroyDebugUtilsMessengerEXT>(f)),
            }
        }
    }

    fn enumerate_physical_devices(
        &self,
        instance: vk::Instance,
        count: &mut u32,
        devices: Option<&mut [vk::PhysicalDevice]>,
    ) -> vk::Result {
        let Some(loaded) = self.instance.as_ref().filter(|loaded| loaded.handle() == instance) else {
            return vk::Result::ERROR_INITIALIZATION_FAILED;
        };
        unsafe { (loaded.fp_v1_0().enumerate_physical_devices)(instance, count, buffer_ptr(devices)) }
    }

    fn physical_device_name(&self, instance: vk::Instance, device: vk::PhysicalDevice) -> String {
        match self.instance.as_ref().filter(|loaded| loaded.handle() == instance) {
            Some(loaded) => {
                let properties = unsafe { loaded.get_physical_device_properties(device) };
                fixed_str(&properties.device_name)
            }
            None => String::from("<unknown>"),
        }
    }

    fn destroy_surface(&mut self, instance: vk::Instance, surface: vk::SurfaceKHR) {
        match (&self.instance, &self.surface_loader) {
            (Some(loaded), Some(loader)) if loaded.handle() == instance => unsafe {
                loader.destroy_surface(surface, None);
            },
            _ => log::warn!("Surface {:?} does not belong to the live instance; not destroyed", surface),
        }
    }

    fn destroy_instance(&mut self, instance: vk::Instance) {
        match self.instance.take() {
            Some(loaded) if loaded.handle() == instance => {
                self.surface_loader = None;
                unsafe { loaded.destroy_instance(None) };
            }
            other => {
                self.instance = other;
                log::warn!("Instance {:?} is not the live instance; not destroyed", instance);
            }
        }
    }
}
