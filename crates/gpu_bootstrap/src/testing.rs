//! Recording test doubles for the driver and window seams
//!
//! Both doubles append to a shared journal so tests can assert on the exact
//! order of driver calls. The messenger entry points are real
//! `extern "system"` functions; they find the journal through a thread-local
//! installed by [`journal`].

use std::cell::{Cell, RefCell};
use std::os::raw::c_char;
use std::rc::Rc;

use ash::vk::{self, Handle};

use crate::vulkan::{ApiVersion, BootstrapResult, DebugUtilsFns, GpuDriver, InstanceRequest};
use crate::window::{FramebufferResize, WindowResult, Windowing};

/// One observable driver or window interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateInstance {
        application: String,
        extensions: Vec<String>,
        layers: Vec<String>,
        chained_messenger: bool,
    },
    CreateMessenger,
    DestroyMessenger,
    CreateSurface,
    DestroySurface,
    DestroyInstance,
    PollEvents,
}

pub type Journal = Rc<RefCell<Vec<Call>>>;

thread_local! {
    static ACTIVE_JOURNAL: RefCell<Option<Journal>> = RefCell::new(None);
    static MESSENGER_STATUS: Cell<vk::Result> = Cell::new(vk::Result::SUCCESS);
}

/// Fresh journal, also made visible to the messenger entry points
pub fn journal() -> Journal {
    let journal = Journal::default();
    ACTIVE_JOURNAL.with(|active| *active.borrow_mut() = Some(journal.clone()));
    MESSENGER_STATUS.with(|status| status.set(vk::Result::SUCCESS));
    journal
}

fn record(call: Call) {
    ACTIVE_JOURNAL.with(|active| {
        if let Some(journal) = active.borrow().as_ref() {
            journal.borrow_mut().push(call);
        }
    });
}

pub fn fake_instance() -> vk::Instance {
    vk::Instance::from_raw(0x1000)
}

pub fn fake_surface() -> vk::SurfaceKHR {
    vk::SurfaceKHR::from_raw(0x5000)
}

pub fn fake_messenger() -> vk::DebugUtilsMessengerEXT {
    vk::DebugUtilsMessengerEXT::from_raw(0xD000)
}

unsafe extern "system" fn mock_create_messenger(
    _instance: vk::Instance,
    _create_info: *const vk::DebugUtilsMessengerCreateInfoEXT,
    _allocator: *const vk::AllocationCallbacks,
    messenger: *mut vk::DebugUtilsMessengerEXT,
) -> vk::Result {
    record(Call::CreateMessenger);
    let status = MESSENGER_STATUS.with(Cell::get);
    if status == vk::Result::SUCCESS {
        *messenger = fake_messenger();
    }
    status
}

unsafe extern "system" fn mock_destroy_messenger(
    _instance: vk::Instance,
    _messenger: vk::DebugUtilsMessengerEXT,
    _allocator: *const vk::AllocationCallbacks,
) {
    record(Call::DestroyMessenger);
}

fn write_name(dst: &mut [c_char], name: &str) {
    for (slot, byte) in dst.iter_mut().zip(name.bytes()) {
        *slot = byte as c_char;
    }
}

/// Fill `out` Vulkan-style from `items`
fn fill<T: Clone>(items: &[T], count: &mut u32, out: Option<&mut [T]>) -> vk::Result {
    match out {
        None => {
            *count = items.len() as u32;
            vk::Result::SUCCESS
        }
        Some(buf) => {
            let n = buf.len().min(items.len());
            buf[..n].clone_from_slice(&items[..n]);
            *count = n as u32;
            if items.len() > buf.len() {
                vk::Result::INCOMPLETE
            } else {
                vk::Result::SUCCESS
            }
        }
    }
}

/// Scriptable driver that records what it is asked to do
pub struct MockDriver {
    journal: Journal,
    version: ApiVersion,
    extensions: Vec<String>,
    layers: Vec<String>,
    devices: usize,
    layer_status: vk::Result,
    create_status: Option<vk::Result>,
    resolve_create: bool,
    resolve_destroy: bool,
}

impl MockDriver {
    /// A healthy 1.3 driver with surface, xcb and debug utils support and one GPU
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            version: ApiVersion::new(1, 3, 250),
            extensions: ["VK_KHR_surface", "VK_KHR_xcb_surface", "VK_EXT_debug_utils"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            layers: vec!["VK_LAYER_KHRONOS_validation".to_string()],
            devices: 1,
            layer_status: vk::Result::SUCCESS,
            create_status: None,
            resolve_create: true,
            resolve_destroy: true,
        }
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_layers(mut self, layers: &[&str]) -> Self {
        self.layers = layers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_layer_status(mut self, status: vk::Result) -> Self {
        self.layer_status = status;
        self
    }

    pub fn with_devices(mut self, devices: usize) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_create_status(mut self, status: vk::Result) -> Self {
        self.create_status = Some(status);
        self
    }

    pub fn with_messenger_fns(mut self, create: bool, destroy: bool) -> Self {
        self.resolve_create = create;
        self.resolve_destroy = destroy;
        self
    }

    pub fn with_messenger_status(self, status: vk::Result) -> Self {
        MESSENGER_STATUS.with(|cell| cell.set(status));
        self
    }
}

impl GpuDriver for MockDriver {
    fn instance_version(&self) -> BootstrapResult<ApiVersion> {
        Ok(self.version)
    }

    fn enumerate_instance_extensions(
        &self,
        count: &mut u32,
        properties: Option<&mut [vk::ExtensionProperties]>,
    ) -> vk::Result {
        let items: Vec<vk::ExtensionProperties> = self
            .extensions
            .iter()
            .map(|name| {
                let mut props = vk::ExtensionProperties::default();
                write_name(&mut props.extension_name, name);
                props
            })
            .collect();
        fill(&items, count, properties)
    }

    fn enumerate_instance_layers(&self, count: &mut u32, properties: Option<&mut [vk::LayerProperties]>) -> vk::Result {
        if self.layer_status != vk::Result::SUCCESS {
            return self.layer_status;
        }
        let items: Vec<vk::LayerProperties> = self
            .layers
            .iter()
            .map(|name| {
                let mut props = vk::LayerProperties::default();
                write_name(&mut props.layer_name, name);
                props
            })
            .collect();
        fill(&items, count, properties)
    }

    fn create_instance(&mut self, request: &InstanceRequest<'_>) -> Result<vk::Instance, vk::Result> {
        self.journal.borrow_mut().push(Call::CreateInstance {
            application: request.identity.application_name.clone(),
            extensions: request.requirements.extensions().to_vec(),
            layers: request.requirements.layers().to_vec(),
            chained_messenger: request.diagnostics.is_some(),
        });
        match self.create_status {
            Some(status) => Err(status),
            None => Ok(fake_instance()),
        }
    }

    fn debug_utils_fns(&self, _instance: vk::Instance) -> DebugUtilsFns {
        DebugUtilsFns {
            create: self
                .resolve_create
                .then_some(mock_create_messenger as vk::PFN_vkCreateDebugUtilsMessengerEXT),
            destroy: self
                .resolve_destroy
                .then_some(mock_destroy_messenger as vk::PFN_vkDestroyDebugUtilsMessengerEXT),
        }
    }

    fn enumerate_physical_devices(
        &self,
        _instance: vk::Instance,
        count: &mut u32,
        devices: Option<&mut [vk::PhysicalDevice]>,
    ) -> vk::Result {
        let items: Vec<vk::PhysicalDevice> = (0..self.devices)
            .map(|i| vk::PhysicalDevice::from_raw(0x2000 + i as u64))
            .collect();
        fill(&items, count, devices)
    }

    fn physical_device_name(&self, _instance: vk::Instance, device: vk::PhysicalDevice) -> String {
        format!("Mock GPU {:#x}", device.as_raw())
    }

    fn destroy_surface(&mut self, _instance: vk::Instance, _surface: vk::SurfaceKHR) {
        self.journal.borrow_mut().push(Call::DestroySurface);
    }

    fn destroy_instance(&mut self, _instance: vk::Instance) {
        self.journal.borrow_mut().push(Call::DestroyInstance);
    }
}

/// Scriptable window
pub struct MockWindow {
    journal: Journal,
    extensions: Vec<String>,
    surface_status: Option<vk::Result>,
    close_after: Option<u32>,
    resize: Option<(u32, FramebufferResize)>,
    polls: u32,
}

impl MockWindow {
    /// A window needing surface and xcb surface extensions that never closes
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            extensions: vec!["VK_KHR_surface".to_string(), "VK_KHR_xcb_surface".to_string()],
            surface_status: None,
            close_after: None,
            resize: None,
            polls: 0,
        }
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_surface_status(mut self, status: vk::Result) -> Self {
        self.surface_status = Some(status);
        self
    }

    /// Report a close request once `polls` event polls have happened
    pub fn close_after(mut self, polls: u32) -> Self {
        self.close_after = Some(polls);
        self
    }

    /// Report `resize` on the given (1-based) poll
    pub fn resize_on(mut self, poll: u32, resize: FramebufferResize) -> Self {
        self.resize = Some((poll, resize));
        self
    }
}

impl Windowing for MockWindow {
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        Ok(self.extensions.clone())
    }

    fn create_surface(&mut self, _instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result> {
        self.journal.borrow_mut().push(Call::CreateSurface);
        match self.surface_status {
            Some(status) => Err(status),
            None => Ok(fake_surface()),
        }
    }

    fn poll_events(&mut self) -> Option<FramebufferResize> {
        self.polls += 1;
        self.journal.borrow_mut().push(Call::PollEvents);
        match self.resize {
            Some((poll, resize)) if poll == self.polls => Some(resize),
            _ => None,
        }
    }

    fn should_close(&self) -> bool {
        self.close_after.map_or(false, |limit| self.polls >= limit)
    }
}
