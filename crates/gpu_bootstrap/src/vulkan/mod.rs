//! Vulkan context acquisition and teardown

pub mod ash_driver;
pub mod capabilities;
pub mod debug;
pub mod device;
pub mod driver;
pub mod enumerate;
pub mod error;
pub mod instance;
pub mod negotiation;
pub mod session;
pub mod surface;

pub use ash_driver::AshDriver;
pub use capabilities::{probe_capabilities, probe_version, AvailableCapabilities, MIN_API_VERSION};
pub use debug::{DiagnosticsBridge, Route};
pub use driver::{ApiVersion, DebugUtilsFns, GpuDriver, InstanceRequest};
pub use enumerate::enumerate_two_call;
pub use error::{BootstrapError, BootstrapResult};
pub use negotiation::{
    negotiate, InstanceRequirements, Platform, DEBUG_UTILS_EXTENSION, DIAGNOSTICS_ENABLED,
    PHYSICAL_DEVICE_PROPERTIES_2_EXTENSION, PORTABILITY_ENUMERATION_EXTENSION, VALIDATION_LAYER,
};
pub use session::GpuSession;
