//! Bootstrap error taxonomy
//!
//! Every setup stage fails with one of these variants. All of them except
//! [`BootstrapError::LogSinkUnavailable`] are fatal: they propagate to the
//! top level, which tears down whatever was already acquired and exits.

use ash::vk;
use thiserror::Error;

use crate::window::WindowError;

/// Errors raised while bringing the GPU context up
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The Vulkan loader library could not be found or loaded
    #[error("Vulkan loader unavailable: {0}")]
    DriverUnavailable(String),

    /// The driver reports an API version below the required baseline
    #[error("Driver supports Vulkan {found}, need at least {required}")]
    UnsupportedDriver {
        /// Version reported by the driver
        found: super::ApiVersion,
        /// Minimum version this application runs on
        required: super::ApiVersion,
    },

    /// A negotiated instance extension is not installed
    #[error("Required instance extension not available: {name}")]
    MissingExtension {
        /// Extension identifier that failed validation
        name: String,
    },

    /// A requested instance layer is not installed
    #[error("Required instance layer not available: {name}")]
    MissingLayer {
        /// Layer identifier that failed validation
        name: String,
    },

    /// A two-call enumeration query returned an error status
    #[error("Failed to enumerate {what}: {status:?}")]
    EnumerationFailed {
        /// What was being enumerated
        what: &'static str,
        /// Driver status
        status: vk::Result,
    },

    /// Instance creation returned a non-success status
    #[error("Instance creation failed: {status:?}")]
    ContextCreationFailed {
        /// Driver status
        status: vk::Result,
    },

    /// `vkCreateDebugUtilsMessengerEXT` could not be resolved
    #[error("Debug utils messenger entry points are unavailable")]
    DiagnosticsUnavailable,

    /// The debug messenger entry point exists but creation failed
    #[error("Debug utils messenger creation failed: {status:?}")]
    DiagnosticsAttachFailed {
        /// Driver status
        status: vk::Result,
    },

    /// The windowing layer could not create a presentation surface
    #[error("Surface creation failed: {status:?}")]
    SurfaceCreationFailed {
        /// Driver status reported through the windowing layer
        status: vk::Result,
    },

    /// No physical device is visible to the instance
    #[error("No Vulkan-capable physical device found")]
    NoCompatibleDevice,

    /// The persistent diagnostics log could not be opened (non-fatal)
    #[error("Diagnostics log {path} unavailable: {source}")]
    LogSinkUnavailable {
        /// Path that failed to open
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Window system failure
    #[error(transparent)]
    Window(#[from] WindowError),
}

impl BootstrapError {
    /// Name of the setup stage that produced this error
    pub fn stage(&self) -> &'static str {
        match self {
            Self::DriverUnavailable(_) | Self::UnsupportedDriver { .. } => "capability probe",
            Self::EnumerationFailed { what, .. } => match *what {
                "physical devices" => "device enumeration",
                _ => "capability probe",
            },
            Self::MissingExtension { .. } | Self::MissingLayer { .. } => "extension negotiation",
            Self::ContextCreationFailed { .. } => "context creation",
            Self::DiagnosticsUnavailable | Self::DiagnosticsAttachFailed { .. } => "diagnostics attach",
            Self::SurfaceCreationFailed { .. } => "surface creation",
            Self::NoCompatibleDevice => "device enumeration",
            Self::LogSinkUnavailable { .. } => "diagnostics log",
            Self::Window(_) => "window setup",
        }
    }
}

/// Result type for bootstrap operations
pub type BootstrapResult<T> = Result<T, BootstrapError>;
