//! Validation message bridge
//!
//! Routes driver diagnostics by severity. Verbose, warning and error
//! messages go to the `log` facade; info messages are appended to a
//! persistent file. The callback can fire on driver-owned threads, so the
//! file handle sits behind a mutex.

use std::borrow::Cow;
use std::ffi::{c_void, CStr};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::Mutex;

use ash::vk;

use crate::config::DiagnosticsSettings;
use crate::foundation::logging::DIAGNOSTICS_TARGET;
use super::{BootstrapError, BootstrapResult, GpuDriver, GpuSession};

/// Where a message of a given severity ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Interactive diagnostics stream at this log level
    Interactive(log::Level),
    /// Appended to the persistent info log
    Persistent,
    /// Severity was not subscribed
    Dropped,
}

enum InfoSink {
    Unopened,
    Open(File),
    Unavailable,
}

/// Severity-aware sink for debug utils messages
pub struct DiagnosticsBridge {
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_types: vk::DebugUtilsMessageTypeFlagsEXT,
    info_path: PathBuf,
    info_sink: Mutex<InfoSink>,
}

impl DiagnosticsBridge {
    /// Build the bridge; the info log is opened on first use
    pub fn new(settings: &DiagnosticsSettings) -> Self {
        let mut severity =
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR;
        if settings.capture_verbose {
            severity |= vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE;
        }
        if settings.capture_info {
            severity |= vk::DebugUtilsMessageSeverityFlagsEXT::INFO;
        }

        Self {
            severity,
            message_types: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            info_path: settings.info_log_path.clone(),
            info_sink: Mutex::new(InfoSink::Unopened),
        }
    }

    /// Subscribed severities
    pub fn severity_mask(&self) -> vk::DebugUtilsMessageSeverityFlagsEXT {
        self.severity
    }

    /// Subscribed message types
    pub fn message_type_mask(&self) -> vk::DebugUtilsMessageTypeFlagsEXT {
        self.message_types
    }

    /// Messenger create info pointing the driver back at this bridge
    ///
    /// The bridge address is passed as user data, so the bridge must not move
    /// while a messenger created from this info is alive.
    pub fn messenger_create_info(&self) -> vk::DebugUtilsMessengerCreateInfoEXT {
        vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(self.severity)
            .message_type(self.message_types)
            .pfn_user_callback(Some(vk_debug_callback))
            .user_data(self as *const Self as *mut c_void)
            .build()
    }

    /// Decide where a message of `severity` goes
    pub fn route(&self, severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> Route {
        if !self.severity.contains(severity) {
            return Route::Dropped;
        }
        match severity {
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => Route::Interactive(log::Level::Error),
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => Route::Interactive(log::Level::Warn),
            vk::DebugUtilsMessageSeverityFlagsEXT::INFO => Route::Persistent,
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE => Route::Interactive(log::Level::Debug),
            _ => Route::Dropped,
        }
    }

    /// Deliver one message according to [`DiagnosticsBridge::route`]
    pub fn dispatch(
        &self,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
        message_type: vk::DebugUtilsMessageTypeFlagsEXT,
        message: &str,
    ) -> Route {
        let route = self.route(severity);
        match route {
            Route::Interactive(level) => {
                log::log!(target: DIAGNOSTICS_TARGET, level, "validation layer [{}] {:?}: {}", severity_tag(severity), message_type, message);
            }
            Route::Persistent => self.append_info(message),
            Route::Dropped => {}
        }
        route
    }

    fn append_info(&self, message: &str) {
        let mut sink = match self.info_sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if matches!(*sink, InfoSink::Unopened) {
            *sink = match open_append(&self.info_path) {
                Ok(file) => InfoSink::Open(file),
                Err(err) => {
                    log::error!(target: DIAGNOSTICS_TARGET, "{}", err);
                    InfoSink::Unavailable
                }
            };
        }

        match &mut *sink {
            InfoSink::Open(file) => {
                if let Err(err) = writeln!(file, "validation layer [INFO]: {}", message) {
                    log::error!(target: DIAGNOSTICS_TARGET, "Failed to write {}: {}", self.info_path.display(), err);
                }
            }
            _ => log::info!(target: DIAGNOSTICS_TARGET, "validation layer [INFO]: {}", message),
        }
    }
}

fn open_append(path: &Path) -> BootstrapResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| BootstrapError::LogSinkUnavailable {
            path: path.display().to_string(),
            source,
        })
}

fn severity_tag(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> &'static str {
    match severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => "ERROR",
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => "WARNING",
        vk::DebugUtilsMessageSeverityFlagsEXT::INFO => "INFO",
        vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE => "VERBOSE",
        _ => "UNKNOWN",
    }
}

/// Debug messenger callback
///
/// # Safety
/// `user_data` must be null or point at a live [`DiagnosticsBridge`].
unsafe extern "system" fn vk_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    user_data: *mut c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() || user_data.is_null() {
        return vk::FALSE;
    }

    let callback_data = *p_callback_data;
    let message = if callback_data.p_message.is_null() {
        Cow::from("")
    } else {
        CStr::from_ptr(callback_data.p_message).to_string_lossy()
    };
    let bridge = &*(user_data as *const DiagnosticsBridge);

    // Unwinding into the driver is undefined; swallow anything from the sinks.
    let _ = panic::catch_unwind(AssertUnwindSafe(|| {
        bridge.dispatch(message_severity, message_type, &message);
    }));

    // Only layer developers return TRUE
    vk::FALSE
}

impl<D: GpuDriver> GpuSession<D> {
    /// Resolve the messenger entry points and attach the bridge
    ///
    /// A no-op when the session was built without diagnostics.
    pub fn attach_diagnostics(&mut self) -> BootstrapResult<()> {
        let Some(bridge) = self.diagnostics.as_deref() else {
            return Ok(());
        };

        self.debug_fns = self.driver.debug_utils_fns(self.instance);
        let create = self.debug_fns.create.ok_or(BootstrapError::DiagnosticsUnavailable)?;
        if self.debug_fns.destroy.is_none() {
            log::warn!("vkDestroyDebugUtilsMessengerEXT not resolved; messenger will not be detached");
        }

        let create_info = bridge.messenger_create_info();
        let mut messenger = vk::DebugUtilsMessengerEXT::null();
        let status = unsafe { create(self.instance, &create_info, ptr::null(), &mut messenger) };
        if status != vk::Result::SUCCESS {
            return Err(BootstrapError::DiagnosticsAttachFailed { status });
        }

        self.messenger = messenger;
        log::info!("Debug messenger attached");
        Ok(())
    }
}
