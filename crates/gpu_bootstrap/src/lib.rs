//! # GPU Bootstrap
//!
//! Brings a Vulkan instance and presentation surface up for a window, wires
//! validation-layer diagnostics, checks that a physical device exists, runs a
//! minimal event loop and releases everything in reverse order.
//!
//! ## Stages
//!
//! 1. Probe the driver version and available extensions/layers
//! 2. Negotiate the instance extension and layer lists
//! 3. Create the instance, chaining the debug messenger config
//! 4. Attach the debug messenger through resolved entry points
//! 5. Bind the window surface
//! 6. Enumerate physical devices
//! 7. Run the lifecycle loop until the window closes
//! 8. Tear down: messenger, surface, instance
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gpu_bootstrap::prelude::*;
//!
//! fn main() -> Result<(), BootstrapError> {
//!     let config = SessionConfig::default();
//!     let mut window = GlfwWindow::new(&config.window)?;
//!     let driver = AshDriver::load()?;
//!     let report = gpu_bootstrap::run(driver, &mut window, &config, BootstrapOptions::default())?;
//!     println!("ran {} frames", report.iterations);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::missing_errors_doc)]

pub mod config;
pub mod foundation;
pub mod lifecycle;
pub mod vulkan;
pub mod window;

mod bootstrap;

#[cfg(test)]
#[allow(missing_docs)]
pub(crate) mod testing;

pub use bootstrap::{run, start_session, BootstrapOptions};

/// Common imports for users of the crate
pub mod prelude {
    pub use crate::{
        bootstrap::{run, start_session, BootstrapOptions},
        config::{Config, ConfigError, SessionConfig, DEFAULT_CONFIG_FILE},
        lifecycle::{LifecycleLoop, LoopReport, LoopState},
        vulkan::{AshDriver, BootstrapError, BootstrapResult, GpuDriver, GpuSession},
        window::{GlfwWindow, Windowing},
    };
}
