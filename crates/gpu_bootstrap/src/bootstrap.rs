//! Startup sequence
//!
//! Probe → negotiate → create instance → attach diagnostics → bind surface
//! → enumerate devices → lifecycle loop → teardown. A failure at any stage
//! returns early; whatever the session already holds is released when it
//! drops.

use crate::config::SessionConfig;
use crate::lifecycle::{LifecycleLoop, LoopReport};
use crate::vulkan::{
    negotiate, probe_capabilities, probe_version, BootstrapResult, DiagnosticsBridge, GpuDriver, GpuSession,
    Platform, DIAGNOSTICS_ENABLED,
};
use crate::window::Windowing;

/// Build-time switches for the startup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Enable validation layers and the debug messenger
    pub diagnostics: bool,
    /// Host platform used for portability decisions
    pub platform: Platform,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            diagnostics: DIAGNOSTICS_ENABLED,
            platform: Platform::current(),
        }
    }
}

/// Bring up a GPU session bound to `window`
///
/// On error every handle created so far has already been released.
pub fn start_session<D, W>(
    driver: D,
    window: &mut W,
    config: &SessionConfig,
    options: BootstrapOptions,
) -> BootstrapResult<GpuSession<D>>
where
    D: GpuDriver,
    W: Windowing,
{
    log::info!("Checking version");
    probe_version(&driver)?;
    let available = probe_capabilities(&driver, options.diagnostics)?;

    let window_extensions = window.required_instance_extensions()?;
    let requirements = negotiate(&window_extensions, options.diagnostics, options.platform, &available)?;

    let bridge = options
        .diagnostics
        .then(|| DiagnosticsBridge::new(&config.diagnostics));
    let mut session = GpuSession::new(driver, bridge);

    session.create_context(&config.identity, &requirements)?;
    session.attach_diagnostics()?;
    session.bind_surface(window)?;
    session.enumerate_devices()?;

    Ok(session)
}

/// Start a session, run the lifecycle loop until close, then tear down
pub fn run<D, W>(driver: D, window: &mut W, config: &SessionConfig, options: BootstrapOptions) -> BootstrapResult<LoopReport>
where
    D: GpuDriver,
    W: Windowing,
{
    log::info!("Initializing {}", config.identity.application_name);
    let mut session = start_session(driver, window, config, options)?;

    let report = LifecycleLoop::new(config.frame_interval()).run(window);

    session.teardown();
    Ok(report)
}
