//! Logging setup

use log::LevelFilter;

/// Log target carrying validation-layer messages
pub const DIAGNOSTICS_TARGET: &str = "vulkan";

/// Logger configuration used by [`init`]
///
/// Defaults to `Info`, with every severity on [`DIAGNOSTICS_TARGET`] let
/// through. `RUST_LOG` still overrides per module.
pub fn builder() -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_default_env();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module(DIAGNOSTICS_TARGET, LevelFilter::Trace)
        .parse_default_env();
    builder
}

/// Initialize the logging system
pub fn init() {
    builder().init();
}
