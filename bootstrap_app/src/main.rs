//! Vulkan2: open a window, bring the GPU context up, idle until closed

use std::path::Path;
use std::process::ExitCode;

use gpu_bootstrap::foundation::logging;
use gpu_bootstrap::prelude::*;

fn run_application(config: &SessionConfig) -> BootstrapResult<LoopReport> {
    let mut window = GlfwWindow::new(&config.window)?;
    let driver = AshDriver::load()?;
    gpu_bootstrap::run(driver, &mut window, config, BootstrapOptions::default())
}

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {}", panic_info);
    }));

    logging::init();
    log::info!("Initializing Program");

    let config = match SessionConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("configuration failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match run_application(&config) {
        Ok(report) => {
            log::info!(
                "Window closed after {} frames ({:.1}s)",
                report.iterations,
                report.elapsed.as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{} failed: {}", e.stage(), e);
            ExitCode::FAILURE
        }
    }
}
