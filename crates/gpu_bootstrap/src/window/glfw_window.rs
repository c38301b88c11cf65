//! Window management using GLFW

use ash::vk;

use crate::config::WindowSettings;
use super::{FramebufferResize, WindowError, WindowResult, Windowing};

/// GLFW window configured for Vulkan (no client API)
pub struct GlfwWindow {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl GlfwWindow {
    /// Initialize GLFW and open the window
    pub fn new(settings: &WindowSettings) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::log_errors).map_err(|_| WindowError::InitializationFailed)?;

        if !glfw.vulkan_supported() {
            return Err(WindowError::GlfwError("Vulkan loader not found by GLFW".to_string()));
        }

        // Configure for Vulkan (no OpenGL context)
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(settings.width, settings.height, &settings.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        log::info!("Window created: {}x{} \"{}\"", settings.width, settings.height, settings.title);
        Ok(Self { glfw, window, events })
    }
}

impl Windowing for GlfwWindow {
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or(WindowError::GlfwError("Failed to get required extensions".to_string()))
    }

    fn create_surface(&mut self, instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result> {
        let mut surface = vk::SurfaceKHR::null();
        let result = self.window.create_window_surface(instance, std::ptr::null(), &mut surface);

        if result == vk::Result::SUCCESS {
            Ok(surface)
        } else {
            Err(result)
        }
    }

    fn poll_events(&mut self) -> Option<FramebufferResize> {
        self.glfw.poll_events();

        let mut resized = None;
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                glfw::WindowEvent::FramebufferSize(width, height) => {
                    resized = Some(FramebufferResize {
                        width: width.max(0) as u32,
                        height: height.max(0) as u32,
                    });
                }
                glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _) => {
                    self.window.set_should_close(true);
                }
                _ => {}
            }
        }
        resized
    }

    fn should_close(&self) -> bool {
        self.window.should_close()
    }
}
