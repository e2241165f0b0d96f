pub mod input;

#[cfg(feature = "desktop")]
mod glfw;

#[cfg(feature = "desktop")]
pub use glfw::{InputAction, InputKey, InputModifiers, WindowMouseButton};

#[cfg(feature = "desktop")]
use {
    std::ffi::c_void,
    smallvec::SmallVec,
    crate::utils::{Size, Vec2},
    input::FrameInput,
};

// ----------------------------------------------
// Application
// ----------------------------------------------

// Window + GL context + event pump. Only available with the `desktop` feature.
#[cfg(feature = "desktop")]
pub trait Application {
    fn should_quit(&self) -> bool;
    fn request_quit(&mut self);

    fn poll_events(&mut self) -> ApplicationEventList;
    fn present(&mut self);

    fn window_size(&self) -> Size;
    fn framebuffer_size(&self) -> Size;
    fn content_scale(&self) -> Vec2;

    // Copies the current cursor/button/key state into `input`.
    fn sample_input(&self, input: &mut FrameInput);

    // For the ImGui OpenGL backend.
    fn load_gl_func(&mut self, func_name: &'static str) -> *const c_void;
}

// ----------------------------------------------
// ApplicationEvent
// ----------------------------------------------

#[cfg(feature = "desktop")]
#[derive(Debug)]
pub enum ApplicationEvent {
    Quit,
    WindowResize(Size),
    KeyInput(InputKey, InputAction, InputModifiers),
    CharInput(char),
    Scroll(Vec2),
    MouseButton(WindowMouseButton, InputAction, InputModifiers),
}

#[cfg(feature = "desktop")]
pub type ApplicationEventList = SmallVec<[ApplicationEvent; 16]>;

// ----------------------------------------------
// ApplicationBuilder
// ----------------------------------------------

#[cfg(feature = "desktop")]
pub struct ApplicationBuilder {
    title: String,
    window_size: Size,
    confine_cursor: bool,
}

#[cfg(feature = "desktop")]
impl ApplicationBuilder {
    pub fn new() -> Self {
        ApplicationBuilder {
            title: String::default(),
            window_size: Size::new(1024, 768),
            confine_cursor: false,
        }
    }

    pub fn window_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn window_size(&mut self, size: Size) -> &mut Self {
        self.window_size = size;
        self
    }

    pub fn confine_cursor_to_window(&mut self, confine: bool) -> &mut Self {
        self.confine_cursor = confine;
        self
    }

    pub fn build<'a>(&self) -> Result<impl Application + use<'a>, String> {
        glfw::GlfwApplication::new(
            self.title.clone(),
            self.window_size,
            self.confine_cursor)
    }
}

#[cfg(feature = "desktop")]
impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
