use std::ffi::c_void;
use glfw::Context;
use strum::IntoEnumIterator;

use crate::{
    log,
    utils::{self, Size, Vec2},
    app::{
        Application,
        ApplicationEvent,
        ApplicationEventList,
        input::{FrameInput, Key, MouseButton},
    },
};

// ----------------------------------------------
// These are exposed as public types in the app
// module so we don't have to replicate all the
// GLFW enums for window events.
// ----------------------------------------------

pub type InputModifiers = glfw::Modifiers;
pub type InputAction = glfw::Action;
pub type InputKey = glfw::Key;
pub type WindowMouseButton = glfw::MouseButton;

// ----------------------------------------------
// GlfwApplication
// ----------------------------------------------

pub struct GlfwApplication {
    window_size: Size,
    confine_cursor: bool,
    should_quit: bool,
    glfw_instance: glfw::Glfw,
    window: glfw::PWindow,
    event_receiver: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl GlfwApplication {
    pub fn new(title: String, window_size: Size, confine_cursor: bool) -> Result<Self, String> {
        if !window_size.is_valid() {
            return Err(format!("Invalid window size {}x{}", window_size.width, window_size.height));
        }

        let mut glfw_instance = glfw::init(glfw::fail_on_errors)
            .map_err(|err| format!("Failed to initialize GLFW: {err:?}"))?;

        glfw_instance.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw_instance.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw_instance.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));

        let (mut window, event_receiver) = glfw_instance
            .create_window(window_size.width as u32,
                           window_size.height as u32,
                           title.as_str(),
                           glfw::WindowMode::Windowed)
            .ok_or_else(|| "Failed to create GLFW window!".to_string())?;

        window.make_current();

        // Listen to these application events:
        window.set_size_polling(true);
        window.set_close_polling(true);
        window.set_key_polling(true);
        window.set_char_polling(true);
        window.set_scroll_polling(true);
        window.set_mouse_button_polling(true);

        // On MacOS this generates a lot of TTY spam about missing
        // OpenGL functions that we don't need. Keep a record of the
        // errors in a file instead.
        utils::macos_redirect_stderr(|| {
            gl::load_with(|symbol| window.get_proc_address(symbol))
        }, "stderr_gl_load_app.log");

        log::info!("app", "Created {}x{} window '{title}'.", window_size.width, window_size.height);

        Ok(Self {
            window_size,
            confine_cursor,
            should_quit: false,
            glfw_instance,
            window,
            event_receiver,
        })
    }
}

impl Application for GlfwApplication {
    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn request_quit(&mut self) {
        self.window.set_should_close(true);
        self.should_quit = true;
    }

    fn poll_events(&mut self) -> ApplicationEventList {
        self.glfw_instance.poll_events();

        let mut translated_events = ApplicationEventList::new();

        for (_, event) in glfw::flush_messages(&self.event_receiver) {
            // NOTE: To receive events here we must call set_<event>_polling().
            match event {
                glfw::WindowEvent::Size(width, height) => {
                    self.window_size = Size::new(width, height);
                    translated_events.push(ApplicationEvent::WindowResize(self.window_size));
                }
                glfw::WindowEvent::Close => {
                    translated_events.push(ApplicationEvent::Quit);
                }
                glfw::WindowEvent::Key(key, _scan_code, action, modifiers) => {
                    translated_events.push(ApplicationEvent::KeyInput(key, action, modifiers));
                }
                glfw::WindowEvent::Char(c) => {
                    translated_events.push(ApplicationEvent::CharInput(c));
                }
                glfw::WindowEvent::Scroll(x, y) => {
                    translated_events.push(ApplicationEvent::Scroll(Vec2::new(x as f32, y as f32)));
                }
                glfw::WindowEvent::MouseButton(button, action, modifiers) => {
                    translated_events.push(ApplicationEvent::MouseButton(button, action, modifiers));
                }
                unhandled_event => {
                    log::verbose!("app", "Unhandled GLFW window event: {unhandled_event:?}");
                }
            }
        }

        if self.confine_cursor {
            confine_cursor_to_window(&mut self.window);
        }

        translated_events
    }

    fn present(&mut self) {
        self.window.swap_buffers();
    }

    fn window_size(&self) -> Size {
        self.window_size
    }

    fn framebuffer_size(&self) -> Size {
        let (width, height) = self.window.get_framebuffer_size();
        Size::new(width, height)
    }

    fn content_scale(&self) -> Vec2 {
        let (x_scale, y_scale) = self.window.get_content_scale();
        Vec2::new(x_scale, y_scale)
    }

    fn sample_input(&self, input: &mut FrameInput) {
        let (x, y) = self.window.get_cursor_pos();
        input.set_cursor_pos(Vec2::new(x as f32, y as f32));

        for button in MouseButton::iter() {
            let action = self.window.get_mouse_button(to_glfw_mouse_button(button));
            input.set_button(button, action != glfw::Action::Release);
        }

        for key in Key::iter() {
            let action = self.window.get_key(to_glfw_key(key));
            input.set_key(key, action != glfw::Action::Release);
        }
    }

    fn load_gl_func(&mut self, func_name: &'static str) -> *const c_void {
        self.window.get_proc_address(func_name) as *const c_void
    }
}

// ----------------------------------------------
// Internal helpers
// ----------------------------------------------

fn confine_cursor_to_window(window: &mut glfw::Window) {
    let (x, y) = window.get_cursor_pos();
    let (width, height) = window.get_size();

    let new_x = x.clamp(0.0, width as f64);
    let new_y = y.clamp(0.0, height as f64);

    if new_x != x || new_y != y {
        window.set_cursor_pos(new_x, new_y);
    }
}

fn to_glfw_mouse_button(button: MouseButton) -> glfw::MouseButton {
    match button {
        MouseButton::Left   => glfw::MouseButton::Left,
        MouseButton::Right  => glfw::MouseButton::Right,
        MouseButton::Middle => glfw::MouseButton::Middle,
    }
}

fn to_glfw_key(key: Key) -> glfw::Key {
    match key {
        Key::Left         => glfw::Key::Left,
        Key::Right        => glfw::Key::Right,
        Key::Up           => glfw::Key::Up,
        Key::Down         => glfw::Key::Down,
        Key::Equal        => glfw::Key::Equal,
        Key::Minus        => glfw::Key::Minus,
        Key::LeftBracket  => glfw::Key::LeftBracket,
        Key::RightBracket => glfw::Key::RightBracket,
        Key::Tab          => glfw::Key::Tab,
        Key::Escape       => glfw::Key::Escape,
        Key::Num1         => glfw::Key::Num1,
        Key::Num2         => glfw::Key::Num2,
        Key::Num3         => glfw::Key::Num3,
        Key::Num4         => glfw::Key::Num4,
        Key::Q            => glfw::Key::Q,
        Key::E            => glfw::Key::E,
        Key::S            => glfw::Key::S,
        Key::PageUp       => glfw::Key::PageUp,
        Key::PageDown     => glfw::Key::PageDown,
        Key::LeftControl  => glfw::Key::LeftControl,
        Key::RightControl => glfw::Key::RightControl,
    }
}
