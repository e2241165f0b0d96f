use std::time;

use imgui_opengl_renderer::Renderer as ImGuiRenderer;

use crate::{
    app::{Application, InputAction, InputKey, input::{InputProvider, MouseButton}},
    utils::{self, Vec2},
};

pub mod editor_panel;

// ----------------------------------------------
// UiInputEvent
// ----------------------------------------------

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UiInputEvent {
    Handled,    // Input event was consumed by the UI and should not propagate.
    NotHandled, // Input event should propagate to the editor.
}

impl UiInputEvent {
    #[inline]
    pub fn is_handled(self) -> bool {
        self == UiInputEvent::Handled
    }
}

// ----------------------------------------------
// UiSystem
// ----------------------------------------------

pub struct UiSystem {
    ctx: imgui::Context,
    renderer: ImGuiRenderer,
}

impl UiSystem {
    pub fn new(app: &mut impl Application) -> Self {
        let mut ctx = imgui::Context::create();

        // 'None' disables automatic "imgui.ini" saving.
        ctx.set_ini_filename(None);
        ctx.style_mut().window_rounding = 4.0;

        // On MacOS this generates a lot of TTY spam about missing OpenGL functions.
        let renderer = utils::macos_redirect_stderr(|| {
            ImGuiRenderer::new(&mut ctx, |func_name| app.load_gl_func(func_name))
        }, "stderr_gl_load_imgui.log");

        Self { ctx, renderer }
    }

    // Builds and renders one UI frame. Call after the world has been drawn.
    pub fn frame<F>(&mut self,
                    app: &impl Application,
                    input: &impl InputProvider,
                    delta_time: time::Duration,
                    build_fn: F)
        where F: FnOnce(&imgui::Ui)
    {
        let io = self.ctx.io_mut();
        io.update_delta_time(delta_time);

        let fb_size = app.framebuffer_size().to_vec2();
        let content_scale = app.content_scale();

        io.display_size = [fb_size.x / content_scale.x, fb_size.y / content_scale.y];
        io.display_framebuffer_scale = [content_scale.x, content_scale.y];

        // Mouse state is polled; keys and scroll arrive as application events.
        let cursor_pos = input.cursor_pos();
        io.mouse_pos = [cursor_pos.x, cursor_pos.y];
        io.mouse_down[0] = input.is_button_down(MouseButton::Left);
        io.mouse_down[1] = input.is_button_down(MouseButton::Right);
        io.mouse_down[2] = input.is_button_down(MouseButton::Middle);
        io.key_ctrl = input.is_control_down();

        let ui = self.ctx.new_frame();
        build_fn(ui);

        let draw_data = self.ctx.render();
        if draw_data.total_idx_count != 0 && draw_data.total_vtx_count != 0 {
            self.renderer.render(&mut self.ctx);
        }
    }

    pub fn on_key_input(&mut self, key: InputKey, action: InputAction) -> UiInputEvent {
        if let Some(imgui_key) = to_imgui_key(key) {
            self.ctx.io_mut().add_key_event(imgui_key, action != InputAction::Release);
        }
        self.key_input_result()
    }

    pub fn on_char_input(&mut self, c: char) -> UiInputEvent {
        self.ctx.io_mut().add_input_character(c);
        self.key_input_result()
    }

    pub fn on_scroll(&mut self, amount: Vec2) -> UiInputEvent {
        let io = self.ctx.io_mut();
        io.mouse_wheel_h += amount.x;
        io.mouse_wheel += amount.y;
        self.mouse_input_result()
    }

    #[inline]
    pub fn is_handling_mouse_input(&self) -> bool {
        self.ctx.io().want_capture_mouse
    }

    #[inline]
    pub fn is_handling_key_input(&self) -> bool {
        self.ctx.io().want_capture_keyboard
    }

    fn key_input_result(&self) -> UiInputEvent {
        if self.is_handling_key_input() { UiInputEvent::Handled } else { UiInputEvent::NotHandled }
    }

    fn mouse_input_result(&self) -> UiInputEvent {
        if self.is_handling_mouse_input() { UiInputEvent::Handled } else { UiInputEvent::NotHandled }
    }
}

// Keys ImGui needs for text editing and its internal shortcuts.
fn to_imgui_key(key: InputKey) -> Option<imgui::Key> {
    Some(match key {
        InputKey::Tab       => imgui::Key::Tab,
        InputKey::Left      => imgui::Key::LeftArrow,
        InputKey::Right     => imgui::Key::RightArrow,
        InputKey::Up        => imgui::Key::UpArrow,
        InputKey::Down      => imgui::Key::DownArrow,
        InputKey::Home      => imgui::Key::Home,
        InputKey::End       => imgui::Key::End,
        InputKey::Delete    => imgui::Key::Delete,
        InputKey::Backspace => imgui::Key::Backspace,
        InputKey::Enter     => imgui::Key::Enter,
        InputKey::Escape    => imgui::Key::Escape,

        InputKey::A => imgui::Key::A,
        InputKey::C => imgui::Key::C,
        InputKey::V => imgui::Key::V,
        InputKey::X => imgui::Key::X,

        InputKey::LeftControl | InputKey::RightControl => imgui::Key::ModCtrl,
        InputKey::LeftShift   | InputKey::RightShift   => imgui::Key::ModShift,

        _ => return None,
    })
}
