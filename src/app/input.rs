use strum::{EnumCount, EnumIter};
use crate::utils::Vec2;


// ----------------------------------------------
// MouseButton / Key
// ----------------------------------------------

#[repr(usize)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumCount, EnumIter)]
pub enum MouseButton {
    Left,   // Primary: selection.
    Right,  // Secondary: tool commit.
    Middle,
}

// Keys the editor reacts to. Windowing backends map their own key codes onto these.
#[repr(usize)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumCount, EnumIter)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Equal,
    Minus,
    LeftBracket,
    RightBracket,
    Tab,
    Escape,
    Num1,
    Num2,
    Num3,
    Num4,
    Q,
    E,
    S,
    PageUp,
    PageDown,
    LeftControl,
    RightControl,
}

// ----------------------------------------------
// InputProvider
// ----------------------------------------------

// Polled input. State is sampled once per frame and queried during the
// update phase; nothing here registers callbacks.
pub trait InputProvider {
    // Cursor position in screen space (pixels, top-left origin).
    fn cursor_pos(&self) -> Vec2;

    fn is_button_down(&self, button: MouseButton) -> bool;
    fn button_pressed(&self, button: MouseButton) -> bool;
    fn button_released(&self, button: MouseButton) -> bool;

    fn is_key_down(&self, key: Key) -> bool;
    fn key_pressed(&self, key: Key) -> bool;

    // Accumulated vertical scroll since the previous frame. Positive is away from the user.
    fn scroll_delta(&self) -> f32;

    #[inline]
    fn is_control_down(&self) -> bool {
        self.is_key_down(Key::LeftControl) || self.is_key_down(Key::RightControl)
    }
}

// ----------------------------------------------
// FrameInput
// ----------------------------------------------

// Two input snapshots, previous and current frame. Pressed/released
// edges are derived from the difference between them.
//
// Usage per frame:
//  1. set_cursor_pos / set_button / set_key / add_scroll with the new state.
//  2. Run the update phase against it.
//  3. end_frame() rolls current into previous.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    cursor_pos: Vec2,
    scroll: f32,
    buttons: [bool; MouseButton::COUNT],
    prev_buttons: [bool; MouseButton::COUNT],
    keys: [bool; Key::COUNT],
    prev_keys: [bool; Key::COUNT],
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set_cursor_pos(&mut self, pos: Vec2) {
        self.cursor_pos = pos;
    }

    #[inline]
    pub fn set_button(&mut self, button: MouseButton, down: bool) {
        self.buttons[button as usize] = down;
    }

    #[inline]
    pub fn set_key(&mut self, key: Key, down: bool) {
        self.keys[key as usize] = down;
    }

    #[inline]
    pub fn add_scroll(&mut self, amount: f32) {
        self.scroll += amount;
    }

    pub fn end_frame(&mut self) {
        self.prev_buttons = self.buttons;
        self.prev_keys = self.keys;
        self.scroll = 0.0;
    }
}

impl InputProvider for FrameInput {
    #[inline]
    fn cursor_pos(&self) -> Vec2 {
        self.cursor_pos
    }

    #[inline]
    fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons[button as usize]
    }

    #[inline]
    fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button as usize] && !self.prev_buttons[button as usize]
    }

    #[inline]
    fn button_released(&self, button: MouseButton) -> bool {
        !self.buttons[button as usize] && self.prev_buttons[button as usize]
    }

    #[inline]
    fn is_key_down(&self, key: Key) -> bool {
        self.keys[key as usize]
    }

    #[inline]
    fn key_pressed(&self, key: Key) -> bool {
        self.keys[key as usize] && !self.prev_keys[key as usize]
    }

    #[inline]
    fn scroll_delta(&self) -> f32 {
        self.scroll
    }
}
