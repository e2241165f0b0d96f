use crate::utils::{Color, Vec2};

#[cfg(feature = "desktop")]
pub mod opengl;

// ----------------------------------------------
// TextureHandle
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureHandle {
    Invalid,    // Draws the built-in placeholder texture.
    White,      // Draws the built-in white texture.
    Index(u32), // Index into the backend's texture cache.
}

impl TextureHandle {
    #[inline]
    pub const fn invalid() -> Self {
        TextureHandle::Invalid
    }

    #[inline]
    pub const fn white() -> Self {
        TextureHandle::White
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, TextureHandle::Invalid)
    }
}

impl Default for TextureHandle {
    fn default() -> Self { TextureHandle::invalid() }
}

// ----------------------------------------------
// TextureCache
// ----------------------------------------------

// Resolves texture names to handles. Returns `TextureHandle::Invalid`
// when the texture cannot be loaded, so callers fall back to the placeholder.
pub trait TextureCache {
    fn load_texture(&mut self, name: &str) -> TextureHandle;
}

// ----------------------------------------------
// Renderer
// ----------------------------------------------

// Sprite sink for the tile layer. The core computes every screen position
// and never touches pixels itself.
pub trait Renderer {
    // Scale applied to sprite sizes, i.e. the camera zoom.
    fn set_sprite_scale(&mut self, _scale: f32) {
    }

    // `screen_pos` is the projected cell origin, which is the top vertex
    // of the tile diamond. Backends anchor sprites at their top-center.
    fn draw_at(&mut self, texture: TextureHandle, screen_pos: Vec2, color: Color);
}
