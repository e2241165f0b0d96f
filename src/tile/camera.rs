use std::time;
use serde::{Deserialize, Serialize};

use crate::{
    app::input::{InputProvider, Key},
    utils::{Size, Vec2},
};

#[cfg(test)]
mod tests;

// ----------------------------------------------
// Constants / Enums
// ----------------------------------------------

pub const MIN_ZOOM: f32 = 0.01;
pub const MAX_ZOOM: f32 = 2.0;
pub const DEFAULT_ZOOM: f32 = 1.0;

// The tile editing layer always pans 1:1 with the camera.
pub const TILE_LAYER_PARALLAX: f32 = 1.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Zoom {
    In,
    Out,
}

// ----------------------------------------------
// ViewTransform
// ----------------------------------------------

// Isometric space -> screen space:
//  screen = (iso - displacement * parallax) * zoom + viewport_center
// folded into a single scale + offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewTransform {
    pub scaling: f32,
    pub offset: Vec2,
}

impl ViewTransform {
    #[inline]
    pub const fn new(scaling: f32, offset: Vec2) -> Self {
        Self { scaling, offset }
    }

    #[inline]
    #[must_use]
    pub fn apply_to_iso_point(&self, iso: Vec2) -> Vec2 {
        (iso * self.scaling) + self.offset
    }

    #[inline]
    #[must_use]
    pub fn apply_to_screen_point(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.scaling
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(1.0, Vec2::zero())
    }
}

// ----------------------------------------------
// CameraControls
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraControls {
    pub pan_speed: f32, // pixels per second at zoom 1
    pub zoom_step: f32, // multiplier per zoom notch
}

impl Default for CameraControls {
    fn default() -> Self {
        Self { pan_speed: 600.0, zoom_step: 1.1 }
    }
}

// ----------------------------------------------
// Camera
// ----------------------------------------------

// Pan + zoom over the isometric plane. Any change marks the camera dirty;
// the cached tile layer transform is rebuilt lazily on the next
// `view_transform()` call, which clears the flag.
#[derive(Clone, Debug)]
pub struct Camera {
    viewport_size: Size,
    displacement: Vec2,
    zoom: f32,
    dirty: bool,
    cached_transform: ViewTransform,
}

impl Camera {
    pub fn new(viewport_size: Size) -> Self {
        Self {
            viewport_size,
            displacement: Vec2::zero(),
            zoom: DEFAULT_ZOOM,
            dirty: true,
            cached_transform: ViewTransform::default(),
        }
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, new_size: Size) {
        if self.viewport_size != new_size {
            self.viewport_size = new_size;
            self.dirty = true;
        }
    }

    #[inline]
    pub fn viewport_center(&self) -> Vec2 {
        self.viewport_size.to_vec2() * 0.5
    }

    // ----------------------
    // Displacement (pan):
    // ----------------------

    #[inline]
    pub fn displacement(&self) -> Vec2 {
        self.displacement
    }

    pub fn set_displacement(&mut self, displacement: Vec2) {
        if displacement.is_finite() && displacement != self.displacement {
            self.displacement = displacement;
            self.dirty = true;
        }
    }

    #[inline]
    pub fn pan(&mut self, delta: Vec2) {
        self.set_displacement(self.displacement + delta);
    }

    // ----------------------
    // Zoom/scaling:
    // ----------------------

    #[inline]
    pub fn current_zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if !zoom.is_finite() {
            return;
        }

        let new_zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if new_zoom != self.zoom {
            self.zoom = new_zoom;
            self.dirty = true;
        }
    }

    pub fn request_zoom(&mut self, zoom: Zoom, step: f32) {
        match zoom {
            Zoom::In  => self.set_zoom(self.zoom * step),
            Zoom::Out => self.set_zoom(self.zoom / step),
        }
    }

    // ----------------------
    // Transforms:
    // ----------------------

    // Uncached transform for a layer with the given parallax (>= 0).
    pub fn compute_view_transform(&self, parallax: f32) -> ViewTransform {
        let parallax = parallax.max(0.0);
        let offset = self.viewport_center() - (self.displacement * parallax * self.zoom);
        ViewTransform::new(self.zoom, offset)
    }

    // Tile layer transform, rebuilt only when the camera moved.
    pub fn view_transform(&mut self) -> ViewTransform {
        if self.dirty {
            self.cached_transform = self.compute_view_transform(TILE_LAYER_PARALLAX);
            self.dirty = false;
        }
        self.cached_transform
    }

    // Tile layer transform for read-only consumers. Never stale.
    pub fn current_view_transform(&self) -> ViewTransform {
        if self.dirty {
            self.compute_view_transform(TILE_LAYER_PARALLAX)
        } else {
            self.cached_transform
        }
    }

    // ----------------------
    // Input:
    // ----------------------

    // Arrow keys pan, +/- and the scroll wheel zoom. Pan speed is in
    // screen pixels so it feels the same at every zoom level.
    pub fn update(&mut self, input: &impl InputProvider, controls: &CameraControls, delta_time: time::Duration) {
        let mut direction = Vec2::zero();

        if input.is_key_down(Key::Left)  { direction.x -= 1.0; }
        if input.is_key_down(Key::Right) { direction.x += 1.0; }
        if input.is_key_down(Key::Up)    { direction.y -= 1.0; }
        if input.is_key_down(Key::Down)  { direction.y += 1.0; }

        if direction != Vec2::zero() {
            let distance = controls.pan_speed * delta_time.as_secs_f32() / self.zoom;
            self.pan(direction * distance);
        }

        if input.key_pressed(Key::Equal) {
            self.request_zoom(Zoom::In, controls.zoom_step);
        }
        if input.key_pressed(Key::Minus) {
            self.request_zoom(Zoom::Out, controls.zoom_step);
        }

        let scroll = input.scroll_delta();
        if scroll > 0.0 {
            self.request_zoom(Zoom::In, controls.zoom_step);
        } else if scroll < 0.0 {
            self.request_zoom(Zoom::Out, controls.zoom_step);
        }
    }
}
