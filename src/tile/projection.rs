use crate::utils::{DVec2, Mat2, Vec2};


// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const DEFAULT_ROTATION_Y_DEGREES: f32 = 45.0;
pub const DEFAULT_ROTATION_DOWN_DEGREES: f32 = 30.0;

pub const MIN_ROTATION_DOWN_DEGREES: f32 = 0.0;
pub const MAX_ROTATION_DOWN_DEGREES: f32 = 90.0;

// Floor for the vertical scale `1 - sin(down)`. At a 90 degree tilt the
// plane would collapse to a line and the inverse would not exist.
pub const MIN_VERTICAL_SCALE: f64 = 1e-3;

// ----------------------------------------------
// ProjectionTransform
// ----------------------------------------------

// Maps the flat cartesian grid plane to isometric space and back.
//
//  forward = Scale(1, k) * RotateZ(rotation_y),  k = 1 - sin(rotation_down)
//  inverse = RotateZ(-rotation_y) * Scale(1, 1/k)
//
// Both matrices are rebuilt whenever an angle changes, so inverse
// queries are always consistent with the current angles. Matrices and
// the `*_f64` queries are double precision; the `Vec2` queries round
// to f32 on output only.
#[derive(Clone, Debug)]
pub struct ProjectionTransform {
    rotation_y_degrees: f32,
    rotation_down_degrees: f32,
    vertical_scale: f64,
    forward: Mat2,
    inverse: Mat2,
}

impl ProjectionTransform {
    pub fn new(rotation_y_degrees: f32, rotation_down_degrees: f32) -> Self {
        let mut projection = Self {
            rotation_y_degrees: DEFAULT_ROTATION_Y_DEGREES,
            rotation_down_degrees: DEFAULT_ROTATION_DOWN_DEGREES,
            vertical_scale: 1.0,
            forward: Mat2::identity(),
            inverse: Mat2::identity(),
        };
        projection.set_angles(rotation_y_degrees, rotation_down_degrees);
        projection
    }

    #[inline]
    pub fn rotation_y_degrees(&self) -> f32 {
        self.rotation_y_degrees
    }

    #[inline]
    pub fn rotation_down_degrees(&self) -> f32 {
        self.rotation_down_degrees
    }

    #[inline]
    pub fn vertical_scale(&self) -> f32 {
        self.vertical_scale as f32
    }

    #[inline]
    pub fn forward_matrix(&self) -> &Mat2 {
        &self.forward
    }

    #[inline]
    pub fn inverse_matrix(&self) -> &Mat2 {
        &self.inverse
    }

    // Yaw wraps into [0, 360). Non-finite angles are ignored.
    pub fn set_rotation_y(&mut self, degrees: f32) {
        self.set_angles(degrees, self.rotation_down_degrees);
    }

    // Tilt is clamped to [0, 90].
    pub fn set_rotation_down(&mut self, degrees: f32) {
        self.set_angles(self.rotation_y_degrees, degrees);
    }

    #[inline]
    pub fn rotate_y_by(&mut self, delta_degrees: f32) {
        self.set_rotation_y(self.rotation_y_degrees + delta_degrees);
    }

    #[inline]
    pub fn tilt_by(&mut self, delta_degrees: f32) {
        self.set_rotation_down(self.rotation_down_degrees + delta_degrees);
    }

    pub fn set_angles(&mut self, rotation_y_degrees: f32, rotation_down_degrees: f32) {
        if rotation_y_degrees.is_finite() {
            self.rotation_y_degrees = rotation_y_degrees.rem_euclid(360.0);
        }
        if rotation_down_degrees.is_finite() {
            self.rotation_down_degrees =
                rotation_down_degrees.clamp(MIN_ROTATION_DOWN_DEGREES, MAX_ROTATION_DOWN_DEGREES);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        let yaw = f64::from(self.rotation_y_degrees).to_radians();
        let down = f64::from(self.rotation_down_degrees).to_radians();

        self.vertical_scale = (1.0 - down.sin()).max(MIN_VERTICAL_SCALE);
        self.forward = Mat2::scale(1.0, self.vertical_scale) * Mat2::rotation(yaw);
        self.inverse = Mat2::rotation(-yaw) * Mat2::scale(1.0, 1.0 / self.vertical_scale);
    }

    // ----------------------
    // Queries:
    // ----------------------

    // Cartesian -> isometric, on the ground plane.
    #[inline]
    #[must_use]
    pub fn forward(&self, world: Vec2) -> Vec2 {
        self.forward.transform(world)
    }

    #[inline]
    #[must_use]
    pub fn forward_f64(&self, world: DVec2) -> DVec2 {
        self.forward.transform_f64(world)
    }

    // Isometric -> cartesian, assuming the ground plane (height 0).
    #[inline]
    #[must_use]
    pub fn inverse(&self, iso: Vec2) -> Vec2 {
        self.inverse.transform(iso)
    }

    #[inline]
    #[must_use]
    pub fn inverse_f64(&self, iso: DVec2) -> DVec2 {
        self.inverse.transform_f64(iso)
    }

    // Cartesian point raised by `height` world units. Height only moves
    // the point up the screen (negative Y), never along X.
    #[inline]
    #[must_use]
    pub fn project(&self, world: Vec2, height: f32) -> Vec2 {
        let mut iso = self.forward_f64(DVec2::from(world));
        iso.y -= f64::from(height) * self.vertical_scale;
        iso.to_vec2()
    }
}

impl Default for ProjectionTransform {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_Y_DEGREES, DEFAULT_ROTATION_DOWN_DEGREES)
    }
}
