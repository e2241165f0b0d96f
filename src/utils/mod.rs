use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::time;
use serde::{Deserialize, Serialize};

pub mod coords;


// ----------------------------------------------
// Float helpers
// ----------------------------------------------

pub const DEFAULT_EPSILON: f32 = 1e-4;

#[inline]
#[must_use]
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

// ----------------------------------------------
// Vec2
// ----------------------------------------------

// 2D vector or point. Used for cartesian world positions,
// isometric positions and final screen positions alike.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    #[must_use]
    pub fn dot(&self, other: Self) -> f32 {
        (self.x * other.x) + (self.y * other.y)
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    #[inline]
    #[must_use]
    pub fn approx_equal(&self, other: Self, epsilon: f32) -> bool {
        approx_equal(self.x, other.x, epsilon) && approx_equal(self.y, other.y, epsilon)
    }

    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn to_array(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

// Vec2 * f32
impl Mul<f32> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, scalar: f32) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

// f32 * Vec2
impl Mul<Vec2> for f32 {
    type Output = Vec2;

    #[inline]
    fn mul(self, vec: Vec2) -> Vec2 {
        Vec2::new(vec.x * self, vec.y * self)
    }
}

// Vec2 / f32
impl Div<f32> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn div(self, scalar: f32) -> Vec2 {
        Vec2::new(self.x / scalar, self.y / scalar)
    }
}

// ----------------------------------------------
// DVec2
// ----------------------------------------------

// Double precision point for exact transform round trips.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DVec2 {
    pub x: f64,
    pub y: f64,
}

impl DVec2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub fn distance(&self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    #[must_use]
    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl From<Vec2> for DVec2 {
    #[inline]
    fn from(v: Vec2) -> Self {
        Self::new(f64::from(v.x), f64::from(v.y))
    }
}

// ----------------------------------------------
// Mat2
// ----------------------------------------------

// Row-major 2x2 matrix acting on column vectors: `M * v`.
// Stored and applied in f64; `transform` rounds to f32 only on output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mat2 {
    pub m00: f64, pub m01: f64,
    pub m10: f64, pub m11: f64,
}

impl Mat2 {
    #[inline]
    pub const fn new(m00: f64, m01: f64, m10: f64, m11: f64) -> Self {
        Self { m00, m01, m10, m11 }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0)
    }

    // Counter-clockwise rotation about the Z axis:
    // (x, y) -> (x*cos - y*sin, x*sin + y*cos)
    #[inline]
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, -sin, sin, cos)
    }

    #[inline]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy)
    }

    #[inline]
    #[must_use]
    pub fn transform_f64(&self, v: DVec2) -> DVec2 {
        DVec2::new(
            (self.m00 * v.x) + (self.m01 * v.y),
            (self.m10 * v.x) + (self.m11 * v.y),
        )
    }

    #[inline]
    #[must_use]
    pub fn transform(&self, v: Vec2) -> Vec2 {
        self.transform_f64(DVec2::from(v)).to_vec2()
    }
}

impl Default for Mat2 {
    fn default() -> Self {
        Self::identity()
    }
}

// Mat2 * Mat2
impl Mul for Mat2 {
    type Output = Mat2;

    fn mul(self, rhs: Mat2) -> Mat2 {
        Mat2::new(
            (self.m00 * rhs.m00) + (self.m01 * rhs.m10),
            (self.m00 * rhs.m01) + (self.m01 * rhs.m11),
            (self.m10 * rhs.m00) + (self.m11 * rhs.m10),
            (self.m10 * rhs.m01) + (self.m11 * rhs.m11),
        )
    }
}

// ----------------------------------------------
// Color
// ----------------------------------------------

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub const fn white()  -> Self { Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 } }
    pub const fn red()    -> Self { Self { r: 1.0, g: 0.0, b: 0.0, a: 1.0 } }
    pub const fn green()  -> Self { Self { r: 0.0, g: 1.0, b: 0.0, a: 1.0 } }
    pub const fn yellow() -> Self { Self { r: 1.0, g: 1.0, b: 0.0, a: 1.0 } }
    pub const fn gray()   -> Self { Self { r: 0.7, g: 0.7, b: 0.7, a: 1.0 } }

    pub const fn to_array(&self) -> [f32; 4] {
        [ self.r, self.g, self.b, self.a ]
    }
}

impl Default for Color {
    fn default() -> Self { Self::white() }
}

// ----------------------------------------------
// Size
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width:  i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn zero() -> Self {
        Self { width: 0, height: 0 }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

// ----------------------------------------------
// FrameClock
// ----------------------------------------------

pub struct FrameClock {
    last_frame_time: time::Instant,
    delta_time: time::Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame_time: time::Instant::now(),
            delta_time: time::Duration::ZERO,
        }
    }

    #[inline]
    pub fn end_frame(&mut self) {
        let time_now = time::Instant::now();
        self.delta_time = time_now - self.last_frame_time;
        self.last_frame_time = time_now;
    }

    #[inline]
    #[must_use]
    pub fn delta_time(&self) -> time::Duration {
        self.delta_time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------
// macos_redirect_stderr()
// ----------------------------------------------

// Silences TTY spam from the OpenGL loader on MacOS by pointing
// stderr at a file while `f` runs.
#[cfg(all(feature = "desktop", target_os = "macos"))]
pub fn macos_redirect_stderr<F, R>(f: F, filename: &str) -> R where F: FnOnce() -> R {
    use std::fs::OpenOptions;
    use std::os::unix::io::AsRawFd;
    use libc::{dup, dup2, close, STDERR_FILENO};

    let file = match OpenOptions::new().create(true).write(true).truncate(true).open(filename) {
        Ok(file) => file,
        Err(_) => return f(),
    };

    unsafe {
        let saved_fd = dup(STDERR_FILENO);
        dup2(file.as_raw_fd(), STDERR_FILENO);
        let result = f();
        dup2(saved_fd, STDERR_FILENO);
        close(saved_fd);
        result
    }
}

#[cfg(not(all(feature = "desktop", target_os = "macos")))]
pub fn macos_redirect_stderr<F, R>(f: F, _filename: &str) -> R where F: FnOnce() -> R {
    f() // No-op on non-MacOS
}
