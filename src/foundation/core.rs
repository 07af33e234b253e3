use crate::foundation::error::{HaloError, HaloResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Placement of a source image inside a fixed-size surface.
///
/// `position` is the pan offset of the image center relative to the surface center, in surface
/// pixels. `scale` maps source pixels to surface pixels and is always `> 0`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformState {
    /// Source-to-surface scale factor.
    pub scale: f64,
    /// Pan offset of the image center from the surface center.
    pub position: Vec2,
}

impl TransformState {
    /// Create a validated transform.
    pub fn new(scale: f64, position: Vec2) -> HaloResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(HaloError::validation("transform scale must be finite and > 0"));
        }
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(HaloError::validation("transform position must be finite"));
        }
        Ok(Self { scale, position })
    }

    /// Unit scale, centered.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            position: Vec2::ZERO,
        }
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    pub fn with_position(self, position: Vec2) -> Self {
        Self { position, ..self }
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> HaloResult<Self> {
        if width == 0 || height == 0 {
            return Err(HaloError::validation("canvas dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(HaloError::validation("canvas dimensions must fit in u16"));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Radius of the largest circle centered in the canvas.
    pub fn inscribed_radius(self) -> f64 {
        f64::from(self.width.min(self.height)) / 2.0
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}
