use crate::{
    crop::CROP_CONTAINER_SIZE,
    foundation::core::{Rect, Size, TransformState, Vec2},
    foundation::error::{HaloError, HaloResult},
    foundation::math::{clamp_position, fit_within, max_pan},
};

/// On-screen crop window. Its size is fixed by the aspect ratio, never by the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    size: Size,
}

impl Viewport {
    /// Viewport whose longer side is [`CROP_CONTAINER_SIZE`].
    pub fn for_aspect(ratio: f64) -> Self {
        Self {
            size: fit_within(ratio, CROP_CONTAINER_SIZE),
        }
    }

    pub fn new(size: Size) -> HaloResult<Self> {
        if !(size.width.is_finite() && size.height.is_finite())
            || size.width <= 0.0
            || size.height <= 0.0
        {
            return Err(HaloError::validation("viewport size must be finite and > 0"));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Smallest scale at which `image` covers the viewport, centered.
    pub fn fit_to_cover(&self, image: Size) -> TransformState {
        if image.width <= 0.0 || image.height <= 0.0 {
            return TransformState::identity();
        }
        let scale = (self.size.width / image.width).max(self.size.height / image.height);
        TransformState::identity().with_scale(scale)
    }

    /// How far the image center may move from the viewport center at `scale`.
    pub fn max_pan(&self, image: Size, scale: f64) -> Vec2 {
        max_pan(
            Size::new(image.width * scale, image.height * scale),
            self.size,
        )
    }

    /// Clamp the position so the scaled image keeps covering the viewport where it can.
    pub fn clamp(&self, image: Size, transform: TransformState) -> TransformState {
        let limit = self.max_pan(image, transform.scale);
        transform.with_position(clamp_position(transform.position, limit))
    }

    /// Source-pixel rectangle under the viewport. May extend past the image when zoomed out.
    pub fn crop_area(&self, image: Size, transform: TransformState) -> CropArea {
        let TransformState { scale, position } = transform;
        let scaled = Size::new(image.width * scale, image.height * scale);
        CropArea {
            x: (scaled.width / 2.0 - self.size.width / 2.0 - position.x) / scale,
            y: (scaled.height / 2.0 - self.size.height / 2.0 - position.y) / scale,
            width: self.size.width / scale,
            height: self.size.height / scale,
        }
    }
}

/// Rectangle in source-image pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropArea {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Intersection with `[0, W] x [0, H]`. Disjoint areas collapse to an empty rect at the
    /// nearest edge.
    pub fn clamped_to(self, image: Size) -> CropArea {
        let x0 = self.x.clamp(0.0, image.width);
        let y0 = self.y.clamp(0.0, image.height);
        let x1 = (self.x + self.width).clamp(x0, image.width);
        let y1 = (self.y + self.height).clamp(y0, image.height);
        CropArea {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    pub fn is_within(self, image: Size) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= image.width
            && self.y + self.height <= image.height
    }
}

#[cfg(test)]
#[path = "../../tests/unit/crop/viewport.rs"]
mod tests;
