//! Pure geometry for the badge: where the arc segments go, how opaque each is, and where every
//! character of the text sits. Nothing here touches pixels.

use std::f64::consts::FRAC_PI_2;

use crate::{
    foundation::core::{Canvas, Point, Vec2},
    foundation::math::{ArcSweep, fade_alpha},
};

pub const FADE_STEPS: usize = 150;
/// Fraction of the arc faded in at the start and out at the end.
pub const FADE_PORTION: f64 = 0.15;
/// Extra sweep added to every segment so neighbours overlap without seams.
pub const SEGMENT_OVERLAP: f64 = 0.005;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcGeometry {
    pub center: Point,
    /// Radius of the circular clip.
    pub circle_radius: f64,
    /// Radius of the arc centerline (and text baseline middle).
    pub arc_radius: f64,
    pub thickness: f64,
    pub sweep: ArcSweep,
}

impl ArcGeometry {
    pub fn new(canvas: Canvas, thickness: f64, start_percent: f64, end_percent: f64) -> Self {
        let circle_radius = canvas.inscribed_radius();
        Self {
            center: canvas.center(),
            circle_radius,
            arc_radius: circle_radius - thickness / 2.0,
            thickness,
            sweep: ArcSweep::from_percent(start_percent, end_percent),
        }
    }

    pub fn point_at(&self, angle: f64) -> Point {
        self.center + Vec2::from_angle(angle) * self.arc_radius
    }
}

/// One slice of the faded arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeSegment {
    pub start_angle: f64,
    pub sweep: f64,
    pub alpha: f64,
}

/// Split `sweep` into `steps` overlapping slices with an eased fade at both ends.
pub fn fade_segments(sweep: ArcSweep, steps: usize, portion: f64) -> Vec<FadeSegment> {
    let span = sweep.sweep() / steps.max(1) as f64 + SEGMENT_OVERLAP;
    let last = steps.saturating_sub(1).max(1) as f64;
    (0..steps)
        .map(|i| {
            let t = i as f64 / last;
            FadeSegment {
                start_angle: sweep.angle_at(t),
                sweep: span,
                alpha: fade_alpha(t, portion),
            }
        })
        .collect()
}

/// Where one character is drawn. The glyph is centered on `position` and rotated by `rotation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub index: usize,
    pub angle: f64,
    pub position: Point,
    pub rotation: f64,
}

/// Total angle covered by characters of the given pixel `advances` plus spacing after each.
pub fn text_span(advances: &[f64], letter_spacing: f64, radius: f64) -> f64 {
    advances
        .iter()
        .map(|w| w / radius + letter_spacing / radius)
        .sum()
}

/// Lay characters along the arc, centered at the arc midpoint and slid by `placement`.
///
/// `100` centers the text. The slide is `(placement - 100) / 100` times the slack between arc and
/// text, so `50` and `150` sit flush with the arc ends and values beyond run past them.
pub fn place_text(
    advances: &[f64],
    letter_spacing: f64,
    arc: &ArcGeometry,
    placement: f64,
) -> Vec<PlacedGlyph> {
    let radius = arc.arc_radius;
    if radius <= 0.0 || advances.is_empty() {
        return Vec::new();
    }
    let span = text_span(advances, letter_spacing, radius);
    let slide = (placement - 100.0) / 100.0 * (arc.sweep.sweep() - span);
    let mut cursor = arc.sweep.mid() - span / 2.0 + slide;

    let mut out = Vec::with_capacity(advances.len());
    for (index, w) in advances.iter().enumerate() {
        let char_angle = w / radius;
        let angle = cursor + char_angle / 2.0;
        out.push(PlacedGlyph {
            index,
            angle,
            position: arc.point_at(angle),
            rotation: angle + FRAC_PI_2,
        });
        cursor += char_angle + letter_spacing / radius;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/badge/layout.rs"]
mod tests;
