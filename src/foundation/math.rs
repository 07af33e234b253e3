use std::f64::consts::TAU;

use crate::foundation::core::{Rgba8, Size, Vec2};
use crate::foundation::error::{HaloError, HaloResult};

/// Parse a `"W:H"` aspect ratio into `W / H`.
///
/// Anything that is not two finite, positive numbers falls back to square.
pub fn parse_aspect_ratio(ratio: &str) -> f64 {
    let mut parts = ratio.split(':');
    let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
        return 1.0;
    };
    match (w.trim().parse::<f64>(), h.trim().parse::<f64>()) {
        (Ok(w), Ok(h)) if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 => w / h,
        _ => 1.0,
    }
}

/// Largest box of the given aspect ratio whose longer side is `longest`.
pub fn fit_within(ratio: f64, longest: f64) -> Size {
    let width = if ratio >= 1.0 { longest } else { longest * ratio };
    let height = if ratio <= 1.0 { longest } else { longest / ratio };
    Size::new(width, height)
}

/// Convert `#rgb` / `#rrggbb` into a color carrying the given alpha.
///
/// Other lengths (and unparsable digits) produce black, matching what a lenient canvas color
/// string would end up drawing.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Rgba8 {
    fn channel(s: &str) -> u8 {
        u8::from_str_radix(s, 16).unwrap_or(0)
    }

    let hex = hex.trim();
    let (r, g, b) = match (hex.len(), hex.get(1..)) {
        (4, Some(d)) if hex.starts_with('#') && d.is_ascii() => {
            let dup = |i: usize| channel(&d[i..=i].repeat(2));
            (dup(0), dup(1), dup(2))
        }
        (7, Some(d)) if hex.starts_with('#') && d.is_ascii() => {
            (channel(&d[0..2]), channel(&d[2..4]), channel(&d[4..6]))
        }
        _ => (0, 0, 0),
    };
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba8 { r, g, b, a }
}

/// Strict hex parser for configuration values: `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(hex: &str) -> HaloResult<Rgba8> {
    let s = hex.trim();
    let Some(d) = s.strip_prefix('#') else {
        return Err(HaloError::validation(format!(
            "color \"{hex}\" must start with '#'"
        )));
    };
    if !d.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HaloError::validation(format!(
            "color \"{hex}\" contains non-hex digits"
        )));
    }

    let byte = |pair: &str| u8::from_str_radix(pair, 16).unwrap_or(0);
    match d.len() {
        3 => Ok(hex_to_rgba(s, 1.0)),
        6 => Ok(Rgba8::opaque(byte(&d[0..2]), byte(&d[2..4]), byte(&d[4..6]))),
        8 => Ok(Rgba8 {
            r: byte(&d[0..2]),
            g: byte(&d[2..4]),
            b: byte(&d[4..6]),
            a: byte(&d[6..8]),
        }),
        _ => Err(HaloError::validation(format!(
            "color \"{hex}\" must be #rgb, #rrggbb or #rrggbbaa"
        ))),
    }
}

/// Map a percentage of a full turn to radians.
pub fn percent_to_radians(percent: f64) -> f64 {
    percent / 100.0 * TAU
}

/// Forward-sweeping angular interval, in radians.
///
/// `end` is always strictly greater than `start`; a requested end at or before the start wraps
/// through zero by adding a full turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSweep {
    pub start: f64,
    pub end: f64,
}

impl ArcSweep {
    pub fn from_percent(start_percent: f64, end_percent: f64) -> Self {
        let start = percent_to_radians(start_percent);
        let mut end = percent_to_radians(end_percent);
        if end <= start {
            end += TAU;
        }
        Self { start, end }
    }

    pub fn sweep(self) -> f64 {
        self.end - self.start
    }

    pub fn mid(self) -> f64 {
        self.start + self.sweep() / 2.0
    }

    /// Angle at normalized position `t` along the sweep.
    pub fn angle_at(self, t: f64) -> f64 {
        self.start + t * self.sweep()
    }
}

/// Eased edge fade: linear ramp over the first and last `portion` of `t in [0, 1]`, squared.
pub fn fade_alpha(t: f64, portion: f64) -> f64 {
    let mut alpha = 1.0;
    if portion > 0.0 {
        if t < portion {
            alpha = t / portion;
        } else if t > 1.0 - portion {
            alpha = (1.0 - t) / portion;
        }
    }
    (alpha * alpha).clamp(0.0, 1.0)
}

/// Per-axis pan limit keeping a scaled image over a viewport.
pub fn max_pan(scaled: Size, viewport: Size) -> Vec2 {
    Vec2::new(
        ((scaled.width - viewport.width) / 2.0).max(0.0),
        ((scaled.height - viewport.height) / 2.0).max(0.0),
    )
}

pub fn clamp_position(position: Vec2, limit: Vec2) -> Vec2 {
    Vec2::new(
        position.x.clamp(-limit.x, limit.x),
        position.y.clamp(-limit.y, limit.y),
    )
}
