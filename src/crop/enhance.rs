use crate::render::Raster;

pub const ENHANCE_BRIGHTNESS: f64 = 1.05;
pub const ENHANCE_CONTRAST: f64 = 1.05;
pub const ENHANCE_SATURATE: f64 = 1.1;

/// Apply the fixed auto-enhance look: `brightness(1.05) contrast(1.05) saturate(1.1)`, in that
/// order, on straight-alpha color. Alpha is untouched.
pub fn enhance_in_place(raster: &mut Raster) {
    let premultiplied = raster.premultiplied;
    for px in raster.data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            continue;
        }
        let alpha = f64::from(a) / 255.0;
        let mut rgb = [0.0f64; 3];
        for (dst, &c) in rgb.iter_mut().zip(px.iter()) {
            let c = f64::from(c) / 255.0;
            *dst = if premultiplied { c / alpha } else { c }.min(1.0);
        }

        let out = enhance_rgb(rgb);
        for (dst, c) in px.iter_mut().zip(out) {
            let c = if premultiplied { c * alpha } else { c };
            *dst = (c * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}

fn enhance_rgb(rgb: [f64; 3]) -> [f64; 3] {
    let [r, g, b] = rgb.map(|c| clamp01(c * ENHANCE_BRIGHTNESS));
    let [r, g, b] = [r, g, b].map(|c| clamp01((c - 0.5) * ENHANCE_CONTRAST + 0.5));

    let s = ENHANCE_SATURATE;
    [
        (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
    ]
    .map(clamp01)
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
