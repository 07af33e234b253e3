use crate::{
    assets::SourceImage,
    badge::config::{BadgeConfig, Customization},
    badge::layout::{ArcGeometry, FADE_PORTION, FADE_STEPS, fade_segments, place_text},
    foundation::core::{Affine, Canvas, Point, Rgba8},
    foundation::error::{HaloError, HaloResult},
    foundation::math::{hex_to_rgba, parse_aspect_ratio},
    render::{
        Raster,
        cpu::{CpuSurface, affine_to_cpu, color_to_cpu, draw_image, fill_surface, image_paint},
        text::{BadgeFont, GlyphShaper},
    },
};

pub const EXPORT_FILENAME: &str = "linkedin-profile.png";
pub const EXPORT_WIDTH: u32 = 1000;

const PATH_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    /// Transparent outside the circle.
    Preview,
    /// White outside the circle.
    Export,
}

/// Export canvas for an aspect ratio: `EXPORT_WIDTH x round(EXPORT_WIDTH / ratio)`.
pub fn export_canvas(aspect: &str) -> HaloResult<Canvas> {
    canvas_for_width(aspect, EXPORT_WIDTH)
}

pub fn canvas_for_width(aspect: &str, width: u32) -> HaloResult<Canvas> {
    let ratio = parse_aspect_ratio(aspect);
    let height = (f64::from(width) / ratio).round().max(1.0) as u32;
    Canvas::new(width, height)
}

/// Draws the circular portrait with its optional faded arc and curved lettering.
///
/// Rendering is a pure function of its inputs; the renderer only caches shaped glyphs.
pub struct BadgeRenderer {
    font: Option<BadgeFont>,
    shaper: Option<GlyphShaper>,
}

impl std::fmt::Debug for BadgeRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeRenderer")
            .field("font", &self.font)
            .finish_non_exhaustive()
    }
}

impl BadgeRenderer {
    /// Renderer using `font` for the lettering; `None` draws the arc without text.
    pub fn new(font: Option<BadgeFont>) -> HaloResult<Self> {
        let shaper = font.as_ref().map(GlyphShaper::new).transpose()?;
        Ok(Self { font, shaper })
    }

    /// Renderer using the system's bold sans-serif face, or no lettering if none is found.
    pub fn with_system_font() -> Self {
        match BadgeFont::system_sans_bold().and_then(|f| Self::new(Some(f))) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(error = %err, "no usable badge font, text will be skipped");
                Self {
                    font: None,
                    shaper: None,
                }
            }
        }
    }

    pub fn has_font(&self) -> bool {
        self.shaper.is_some()
    }

    #[tracing::instrument(skip(self, image, customization), fields(w = canvas.width, h = canvas.height))]
    pub fn render(
        &mut self,
        image: &SourceImage,
        customization: &Customization,
        canvas: Canvas,
        target: RenderTarget,
    ) -> HaloResult<Raster> {
        let scale = customization.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(HaloError::validation("badge scale must be finite and > 0"));
        }
        let offset = customization.offset;
        if !offset.x.is_finite() || !offset.y.is_finite() {
            return Err(HaloError::validation("badge offset must be finite"));
        }
        let badge = customization.badge.normalized();

        let mut surface = CpuSurface::new(canvas.width, canvas.height)?;
        let (w, h) = (surface.width(), surface.height());
        let center = canvas.center();
        let ctx = surface.ctx();

        if target == RenderTarget::Export {
            fill_surface(ctx, w, h, Rgba8::WHITE);
        }

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.push_clip_layer(&circle_path(center, canvas.inscribed_radius()));

        fill_surface(ctx, w, h, hex_to_rgba(&badge.background_color, 1.0));

        let image_transform = Affine::translate(center.to_vec2() + offset)
            * Affine::scale(scale)
            * Affine::translate((
                -f64::from(image.width) / 2.0,
                -f64::from(image.height) / 2.0,
            ));
        draw_image(
            ctx,
            image_paint(image)?,
            image.width,
            image.height,
            image_transform,
        );

        if customization.show_badge {
            let arc = ArcGeometry::new(
                canvas,
                badge.frame_thickness,
                badge.frame_start_position,
                badge.frame_end_position,
            );
            draw_arc(ctx, &arc, &badge);
            if let (Some(font), Some(shaper)) = (self.font.as_ref(), self.shaper.as_mut()) {
                draw_text(ctx, font, shaper, &arc, &badge)?;
            }
        }

        ctx.pop_layer();
        surface.finish()
    }
}

fn draw_arc(ctx: &mut vello_cpu::RenderContext, arc: &ArcGeometry, badge: &BadgeConfig) {
    if arc.thickness <= 0.0 || arc.arc_radius <= 0.0 {
        return;
    }
    let inner = (arc.arc_radius - arc.thickness / 2.0).max(0.0);
    let outer = arc.arc_radius + arc.thickness / 2.0;

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for seg in fade_segments(arc.sweep, FADE_STEPS, FADE_PORTION) {
        if seg.alpha <= 0.0 {
            continue;
        }
        ctx.set_paint(color_to_cpu(hex_to_rgba(&badge.badge_color, seg.alpha)));
        ctx.fill_path(&annular_sector(
            arc.center,
            inner,
            outer,
            seg.start_angle,
            seg.sweep,
        ));
    }
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    font: &BadgeFont,
    shaper: &mut GlyphShaper,
    arc: &ArcGeometry,
    badge: &BadgeConfig,
) -> HaloResult<()> {
    let size_px = badge.font_size as f32;
    let shaped = badge
        .badge_text
        .chars()
        .map(|c| shaper.shape(c.encode_utf8(&mut [0u8; 4]), size_px))
        .collect::<HaloResult<Vec<_>>>()?;
    let advances: Vec<f64> = shaped.iter().map(|s| s.advance).collect();

    ctx.set_paint(color_to_cpu(hex_to_rgba(&badge.badge_text_color, 1.0)));
    for placed in place_text(&advances, badge.letter_spacing, arc, badge.text_placement) {
        let glyphs = &shaped[placed.index];
        if glyphs.glyphs.is_empty() {
            continue;
        }
        let tr = Affine::translate(placed.position.to_vec2()) * Affine::rotate(placed.rotation);
        ctx.set_transform(affine_to_cpu(tr));
        ctx.glyph_run(font.font_data())
            .font_size(glyphs.size_px)
            .fill_glyphs(glyphs.glyphs.iter().cloned());
    }
    Ok(())
}

fn circle_path(center: Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    use vello_cpu::kurbo::Shape;

    vello_cpu::kurbo::Circle::new((center.x, center.y), radius).to_path(PATH_TOLERANCE)
}

/// Ring slice between `inner` and `outer`, from `start` sweeping `sweep` radians clockwise.
fn annular_sector(
    center: Point,
    inner: f64,
    outer: f64,
    start: f64,
    sweep: f64,
) -> vello_cpu::kurbo::BezPath {
    use vello_cpu::kurbo::{Arc, BezPath, Point as CpuPoint, Vec2 as CpuVec2};

    let c = CpuPoint::new(center.x, center.y);
    let end = start + sweep;
    let mut path = BezPath::new();
    path.move_to(c + CpuVec2::from_angle(start) * outer);
    path.extend(Arc::new(c, (outer, outer), start, sweep, 0.0).append_iter(PATH_TOLERANCE));
    path.line_to(c + CpuVec2::from_angle(end) * inner);
    if inner > 0.0 {
        path.extend(Arc::new(c, (inner, inner), end, -sweep, 0.0).append_iter(PATH_TOLERANCE));
    }
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/badge/canvas.rs"]
mod tests;
