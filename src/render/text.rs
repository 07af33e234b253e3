use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{HaloError, HaloResult};

/// Font used for badge lettering.
#[derive(Clone)]
pub struct BadgeFont {
    bytes: Arc<Vec<u8>>,
    index: u32,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for BadgeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeFont")
            .field("bytes", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl BadgeFont {
    pub fn from_bytes(bytes: Vec<u8>, index: u32) -> HaloResult<Self> {
        if bytes.is_empty() {
            return Err(HaloError::validation("font bytes are empty"));
        }
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.clone()),
            index,
        );
        Ok(Self {
            bytes: Arc::new(bytes),
            index,
            font,
        })
    }

    pub fn from_path(path: &Path) -> HaloResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes, 0)
    }

    /// First bold sans-serif face installed on the system, falling back to any sans-serif face.
    pub fn system_sans_bold() -> HaloResult<Self> {
        use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

        let mut db = Database::new();
        db.load_system_fonts();

        let families = [Family::SansSerif];
        let query = |weight| Query {
            families: &families,
            weight,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = db
            .query(&query(Weight::BOLD))
            .or_else(|| db.query(&query(Weight::NORMAL)))
            .or_else(|| db.faces().next().map(|f| f.id))
            .ok_or_else(|| HaloError::render("no system fonts available"))?;

        let (bytes, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| HaloError::render("system font face data unavailable"))?;
        tracing::debug!(bytes = bytes.len(), index, "loaded system badge font");
        Self::from_bytes(bytes, index)
    }

    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }
}

/// A shaped string ready to draw with its middle-center at the origin.
#[derive(Clone, Debug)]
pub struct ShapedText {
    /// Horizontal advance in pixels.
    pub advance: f64,
    /// Line box height in pixels.
    pub height: f64,
    pub size_px: f32,
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
}

/// Parley-backed shaping for single characters of the badge font. Only the most recent size is
/// cached.
pub struct GlyphShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    cache_size_bits: u32,
    cache: HashMap<String, ShapedText>,
}

impl GlyphShaper {
    pub fn new(font: &BadgeFont) -> HaloResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            HaloError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| HaloError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            cache_size_bits: 0,
            cache: HashMap::new(),
        })
    }

    /// Shape `text` at `size_px`, centering horizontally on the advance and vertically on the
    /// line box.
    pub fn shape(&mut self, text: &str, size_px: f32) -> HaloResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(HaloError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        if self.cache_size_bits != size_px.to_bits() {
            self.cache.clear();
            self.cache_size_bits = size_px.to_bits();
        }
        if let Some(hit) = self.cache.get(text) {
            return Ok(hit.clone());
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let height = f64::from(layout.height());
        let mut advance = 0.0f32;
        let mut raw = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                for g in run.positioned_glyphs() {
                    advance += g.advance;
                    raw.push((g.id, g.x, g.y));
                }
            }
        }

        let (dx, dy) = (advance / 2.0, (height / 2.0) as f32);
        let glyphs = raw
            .into_iter()
            .map(|(id, x, y)| vello_cpu::Glyph {
                id,
                x: x - dx,
                y: y - dy,
            })
            .collect();

        let shaped = ShapedText {
            advance: f64::from(advance),
            height,
            size_px,
            glyphs,
        };
        self.cache.insert(text.to_string(), shaped.clone());
        Ok(shaped)
    }
}
