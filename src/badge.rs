//! Circular portrait compositor with an optional arc badge.
//!
//! [`BadgeRenderer::render`] is a pure function of image, [`Customization`] and canvas size.
//! [`BadgeEditor`] holds the customization history that drives it.

pub mod canvas;
pub mod config;
pub mod editor;
pub mod layout;

pub use canvas::{
    BadgeRenderer, EXPORT_FILENAME, EXPORT_WIDTH, RenderTarget, canvas_for_width, export_canvas,
};
pub use config::{BADGE_MAX_SCALE, BADGE_MIN_SCALE, BadgeConfig, Customization, MIN_FONT_SIZE};
pub use editor::BadgeEditor;
pub use layout::{ArcGeometry, FadeSegment, PlacedGlyph, fade_segments, place_text, text_span};
