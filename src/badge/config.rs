use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::Vec2,
    foundation::error::{HaloError, HaloResult},
    foundation::math::parse_hex_color,
};

pub const BADGE_MIN_SCALE: f64 = 0.1;
pub const BADGE_MAX_SCALE: f64 = 3.0;
pub const MIN_FONT_SIZE: f64 = 10.0;

/// Frame, lettering and background settings for one render.
///
/// Positions are percentages of a full turn measured clockwise from 3 o'clock. `end` below
/// `start` wraps through 0%.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BadgeConfig {
    pub frame_thickness: f64,
    pub frame_start_position: f64,
    pub frame_end_position: f64,
    pub badge_text: String,
    pub badge_color: String,
    pub badge_text_color: String,
    pub font_size: f64,
    pub letter_spacing: f64,
    /// `0..=200`; 100 centers the text on the arc.
    pub text_placement: f64,
    pub background_color: String,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            frame_thickness: 60.0,
            frame_start_position: 16.0,
            frame_end_position: 56.0,
            badge_text: "#OPENTOWORK".to_string(),
            badge_color: "#000000".to_string(),
            badge_text_color: "#FFFFFF".to_string(),
            font_size: 44.0,
            letter_spacing: 0.0,
            text_placement: 100.0,
            background_color: "#FFFFFF".to_string(),
        }
    }
}

impl BadgeConfig {
    /// Copy with every numeric field pulled into its usable range. Non-finite values fall back
    /// to the defaults.
    pub fn normalized(&self) -> Self {
        let d = Self::default();
        let finite = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            frame_thickness: finite(self.frame_thickness, d.frame_thickness).max(0.0),
            frame_start_position: finite(self.frame_start_position, d.frame_start_position)
                .clamp(0.0, 100.0),
            frame_end_position: finite(self.frame_end_position, d.frame_end_position)
                .clamp(0.0, 100.0),
            font_size: finite(self.font_size, d.font_size).max(1.0),
            letter_spacing: finite(self.letter_spacing, d.letter_spacing),
            text_placement: finite(self.text_placement, d.text_placement).clamp(0.0, 200.0),
            ..self.clone()
        }
    }

    /// Strict check of the color strings, for configuration files.
    pub fn validate_colors(&self) -> HaloResult<()> {
        for c in [
            &self.badge_color,
            &self.badge_text_color,
            &self.background_color,
        ] {
            parse_hex_color(c)?;
        }
        Ok(())
    }
}

/// Snapshot held in the customization panel's history.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub show_badge: bool,
    pub scale: f64,
    pub offset: Vec2,
    #[serde(flatten)]
    pub badge: BadgeConfig,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            show_badge: false,
            scale: 1.0,
            offset: Vec2::ZERO,
            badge: BadgeConfig::default(),
        }
    }
}

impl Customization {
    pub fn from_json_str(json: &str) -> HaloResult<Self> {
        let c: Self = serde_json::from_str(json)
            .map_err(|e| HaloError::serde(format!("customization json: {e}")))?;
        c.badge.validate_colors()?;
        Ok(c)
    }

    pub fn from_json_path(path: &Path) -> HaloResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read customization '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}
