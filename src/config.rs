use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

use crate::{
    badge::{BadgeConfig, BadgeRenderer, Customization, EXPORT_WIDTH},
    foundation::error::{HaloError, HaloResult},
    generate::{GenerationService, HttpGenerationService, default_style, selectable_style},
    render::text::BadgeFont,
};

pub const ENV_GENERATE_URL: &str = "HALOFRAME_GENERATE_URL";
pub const ENV_FONT: &str = "HALOFRAME_FONT";
pub const ENV_GENERATE_TIMEOUT_SECS: &str = "HALOFRAME_GENERATE_TIMEOUT_SECS";

/// Application settings. Every key is optional in the JSON file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub generate_url: Option<String>,
    pub generate_timeout_secs: u64,
    pub font_path: Option<PathBuf>,
    pub show_badge: bool,
    pub badge: BadgeConfig,
    pub export_width: u32,
    pub default_style: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generate_url: None,
            generate_timeout_secs: HttpGenerationService::DEFAULT_TIMEOUT.as_secs(),
            font_path: None,
            show_badge: false,
            badge: BadgeConfig::default(),
            export_width: EXPORT_WIDTH,
            default_style: default_style().id.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `path` if given, then `HALOFRAME_*` environment overrides.
    pub fn load(path: Option<&Path>) -> HaloResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_json_path(p)?,
            None => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_json_str(json: &str) -> HaloResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| HaloError::serde(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_path(path: &Path) -> HaloResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> HaloResult<()> {
        self.badge.validate_colors()?;
        if self.export_width == 0 {
            return Err(HaloError::validation("exportWidth must be > 0"));
        }
        selectable_style(&self.default_style)?;
        Ok(())
    }

    /// Apply overrides from `lookup`. Empty or unparsable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_GENERATE_URL).filter(|v| !v.trim().is_empty()) {
            self.generate_url = Some(url);
        }
        if let Some(font) = lookup(ENV_FONT).filter(|v| !v.trim().is_empty()) {
            self.font_path = Some(PathBuf::from(font));
        }
        if let Some(secs) = lookup(ENV_GENERATE_TIMEOUT_SECS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.generate_timeout_secs = secs;
        }
    }

    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(self.generate_timeout_secs.max(1))
    }

    /// Starting point of every customization session.
    pub fn initial_customization(&self) -> Customization {
        Customization {
            show_badge: self.show_badge,
            badge: self.badge.clone(),
            ..Customization::default()
        }
    }

    /// Renderer using `fontPath` when set, the system face otherwise.
    pub fn badge_renderer(&self) -> BadgeRenderer {
        let Some(path) = self.font_path.as_deref() else {
            return BadgeRenderer::with_system_font();
        };
        match BadgeFont::from_path(path).and_then(|f| BadgeRenderer::new(Some(f))) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "configured font unusable");
                BadgeRenderer::with_system_font()
            }
        }
    }

    pub fn generation_service(&self) -> HaloResult<HttpGenerationService> {
        let url = self
            .generate_url
            .as_deref()
            .ok_or_else(|| HaloError::validation("no generation endpoint configured"))?;
        HttpGenerationService::new(url, self.generate_timeout())
    }

    /// Boxed service, for hosts that pick the implementation at runtime.
    pub fn boxed_generation_service(&self) -> HaloResult<Box<dyn GenerationService>> {
        Ok(Box::new(self.generation_service()?))
    }
}
