//! Four-step wizard tying the editors together: upload and crop, pick a style and generate,
//! customize the badge, download.
//!
//! Failures end the operation that raised them and are kept in [`Wizard::last_error`]; nothing
//! else in the session is lost.

use crate::{
    assets::{SourceImage, decode_image, validate_upload},
    badge::{
        BadgeEditor, BadgeRenderer, Customization, EXPORT_FILENAME, RenderTarget,
        canvas_for_width,
    },
    crop::{CropEditor, CroppedPhoto, FaceDetection},
    foundation::core::Canvas,
    foundation::error::{HaloError, HaloResult},
    generate::{
        GeneratedImage, GenerationRequest, GenerationService, StylePreset, default_style,
        selectable_style,
    },
    render::Raster,
};

pub const DEFAULT_ASPECT: &str = "1:1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Upload,
    Style,
    Customize,
    Download,
}

impl WizardStep {
    /// 1-based position shown in the stepper.
    pub fn index(self) -> u8 {
        match self {
            Self::Upload => 1,
            Self::Style => 2,
            Self::Customize => 3,
            Self::Download => 4,
        }
    }
}

/// Identifies one [`Wizard::begin_generation`] call. Results carrying an older ticket are
/// dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GenerationTicket(u64);

/// Final PNG, named the way the download is offered.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedImage {
    pub filename: String,
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub struct Wizard {
    step: WizardStep,
    aspect: String,
    editor: Option<CropEditor>,
    cropped: Option<CroppedPhoto>,
    style: &'static StylePreset,
    generation_seq: u64,
    pending: Option<GenerationTicket>,
    generated: Option<SourceImage>,
    badge: BadgeEditor,
    initial: Customization,
    renderer: BadgeRenderer,
    export_width: u32,
    last_error: Option<String>,
}

impl std::fmt::Debug for Wizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wizard")
            .field("step", &self.step)
            .field("aspect", &self.aspect)
            .field("style", &self.style.id)
            .field("pending", &self.pending)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl Wizard {
    /// `initial` seeds every badge session; exports are `export_width` pixels wide.
    pub fn new(renderer: BadgeRenderer, initial: Customization, export_width: u32) -> Self {
        Self {
            step: WizardStep::Upload,
            aspect: DEFAULT_ASPECT.to_string(),
            editor: None,
            cropped: None,
            style: default_style(),
            generation_seq: 0,
            pending: None,
            generated: None,
            badge: BadgeEditor::new(initial.clone()),
            initial,
            renderer,
            export_width: export_width.max(1),
            last_error: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Aspect ratio of the confirmed crop (`"1:1"` before any).
    pub fn aspect(&self) -> &str {
        &self.aspect
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validate and decode a picked file, then open it in the crop editor.
    ///
    /// Works at any step; the current result stays in place until the new crop is confirmed.
    #[tracing::instrument(skip(self, bytes, detection), fields(len = bytes.len()))]
    pub fn select_file(
        &mut self,
        bytes: &[u8],
        declared_mime: &str,
        detection: &FaceDetection,
    ) -> HaloResult<()> {
        let result = validate_upload(declared_mime, bytes.len() as u64)
            .map_err(HaloError::from)
            .and_then(|()| decode_image(bytes));
        let image = self.record(result)?;
        self.supersede_generation();
        self.editor = Some(CropEditor::open(image, &self.aspect, detection));
        Ok(())
    }

    pub fn editor(&self) -> Option<&CropEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut CropEditor> {
        self.editor.as_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    /// Confirm the open crop and move to style selection with a fresh badge session.
    pub fn confirm_crop(&mut self) -> HaloResult<()> {
        let editor = self
            .editor
            .as_ref()
            .ok_or_else(|| HaloError::validation("no image is being edited"))?;
        let result = editor.confirm();
        let photo = self.record(result)?;

        self.aspect = photo.aspect.clone();
        self.cropped = Some(photo);
        self.editor = None;
        self.generated = None;
        self.supersede_generation();
        self.badge.reset(self.initial.clone());
        self.step = WizardStep::Style;
        tracing::debug!(aspect = %self.aspect, "crop accepted");
        Ok(())
    }

    pub fn cropped(&self) -> Option<&CroppedPhoto> {
        self.cropped.as_ref()
    }

    /// Unknown and disabled presets are rejected; the selection stays as it was.
    pub fn select_style(&mut self, id: &str) -> HaloResult<()> {
        self.style = selectable_style(id)?;
        Ok(())
    }

    pub fn selected_style(&self) -> &'static StylePreset {
        self.style
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    /// Request for the selected style. Only one may be outstanding; a new photo supersedes it.
    pub fn begin_generation(&mut self) -> HaloResult<(GenerationTicket, GenerationRequest)> {
        if self.pending.is_some() {
            return Err(HaloError::validation("generation already in progress"));
        }
        let photo = self
            .cropped
            .as_ref()
            .ok_or_else(|| HaloError::validation("no confirmed crop to generate from"))?;
        let request = GenerationRequest {
            bytes: photo.png.clone(),
            mime: "image/png".to_string(),
            prompt: self.style.prompt.to_string(),
        };
        self.generation_seq += 1;
        let ticket = GenerationTicket(self.generation_seq);
        self.pending = Some(ticket);
        self.last_error = None;
        Ok((ticket, request))
    }

    /// Settle the request behind `ticket`. Success moves on to customization; failure stays on
    /// the style step with the message kept for display.
    ///
    /// Returns `Ok(false)` without touching any state when `ticket` is not the outstanding
    /// request.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: HaloResult<GeneratedImage>,
    ) -> HaloResult<bool> {
        if self.pending != Some(ticket) {
            tracing::debug!(?ticket, pending = ?self.pending, "dropping superseded generation result");
            return Ok(false);
        }
        self.pending = None;

        let result = result.and_then(|img| {
            decode_image(&img.bytes)
                .map_err(|e| HaloError::generation(format!("undecodable result: {e}")))
        });
        if let Err(err) = &result {
            tracing::warn!(error = %err, "generation failed");
        }
        let image = self.record(result)?;

        self.generated = Some(image);
        self.badge.reset(self.initial.clone());
        self.step = WizardStep::Customize;
        tracing::info!(style = self.style.id, "generated image ready");
        Ok(true)
    }

    /// Blocking round trip through `service`.
    pub fn generate(&mut self, service: &dyn GenerationService) -> HaloResult<()> {
        let (ticket, request) = self.begin_generation()?;
        let result = service.generate(&request);
        self.finish_generation(ticket, result).map(|_| ())
    }

    pub fn generated_image(&self) -> Option<&SourceImage> {
        self.generated.as_ref()
    }

    pub fn badge(&self) -> &BadgeEditor {
        &self.badge
    }

    pub fn badge_mut(&mut self) -> &mut BadgeEditor {
        &mut self.badge
    }

    pub fn export_canvas(&self) -> HaloResult<Canvas> {
        canvas_for_width(&self.aspect, self.export_width)
    }

    /// Current customization drawn with a transparent surround.
    pub fn render_preview(&mut self) -> HaloResult<Raster> {
        self.render(RenderTarget::Preview)
    }

    pub fn proceed_to_download(&mut self) -> HaloResult<()> {
        if self.generated.is_none() {
            return Err(HaloError::validation("nothing to download yet"));
        }
        self.step = WizardStep::Download;
        Ok(())
    }

    pub fn export(&mut self) -> HaloResult<ExportedImage> {
        let raster = self.render(RenderTarget::Export)?;
        let png = raster.encode_png()?;
        tracing::info!(width = raster.width, height = raster.height, "exported");
        Ok(ExportedImage {
            filename: EXPORT_FILENAME.to_string(),
            png,
            width: raster.width,
            height: raster.height,
        })
    }

    /// Back to an empty upload step.
    pub fn reset(&mut self) {
        self.step = WizardStep::Upload;
        self.aspect = DEFAULT_ASPECT.to_string();
        self.editor = None;
        self.cropped = None;
        self.generated = None;
        self.supersede_generation();
        self.last_error = None;
        self.badge.reset(self.initial.clone());
        tracing::debug!("wizard reset");
    }

    fn render(&mut self, target: RenderTarget) -> HaloResult<Raster> {
        let image = self
            .generated
            .as_ref()
            .ok_or_else(|| HaloError::validation("no generated image to render"))?;
        let canvas = canvas_for_width(&self.aspect, self.export_width)?;
        self.renderer
            .render(image, self.badge.customization(), canvas, target)
    }

    /// Forget the outstanding request; its result will no longer match.
    fn supersede_generation(&mut self) {
        if let Some(ticket) = self.pending.take() {
            tracing::debug!(?ticket, "pending generation superseded");
        }
    }

    fn record<T>(&mut self, result: HaloResult<T>) -> HaloResult<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
        result
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
