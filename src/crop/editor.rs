use std::time::Instant;

use crate::{
    assets::SourceImage,
    crop::{
        CROP_OUTPUT_RESOLUTION, NUDGE_COMMIT_DELAY, PAN_STEP_PX, clamp_scale,
        extract::render_region,
        face::{DetectedFace, DetectionStatus, FaceDetection, face_centered, largest_face},
        viewport::{CropArea, Viewport},
    },
    foundation::core::{Point, Size, TransformState, Vec2},
    foundation::error::{HaloError, HaloResult},
    foundation::math::{fit_within, parse_aspect_ratio},
    history::{DebouncedCommit, WorkingState},
    render::Raster,
};

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

impl ArrowKey {
    /// Maps DOM-style key names (`"ArrowUp"`, ...).
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }

    fn step(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -PAN_STEP_PX),
            Self::Down => Vec2::new(0.0, PAN_STEP_PX),
            Self::Left => Vec2::new(-PAN_STEP_PX, 0.0),
            Self::Right => Vec2::new(PAN_STEP_PX, 0.0),
        }
    }
}

/// Confirmed crop, encoded as PNG.
#[derive(Clone, Debug, PartialEq)]
pub struct CroppedPhoto {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Aspect ratio the crop was confirmed with, e.g. `"4:3"`.
    pub aspect: String,
}

#[derive(Clone, Copy, Debug)]
struct Pinch {
    start_distance: f64,
    start_scale: f64,
}

/// Interactive crop session for one source image.
#[derive(Debug)]
pub struct CropEditor {
    image: SourceImage,
    aspect: String,
    viewport: Viewport,
    state: WorkingState<TransformState>,
    status: DetectionStatus,
    enhanced: bool,
    pointers: Vec<(PointerId, Point)>,
    pinch: Option<Pinch>,
    nudge: DebouncedCommit,
}

impl CropEditor {
    /// Open `image` and run the whole initialization flow, detection included.
    pub fn open(image: SourceImage, aspect: &str, detection: &FaceDetection) -> Self {
        let mut editor = Self::open_idle(image, aspect);
        if !detection.is_available() {
            tracing::debug!("face detection unavailable");
            editor.finish_init(DetectionStatus::NotDetected, None);
            return editor;
        }
        editor.begin_detection();
        if let Some(result) = detection.detect(&editor.image) {
            editor.complete_detection(result);
        }
        editor
    }

    /// Open `image` in the [`DetectionStatus::Idle`] state. Nothing is framed and gestures are
    /// ignored until the host calls [`CropEditor::begin_detection`].
    pub fn open_idle(image: SourceImage, aspect: &str) -> Self {
        let viewport = Viewport::for_aspect(parse_aspect_ratio(aspect));
        let initial = viewport.fit_to_cover(image.size());
        Self {
            image,
            aspect: aspect.to_string(),
            viewport,
            state: WorkingState::new(initial),
            status: DetectionStatus::Idle,
            enhanced: false,
            pointers: Vec::new(),
            pinch: None,
            nudge: DebouncedCommit::new(NUDGE_COMMIT_DELAY),
        }
    }

    /// Open `image` already in the [`DetectionStatus::Detecting`] state; the host runs detection
    /// and reports back through [`CropEditor::complete_detection`].
    pub fn open_detecting(image: SourceImage, aspect: &str) -> Self {
        let mut editor = Self::open_idle(image, aspect);
        editor.begin_detection();
        editor
    }

    /// `Idle` to `Detecting`. Returns false in any other state.
    pub fn begin_detection(&mut self) -> bool {
        if self.status != DetectionStatus::Idle {
            return false;
        }
        self.status = DetectionStatus::Detecting;
        true
    }

    /// Initialize framing from a detection result. Only meaningful while detecting.
    pub fn complete_detection(&mut self, result: HaloResult<Vec<DetectedFace>>) {
        if self.status != DetectionStatus::Detecting {
            tracing::debug!(status = ?self.status, "ignoring late detection result");
            return;
        }
        match result {
            Ok(faces) => match largest_face(&faces) {
                Some(face) => {
                    let face = *face;
                    self.finish_init(DetectionStatus::Detected, Some(&face));
                }
                None => self.finish_init(DetectionStatus::NotDetected, None),
            },
            Err(err) => {
                tracing::warn!(error = %err, "face detection failed, fitting image instead");
                self.finish_init(DetectionStatus::Error, None);
            }
        }
    }

    fn finish_init(&mut self, status: DetectionStatus, face: Option<&DetectedFace>) {
        let initial = match face {
            Some(face) => face_centered(&self.viewport, self.image.size(), face),
            None => self.viewport.fit_to_cover(self.image.size()),
        };
        self.state.reset(initial);
        self.status = status;
        tracing::debug!(?status, scale = initial.scale, "crop editor initialized");
    }

    pub fn accepts_input(&self) -> bool {
        !matches!(self.status, DetectionStatus::Idle | DetectionStatus::Detecting)
    }

    pub fn status(&self) -> DetectionStatus {
        self.status
    }

    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    pub fn aspect(&self) -> &str {
        &self.aspect
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Transform being displayed, possibly uncommitted.
    pub fn transform(&self) -> TransformState {
        *self.state.get()
    }

    pub fn committed_transform(&self) -> TransformState {
        *self.state.committed()
    }

    pub fn is_enhanced(&self) -> bool {
        self.enhanced
    }

    pub fn pointer_down(&mut self, id: PointerId, at: Point) {
        if !self.accepts_input() {
            return;
        }
        match self.pointers.iter_mut().find(|(p, _)| *p == id) {
            Some(entry) => entry.1 = at,
            None => self.pointers.push((id, at)),
        }
        self.pinch = None;
    }

    pub fn pointer_move(&mut self, id: PointerId, at: Point) {
        let Some(entry) = self.pointers.iter_mut().find(|(p, _)| *p == id) else {
            return;
        };
        let previous = std::mem::replace(&mut entry.1, at);

        let distance = match self.pointers.as_slice() {
            [(_, a), (_, b), ..] => a.distance(*b),
            _ => {
                let t = self.transform();
                self.set_live(t.with_position(t.position + (at - previous)));
                return;
            }
        };
        match self.pinch {
            Some(pinch) => {
                let scale = clamp_scale(pinch.start_scale * distance / pinch.start_distance);
                self.set_live(self.transform().with_scale(scale));
            }
            None if distance > 0.0 => {
                self.pinch = Some(Pinch {
                    start_distance: distance,
                    start_scale: self.transform().scale,
                });
            }
            None => {}
        }
    }

    /// Release (or cancel) a pointer and commit the gesture.
    pub fn pointer_up(&mut self, id: PointerId) {
        let before = self.pointers.len();
        self.pointers.retain(|(p, _)| *p != id);
        if self.pointers.len() == before {
            return;
        }
        if self.pointers.len() < 2 {
            self.pinch = None;
        }
        self.state.commit();
    }

    /// Live zoom from a slider drag.
    pub fn set_zoom(&mut self, scale: f64) {
        if !self.accepts_input() || !scale.is_finite() {
            return;
        }
        self.set_live(self.transform().with_scale(clamp_scale(scale)));
    }

    pub fn commit_zoom(&mut self) -> bool {
        self.state.commit()
    }

    /// Pan by one arrow-key step; the commit follows after a quiet period (see [`Self::tick`]).
    pub fn nudge(&mut self, key: ArrowKey, now: Instant) {
        if !self.accepts_input() {
            return;
        }
        let t = self.transform();
        self.set_live(t.with_position(t.position + key.step()));
        self.nudge.schedule(now);
    }

    /// Fire the pending nudge commit once its quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.nudge.poll(now) {
            return self.state.commit();
        }
        false
    }

    /// Refit to cover and drop all history.
    pub fn auto_fit(&mut self) {
        self.nudge.cancel();
        self.state.reset(self.viewport.fit_to_cover(self.image.size()));
    }

    /// Switch aspect ratio on the same image: new viewport, refit, fresh history.
    pub fn set_aspect_ratio(&mut self, aspect: &str) {
        self.aspect = aspect.to_string();
        self.viewport = Viewport::for_aspect(parse_aspect_ratio(aspect));
        self.auto_fit();
        tracing::debug!(aspect, "crop aspect changed");
    }

    pub fn set_enhanced(&mut self, enhanced: bool) {
        self.enhanced = enhanced;
    }

    pub fn toggle_enhance(&mut self) {
        self.enhanced = !self.enhanced;
    }

    pub fn undo(&mut self) -> bool {
        self.nudge.cancel();
        self.state.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.nudge.cancel();
        self.state.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    /// Source rectangle under the viewport, intersected with the image bounds.
    pub fn crop_area(&self) -> CropArea {
        self.raw_crop_area().clamped_to(self.image.size())
    }

    fn raw_crop_area(&self) -> CropArea {
        self.viewport.crop_area(self.image.size(), self.transform())
    }

    /// Output raster size: [`CROP_OUTPUT_RESOLUTION`] on the longer side.
    pub fn output_size(&self) -> (u32, u32) {
        let size = fit_within(parse_aspect_ratio(&self.aspect), CROP_OUTPUT_RESOLUTION);
        round_size(size)
    }

    pub fn render_crop(&self) -> HaloResult<Raster> {
        let (w, h) = self.output_size();
        render_region(&self.image, self.raw_crop_area(), w, h, self.enhanced)
    }

    /// Viewport-sized render of what the user currently sees.
    pub fn render_preview(&self) -> HaloResult<Raster> {
        let (w, h) = round_size(self.viewport.size());
        render_region(&self.image, self.raw_crop_area(), w, h, self.enhanced)
    }

    pub fn confirm(&self) -> HaloResult<CroppedPhoto> {
        let raster = self.render_crop()?;
        let png = raster
            .encode_png()
            .map_err(|e| HaloError::crop(e.to_string()))?;
        tracing::info!(
            width = raster.width,
            height = raster.height,
            aspect = %self.aspect,
            "crop confirmed"
        );
        Ok(CroppedPhoto {
            png,
            width: raster.width,
            height: raster.height,
            aspect: self.aspect.clone(),
        })
    }

    fn set_live(&mut self, t: TransformState) {
        let clamped = self.viewport.clamp(self.image.size(), t);
        self.state.set(clamped);
    }
}

fn round_size(size: Size) -> (u32, u32) {
    (
        (size.width.round() as u32).max(1),
        (size.height.round() as u32).max(1),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/crop/editor.rs"]
mod tests;
