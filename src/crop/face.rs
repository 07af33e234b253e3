use std::str::FromStr;

use crate::{
    assets::SourceImage,
    crop::{FACE_PADDING_FACTOR, clamp_scale, viewport::Viewport},
    foundation::core::{Rect, Size, TransformState, Vec2},
    foundation::error::{HaloError, HaloResult},
};

/// A face found in a source image, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    pub bounding_box: Rect,
}

impl DetectedFace {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            bounding_box: Rect::new(x, y, x + width, y + height),
        }
    }

    pub fn area(&self) -> f64 {
        self.bounding_box.area()
    }
}

impl FromStr for DetectedFace {
    type Err = HaloError;

    /// Parses `x,y,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| HaloError::validation(format!("face box \"{s}\": {e}")))?;
        let [x, y, w, h] = parts[..] else {
            return Err(HaloError::validation(format!(
                "face box \"{s}\" must be x,y,width,height"
            )));
        };
        if ![x, y, w, h].iter().all(|v| v.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Err(HaloError::validation(format!(
                "face box \"{s}\" must be finite with positive size"
            )));
        }
        Ok(Self::new(x, y, w, h))
    }
}

/// Largest face by area; later entries win ties.
pub fn largest_face(faces: &[DetectedFace]) -> Option<&DetectedFace> {
    faces.iter().max_by(|a, b| a.area().total_cmp(&b.area()))
}

/// Frame `face` (padded) in the viewport, centered where the pan limits allow.
pub fn face_centered(viewport: &Viewport, image: Size, face: &DetectedFace) -> TransformState {
    let vp = viewport.size();
    let bb = face.bounding_box;
    let padded_w = bb.width() * FACE_PADDING_FACTOR;
    let padded_h = bb.height() * FACE_PADDING_FACTOR;
    let scale = clamp_scale((vp.width / padded_w).min(vp.height / padded_h));

    let center = bb.center();
    let position = Vec2::new(
        -(center.x - image.width / 2.0) * scale,
        -(center.y - image.height / 2.0) * scale,
    );
    viewport.clamp(
        image,
        TransformState::identity()
            .with_scale(scale)
            .with_position(position),
    )
}

/// Host face-detection backend.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &SourceImage) -> HaloResult<Vec<DetectedFace>>;
}

/// Face detection as an optional capability, chosen once per session.
pub enum FaceDetection {
    Available(Box<dyn FaceDetector>),
    Unavailable,
}

impl FaceDetection {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// `None` when the capability is missing.
    pub fn detect(&self, image: &SourceImage) -> Option<HaloResult<Vec<DetectedFace>>> {
        match self {
            Self::Available(detector) => Some(detector.detect(image)),
            Self::Unavailable => None,
        }
    }
}

impl std::fmt::Debug for FaceDetection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("FaceDetection::Available(..)"),
            Self::Unavailable => f.write_str("FaceDetection::Unavailable"),
        }
    }
}

/// Detector returning boxes computed elsewhere (CLI hints, an upstream service).
#[derive(Clone, Debug, Default)]
pub struct FixedFaceDetector {
    faces: Vec<DetectedFace>,
}

impl FixedFaceDetector {
    pub fn new(faces: Vec<DetectedFace>) -> Self {
        Self { faces }
    }
}

impl FaceDetector for FixedFaceDetector {
    fn detect(&self, _image: &SourceImage) -> HaloResult<Vec<DetectedFace>> {
        Ok(self.faces.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionStatus {
    Idle,
    Detecting,
    Detected,
    NotDetected,
    Error,
}
