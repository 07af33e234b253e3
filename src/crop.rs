//! Crop editor: pan/zoom of a source image inside an aspect-constrained viewport.
//!
//! The editor keeps a [`crate::history::WorkingState`] of [`TransformState`]: pointer moves,
//! pinches, slider drags and arrow-key nudges update the working copy, and gesture ends commit it.
//! Opening an image runs face detection (when the host has it) to pick the initial framing;
//! otherwise the image is fitted to cover the viewport.
//!
//! [`TransformState`]: crate::TransformState

use std::time::Duration;

pub mod editor;
pub mod enhance;
pub mod extract;
pub mod face;
pub mod viewport;

pub use editor::{ArrowKey, CropEditor, CroppedPhoto, PointerId};
pub use enhance::{ENHANCE_BRIGHTNESS, ENHANCE_CONTRAST, ENHANCE_SATURATE, enhance_in_place};
pub use face::{
    DetectedFace, DetectionStatus, FaceDetection, FaceDetector, FixedFaceDetector, face_centered,
    largest_face,
};
pub use viewport::{CropArea, Viewport};

/// Longer side of the on-screen crop viewport, in pixels.
pub const CROP_CONTAINER_SIZE: f64 = 320.0;
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 5.0;
/// Margin applied around a detected face box on each axis before fitting it to the viewport.
pub const FACE_PADDING_FACTOR: f64 = 1.8;
pub const PAN_STEP_PX: f64 = 10.0;
pub const NUDGE_COMMIT_DELAY: Duration = Duration::from_millis(500);
/// Longer side of the confirmed crop raster, in pixels.
pub const CROP_OUTPUT_RESOLUTION: f64 = 1024.0;
pub const ASPECT_RATIO_PRESETS: [&str; 5] = ["1:1", "4:3", "16:9", "3:4", "9:16"];

pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}
