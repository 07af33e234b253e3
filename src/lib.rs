//! Haloframe turns a portrait photo into a circular profile picture.
//!
//! The pipeline mirrors the four-step [`Wizard`]:
//!
//! - Upload a photo and frame it in the [`CropEditor`] (face-centered when a detector is present)
//! - Send the confirmed crop through a [`GenerationService`] with a style prompt
//! - Customize the result in the [`BadgeEditor`] and draw it with the [`BadgeRenderer`]
//! - Export a PNG
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod badge;
pub mod config;
pub mod crop;
pub mod generate;
pub mod history;
pub mod render;
pub mod session;

pub use crate::foundation::core::{
    Affine, Canvas, Point, Rect, Rgba8, Size, TransformState, Vec2,
};
pub use crate::foundation::error::{HaloError, HaloResult, UploadError};
pub use crate::foundation::math::{
    ArcSweep, clamp_position, fade_alpha, fit_within, hex_to_rgba, max_pan, parse_aspect_ratio,
    parse_hex_color, percent_to_radians,
};

pub use crate::assets::{SourceImage, decode_image, validate_upload};
pub use crate::badge::{BadgeConfig, BadgeEditor, BadgeRenderer, Customization, RenderTarget};
pub use crate::config::AppConfig;
pub use crate::crop::{CropArea, CropEditor, CroppedPhoto, DetectedFace, FaceDetection};
pub use crate::generate::{
    GeneratedImage, GenerationRequest, GenerationService, HttpGenerationService,
    PassthroughService, StylePreset,
};
pub use crate::history::{DebouncedCommit, HistoryLog, WorkingState};
pub use crate::render::Raster;
pub use crate::session::{ExportedImage, GenerationTicket, Wizard, WizardStep};
