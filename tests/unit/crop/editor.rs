use std::time::Duration;

use super::*;
use crate::crop::{FaceDetector, FixedFaceDetector, MAX_SCALE, MIN_SCALE};

fn solid(width: u32, height: u32) -> SourceImage {
    SourceImage::from_rgba_image(image::RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([90, 140, 200, 255]),
    ))
}

struct Failing;

impl FaceDetector for Failing {
    fn detect(&self, _image: &SourceImage) -> HaloResult<Vec<DetectedFace>> {
        Err(HaloError::face_detection("backend crashed"))
    }
}

fn plain(width: u32, height: u32) -> CropEditor {
    CropEditor::open(solid(width, height), "1:1", &FaceDetection::Unavailable)
}

#[test]
fn open_without_capability_fits_to_cover() {
    let ed = plain(500, 400);
    assert_eq!(ed.status(), DetectionStatus::NotDetected);
    assert!(ed.accepts_input());
    assert!((ed.transform().scale - 0.8).abs() < 1e-12);
    assert_eq!(ed.transform().position, Vec2::ZERO);
    assert!(!ed.can_undo() && !ed.can_redo());
}

#[test]
fn open_with_face_centers_largest_face() {
    let detector = FixedFaceDetector::new(vec![
        DetectedFace::new(10.0, 10.0, 20.0, 20.0),
        DetectedFace::new(600.0, 300.0, 100.0, 100.0),
    ]);
    let ed = CropEditor::open(
        solid(1000, 1000),
        "1:1",
        &FaceDetection::Available(Box::new(detector)),
    );
    assert_eq!(ed.status(), DetectionStatus::Detected);
    let t = ed.transform();
    assert!((t.scale - 320.0 / 180.0).abs() < 1e-12);
    assert!(t.position.x < 0.0 && t.position.y > 0.0);
    assert!(!ed.can_undo());
}

#[test]
fn detection_error_and_empty_result_fall_back_to_fit() {
    let ed = CropEditor::open(solid(500, 400), "1:1", &FaceDetection::Available(Box::new(Failing)));
    assert_eq!(ed.status(), DetectionStatus::Error);
    assert!((ed.transform().scale - 0.8).abs() < 1e-12);

    let none = FaceDetection::Available(Box::new(FixedFaceDetector::default()));
    let ed = CropEditor::open(solid(500, 400), "1:1", &none);
    assert_eq!(ed.status(), DetectionStatus::NotDetected);
}

#[test]
fn gestures_are_ignored_while_detecting() {
    let mut ed = CropEditor::open_detecting(solid(500, 400), "1:1");
    assert!(!ed.accepts_input());
    let before = ed.transform();
    ed.pointer_down(1, Point::new(0.0, 0.0));
    ed.pointer_move(1, Point::new(30.0, 0.0));
    ed.pointer_up(1);
    ed.nudge(ArrowKey::Left, Instant::now());
    ed.set_zoom(3.0);
    assert_eq!(ed.transform(), before);

    ed.complete_detection(Ok(vec![]));
    assert_eq!(ed.status(), DetectionStatus::NotDetected);
    ed.complete_detection(Ok(vec![DetectedFace::new(0.0, 0.0, 50.0, 50.0)]));
    assert_eq!(ed.status(), DetectionStatus::NotDetected);
}

#[test]
fn idle_editor_waits_for_detection_to_begin() {
    let mut ed = CropEditor::open_idle(solid(500, 400), "1:1");
    assert_eq!(ed.status(), DetectionStatus::Idle);
    assert!(!ed.accepts_input());

    // Results only count once detection is running.
    ed.complete_detection(Ok(vec![DetectedFace::new(0.0, 0.0, 50.0, 50.0)]));
    assert_eq!(ed.status(), DetectionStatus::Idle);

    assert!(ed.begin_detection());
    assert_eq!(ed.status(), DetectionStatus::Detecting);
    assert!(!ed.begin_detection());
    ed.complete_detection(Ok(vec![DetectedFace::new(100.0, 100.0, 50.0, 50.0)]));
    assert_eq!(ed.status(), DetectionStatus::Detected);
    assert!(ed.accepts_input());
    assert!(!ed.begin_detection());
}

#[test]
fn detection_status_serializes_kebab_case() {
    assert_eq!(serde_json::to_value(DetectionStatus::Idle).unwrap(), "idle");
    assert_eq!(
        serde_json::to_value(DetectionStatus::NotDetected).unwrap(),
        "not-detected"
    );
}

#[test]
fn drag_is_clamped_live_and_committed_on_release() {
    let mut ed = plain(500, 400);
    ed.pointer_down(7, Point::new(100.0, 100.0));
    ed.pointer_move(7, Point::new(150.0, 110.0));
    assert_eq!(ed.transform().position, Vec2::new(40.0, 0.0));
    assert_eq!(ed.committed_transform().position, Vec2::ZERO);
    ed.pointer_move(7, Point::new(120.0, 110.0));
    assert_eq!(ed.transform().position, Vec2::new(10.0, 0.0));

    ed.pointer_up(7);
    assert_eq!(ed.committed_transform().position, Vec2::new(10.0, 0.0));
    assert!(ed.can_undo());
    assert!(ed.undo());
    assert_eq!(ed.transform().position, Vec2::ZERO);
    assert!(ed.redo());
    assert_eq!(ed.transform().position, Vec2::new(10.0, 0.0));
}

#[test]
fn release_without_movement_does_not_grow_history() {
    let mut ed = plain(500, 400);
    ed.pointer_down(1, Point::new(5.0, 5.0));
    ed.pointer_up(1);
    assert!(!ed.can_undo());
    ed.pointer_up(99);
    assert!(!ed.can_undo());
}

#[test]
fn pinch_scale_is_always_clamped() {
    let mut ed = plain(500, 400);
    ed.pointer_down(1, Point::new(0.0, 0.0));
    ed.pointer_down(2, Point::new(10.0, 0.0));
    ed.pointer_move(2, Point::new(10.0, 0.0));
    ed.pointer_move(2, Point::new(10_000.0, 0.0));
    assert_eq!(ed.transform().scale, MAX_SCALE);
    ed.pointer_move(2, Point::new(0.01, 0.0));
    assert_eq!(ed.transform().scale, MIN_SCALE);
    assert_eq!(ed.transform().position, Vec2::ZERO);

    ed.pointer_up(2);
    assert_eq!(ed.committed_transform().scale, MIN_SCALE);
    ed.pointer_up(1);
    assert_eq!(ed.state.log().len(), 2);
}

#[test]
fn pinch_doubles_scale_with_doubled_distance() {
    let mut ed = plain(500, 400);
    ed.pointer_down(1, Point::new(0.0, 0.0));
    ed.pointer_down(2, Point::new(50.0, 0.0));
    ed.pointer_move(1, Point::new(0.0, 0.0));
    ed.pointer_move(2, Point::new(100.0, 0.0));
    assert!((ed.transform().scale - 1.6).abs() < 1e-12);
}

#[test]
fn nudges_commit_once_after_quiet_period() {
    let mut ed = plain(500, 400);
    let t0 = Instant::now();
    for i in 0..3 {
        ed.nudge(ArrowKey::Right, t0 + Duration::from_millis(100 * i));
    }
    assert_eq!(ed.transform().position, Vec2::new(30.0, 0.0));
    assert!(!ed.tick(t0 + Duration::from_millis(600)));
    assert!(!ed.can_undo());
    assert!(ed.tick(t0 + Duration::from_millis(700)));
    assert_eq!(ed.state.log().len(), 2);
    assert!(!ed.tick(t0 + Duration::from_secs(5)));

    ed.nudge(ArrowKey::Down, t0 + Duration::from_secs(6));
    assert_eq!(ed.transform().position, Vec2::new(30.0, 0.0));
    for _ in 0..10 {
        ed.nudge(ArrowKey::Right, t0 + Duration::from_secs(6));
    }
    assert_eq!(ed.transform().position, Vec2::new(40.0, 0.0));
    assert_eq!(ArrowKey::from_key_name("ArrowUp"), Some(ArrowKey::Up));
    assert_eq!(ArrowKey::from_key_name("Enter"), None);
}

#[test]
fn zoom_slider_is_live_until_committed() {
    let mut ed = plain(500, 400);
    ed.set_zoom(2.0);
    ed.set_zoom(9.0);
    assert_eq!(ed.transform().scale, MAX_SCALE);
    assert!(!ed.can_undo());
    assert!(ed.commit_zoom());
    assert!(ed.can_undo());
    assert!(!ed.commit_zoom());
}

#[test]
fn aspect_change_and_auto_fit_reset_history() {
    let mut ed = plain(500, 400);
    ed.set_zoom(2.0);
    ed.commit_zoom();
    ed.set_aspect_ratio("3:4");
    assert_eq!(ed.viewport().size(), Size::new(240.0, 320.0));
    assert!((ed.transform().scale - 0.8).abs() < 1e-12);
    assert!(!ed.can_undo());
    assert_eq!(ed.output_size(), (768, 1024));

    ed.set_zoom(3.0);
    ed.commit_zoom();
    ed.auto_fit();
    assert!(!ed.can_undo());
    assert!((ed.transform().scale - 0.8).abs() < 1e-12);
}

#[test]
fn crop_area_stays_inside_image_after_gestures() {
    let mut ed = plain(640, 480);
    let size = ed.image().size();
    ed.set_zoom(3.3);
    ed.pointer_down(1, Point::new(0.0, 0.0));
    ed.pointer_move(1, Point::new(-4000.0, 2500.0));
    ed.pointer_up(1);
    assert!(ed.crop_area().is_within(size));
    ed.set_zoom(0.1);
    let area = ed.crop_area();
    assert!(area.is_within(size));
    assert_eq!(area.width, 640.0);
}

#[test]
fn confirm_renders_fixed_resolution_png() {
    let mut ed = plain(500, 500);
    assert_eq!(ed.output_size(), (1024, 1024));
    let photo = ed.confirm().unwrap();
    assert_eq!((photo.width, photo.height), (1024, 1024));
    assert_eq!(photo.aspect, "1:1");
    let decoded = image::load_from_memory(&photo.png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1024, 1024));

    let preview = ed.render_preview().unwrap();
    assert_eq!((preview.width, preview.height), (320, 320));

    let plain_px = preview.pixel(160, 160).unwrap();
    ed.toggle_enhance();
    assert!(ed.is_enhanced());
    let enhanced_px = ed.render_preview().unwrap().pixel(160, 160).unwrap();
    assert_ne!(plain_px, enhanced_px);
}
