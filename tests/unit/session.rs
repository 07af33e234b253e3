use std::io::Cursor;

use super::*;
use crate::generate::PassthroughService;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    solid_png(width, height, [30, 120, 220, 255])
}

fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn wizard() -> Wizard {
    Wizard::new(
        BadgeRenderer::new(None).unwrap(),
        Customization::default(),
        1000,
    )
}

fn at_style_step() -> Wizard {
    let mut wz = wizard();
    wz.select_file(&png_bytes(400, 300), "image/png", &FaceDetection::Unavailable)
        .unwrap();
    wz.confirm_crop().unwrap();
    wz
}

struct Offline;

impl GenerationService for Offline {
    fn generate(&self, _request: &GenerationRequest) -> HaloResult<GeneratedImage> {
        Err(HaloError::generation("service unreachable"))
    }
}

#[test]
fn steps_are_numbered_from_one() {
    assert_eq!(WizardStep::Upload.index(), 1);
    assert_eq!(WizardStep::Style.index(), 2);
    assert_eq!(WizardStep::Customize.index(), 3);
    assert_eq!(WizardStep::Download.index(), 4);
}

#[test]
fn rejected_uploads_keep_the_wizard_on_upload() {
    let mut wz = wizard();
    let err = wz
        .select_file(&png_bytes(8, 8), "image/gif", &FaceDetection::Unavailable)
        .unwrap_err();
    assert!(matches!(err, HaloError::Upload(_)));
    assert!(wz.last_error().unwrap().starts_with("upload rejected:"));
    assert!(wz.editor().is_none());

    assert!(
        wz.select_file(b"not an image", "image/png", &FaceDetection::Unavailable)
            .is_err()
    );
    assert!(wz.editor().is_none());
    assert_eq!(wz.step(), WizardStep::Upload);
}

#[test]
fn cancel_closes_the_editor_without_moving_on() {
    let mut wz = wizard();
    wz.select_file(&png_bytes(50, 50), "image/png", &FaceDetection::Unavailable)
        .unwrap();
    assert!(wz.last_error().is_none());
    wz.cancel_edit();
    assert!(wz.editor().is_none());
    assert_eq!(wz.step(), WizardStep::Upload);
    assert!(wz.confirm_crop().is_err());
}

#[test]
fn confirmed_crop_moves_to_style() {
    let wz = at_style_step();
    assert_eq!(wz.step(), WizardStep::Style);
    assert!(wz.editor().is_none());
    let photo = wz.cropped().unwrap();
    assert_eq!((photo.width, photo.height), (1024, 1024));
    assert_eq!(wz.aspect(), "1:1");
    assert_eq!(wz.selected_style().id, "classic");
}

#[test]
fn crop_aspect_carries_into_export_canvas() {
    let mut wz = wizard();
    wz.select_file(&png_bytes(400, 300), "image/png", &FaceDetection::Unavailable)
        .unwrap();
    wz.editor_mut().unwrap().set_aspect_ratio("4:3");
    wz.confirm_crop().unwrap();
    assert_eq!(wz.aspect(), "4:3");
    assert_eq!(wz.export_canvas().unwrap(), Canvas::new(1000, 750).unwrap());
}

#[test]
fn only_one_generation_at_a_time() {
    let mut wz = at_style_step();
    let (ticket, req) = wz.begin_generation().unwrap();
    assert_eq!(req.mime, "image/png");
    assert_eq!(req.prompt, wz.selected_style().prompt);
    assert!(wz.is_generating());
    assert!(wz.begin_generation().is_err());

    let done = wz.finish_generation(ticket, PassthroughService.generate(&req));
    assert!(done.unwrap());
    assert!(!wz.is_generating());

    // Settling the same ticket twice is a no-op.
    let again = wz.finish_generation(ticket, Err(HaloError::generation("late")));
    assert!(!again.unwrap());
    assert_eq!(wz.step(), WizardStep::Customize);
    assert!(wz.last_error().is_none());
}

#[test]
fn superseded_result_is_dropped() {
    let mut wz = wizard();
    wz.select_file(
        &solid_png(40, 40, [255, 0, 0, 255]),
        "image/png",
        &FaceDetection::Unavailable,
    )
    .unwrap();
    wz.confirm_crop().unwrap();
    let (first, first_req) = wz.begin_generation().unwrap();

    wz.select_file(
        &solid_png(40, 40, [0, 0, 255, 255]),
        "image/png",
        &FaceDetection::Unavailable,
    )
    .unwrap();
    assert!(!wz.is_generating());
    wz.confirm_crop().unwrap();
    let (second, second_req) = wz.begin_generation().unwrap();
    assert_ne!(first, second);

    let applied = wz
        .finish_generation(first, PassthroughService.generate(&first_req))
        .unwrap();
    assert!(!applied);
    assert!(wz.generated_image().is_none());
    assert_eq!(wz.step(), WizardStep::Style);
    assert!(wz.is_generating());

    let applied = wz
        .finish_generation(second, PassthroughService.generate(&second_req))
        .unwrap();
    assert!(applied);
    assert_eq!(wz.step(), WizardStep::Customize);
    let img = wz.generated_image().unwrap();
    let center = (((img.height / 2) * img.width + img.width / 2) * 4) as usize;
    assert_eq!(&img.rgba8_premul[center..center + 4], &[0, 0, 255, 255]);
}

#[test]
fn reset_drops_a_pending_result() {
    let mut wz = at_style_step();
    let (ticket, req) = wz.begin_generation().unwrap();
    wz.reset();
    assert!(!wz.is_generating());

    let applied = wz
        .finish_generation(ticket, PassthroughService.generate(&req))
        .unwrap();
    assert!(!applied);
    assert_eq!(wz.step(), WizardStep::Upload);
    assert!(wz.generated_image().is_none());
}

#[test]
fn failed_generation_stays_on_style_and_can_retry() {
    let mut wz = at_style_step();
    assert!(wz.generate(&Offline).is_err());
    assert_eq!(wz.step(), WizardStep::Style);
    assert!(!wz.is_generating());
    assert!(wz.last_error().unwrap().contains("service unreachable"));
    assert!(wz.cropped().is_some());

    wz.select_style("modern").unwrap();
    assert!(wz.select_style("nope").is_err());
    assert!(wz.select_style("vintage").is_err());
    assert_eq!(wz.selected_style().id, "modern");

    wz.generate(&PassthroughService).unwrap();
    assert_eq!(wz.step(), WizardStep::Customize);
    assert!(wz.last_error().is_none());
}

#[test]
fn undecodable_result_is_a_generation_error() {
    let mut wz = at_style_step();
    let (ticket, _) = wz.begin_generation().unwrap();
    let err = wz
        .finish_generation(ticket, Ok(GeneratedImage {
            bytes: b"garbage".to_vec(),
            mime: "image/png".to_string(),
        }))
        .unwrap_err();
    assert!(matches!(err, HaloError::Generation(_)));
    assert_eq!(wz.step(), WizardStep::Style);
}

#[test]
fn new_result_starts_a_fresh_badge_session() {
    let mut wz = at_style_step();
    wz.generate(&PassthroughService).unwrap();
    wz.badge_mut().set_show_badge(true);
    assert!(wz.badge().can_undo());

    let (ticket, _) = wz.begin_generation().unwrap();
    let result = PassthroughService.generate(&GenerationRequest {
        bytes: png_bytes(64, 64),
        mime: "image/png".to_string(),
        prompt: String::new(),
    });
    assert!(wz.finish_generation(ticket, result).unwrap());
    assert!(!wz.badge().can_undo());
    assert!(!wz.badge().customization().show_badge);
    assert_eq!(wz.generated_image().unwrap().width, 64);
}

#[test]
fn export_renders_the_current_customization() {
    let mut wz = at_style_step();
    assert!(wz.proceed_to_download().is_err());
    assert!(wz.export().is_err());

    wz.generate(&PassthroughService).unwrap();
    let preview = wz.render_preview().unwrap();
    assert_eq!(preview.pixel(0, 0), Some([0, 0, 0, 0]));

    wz.proceed_to_download().unwrap();
    assert_eq!(wz.step(), WizardStep::Download);
    let out = wz.export().unwrap();
    assert_eq!(out.filename, "linkedin-profile.png");
    assert_eq!((out.width, out.height), (1000, 1000));

    let decoded = image::load_from_memory(&out.png).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(decoded.get_pixel(500, 500).0, [30, 120, 220, 255]);
}

#[test]
fn reset_returns_to_an_empty_upload_step() {
    let mut wz = wizard();
    wz.select_file(&png_bytes(40, 30), "image/png", &FaceDetection::Unavailable)
        .unwrap();
    wz.editor_mut().unwrap().set_aspect_ratio("16:9");
    wz.confirm_crop().unwrap();
    wz.generate(&PassthroughService).unwrap();

    wz.reset();
    assert_eq!(wz.step(), WizardStep::Upload);
    assert_eq!(wz.aspect(), "1:1");
    assert!(wz.cropped().is_none());
    assert!(wz.generated_image().is_none());
    assert!(wz.last_error().is_none());
}
