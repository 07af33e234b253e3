use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn viewport_sizes_follow_aspect() {
    assert_eq!(Viewport::for_aspect(1.0).size(), Size::new(320.0, 320.0));
    assert_eq!(Viewport::for_aspect(0.75).size(), Size::new(240.0, 320.0));
    let wide = Viewport::for_aspect(16.0 / 9.0).size();
    assert_eq!(wide.width, 320.0);
    assert!(approx(wide.height, 180.0));
    assert!(Viewport::new(Size::new(0.0, 10.0)).is_err());
}

#[test]
fn fit_to_cover_covers_with_one_tight_axis() {
    let images = [
        Size::new(2000.0, 2000.0),
        Size::new(500.0, 300.0),
        Size::new(300.0, 900.0),
        Size::new(64.0, 64.0),
    ];
    for ratio in [1.0, 4.0 / 3.0, 16.0 / 9.0, 0.75, 9.0 / 16.0] {
        let vp = Viewport::for_aspect(ratio);
        let v = vp.size();
        for img in images {
            let t = vp.fit_to_cover(img);
            assert_eq!(t.position, Vec2::ZERO);
            let (sw, sh) = (img.width * t.scale, img.height * t.scale);
            assert!(sw >= v.width - 1e-9 && sh >= v.height - 1e-9);
            assert!(approx(sw, v.width) || approx(sh, v.height));
        }
    }
}

#[test]
fn square_fit_crops_the_whole_square_image() {
    let vp = Viewport::for_aspect(1.0);
    let img = Size::new(2000.0, 2000.0);
    let t = vp.fit_to_cover(img);
    assert!(approx(t.scale, 0.16));
    let area = vp.crop_area(img, t).clamped_to(img);
    assert!(approx(area.x, 0.0) && approx(area.y, 0.0));
    assert!(approx(area.width, 2000.0) && approx(area.height, 2000.0));
    assert!(area.is_within(img));
}

#[test]
fn clamping_keeps_crop_inside_image() {
    let vp = Viewport::for_aspect(1.0);
    let img = Size::new(800.0, 600.0);
    let t = TransformState::new(1.0, Vec2::new(5000.0, -5000.0)).unwrap();
    let clamped = vp.clamp(img, t);
    assert_eq!(clamped.position, Vec2::new(240.0, -140.0));

    let area = vp.crop_area(img, clamped);
    assert!(area.is_within(img));
    assert!(approx(area.x, 0.0));
    assert!(approx(area.y + area.height, 600.0));
}

#[test]
fn zoomed_out_crop_is_reported_as_intersection() {
    let vp = Viewport::for_aspect(1.0);
    let img = Size::new(400.0, 400.0);
    let t = vp.clamp(img, TransformState::identity().with_scale(0.4));
    assert_eq!(t.position, Vec2::ZERO);

    let raw = vp.crop_area(img, t);
    assert!(raw.x < 0.0 && raw.width > 400.0);
    let area = raw.clamped_to(img);
    assert_eq!(area, CropArea { x: 0.0, y: 0.0, width: 400.0, height: 400.0 });
}

#[test]
fn disjoint_area_collapses_to_empty() {
    let img = Size::new(10.0, 10.0);
    let a = CropArea { x: 20.0, y: -30.0, width: 5.0, height: 5.0 }.clamped_to(img);
    assert_eq!(a.width, 0.0);
    assert_eq!(a.height, 0.0);
    assert!(a.is_within(img));
}
