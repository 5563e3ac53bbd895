use super::*;

fn map() -> DisplacementMap {
    DisplacementMap::generate(Size::new(100.0, 60.0), 16.0, 12.0, 1.0).unwrap()
}

#[test]
fn dimensions_follow_size_and_scale() {
    let m = DisplacementMap::generate(Size::new(10.5, 4.0), 2.0, 3.0, 2.0).unwrap();
    assert_eq!((m.width(), m.height()), (21, 8));
}

#[test]
fn degenerate_inputs_are_rejected() {
    let err = DisplacementMap::generate(Size::new(0.0, 40.0), 4.0, 4.0, 1.0).unwrap_err();
    assert!(matches!(err, MeshWarpError::Validation(_)));
    let err = DisplacementMap::generate(Size::new(0.4, 40.0), 4.0, 4.0, 1.0).unwrap_err();
    assert!(matches!(err, MeshWarpError::Validation(_)));
    assert!(DisplacementMap::generate(Size::new(40.0, 40.0), 4.0, 4.0, 0.0).is_err());
    assert!(DisplacementMap::generate(Size::new(40.0, 40.0), 4.0, -1.0, 1.0).is_err());
    assert!(DisplacementMap::generate(Size::new(f64::NAN, 40.0), 4.0, 4.0, 1.0).is_err());
}

#[test]
fn oversized_maps_are_rejected_before_allocating() {
    let side = f64::from(MAX_MAP_DIMENSION);
    let m = DisplacementMap::generate(Size::new(side, 1.0), 0.0, 0.0, 1.0).unwrap();
    assert_eq!(m.width(), MAX_MAP_DIMENSION);

    for (size, scale) in [
        (Size::new(side + 1.0, 1.0), 1.0),
        (Size::new(1e12, 40.0), 1.0),
        (Size::new(40.0, 40.0), 1e6),
    ] {
        let err = DisplacementMap::generate(size, 4.0, 4.0, scale).unwrap_err();
        assert!(matches!(err, MeshWarpError::Validation(_)), "{size:?} at {scale}");
    }
}

#[test]
fn center_is_neutral_and_edges_push_inward() {
    let m = map();
    let center = m.image().get_pixel(50, 30).0;
    assert_eq!(center, [127, 127, 0, 255]);

    // left edge: inward is +x at full strength
    let left = m.image().get_pixel(0, 30).0;
    assert_eq!(left, [254, 127, 0, 255]);
    // top edge: inward is +y
    let top = m.image().get_pixel(50, 0).0;
    assert_eq!(top, [127, 254, 0, 255]);
    // six points in, half strength
    let near_left = m.image().get_pixel(6, 30).0;
    assert_eq!(near_left[0], 190);
}

#[test]
fn sampling_decodes_and_eases() {
    let m = map();
    let linear = DisplacementBezier::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);

    assert_eq!(m.sample(50.0, 30.0, &linear), Vec2::ZERO);

    let d = m.sample(0.0, 30.0, &linear);
    assert!((d.x - 1.0).abs() < 1e-6);
    assert!(d.y.abs() < 1e-12);

    // out of range coordinates clamp to the border
    assert_eq!(m.sample(-40.0, 30.0, &linear), d);

    let eased = m.sample(6.0, 30.0, &DisplacementBezier::default());
    let raw = m.sample(6.0, 30.0, &linear);
    assert!(eased.x > 0.0 && eased.x < raw.x);
}

#[test]
fn bilinear_sampling_blends_neighbours() {
    let mut img = RgbaImage::from_pixel(2, 1, image::Rgba([127, 127, 0, 255]));
    img.put_pixel(1, 0, image::Rgba([254, 127, 0, 255]));
    let m = DisplacementMap::from_image(img).unwrap();
    let linear = DisplacementBezier::new(1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
    let d = m.sample(0.5, 0.0, &linear);
    assert!((d.x - 0.5).abs() < 1e-6);
}

#[test]
fn png_round_trip() {
    let m = map();
    let path = std::env::temp_dir().join(format!("meshwarp_map_{}.png", std::process::id()));
    m.save_png(&path).unwrap();
    let back = DisplacementMap::open(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(back, m);
}

#[test]
fn empty_image_is_rejected() {
    assert!(DisplacementMap::from_image(RgbaImage::new(0, 3)).is_err());
}
