use super::*;

#[test]
fn set_wh_resets_to_transparent() {
    let mut s = Surface::new(2, 2).unwrap();
    s.fill(Color::RED);
    s.set_wh(3, 1).unwrap();
    assert_eq!(s.width(), 3);
    assert_eq!(s.height(), 1);
    assert!(s.pixels().iter().all(|c| *c == Color::TRANSPARENT));
}

#[test]
fn oversized_surface_is_an_error() {
    let mut s = Surface::default();
    assert!(s.set_wh(u32::MAX, u32::MAX).is_err());
}

#[test]
fn out_of_range_access_is_ignored() {
    let mut s = Surface::new(2, 2).unwrap();
    s.set(5, 0, Color::RED);
    assert_eq!(s.get(5, 0), None);
    assert!(s.row(9).is_empty());
}

#[test]
fn blit_places_source_at_pen_offset() {
    let mut dst = Surface::new(4, 4).unwrap();
    let mut src = Surface::new(2, 2).unwrap();
    src.fill(Color::RED);

    let mut pen = dst.get_pen(1, 2);
    src.blit_to(&mut pen);

    for y in 0..4 {
        for x in 0..4 {
            let expect = if (1..3).contains(&x) && (2..4).contains(&y) {
                Color::RED
            } else {
                Color::TRANSPARENT
            };
            assert_eq!(dst.get(x, y), Some(expect), "({x},{y})");
        }
    }
}

#[test]
fn blit_clips_negative_and_overhanging_positions() {
    let mut dst = Surface::new(2, 2).unwrap();
    let mut src = Surface::new(3, 3).unwrap();
    src.fill(Color::BLUE);
    let mut pen = dst.get_pen(-1, 1);
    src.blit_to(&mut pen);
    assert_eq!(dst.get(0, 0), Some(Color::TRANSPARENT));
    assert_eq!(dst.get(0, 1), Some(Color::BLUE));
    assert_eq!(dst.get(1, 1), Some(Color::BLUE));
}

#[test]
fn pen_alpha_and_blend_are_applied() {
    let mut dst = Surface::new(1, 1).unwrap();
    dst.fill(Color::BLACK);
    let mut src = Surface::new(1, 1).unwrap();
    src.fill(Color::WHITE);

    let mut pen = dst.get_pen(0, 0);
    pen.set_alpha(0.5);
    pen.set_blend_method(BlendMethod::Composite);
    assert_eq!(pen.alpha(), 0.5);
    src.blit_to(&mut pen);

    let px = dst.get(0, 0).unwrap();
    assert!((px.r - 0.5).abs() < 1e-6);
    assert!((px.a - 1.0).abs() < 1e-6);
}

#[test]
fn rgba8_export_is_straight_alpha() {
    let mut s = Surface::new(1, 1).unwrap();
    s.fill(Color::new(1.0, 0.0, 0.0, 0.5));
    assert_eq!(s.to_rgba8(), vec![255, 0, 0, 128]);
    s.flatten_onto(Color::WHITE);
    assert_eq!(s.to_rgba8(), vec![255, 128, 128, 255]);
}
