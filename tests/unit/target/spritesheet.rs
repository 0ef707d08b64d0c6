use super::*;
use crate::render::progress::NoProgress;
use crate::foundation::core::Time;

fn desc(frames: u32) -> RendDesc {
    RendDesc::from_size(2, 2).with_time_range(
        Time::ZERO,
        Time::seconds(f64::from(frames - 1)),
        1.0,
    )
}

fn paint_frame(t: &mut SpritesheetTarget, color: Color) {
    assert!(t.start_frame(&mut NoProgress).unwrap());
    for y in 0..2 {
        t.start_scanline(y).unwrap().fill(color);
        t.end_scanline().unwrap();
    }
    t.end_frame().unwrap();
}

#[test]
fn zero_layout_defaults_to_one_row() {
    let mut t = SpritesheetTarget::new(SheetParams::default());
    t.set_rend_desc(&desc(3)).unwrap();
    assert_eq!((t.params().columns, t.params().rows), (3, 1));
    assert_eq!((t.sheet().width(), t.sheet().height()), (6, 2));
}

#[test]
fn horizontal_fill_wraps_rows() {
    let mut t = SpritesheetTarget::new(SheetParams {
        columns: 2,
        rows: 2,
        ..SheetParams::default()
    });
    t.set_rend_desc(&desc(3)).unwrap();
    for c in [Color::RED, Color::GREEN, Color::BLUE] {
        paint_frame(&mut t, c);
    }
    let s = t.sheet();
    assert_eq!(s.get(0, 0), Some(Color::RED));
    assert_eq!(s.get(2, 0), Some(Color::GREEN));
    assert_eq!(s.get(0, 2), Some(Color::BLUE));
    assert_eq!(s.get(3, 3), Some(Color::TRANSPARENT));
}

#[test]
fn vertical_fill_and_offsets() {
    let mut t = SpritesheetTarget::new(SheetParams {
        columns: 2,
        rows: 2,
        offset_x: 1,
        offset_y: 1,
        direction: SheetDirection::Vertical,
    });
    t.set_rend_desc(&desc(2)).unwrap();
    assert_eq!((t.sheet().width(), t.sheet().height()), (5, 5));
    paint_frame(&mut t, Color::RED);
    paint_frame(&mut t, Color::GREEN);
    let s = t.sheet();
    assert_eq!(s.get(0, 0), Some(Color::TRANSPARENT));
    assert_eq!(s.get(1, 1), Some(Color::RED));
    assert_eq!(s.get(1, 3), Some(Color::GREEN));
    assert_eq!(s.get(3, 1), Some(Color::TRANSPARENT));
}

#[test]
fn rejects_sheets_too_small_or_too_large() {
    let mut small = SpritesheetTarget::new(SheetParams {
        columns: 1,
        rows: 2,
        ..SheetParams::default()
    });
    assert!(small.set_rend_desc(&desc(3)).is_err());

    let mut huge = SpritesheetTarget::new(SheetParams::default());
    let big = RendDesc::from_size(4000, 3000);
    assert!(huge.set_rend_desc(&big).is_err());
}

#[test]
fn extra_frames_are_refused() {
    let mut t = SpritesheetTarget::new(SheetParams {
        columns: 1,
        rows: 1,
        ..SheetParams::default()
    });
    t.set_rend_desc(&desc(1)).unwrap();
    paint_frame(&mut t, Color::RED);
    assert!(t.start_frame(&mut NoProgress).is_err());
}

#[test]
fn oversized_layout_is_rejected_without_overflow() {
    let mut t = SpritesheetTarget::new(SheetParams {
        columns: u32::MAX,
        rows: u32::MAX,
        ..SheetParams::default()
    });
    let err = t.set_rend_desc(&RendDesc::from_size(4000, 3000)).unwrap_err();
    assert!(err.to_string().contains("exceeds"), "{err}");
}
