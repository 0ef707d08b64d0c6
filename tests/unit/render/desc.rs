use super::*;

#[test]
fn from_size_maps_one_unit_per_pixel() {
    let d = RendDesc::from_size(100, 50);
    assert_eq!(d.pw(), 1.0);
    assert_eq!(d.ph(), 1.0);
    assert_eq!(d.rect(), Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(d.pixel_center(0, 0), Point::new(0.5, 0.5));
    d.validate().unwrap();
}

#[test]
fn inverted_axis_has_negative_pixel_size_and_normalized_rect() {
    let d = RendDesc::from_size(20, 20).with_window(Point::new(-10.0, 10.0), Point::new(10.0, -10.0));
    assert_eq!(d.ph(), -1.0);
    assert_eq!(d.rect(), Rect::new(-10.0, -10.0, 10.0, 10.0));
    assert_eq!(d.pixel_center(0, 0), Point::new(-9.5, 9.5));
}

#[test]
fn subwindow_keeps_pixel_size() {
    let mut d = RendDesc::from_size(100, 100).with_window(Point::new(-25.0, -25.0), Point::new(75.0, 75.0));
    d.set_subwindow(25, 25, 50, 50);
    assert_eq!(d.tl, Point::new(0.0, 0.0));
    assert_eq!(d.br, Point::new(50.0, 50.0));
    assert_eq!((d.width, d.height), (50, 50));
    assert_eq!(d.pw(), 1.0);
}

#[test]
fn degenerate_window_is_invalid() {
    let d = RendDesc::from_size(10, 10).with_window(Point::ZERO, Point::new(0.0, 5.0));
    assert!(d.validate().is_err());
    let d = RendDesc::from_size(10, 10).with_time_range(Time::ZERO, Time::ZERO, 0.0);
    assert!(d.validate().is_err());
}

#[test]
fn frame_range_is_inclusive() {
    let d = RendDesc::from_size(4, 4).with_time_range(Time::ZERO, Time::seconds(1.0), 4.0);
    assert_eq!(d.frame_start(), 0);
    assert_eq!(d.frame_end(), 4);
    assert_eq!(d.frame_count(), 5);
    assert_eq!(RendDesc::from_size(4, 4).frame_count(), 1);
}

#[test]
fn json_defaults_fill_optional_fields() {
    let d: RendDesc = serde_json::from_str(
        r#"{"width":8,"height":8,"tl":{"x":0.0,"y":0.0},"br":{"x":8.0,"y":8.0}}"#,
    )
    .unwrap();
    assert_eq!(d.frame_rate, 24.0);
    assert_eq!(d.focus, Point::ZERO);
    assert!(!d.pixel_aspect_locked);
}
