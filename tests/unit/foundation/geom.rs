use super::*;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn empty_rects_vanish_in_union() {
    let r = Rect::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(union(Rect::ZERO, r), r);
    assert_eq!(union(r, Rect::ZERO), r);
    assert_eq!(union(Rect::ZERO, Rect::ZERO), Rect::ZERO);
    assert_eq!(
        union(r, Rect::new(-1.0, 0.0, 2.0, 2.5)),
        Rect::new(-1.0, 0.0, 3.0, 4.0)
    );
}

#[test]
fn intersection_of_disjoint_rects_is_empty() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 0.0, 20.0, 10.0);
    assert!(!intersects(a, b));
    assert_eq!(intersect(a, b), Rect::ZERO);
    assert_eq!(
        intersect(a, Rect::new(5.0, 5.0, 15.0, 15.0)),
        Rect::new(5.0, 5.0, 10.0, 10.0)
    );
    assert_eq!(intersect(a, INFINITE), a);
}

#[test]
fn nan_rect_is_empty() {
    assert!(is_empty(Rect::new(f64::NAN, 0.0, 1.0, 1.0)));
}

#[test]
fn bounding_rect_maps_by_focus_zoom_origin() {
    let r = Rect::new(0.0, 0.0, 50.0, 40.0);
    let focus = Point::new(10.0, 20.0);
    for zoom in [-2.0f64, 0.0, 2.0] {
        for origin in [Point::ZERO, Point::new(10.0, -5.0)] {
            let t = FocusTransform::new(focus, origin, zoom);
            let s = zoom.exp();
            let out = t.rect_to_outer(r);
            let ex0 = (r.x0 - focus.x) * s + origin.x + focus.x;
            let ey0 = (r.y0 - focus.y) * s + origin.y + focus.y;
            let ex1 = (r.x1 - focus.x) * s + origin.x + focus.x;
            let ey1 = (r.y1 - focus.y) * s + origin.y + focus.y;
            assert!((out.x0 - ex0).abs() < 1e-9);
            assert!((out.y0 - ey0).abs() < 1e-9);
            assert!((out.x1 - ex1).abs() < 1e-9);
            assert!((out.y1 - ey1).abs() < 1e-9);
        }
    }
}

#[test]
fn inner_outer_roundtrip() {
    let t = FocusTransform::new(Point::new(3.0, -7.0), Point::new(10.0, -5.0), 1.3);
    for p in [Point::ZERO, Point::new(12.5, 99.0), Point::new(-40.0, 0.25)] {
        assert!(close(t.to_outer(t.to_inner(p)), p));
        assert!(close(t.to_inner(t.to_outer(p)), p));
    }
}

#[test]
fn empty_rect_stays_empty_under_transform() {
    let t = FocusTransform::new(Point::ZERO, Point::new(5.0, 5.0), 0.0);
    assert_eq!(t.rect_to_outer(Rect::ZERO), Rect::ZERO);
    assert_eq!(t.rect_to_outer(INFINITE), INFINITE);
}
