use super::*;
use crate::{
    composite::blend::BlendMethod,
    layer::{layer::LayerId, params},
};

fn comp(amount: f32, blend: BlendMethod) -> Composite {
    Composite {
        id: LayerId(1),
        amount,
        blend,
        time: Time::ZERO,
    }
}

fn painted(quality: u8, blend: BlendMethod, amount: f32, base: Color) -> Surface {
    let rect = Rectangle::new(Point::new(0.5, 0.5), Point::new(2.0, 2.0), Color::RED);
    let mut s = Surface::new(4, 4).unwrap();
    s.fill(base);
    rect.paint(&mut s, &RendDesc::from_size(4, 4), quality, &comp(amount, blend));
    s
}

#[test]
fn soft_edges_scale_by_covered_area() {
    let s = painted(3, BlendMethod::Composite, 1.0, Color::TRANSPARENT);
    let corner = s.get(0, 0).unwrap();
    assert_eq!(corner.r, 1.0);
    assert!((corner.a - 0.25).abs() < 1e-6);
    assert_eq!(s.get(1, 1), Some(Color::RED));
    assert!((s.get(1, 0).unwrap().a - 0.5).abs() < 1e-6);
    assert_eq!(s.get(3, 3), Some(Color::TRANSPARENT));
}

#[test]
fn hard_edges_sample_pixel_centers() {
    let s = painted(HARD_EDGE_QUALITY, BlendMethod::Composite, 1.0, Color::TRANSPARENT);
    assert_eq!(s.get(0, 0), Some(Color::RED));
    assert_eq!(s.get(1, 1), Some(Color::RED));
    assert_eq!(s.get(2, 2), Some(Color::TRANSPARENT));
}

#[test]
fn straight_blend_clears_outside_the_shape() {
    let s = painted(HARD_EDGE_QUALITY, BlendMethod::Straight, 0.5, Color::BLUE);
    let outside = s.get(3, 3).unwrap();
    assert_eq!(outside.b, 1.0);
    assert!((outside.a - 0.5).abs() < 1e-6);

    let kept = painted(HARD_EDGE_QUALITY, BlendMethod::Composite, 0.5, Color::BLUE);
    assert_eq!(kept.get(3, 3), Some(Color::BLUE));
}

#[test]
fn corners_in_any_order_describe_the_same_rect() {
    let r = Rectangle::new(Point::new(2.0, 2.0), Point::ZERO, Color::GREEN);
    assert_eq!(r.rect_at(Time::ZERO), Rect::new(0.0, 0.0, 2.0, 2.0));
    assert_eq!(r.color_at(Time::ZERO, Point::new(1.0, 1.0)), Some(Color::GREEN));
    assert_eq!(r.color_at(Time::ZERO, Point::new(3.0, 1.0)), None);
}

#[test]
fn params_round_trip_through_table() {
    let mut r = Rectangle::default();
    let set = params::lookup(&RECTANGLE_PARAMS, "point2").unwrap().set.unwrap();
    set(&mut r, ParamValue::Point(Point::new(5.0, 6.0))).unwrap();
    assert_eq!(r.rect_at(Time::ZERO), Rect::new(0.0, 0.0, 5.0, 6.0));
    assert!(set(&mut r, ParamValue::Bool(true)).is_err());
}
