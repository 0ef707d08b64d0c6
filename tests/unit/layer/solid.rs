use super::*;
use crate::{composite::blend::BlendMethod, layer::layer::LayerId};

fn comp(amount: f32, blend: BlendMethod) -> Composite {
    Composite {
        id: LayerId(2),
        amount,
        blend,
        time: Time::ZERO,
    }
}

#[test]
fn solid_straight_fill_replaces_everything() {
    let mut s = Surface::new(2, 2).unwrap();
    s.fill(Color::BLUE);
    SolidColor::new(Color::RED).paint(&mut s, &comp(1.0, BlendMethod::Straight));
    assert!(s.pixels().iter().all(|c| *c == Color::RED));
}

#[test]
fn partial_amount_blends_over_existing_pixels() {
    let mut s = Surface::new(2, 1).unwrap();
    s.fill(Color::BLUE);
    SolidColor::new(Color::RED).paint(&mut s, &comp(0.5, BlendMethod::Composite));
    for px in s.pixels() {
        assert!((px.r - 0.5).abs() < 1e-6 && (px.b - 0.5).abs() < 1e-6);
        assert_eq!(px.a, 1.0);
    }
}

#[test]
fn default_is_opaque_black() {
    let s = SolidColor::default();
    assert_eq!(s.color_at(Time::seconds(3.0)), Color::BLACK);
    assert!(s.times().is_empty());
    s.validate().unwrap();
}
