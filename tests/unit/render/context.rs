use super::*;
use crate::{composite::blend::BlendMethod, render::progress::NoProgress};

fn canvas() -> Canvas {
    Canvas::new("ctx", RendDesc::from_size(4, 4))
}

#[test]
fn exhausted_chain_is_the_empty_base_case() {
    let c = canvas();
    let scope = RenderScope::new();
    let ctx = c.context(&scope);
    assert!(ctx.is_empty());
    assert_eq!(ctx.get_color(Point::new(1.0, 1.0)), Color::TRANSPARENT);
    assert_eq!(ctx.get_full_bounding_rect(), Rect::ZERO);
    assert_eq!(ctx.hit_check(Point::new(1.0, 1.0)), None);

    let mut surface = Surface::default();
    let outcome = ctx
        .accelerated_render(&mut surface, 3, &c.rend_desc(), &mut NoProgress)
        .unwrap();
    assert_eq!(outcome, RenderOutcome::Complete);
    assert_eq!((surface.width(), surface.height()), (4, 4));
}

#[test]
fn inactive_layers_are_skipped() {
    let c = canvas()
        .with_layer(Layer::solid_color(Color::RED).with_active(false))
        .with_layer(Layer::rectangle(Point::ZERO, Point::new(2.0, 2.0), Color::BLUE));
    let scope = RenderScope::new();
    let ctx = c.context(&scope);
    assert!(!ctx.is_empty());
    assert_eq!(ctx.get_color(Point::new(1.0, 1.0)), Color::BLUE);
    assert_eq!(ctx.get_full_bounding_rect(), Rect::new(0.0, 0.0, 2.0, 2.0));
}

#[test]
fn off_window_layers_are_culled_unless_straight() {
    let far = || Layer::rectangle(Point::new(10.0, 10.0), Point::new(12.0, 12.0), Color::RED);
    let c = canvas()
        .with_layer(far())
        .with_layer(Layer::solid_color(Color::BLUE));
    let scope = RenderScope::new();
    let mut surface = Surface::default();
    c.context(&scope)
        .accelerated_render(&mut surface, 3, &c.rend_desc(), &mut NoProgress)
        .unwrap();
    assert!(surface.pixels().iter().all(|px| *px == Color::BLUE));

    let straight = canvas()
        .with_layer(far().with_blend(BlendMethod::Straight))
        .with_layer(Layer::solid_color(Color::BLUE));
    let mut surface = Surface::default();
    straight
        .context(&scope)
        .accelerated_render(&mut surface, 3, &straight.rend_desc(), &mut NoProgress)
        .unwrap();
    assert!(surface.pixels().iter().all(|px| *px == Color::TRANSPARENT));
}

#[test]
fn hit_falls_through_faint_layers() {
    let faint = Layer::solid_color(Color::RED).with_amount(0.2);
    let solid = Layer::rectangle(Point::ZERO, Point::new(2.0, 2.0), Color::BLUE);
    let solid_id = solid.id();
    let c = canvas().with_layer(faint).with_layer(solid);
    let scope = RenderScope::new();
    let ctx = c.context(&scope);
    assert_eq!(ctx.hit_check(Point::new(1.0, 1.0)), Some(solid_id));
    assert_eq!(ctx.hit_check(Point::new(3.0, 3.0)), None);
}
