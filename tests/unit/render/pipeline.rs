use super::*;
use crate::{
    layer::Layer,
    render::{desc::RendDesc, progress::NoProgress},
    target::FrameBufferTarget,
};

fn half_red(desc: RendDesc) -> Canvas {
    Canvas::new("scene", desc).with_layer(
        Layer::rectangle(Point::ZERO, Point::new(2.0, 4.0), Color::RED).with_amount(0.5),
    )
}

#[test]
fn default_settings() {
    let s = RenderSettings::default();
    assert_eq!(s.quality, 3);
    assert_eq!(s.background, None);
}

#[test]
fn render_frame_sizes_surface_from_descriptor() {
    let canvas = half_red(RendDesc::from_size(4, 4)).into_handle();
    let frame = render_frame(&canvas, Time::ZERO, &RenderSettings::default(), &mut NoProgress).unwrap();
    assert_eq!(frame.outcome, RenderOutcome::Complete);
    assert_eq!((frame.surface.width(), frame.surface.height()), (4, 4));
    assert!((frame.surface.get(0, 0).unwrap().a - 0.5).abs() < 1e-6);
    assert_eq!(frame.surface.get(3, 0), Some(Color::TRANSPARENT));
}

#[test]
fn background_flattens_result() {
    let canvas = half_red(RendDesc::from_size(4, 4)).into_handle();
    let settings = RenderSettings {
        background: Some(Color::WHITE),
        ..RenderSettings::default()
    };
    let frame = render_frame(&canvas, Time::ZERO, &settings, &mut NoProgress).unwrap();
    assert_eq!(frame.surface.get(3, 3), Some(Color::WHITE));
    let inside = frame.surface.get(0, 0).unwrap();
    assert_eq!(inside.a, 1.0);
    assert!((inside.g - 0.5).abs() < 1e-6);
}

#[test]
fn invalid_descriptor_is_an_error() {
    let desc = RendDesc::from_size(4, 4).with_window(Point::ZERO, Point::new(0.0, 4.0));
    let canvas = half_red(desc).into_handle();
    assert!(render_frame(&canvas, Time::ZERO, &RenderSettings::default(), &mut NoProgress).is_err());
}

#[test]
fn render_to_target_walks_the_frame_range() {
    let desc = RendDesc::from_size(4, 4).with_time_range(Time::ZERO, Time::seconds(0.5), 4.0);
    let canvas = half_red(desc).into_handle();
    let mut target = FrameBufferTarget::new();
    let outcome =
        render_to_target(&canvas, &mut target, &RenderSettings::default(), &mut NoProgress).unwrap();
    assert_eq!(outcome, RenderOutcome::Complete);
    assert!(target.is_finished());
    assert_eq!(target.frames().len(), 3);
    assert!(target.frames().iter().all(|f| (f.get(1, 1).unwrap().a - 0.5).abs() < 1e-6));
    assert!(canvas.get_time().is_equal(Time::seconds(0.5)));
}

#[test]
fn hit_test_sets_time_first() {
    let layer = Layer::rectangle(Point::ZERO, Point::new(2.0, 2.0), Color::RED);
    let id = layer.id();
    let canvas = Canvas::new("scene", RendDesc::from_size(4, 4))
        .with_layer(layer)
        .into_handle();
    assert_eq!(hit_test(&canvas, Time::seconds(1.0), Point::new(1.0, 1.0)), Some(id));
    assert_eq!(hit_test(&canvas, Time::seconds(1.0), Point::new(3.0, 3.0)), None);
    assert_eq!(canvas.get_time(), Time::seconds(1.0));
}
