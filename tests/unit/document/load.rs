use super::*;
use crate::foundation::core::{Color, Point, Time};

#[test]
fn fixture_builds_shared_and_inline_canvases() {
    let doc = Document::from_json_str(include_str!("../../data/nested_scene.json")).unwrap();
    let root = doc.instantiate().unwrap();
    assert_eq!(root.id(), "main");
    assert_eq!(root.layer_count(), 3);

    let ids = root.layer_ids();
    let (name, bounds) = root
        .with_layer_ref(ids[0], |l| {
            (l.local_name(Some(&root)), l.as_paste().map(|p| p.bounds()))
        })
        .unwrap();
    assert_eq!(name, "badge");
    assert_eq!(bounds, Some(crate::foundation::core::Rect::new(25.0, 25.0, 75.0, 75.0)));

    let inline_parent = root
        .with_layer_ref(ids[1], |l| {
            let c = l.as_paste().and_then(|p| p.canvas()).unwrap();
            c.validate().unwrap();
            c.handle().parent().map(|p| p.id().to_owned())
        })
        .unwrap();
    assert_eq!(inline_parent.as_deref(), Some("main"));

    assert_eq!(root.get_color(Point::new(50.0, 50.0)), Color::RED);
    assert_eq!(root.get_color(Point::new(50.0, 90.0)), Color::BLUE);
    assert_eq!(root.get_color(Point::new(5.0, 5.0)), Color::TRANSPARENT);
}

#[test]
fn embedded_keyframes_reach_the_root_timeline() {
    let doc = Document::from_json_str(include_str!("../../data/nested_scene.json")).unwrap();
    let root = doc.instantiate().unwrap();
    let times: Vec<_> = root.get_times().into_iter().collect();
    assert_eq!(times, vec![Time::seconds(0.0), Time::seconds(1.0)]);
}

#[test]
fn self_referencing_document_loads() {
    let doc = Document::from_json_str(
        r#"{
            "root": "loop",
            "canvases": {
                "loop": {
                    "rend_desc": {"width": 8, "height": 8, "tl": {"x": 0, "y": 0}, "br": {"x": 8, "y": 8}},
                    "layers": [
                        {"type": "paste_canvas", "canvas": "loop", "zoom": -0.5},
                        {"type": "rectangle", "point1": {"x": 0, "y": 0}, "point2": {"x": 8, "y": 8},
                         "color": {"r": 0.0, "g": 1.0, "b": 0.0, "a": 1.0}}
                    ]
                }
            }
        }"#,
    )
    .unwrap();
    let root = doc.instantiate().unwrap();
    assert_eq!(root.get_color(Point::new(4.0, 4.0)), Color::GREEN);
}
