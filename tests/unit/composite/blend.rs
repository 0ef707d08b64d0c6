use super::*;

const GREY: Color = Color::new(0.5, 0.5, 0.5, 1.0);

#[test]
fn composite_opaque_source_replaces() {
    assert_eq!(Color::blend(Color::RED, GREY, 1.0, BlendMethod::Composite), Color::RED);
}

#[test]
fn composite_onto_transparent_keeps_source() {
    let out = Color::blend(Color::RED, Color::TRANSPARENT, 1.0, BlendMethod::Composite);
    assert_eq!(out, Color::RED);
}

#[test]
fn composite_half_amount_mixes() {
    let out = Color::blend(Color::WHITE, Color::BLACK, 0.5, BlendMethod::Composite);
    assert!((out.r - 0.5).abs() < 1e-6);
    assert!((out.a - 1.0).abs() < 1e-6);
}

#[test]
fn zero_amount_is_noop_for_non_straight_methods() {
    for m in BlendMethod::ALL {
        if m.is_straight() || m == BlendMethod::AlphaOver {
            continue;
        }
        let out = Color::blend(Color::RED, GREY, 0.0, m);
        assert_eq!(out, GREY, "{m:?}");
    }
}

#[test]
fn transparent_source_leaves_destination_unless_straight() {
    let dst = Color::new(0.2, 0.4, 0.6, 0.8);
    for m in BlendMethod::ALL {
        let out = Color::blend(Color::TRANSPARENT, dst, 1.0, m);
        if m.is_straight() {
            assert_eq!(out, Color::TRANSPARENT, "{m:?}");
        } else {
            assert!((out.r - dst.r).abs() < 1e-5, "{m:?}");
            assert!((out.a - dst.a).abs() < 1e-5, "{m:?}");
        }
    }
}

#[test]
fn onto_methods_do_not_paint_on_transparent() {
    for m in BlendMethod::ALL.into_iter().filter(|m| m.is_onto()) {
        let out = Color::blend(Color::RED, Color::TRANSPARENT, 1.0, m);
        assert!(out.a.abs() < 1e-6, "{m:?}");
    }
}

#[test]
fn straight_full_amount_returns_source_exactly() {
    let src = Color::new(0.1, 0.2, 0.3, 0.4);
    assert_eq!(Color::blend(src, GREY, 1.0, BlendMethod::Straight), src);
}

#[test]
fn behind_puts_destination_on_top() {
    assert_eq!(Color::blend(Color::RED, Color::BLUE, 1.0, BlendMethod::Behind), Color::BLUE);
    let out = Color::blend(Color::RED, Color::TRANSPARENT, 1.0, BlendMethod::Behind);
    assert_eq!(out, Color::RED);
}

#[test]
fn arithmetic_methods() {
    let add = Color::blend(GREY, GREY, 1.0, BlendMethod::Add);
    assert!((add.r - 1.0).abs() < 1e-6);
    let sub = Color::blend(GREY, GREY, 1.0, BlendMethod::Subtract);
    assert!(sub.r.abs() < 1e-6);
    let mul = Color::blend(GREY, GREY, 1.0, BlendMethod::Multiply);
    assert!((mul.r - 0.25).abs() < 1e-6);
    let bright = Color::blend(Color::WHITE, GREY, 1.0, BlendMethod::Brighten);
    assert_eq!(bright, Color::WHITE);
    let dark = Color::blend(Color::BLACK, GREY, 1.0, BlendMethod::Darken);
    assert_eq!(dark, Color::BLACK);
}

#[test]
fn alpha_over_cuts_destination() {
    let out = Color::blend(Color::RED, GREY, 1.0, BlendMethod::AlphaOver);
    assert!(out.a.abs() < 1e-6);
}

#[test]
fn serde_names_match_variants() {
    let m: BlendMethod = serde_json::from_str("\"StraightOnto\"").unwrap();
    assert_eq!(m, BlendMethod::StraightOnto);
}
