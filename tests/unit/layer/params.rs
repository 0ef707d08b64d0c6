use super::*;

#[test]
fn conversions_check_types() {
    assert_eq!(ParamValue::Real(0.5).into_real("amount").unwrap(), 0.5);
    assert!(ParamValue::Bool(true).into_real("amount").is_err());
    assert!(ParamValue::Real(f64::NAN).into_real("zoom").is_err());
    assert_eq!(
        ParamValue::Real(1.5).into_time("time_offset").unwrap(),
        Time::seconds(1.5)
    );
    assert!(ParamValue::Point(Point::new(f64::INFINITY, 0.0))
        .into_point("origin")
        .is_err());
}

#[test]
fn mismatch_message_names_both_types() {
    let err = ParamValue::Color(Color::RED).into_bool("children_lock").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("children_lock"));
    assert!(msg.contains("bool"));
    assert!(msg.contains("color"));
}
