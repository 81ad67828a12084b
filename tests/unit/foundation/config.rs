use super::*;

#[test]
fn partial_json_keeps_defaults() {
    let opts = BridgeOpts::from_json_str(r#"{ "jpeg_quality": 80 }"#).unwrap();
    assert_eq!(opts.jpeg_quality, 80);
    assert_eq!(opts.max_elements, BridgeOpts::default().max_elements);
    assert_eq!(opts.max_handles, BridgeOpts::default().max_handles);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(BridgeOpts::from_json_str(r#"{ "jpeg_quality": 0 }"#).is_err());
    assert!(BridgeOpts::from_json_str(r#"{ "max_elements": 0 }"#).is_err());
    assert!(BridgeOpts::from_json_str("not json").is_err());
}
