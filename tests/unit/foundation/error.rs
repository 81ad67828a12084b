use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BridgeError::bad_argument("x")
            .to_string()
            .contains("bad argument:")
    );
    assert!(
        BridgeError::invalid_handle("x")
            .to_string()
            .contains("invalid handle:")
    );
    assert!(
        BridgeError::allocation("x")
            .to_string()
            .contains("allocation failure:")
    );
    assert!(
        BridgeError::script_incomplete("x")
            .to_string()
            .contains("script incomplete:")
    );
}

#[test]
fn library_message_is_passed_through_verbatim() {
    let err = BridgeError::library("not an RGB image");
    assert_eq!(err.to_string(), "not an RGB image");
    assert_eq!(
        err.to_term(),
        Term::error_tuple(Term::tuple(vec![
            Term::atom("library"),
            Term::string("not an RGB image"),
        ]))
    );
}

#[test]
fn type_mismatch_names_both_kinds() {
    let err = BridgeError::TypeMismatch {
        expected: ResourceKind::Display,
        found: ResourceKind::Image,
    };
    let msg = err.to_string();
    assert!(msg.contains("display"));
    assert!(msg.contains("image"));
    assert_eq!(err.kind_atom(), "type_mismatch");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BridgeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind_atom(), "other");
}
