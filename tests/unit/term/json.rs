use super::*;

#[test]
fn special_objects_become_atoms_and_tuples() {
    let v = json!([{ "atom": "x" }, { "tuple": [1, 2.5] }, null, true, "s"]);
    let t = term_from_json(&v).unwrap();
    assert_eq!(
        t,
        Term::List(vec![
            Term::atom("x"),
            Term::tuple(vec![Term::Int(1), Term::Float(2.5)]),
            Term::atom("nil"),
            Term::atom("true"),
            Term::string("s"),
        ])
    );
}

#[test]
fn script_entries_lead_with_atom_names() {
    let v = json!([["create", 4, 4, 1, 3, 128], ["get_image"]]);
    let script = script_from_json(&v).unwrap();
    assert_eq!(script.len(), 2);
    assert_eq!(
        script[1],
        Term::tuple(vec![Term::atom("get_image")])
    );
    match &script[0] {
        Term::Tuple(items) => {
            assert!(items[0].is_atom("create"));
            assert_eq!(items.len(), 6);
        }
        other => panic!("unexpected {other:?}"),
    }

    assert!(script_from_json(&json!({"create": 1})).is_err());
    assert!(script_from_json(&json!([[1, 2]])).is_err());
}

#[test]
fn terms_render_back_to_json() {
    let t = Term::ok_tuple(Term::tuple(vec![Term::Int(4), Term::Int(3)]));
    assert_eq!(
        term_to_json(&t),
        json!({ "tuple": [{ "atom": "ok" }, { "tuple": [4, 3] }] })
    );
    assert_eq!(
        term_to_json(&Term::Binary(vec![0xff, 0xfe])),
        json!({ "binary_len": 2 })
    );
}
