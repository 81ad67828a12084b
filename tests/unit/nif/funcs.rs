use super::*;

fn ints(v: &[i64]) -> Vec<Term> {
    v.iter().map(|&i| Term::Int(i)).collect()
}

fn with_handle(h: &Term, rest: Vec<Term>) -> Vec<Term> {
    let mut args = vec![h.clone()];
    args.extend(rest);
    args
}

/// Unwrap `{:ok, handle}` into the handle term.
fn ok_handle(out: Term) -> Term {
    match out {
        Term::Tuple(mut items) if items.len() == 2 && items[0].is_atom("ok") => {
            let h = items.pop().unwrap();
            assert!(matches!(h, Term::Resource(_)), "expected handle, got {h:?}");
            h
        }
        other => panic!("expected {{:ok, handle}}, got {other:?}"),
    }
}

fn create(b: &Bridge, w: i64, h: i64, c: i64, v: i64) -> Term {
    ok_handle(b.call("create", &ints(&[w, h, 1, c, v])))
}

fn pixels(b: &Bridge, h: &Term) -> Vec<u8> {
    b.snapshot::<Image>(h).unwrap().data().to_vec()
}

fn u1_layout(nchw: bool, bgr: bool) -> Vec<Term> {
    vec![
        Term::atom("u1"),
        Term::atom("range"),
        Term::tuple(vec![]),
        Term::bool(nchw),
        Term::bool(bgr),
    ]
}

#[test]
fn function_names_are_unique() {
    let mut seen = std::collections::HashSet::new();
    for name in names() {
        assert!(seen.insert(name), "duplicate {name}");
        assert!(lookup(name).is_some());
    }
    assert!(seen.contains("display_mouse_x"));
    assert!(lookup("Create").is_none());
}

#[test]
fn zero_image_to_bin_is_48_zero_bytes() {
    let b = Bridge::new();
    let h = create(&b, 4, 4, 3, 0);
    let out = b.call("to_bin", &with_handle(&h, u1_layout(false, false)));
    assert_eq!(
        out,
        Term::tuple(vec![
            Term::ok(),
            Term::tuple(ints(&[4, 4, 3])),
            Term::Binary(vec![0; 48]),
        ])
    );
}

#[test]
fn gray_of_four_channels_is_a_library_error() {
    let b = Bridge::new();
    let mut args = vec![Term::Binary(vec![0, 85, 170, 255])];
    args.extend(ints(&[1, 1, 1, 4]));
    args.push(Term::atom("u1"));
    let h = ok_handle(b.call("create_from_bin", &args));
    let out = b.call("get_gray", &with_handle(&h, ints(&[0])));
    assert_eq!(
        out,
        Term::error_tuple(Term::tuple(vec![
            Term::atom("library"),
            Term::string("not an RGB image"),
        ]))
    );
}

#[test]
fn bgr_swaps_bytes_zero_and_two() {
    let b = Bridge::new();
    let h = create(&b, 2, 1, 3, 0);
    for (c, v) in [(0, 10), (1, 20), (2, 30)] {
        let mut args = vec![Term::Int(v), h.clone()];
        args.extend(ints(&[0, 0, 0, c]));
        b.try_call("set", &args).unwrap();
    }
    let blob = |bgr| match b.call("to_bin", &with_handle(&h, u1_layout(false, bgr))) {
        Term::Tuple(items) => items[2].clone(),
        other => panic!("{other:?}"),
    };
    assert_eq!(blob(false), Term::Binary(vec![10, 20, 30, 0, 0, 0]));
    assert_eq!(blob(true), Term::Binary(vec![30, 20, 10, 0, 0, 0]));
}

#[test]
fn in_place_functions_answer_their_first_argument() {
    let b = Bridge::new();
    let h = create(&b, 3, 2, 1, 0);
    assert_eq!(b.call("fill", &with_handle(&h, ints(&[9]))), h);
    assert_eq!(b.call("mirror", &with_handle(&h, vec![Term::atom("x")])), h);
    assert_eq!(b.call("resize", &with_handle(&h, ints(&[6, 4]))), h);
    assert_eq!(b.call("shape", &[h.clone()]), Term::tuple(ints(&[6, 4, 1, 1])));
    assert_eq!(b.call("size", &[h.clone()]), Term::Int(24));
    assert_eq!(b.call("clear", &[h.clone()]), h);
    assert_eq!(b.call("size", &[h.clone()]), Term::Int(0));
    assert_eq!(b.stats().live, 1);
}

#[test]
fn producing_functions_register_new_handles() {
    let b = Bridge::new();
    let h = create(&b, 3, 1, 1, 100);
    let inv = ok_handle(b.call("get_invert", &[h.clone()]));
    assert_ne!(inv, h);
    assert_eq!(pixels(&b, &inv), vec![155; 3]);
    assert_eq!(pixels(&b, &h), vec![100; 3]);

    let thr = ok_handle(b.call(
        "get_threshold",
        &with_handle(&h, vec![Term::Int(50), Term::atom("false"), Term::atom("false")]),
    ));
    assert_eq!(pixels(&b, &thr), vec![1; 3]);

    let crop = ok_handle(b.call("get_crop", &with_handle(&h, ints(&[1, 0, 0, 0, 2, 0, 0, 0, 0]))));
    assert_eq!(pixels(&b, &crop), vec![100, 100]);

    let dup = ok_handle(b.call("duplicate", &[h.clone()]));
    assert_eq!(pixels(&b, &dup), pixels(&b, &h));
    assert_eq!(b.stats().live, 5);
}

#[test]
fn wrong_kind_is_a_type_mismatch_term() {
    let b = Bridge::new();
    let img = create(&b, 1, 1, 3, 0);
    let disp = ok_handle(b.call(
        "display_create",
        &[
            img.clone(),
            Term::string("t"),
            Term::Int(0),
            Term::atom("false"),
            Term::atom("true"),
        ],
    ));
    assert!(matches!(
        b.try_call("fill", &with_handle(&disp, ints(&[1]))),
        Err(BridgeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        b.try_call("display_is_closed", &[img]),
        Err(BridgeError::TypeMismatch { .. })
    ));
    assert_eq!(b.call("display_is_closed", &[disp.clone()]), Term::bool(true));
    assert_eq!(b.call("display_button", &[disp.clone()]), Term::Int(0));
    assert_eq!(b.call("display_wait_time", &with_handle(&disp, ints(&[5]))), disp);
}

#[test]
fn handles_wrapped_in_maps_are_accepted() {
    let b = Bridge::new();
    let h = create(&b, 2, 2, 1, 3);
    let wrapped = Term::Map(vec![(Term::atom("handle"), h)]);
    assert_eq!(b.call("size", &[wrapped]), Term::Int(4));
}

#[test]
fn self_referencing_calls_do_not_deadlock() {
    let b = Bridge::new();
    let h = create(&b, 2, 1, 1, 80);
    assert_eq!(b.call("blend", &[h.clone(), h.clone(), Term::Float(0.5)]), h);
    assert_eq!(b.call("assign", &[h.clone(), h.clone()]), h);
    assert_eq!(pixels(&b, &h), vec![80, 80]);
}

#[test]
fn create_list_checks_length() {
    let b = Bridge::new();
    let mut args = ints(&[2, 1, 1, 1]);
    args.push(Term::List(ints(&[7, 8])));
    let h = ok_handle(b.call("create_list", &args));
    assert_eq!(pixels(&b, &h), vec![7, 8]);

    args[4] = Term::List(ints(&[7]));
    assert!(matches!(
        b.try_call("create_list", &args),
        Err(BridgeError::BadArgument(_))
    ));
    args[4] = Term::List(ints(&[7, 300]));
    assert!(b.try_call("create_list", &args).is_err());
}

#[test]
fn transfer_accepts_pairs_or_a_map() {
    let b = Bridge::new();
    let mut src_args = ints(&[3, 1, 1, 1]);
    src_args.push(Term::List(ints(&[10, 20, 30])));
    let src = ok_handle(b.call("create_list", &src_args));
    let pos = |x: i64| Term::List(vec![Term::Int(x)]);
    let pairs = Term::List(vec![
        Term::tuple(vec![pos(0), pos(2)]),
        Term::tuple(vec![pos(2), pos(0)]),
    ]);

    let dst = create(&b, 3, 1, 1, 0);
    let mut args = vec![dst.clone(), src.clone(), pairs.clone()];
    args.extend(ints(&[0, 0, 0]));
    assert_eq!(b.call("transfer", &args), dst);
    assert_eq!(pixels(&b, &dst), vec![30, 0, 10]);

    let map = ok_handle(b.call("create_map", &[pairs]));
    let dst2 = create(&b, 3, 1, 1, 0);
    let mut args = vec![dst2.clone(), src, map];
    args.extend(ints(&[0, 0, 0]));
    b.try_call("transfer", &args).unwrap();
    assert_eq!(pixels(&b, &dst2), vec![30, 0, 10]);
}

#[test]
fn from_bin_inverts_to_bin() {
    let b = Bridge::new();
    let mut list = ints(&[2, 2, 1, 3]);
    list.push(Term::List((0..12).map(|v| Term::Int(v * 20)).collect()));
    let h = ok_handle(b.call("create_list", &list));

    let out = b.call("to_bin", &with_handle(&h, u1_layout(true, true)));
    let Term::Tuple(items) = out else {
        panic!("expected tuple");
    };
    let mut args = vec![items[2].clone()];
    args.extend(ints(&[2, 2, 1, 3]));
    args.extend(u1_layout(true, true));
    let back = ok_handle(b.call("from_bin", &args));
    assert_eq!(pixels(&b, &back), pixels(&b, &h));

    args[0] = Term::Binary(vec![0; 5]);
    assert!(matches!(
        b.try_call("from_bin", &args),
        Err(BridgeError::BadArgument(_))
    ));
}

#[test]
fn drawing_functions_mutate_in_place() {
    let b = Bridge::new();
    let h = create(&b, 8, 8, 3, 0);
    let red = Term::tuple(ints(&[255, 0, 0]));

    let mut line = ints(&[0, 0, 7, 0]);
    line.extend([red.clone(), Term::Int(1), Term::Float(1.0), Term::Int(0xffff_ffff)]);
    assert_eq!(b.call("draw_line", &with_handle(&h, line)), h);

    let mut rect = ints(&[2, 2, 4, 4]);
    rect.extend([red.clone(), Term::Float(1.0)]);
    b.try_call("draw_rect_filled", &with_handle(&h, rect)).unwrap();

    let img = b.snapshot::<Image>(&h).unwrap();
    assert_eq!(img.get(7, 0, 0, 0).unwrap(), 255);
    assert_eq!(img.get(3, 3, 0, 0).unwrap(), 255);
    assert_eq!(img.get(3, 3, 0, 1).unwrap(), 0);
    assert_eq!(img.get(6, 6, 0, 0).unwrap(), 0);

    let mut bad = ints(&[0, 0, 1]);
    bad.extend([Term::tuple(ints(&[1, 2])), Term::Float(1.0)]);
    assert!(matches!(
        b.try_call("draw_circle_filled", &with_handle(&h, bad)),
        Err(BridgeError::BadArgument(_))
    ));
}

#[test]
fn extreme_coordinates_clip_instead_of_failing() {
    let b = Bridge::new();
    let h = create(&b, 4, 4, 3, 0);
    let red = Term::tuple(ints(&[255, 0, 0]));

    let mut line = ints(&[2_000_000_000, 0, -2_000_000_000, 0]);
    line.extend([red.clone(), Term::Int(5), Term::Float(1.0), Term::Int(0xffff_ffff)]);
    assert_eq!(b.call("draw_line", &with_handle(&h, line)), h);
    let img = b.snapshot::<Image>(&h).unwrap();
    assert_eq!(img.get(0, 0, 0, 0).unwrap(), 255);
    assert_eq!(img.get(3, 1, 0, 0).unwrap(), 255);

    let span = ints(&[i64::from(i32::MIN), 0, 0, 0, i64::from(i32::MAX), 0, 0, 0, 1]);
    assert!(matches!(
        b.try_call("get_crop", &with_handle(&h, span)),
        Err(BridgeError::Allocation(_))
    ));
    assert_eq!(b.stats().live, 1);
}

#[test]
fn save_then_load_round_trips_through_a_file() {
    let b = Bridge::new();
    let h = create(&b, 3, 2, 3, 90);
    let path = std::env::temp_dir().join(format!("pixbridge-save-{}.png", std::process::id()));
    let path_term = Term::string(path.to_string_lossy());
    assert_eq!(b.call("save", &[h.clone(), path_term.clone()]), Term::ok());
    let back = ok_handle(b.call("load", &[path_term]));
    std::fs::remove_file(&path).unwrap();
    assert_eq!(pixels(&b, &back), pixels(&b, &h));
}

#[test]
fn convert_to_empty_image_fails_with_collaborator_message() {
    let b = Bridge::new();
    let h = create(&b, 0, 0, 0, 0);
    assert!(matches!(
        b.try_call("convert_to", &[h.clone(), Term::atom("png")]),
        Err(BridgeError::Library(m)) if m == "can't convert empty image"
    ));
    assert!(matches!(
        b.try_call("convert_to", &[h, Term::atom("gif")]),
        Err(BridgeError::BadArgument(_))
    ));
}

#[test]
fn run_and_release_through_the_table() {
    let b = Bridge::new();
    let cmd = |name: &str, args: &[i64]| {
        let mut items = vec![Term::atom(name)];
        items.extend(ints(args));
        Term::Tuple(items)
    };
    let script = Term::List(vec![
        cmd("create", &[4, 4, 1, 3, 128]),
        cmd("fill", &[200]),
        cmd("get_image", &[]),
    ]);
    let h = ok_handle(b.call("run", &[script]));
    assert_eq!(pixels(&b, &h), vec![200; 48]);

    assert_eq!(b.call("release", &[h.clone()]), Term::bool(true));
    assert_eq!(b.call("release", &[h.clone()]), Term::bool(false));
    assert!(matches!(
        b.try_call("size", &[h]),
        Err(BridgeError::InvalidHandle(_))
    ));
}
