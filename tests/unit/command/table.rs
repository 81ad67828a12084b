use super::*;

fn rgb(w: u32, h: u32, v: u8) -> Image {
    Image::new(Dims::new(w, h, 1, 3), v, 1 << 20).unwrap()
}

fn exec(ctx: &mut ScriptCtx<'_>, name: &str, args: Vec<Term>) -> BridgeResult<Step> {
    let command = lookup(name).unwrap();
    (command.run)(ctx, &args)
}

fn ints(v: &[i64]) -> Vec<Term> {
    v.iter().map(|&i| Term::Int(i)).collect()
}

fn color(r: i64, g: i64, b: i64) -> Term {
    Term::tuple(ints(&[r, g, b]))
}

fn crop_term(step: Step) -> Term {
    match step {
        Step::Crop(t) => t,
        other => panic!("expected crop, got {other:?}"),
    }
}

fn fresh() -> ScriptCtx<'static> {
    let reg: &'static Registry = Box::leak(Box::new(Registry::new(32)));
    let opts: &'static BridgeOpts = Box::leak(Box::new(BridgeOpts::default()));
    ScriptCtx::new(reg, opts)
}

#[test]
fn table_names_are_unique_and_resolvable() {
    let mut seen = std::collections::HashSet::new();
    for name in names() {
        assert!(seen.insert(name), "duplicate {name}");
        assert_eq!(lookup(name).unwrap().name, name);
    }
    assert_eq!(seen.len(), 41);
    assert!(lookup("Create").is_none());
    assert_eq!(lookup("get_crop").unwrap().phase, Phase::Crop);
    assert_eq!(lookup("load").unwrap().phase, Phase::Seed);
}

#[test]
fn arity_is_exact() {
    let mut ctx = fresh();
    assert!(matches!(
        exec(&mut ctx, "create", ints(&[1, 1, 1])),
        Err(BridgeError::BadArgument(_))
    ));
    assert!(exec(&mut ctx, "invert", ints(&[1])).is_err());
}

#[test]
fn to_bin_of_zero_image_is_48_zero_bytes() {
    let mut ctx = fresh();
    exec(&mut ctx, "create", ints(&[4, 4, 1, 3, 0])).unwrap();
    let args = vec![
        Term::atom("u1"),
        Term::atom("range"),
        Term::tuple(vec![]),
        Term::atom("false"),
        Term::atom("false"),
    ];
    let out = crop_term(exec(&mut ctx, "to_bin", args).unwrap());
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
fn create_from_bin_decodes_planar_blob() {
    let mut ctx = fresh();
    let mut args = vec![Term::Binary(vec![1, 2, 3, 4, 5, 6])];
    args.extend(ints(&[2, 1, 1, 3]));
    args.extend([
        Term::atom("u1"),
        Term::atom("range"),
        Term::tuple(vec![]),
        Term::atom("true"),
        Term::atom("true"),
    ]);
    exec(&mut ctx, "create_from_bin", args).unwrap();
    // Blob channel 0 is native blue.
    assert_eq!(ctx.img.plane(0, 2), &[1, 2]);
    assert_eq!(ctx.img.plane(0, 0), &[5, 6]);
}

#[test]
fn blend_and_copy_read_other_handles() {
    let mut ctx = fresh();
    let other = ctx.registry.register(rgb(2, 2, 100)).unwrap();
    exec(&mut ctx, "copy", vec![Term::Resource(other)]).unwrap();
    assert_eq!(ctx.img, rgb(2, 2, 100));

    ctx.img.fill(0);
    exec(&mut ctx, "blend", vec![Term::Resource(other), Term::Float(0.5)]).unwrap();
    assert_eq!(ctx.img.get(1, 1, 0, 2).unwrap(), 50);

    assert!(matches!(
        exec(&mut ctx, "blend", vec![Term::Resource(other), Term::Float(2.0)]),
        Err(BridgeError::BadArgument(_))
    ));
}

#[test]
fn color_mapping_by_name_and_by_list() {
    let mut ctx = fresh();
    ctx.img = Image::from_vec(Dims::new(2, 1, 1, 1), vec![0, 1]).unwrap();
    exec(
        &mut ctx,
        "color_mapping_by",
        vec![Term::List(vec![color(1, 2, 3), color(4, 5, 6)]), Term::Int(0)],
    )
    .unwrap();
    assert_eq!(ctx.img.spectrum(), 3);
    assert_eq!(ctx.img.get(1, 0, 0, 2).unwrap(), 6);

    let err = exec(&mut ctx, "color_mapping", vec![Term::atom("plasma"), Term::Int(0)]);
    assert!(matches!(err, Err(BridgeError::BadArgument(_))));
}

#[test]
fn drawing_commands_touch_pixels() {
    let mut ctx = fresh();
    ctx.img = rgb(10, 10, 0);
    let mut line = ints(&[0, 0, 9, 0]);
    line.extend([color(255, 0, 0), Term::Int(1), Term::Float(1.0), Term::Int(-1i64 & 0xffff_ffff)]);
    exec(&mut ctx, "draw_line", line).unwrap();
    assert_eq!(ctx.img.get(9, 0, 0, 0).unwrap(), 255);

    let mut rect = vec![Term::Float(0.5), Term::Float(0.5), Term::Float(0.9), Term::Float(0.9)];
    rect.extend([color(0, 255, 0), Term::Float(1.0), Term::Int(0)]);
    exec(&mut ctx, "fill_rectangle_ratio", rect).unwrap();
    assert_eq!(ctx.img.get(7, 7, 0, 1).unwrap(), 255);
    assert_eq!(ctx.img.get(4, 4, 0, 1).unwrap(), 0);

    let mut circle = ints(&[2, 7, 1]);
    circle.extend([color(0, 0, 255), Term::Float(1.0), Term::Int(0)]);
    exec(&mut ctx, "fill_circle", circle).unwrap();
    assert_eq!(ctx.img.get(2, 7, 0, 2).unwrap(), 255);

    let text = vec![
        Term::Int(0),
        Term::Int(2),
        Term::string("I"),
        Term::atom("white"),
        Term::atom("transparent"),
        Term::Float(1.0),
        Term::Int(8),
    ];
    exec(&mut ctx, "draw_text", text).unwrap();
    assert_eq!(ctx.img.get(2, 2, 0, 1).unwrap(), 255);
}

#[test]
fn draw_graph_plots_a_registered_series() {
    let mut ctx = fresh();
    ctx.img = rgb(8, 8, 0);
    let series = Image::from_vec(Dims::new(4, 1, 1, 1), vec![0, 255, 0, 255]).unwrap();
    let data = ctx.registry.register(series).unwrap();
    let mut args = vec![Term::Resource(data), color(255, 255, 255), Term::Float(1.0)];
    args.extend(ints(&[1, 0, 0, 0, 0xffff_ffff]));
    assert!(matches!(exec(&mut ctx, "draw_graph", args).unwrap(), Step::Grow));
    assert!(ctx.img.plane(0, 0).iter().any(|&v| v == 255));
}

#[test]
fn draw_morph_copies_from_a_snapshot() {
    let mut ctx = fresh();
    ctx.img = Image::from_vec(Dims::new(3, 1, 1, 1), vec![10, 20, 30]).unwrap();
    let pos = |x: i64| Term::List(vec![Term::Int(x)]);
    let pairs = Term::List(vec![
        Term::tuple(vec![pos(0), pos(1)]),
        Term::tuple(vec![pos(1), pos(0)]),
    ]);
    let mut args = vec![pairs];
    args.extend(ints(&[0, 0, 0]));
    exec(&mut ctx, "draw_morph", args).unwrap();
    assert_eq!(ctx.img.data(), &[20, 10, 30]);
}

#[test]
fn get_crop_registers_a_new_image() {
    let mut ctx = fresh();
    ctx.img = Image::from_vec(Dims::new(3, 1, 1, 1), vec![1, 2, 3]).unwrap();
    let out = crop_term(exec(&mut ctx, "get_crop", ints(&[1, 0, 0, 0, 2, 0, 0, 0, 0])).unwrap());
    let Term::Tuple(items) = out else {
        panic!("expected tuple");
    };
    let Term::Resource(h) = items[1] else {
        panic!("expected handle");
    };
    let cropped = ctx.registry.resolve::<Image>(&h).unwrap();
    assert_eq!(cropped.lock().unwrap().data(), &[2, 3]);
}

#[test]
fn get_and_size_and_empty_encode() {
    let mut ctx = fresh();
    ctx.img = Image::from_vec(Dims::new(2, 1, 1, 1), vec![7, 8]).unwrap();
    assert_eq!(crop_term(exec(&mut ctx, "get", ints(&[1, 0, 0, 0])).unwrap()), Term::Int(8));
    assert_eq!(crop_term(exec(&mut ctx, "get_size", vec![]).unwrap()), Term::Int(2));
    assert!(exec(&mut ctx, "get", ints(&[2, 0, 0, 0])).is_err());

    ctx.img = Image::empty();
    let err = exec(&mut ctx, "to_image", vec![Term::atom("png")]).unwrap_err();
    assert!(matches!(&err, BridgeError::Library(m) if m == "can't convert empty image"));
}

#[test]
fn display_on_shows_the_image_and_rejects_image_handles() {
    let mut ctx = fresh();
    ctx.img = rgb(2, 2, 42);
    let disp = Display::new(Image::empty(), "t", Normalization::from_code(0).unwrap(), false, true);
    let dh = ctx.registry.register(disp).unwrap();
    assert_eq!(
        crop_term(exec(&mut ctx, "display_on", vec![Term::Resource(dh)]).unwrap()),
        Term::ok()
    );
    let shown = ctx.registry.resolve::<Display>(&dh).unwrap();
    assert_eq!(shown.lock().unwrap().frame().get(0, 0, 0, 0).unwrap(), 42);

    let ih = ctx.registry.register(rgb(1, 1, 0)).unwrap();
    assert!(matches!(
        exec(&mut ctx, "display_on", vec![Term::Resource(ih)]),
        Err(BridgeError::TypeMismatch { .. })
    ));
}

#[test]
fn display_takes_no_arguments_and_leaves_no_handle() {
    let mut ctx = fresh();
    ctx.img = rgb(2, 2, 7);
    assert_eq!(crop_term(exec(&mut ctx, "display", vec![]).unwrap()), Term::ok());
    assert_eq!(ctx.registry.stats().live, 0);
    assert!(matches!(
        exec(&mut ctx, "display", ints(&[1])),
        Err(BridgeError::BadArgument(_))
    ));
}

#[test]
fn gray_mode_is_zero_or_one() {
    assert!(!gray_mode(0).unwrap());
    assert!(gray_mode(1).unwrap());
    assert!(gray_mode(2).is_err());
}
