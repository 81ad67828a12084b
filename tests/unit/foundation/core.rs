use super::*;

#[test]
fn named_colors_cover_palette_and_transparent() {
    assert_eq!(Color::from_name("red").unwrap(), Some(Color([255, 0, 0])));
    assert_eq!(Color::from_name("navy").unwrap(), Some(Color([0, 0, 128])));
    assert_eq!(Color::from_name("transparent").unwrap(), None);
    assert!(Color::from_name("mauve").is_err());
}

#[test]
fn boundary_resolution_per_mode() {
    assert_eq!(Boundary::Dirichlet.resolve(-1, 4), None);
    assert_eq!(Boundary::Dirichlet.resolve(2, 4), Some(2));
    assert_eq!(Boundary::Neumann.resolve(-3, 4), Some(0));
    assert_eq!(Boundary::Neumann.resolve(9, 4), Some(3));
    assert_eq!(Boundary::Periodic.resolve(-1, 4), Some(3));
    assert_eq!(Boundary::Periodic.resolve(5, 4), Some(1));
    assert_eq!(Boundary::Mirror.resolve(-1, 4), Some(0));
    assert_eq!(Boundary::Mirror.resolve(4, 4), Some(3));
    assert_eq!(Boundary::Mirror.resolve(5, 4), Some(2));
    assert_eq!(Boundary::Neumann.resolve(0, 0), None);
    assert!(Boundary::from_code(4).is_err());
}

#[test]
fn axis_parse_rejects_other_atoms() {
    assert_eq!(Axis::parse("x").unwrap(), Axis::X);
    assert_eq!(Axis::parse("y").unwrap(), Axis::Y);
    assert!(Axis::parse("z").is_err());
}
