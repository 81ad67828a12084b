use super::*;

#[test]
fn planar_layout_puts_x_fastest_and_channel_slowest() {
    let mut img = Image::new(Dims::new(3, 2, 1, 2), 0, 1 << 20).unwrap();
    img.set(1, 0, 0, 0, 10).unwrap();
    img.set(0, 1, 0, 0, 20).unwrap();
    img.set(0, 0, 0, 1, 30).unwrap();
    assert_eq!(img.data()[1], 10);
    assert_eq!(img.data()[3], 20);
    assert_eq!(img.data()[6], 30);
    assert_eq!(img.plane(0, 1)[0], 30);
}

#[test]
fn zero_extent_gives_empty_buffer() {
    let img = Image::new(Dims::new(4, 0, 1, 3), 9, 1 << 20).unwrap();
    assert!(img.is_empty());
    assert_eq!(img.dims(), Dims::default());
}

#[test]
fn element_limit_is_checked_before_allocating() {
    let err = Image::new(Dims::new(100, 100, 1, 3), 0, 1000).unwrap_err();
    assert!(matches!(err, BridgeError::Allocation(_)));

    let huge = Dims::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX);
    assert!(matches!(
        Image::new(huge, 0, usize::MAX),
        Err(BridgeError::Allocation(_))
    ));
}

#[test]
fn out_of_range_access_is_rejected() {
    let mut img = Image::new(Dims::new(2, 2, 1, 1), 0, 16).unwrap();
    assert!(img.get(2, 0, 0, 0).is_err());
    assert!(img.set(0, 0, 0, 1, 5).is_err());
    assert!(img.contains_xyz(1, 1, 0));
    assert!(!img.contains_xyz(-1, 0, 0));
}

#[test]
fn from_vec_checks_length() {
    assert!(Image::from_vec(Dims::new(2, 2, 1, 1), vec![0; 3]).is_err());
    let img = IntMap::from_vec(Dims::new(1, 1, 1, 2), vec![-4, 7]).unwrap();
    assert_eq!(img.get(0, 0, 0, 1).unwrap(), 7);
}

#[test]
fn sample_conversions_round_and_saturate() {
    assert_eq!(u8::from_f64(254.6), 255);
    assert_eq!(u8::from_f64(300.0), 255);
    assert_eq!(u8::from_f64(-3.0), 0);
    assert_eq!(u8::from_f64_trunc(199.9), 199);
    assert_eq!(i32::from_f64(-2.6), -3);
}
