use super::*;

const MAX: usize = 1 << 20;

fn rgb(w: u32, h: u32, px: [u8; 3]) -> Image {
    let mut img = Image::new(Dims::new(w, h, 1, 3), 0, MAX).unwrap();
    let n = (w * h) as usize;
    for (c, v) in px.iter().enumerate() {
        img.data_mut()[c * n..(c + 1) * n].fill(*v);
    }
    img
}

fn ramp(w: u32, h: u32) -> Image {
    let data = (0..w * h).map(|v| v as u8).collect();
    Image::from_vec(Dims::new(w, h, 1, 1), data).unwrap()
}

#[test]
fn resize_constant_image_stays_constant() {
    let img = rgb(4, 4, [10, 20, 30]);
    let out = resize(&img, 7, 3, MAX).unwrap();
    assert_eq!(out.dims(), Dims::new(7, 3, 1, 3));
    assert!(out.plane(0, 1).iter().all(|&v| v == 20));
}

#[test]
fn resize_negative_is_percent_and_zero_is_empty() {
    let img = ramp(8, 4);
    assert_eq!(resize(&img, -50, -100, MAX).unwrap().dims(), Dims::new(4, 4, 1, 1));
    assert!(resize(&img, 0, 4, MAX).unwrap().is_empty());
}

#[test]
fn upsampling_keeps_corner_samples() {
    let img = Image::from_vec(Dims::new(2, 1, 1, 1), vec![0, 200]).unwrap();
    let out = resize(&img, 5, 1, MAX).unwrap();
    assert_eq!(out.data(), &[0, 50, 100, 150, 200]);
}

#[test]
fn resize_fit_pads_with_fill_and_anchors() {
    let img = rgb(4, 2, [255, 255, 255]);
    let top = resize_fit(&img, 4, 4, 1, 7, MAX).unwrap();
    assert_eq!(top.dims(), Dims::new(4, 4, 1, 3));
    assert_eq!(top.get(0, 0, 0, 0).unwrap(), 255);
    assert_eq!(top.get(0, 3, 0, 0).unwrap(), 7);

    let bottom = resize_fit(&img, 4, 4, 2, 7, MAX).unwrap();
    assert_eq!(bottom.get(0, 0, 0, 0).unwrap(), 7);
    assert_eq!(bottom.get(0, 3, 0, 0).unwrap(), 255);

    assert!(matches!(
        resize_fit(&img, 4, 4, 3, 0, MAX),
        Err(BridgeError::BadArgument(_))
    ));
}

#[test]
fn mirror_and_transpose_move_pixels() {
    let mut img = ramp(3, 2);
    mirror(&mut img, Axis::X);
    assert_eq!(img.data(), &[2, 1, 0, 5, 4, 3]);
    mirror(&mut img, Axis::Y);
    assert_eq!(img.data(), &[5, 4, 3, 2, 1, 0]);

    let mut t = ramp(3, 2);
    transpose(&mut t).unwrap();
    assert_eq!(t.dims(), Dims::new(2, 3, 1, 1));
    assert_eq!(t.data(), &[0, 3, 1, 4, 2, 5]);
}

#[test]
fn threshold_modes() {
    let base = Image::from_vec(Dims::new(3, 1, 1, 1), vec![10, 100, 200]).unwrap();

    let mut hard = base.clone();
    threshold(&mut hard, 100, false, false);
    assert_eq!(hard.data(), &[0, 1, 1]);

    let mut strict = base.clone();
    threshold(&mut strict, 100, false, true);
    assert_eq!(strict.data(), &[0, 0, 1]);

    let mut soft = base;
    threshold(&mut soft, 100, true, false);
    assert_eq!(soft.data(), &[0, 0, 100]);
}

#[test]
fn gray_requires_three_channels() {
    let four = Image::new(Dims::new(1, 1, 1, 4), 9, MAX).unwrap();
    let err = gray(&four, false, MAX).unwrap_err();
    assert!(matches!(&err, BridgeError::Library(m) if m == "not an RGB image"));

    let g = gray(&rgb(2, 2, [255, 0, 0]), false, MAX).unwrap();
    assert_eq!(g.spectrum(), 1);
    assert_eq!(g.data(), &[76; 4]);
    let n = gray(&rgb(1, 1, [255, 0, 0]), true, MAX).unwrap();
    assert_eq!(n.data(), &[255 - 76]);
}

#[test]
fn invert_is_bitwise_complement() {
    let mut img = Image::from_vec(Dims::new(2, 1, 1, 1), vec![0, 0x0f]).unwrap();
    invert(&mut img);
    assert_eq!(img.data(), &[0xff, 0xf0]);
}

#[test]
fn blur_preserves_constant_images_and_spreads_impulses() {
    let mut flat = rgb(5, 5, [40, 80, 120]);
    blur(&mut flat, 1.5, true).unwrap();
    assert!(flat.plane(0, 2).iter().all(|&v| v == 120));

    let mut dot = Image::new(Dims::new(9, 9, 1, 1), 0, MAX).unwrap();
    dot.set(4, 4, 0, 0, 255).unwrap();
    blur(&mut dot, 1.0, true).unwrap();
    assert!(dot.get(4, 4, 0, 0).unwrap() < 255);
    assert!(dot.get(5, 4, 0, 0).unwrap() > 0);
    assert!(dot.get(4, 5, 0, 0).unwrap() > 0);
}

#[test]
fn blur_dirichlet_darkens_edges() {
    let mut img = Image::new(Dims::new(6, 6, 1, 1), 200, MAX).unwrap();
    blur(&mut img, 1.0, false).unwrap();
    assert!(img.get(0, 0, 0, 0).unwrap() < 200);
    assert!(img.get(3, 3, 0, 0).unwrap() >= 190);
}

#[test]
fn blur_with_huge_sigma_stays_bounded() {
    let mut flat = Image::new(Dims::new(2, 2, 1, 1), 90, MAX).unwrap();
    blur(&mut flat, 1e18, true).unwrap();
    assert_eq!(flat.data(), &[90; 4]);

    let mut dot = Image::new(Dims::new(3, 1, 1, 1), 0, MAX).unwrap();
    dot.set(1, 0, 0, 0, 255).unwrap();
    blur(&mut dot, 2e6, false).unwrap();
    assert!(dot.get(1, 0, 0, 0).unwrap() < 255);
}

#[test]
fn crop_reads_outside_through_boundary() {
    let img = ramp(3, 1);
    let d = crop(&img, [-1, 0, 0, 0], [3, 0, 0, 0], Boundary::Dirichlet, MAX).unwrap();
    assert_eq!(d.data(), &[0, 0, 1, 2, 0]);
    let n = crop(&img, [-1, 0, 0, 0], [3, 0, 0, 0], Boundary::Neumann, MAX).unwrap();
    assert_eq!(n.data(), &[0, 0, 1, 2, 2]);
    let p = crop(&img, [3, 0, 0, 0], [-1, 0, 0, 0], Boundary::Periodic, MAX).unwrap();
    assert_eq!(p.data(), &[2, 0, 1, 2, 0]);
}

#[test]
fn crop_spanning_the_whole_coordinate_range_is_an_allocation_error() {
    let img = ramp(3, 1);
    let err = crop(&img, [i32::MIN, 0, 0, 0], [i32::MAX, 0, 0, 0], Boundary::Neumann, MAX)
        .unwrap_err();
    assert!(matches!(err, BridgeError::Allocation(_)));
}

#[test]
fn blend_checks_ratio_and_shape() {
    let mut a = rgb(2, 2, [0, 0, 0]);
    let b = rgb(2, 2, [200, 100, 50]);
    blend(&mut a, &b, 0.5).unwrap();
    assert_eq!(a.get(0, 0, 0, 0).unwrap(), 100);
    assert!(matches!(blend(&mut a, &b, 1.5), Err(BridgeError::BadArgument(_))));
    assert!(matches!(
        blend(&mut a, &rgb(1, 1, [0, 0, 0]), 0.5),
        Err(BridgeError::Library(_))
    ));
}

#[test]
fn lut_mapping_expands_channels() {
    let img = Image::from_vec(Dims::new(2, 1, 1, 1), vec![0, 5]).unwrap();
    let lut = Image::from_vec(Dims::new(2, 1, 1, 3), vec![1, 2, 3, 4, 5, 6]).unwrap();

    let dirichlet = map_lut(&img, &lut, Boundary::Dirichlet, MAX).unwrap();
    assert_eq!(dirichlet.spectrum(), 3);
    assert_eq!(dirichlet.data(), &[1, 0, 3, 0, 5, 0]);

    let neumann = map_lut(&img, &lut, Boundary::Neumann, MAX).unwrap();
    assert_eq!(neumann.data(), &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn transfer_skips_out_of_range_pairs() {
    let src = ramp(3, 1);
    let mut dst = Image::new(Dims::new(3, 1, 1, 1), 9, MAX).unwrap();
    let pairs = [
        (Pos3([0, 0, 0]), Pos3([2, 0, 0])),
        (Pos3([1, 0, 0]), Pos3([7, 0, 0])),
    ];
    transfer(&mut dst, &src, &pairs, Pos3::default());
    assert_eq!(dst.data(), &[2, 9, 9]);

    let map = pairs_to_map(&pairs, MAX).unwrap();
    assert_eq!(map.dims(), Dims::new(2, 1, 1, 6));
    assert_eq!(map_to_pairs(&map).unwrap(), pairs.to_vec());
}
