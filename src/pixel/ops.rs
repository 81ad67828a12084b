//! Whole-buffer image operations.
//!
//! In-place operations take `&mut`; producing operations return a new buffer and take the
//! element limit used for the allocation.

use rayon::prelude::*;

use crate::foundation::core::{Axis, Boundary, Pos3};
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::pixel::buffer::{Dims, Image, IntMap, PixelBuffer, Sample};

/// Resolve a requested size: negative values are a percentage of `current`.
fn target_extent(requested: i32, current: u32) -> u32 {
    if requested < 0 {
        let pct = u64::from(requested.unsigned_abs());
        u32::try_from(pct * u64::from(current) / 100).unwrap_or(u32::MAX)
    } else {
        requested as u32
    }
}

/// Source taps `(i0, i1, t)` for each destination coordinate along one axis.
///
/// Upsampling aligns the corner samples; downsampling steps by `src/dst`.
fn linear_taps(src: u32, dst: u32) -> Vec<(usize, usize, f64)> {
    let last = src.saturating_sub(1) as usize;
    let step = if dst > src {
        if dst > 1 {
            f64::from(src - 1) / f64::from(dst - 1)
        } else {
            0.0
        }
    } else {
        f64::from(src) / f64::from(dst)
    };
    (0..dst)
        .map(|x| {
            let p = f64::from(x) * step;
            let i0 = (p.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            (i0, i1, p - i0 as f64)
        })
        .collect()
}

/// Linear resize in x and y; depth and spectrum are kept.
///
/// Negative sizes are percentages of the current size. A zero target gives an empty image.
#[tracing::instrument(skip(img), fields(from = %img.dims()))]
pub fn resize(img: &Image, width: i32, height: i32, max_elements: usize) -> BridgeResult<Image> {
    let src = img.dims();
    let dw = target_extent(width, src.width);
    let dh = target_extent(height, src.height);
    let dims = Dims::new(dw, dh, src.depth, src.spectrum);
    if img.is_empty() || dims.is_empty() {
        return Ok(Image::empty());
    }
    if dw == src.width && dh == src.height {
        return Ok(img.clone());
    }

    let mut out = Image::new(dims, 0, max_elements)?;
    let xs = linear_taps(src.width, dw);
    let ys = linear_taps(src.height, dh);
    let src_plane = src.plane_len();
    let sw = src.width as usize;

    out.data_mut()
        .par_chunks_exact_mut(dims.plane_len())
        .zip(img.data().par_chunks_exact(src_plane))
        .for_each(|(dst, s)| {
            for (y, &(y0, y1, ty)) in ys.iter().enumerate() {
                let row0 = &s[y0 * sw..(y0 + 1) * sw];
                let row1 = &s[y1 * sw..(y1 + 1) * sw];
                let out_row = &mut dst[y * dw as usize..(y + 1) * dw as usize];
                for (o, &(x0, x1, tx)) in out_row.iter_mut().zip(&xs) {
                    let top = f64::from(row0[x0]) * (1.0 - tx) + f64::from(row0[x1]) * tx;
                    let bot = f64::from(row1[x0]) * (1.0 - tx) + f64::from(row1[x1]) * tx;
                    *o = u8::from_f64(top * (1.0 - ty) + bot * ty);
                }
            }
        });
    Ok(out)
}

/// Resize to fit `width x height`.
///
/// `align` 0 stretches; 1 keeps the aspect ratio and anchors top/left; 2 keeps the aspect
/// ratio and anchors bottom/right. The uncovered area is filled with `fill`.
pub fn resize_fit(
    img: &Image,
    width: i32,
    height: i32,
    align: i32,
    fill: u8,
    max_elements: usize,
) -> BridgeResult<Image> {
    match align {
        0 => resize(img, width, height, max_elements),
        1 | 2 => {
            let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
                (Ok(w), Ok(h)) => (w, h),
                _ => {
                    return Err(BridgeError::bad_argument(
                        "aligned resize needs non-negative width and height",
                    ));
                }
            };
            let mut canvas = Image::new(
                Dims::new(w, h, img.depth().max(1), img.spectrum().max(1)),
                fill,
                max_elements,
            )?;
            if img.is_empty() || canvas.is_empty() {
                return Ok(canvas);
            }

            let ratio_w = f64::from(w) / f64::from(img.width());
            let ratio_h = f64::from(h) / f64::from(img.height());
            if ratio_w <= ratio_h {
                // Gap is vertical.
                let fitted = resize(img, width, (ratio_w * f64::from(img.height())) as i32, max_elements)?;
                let y = if align == 1 { 0 } else { i64::from(h) - i64::from(fitted.height()) };
                draw_image(&mut canvas, &fitted, 0, y, 1.0);
            } else {
                let fitted = resize(img, (ratio_h * f64::from(img.width())) as i32, height, max_elements)?;
                let x = if align == 1 { 0 } else { i64::from(w) - i64::from(fitted.width()) };
                draw_image(&mut canvas, &fitted, x, 0, 1.0);
            }
            Ok(canvas)
        }
        other => Err(BridgeError::bad_argument(format!(
            "resize align must be 0, 1 or 2, got {other}"
        ))),
    }
}

/// Blend `src` onto `dst` with its origin at `(x0, y0)`, per slice and channel.
pub fn draw_image(dst: &mut Image, src: &Image, x0: i64, y0: i64, opacity: f64) {
    let depth = dst.depth().min(src.depth());
    let spectrum = dst.spectrum().min(src.spectrum());
    let o = opacity.clamp(0.0, 1.0);
    for c in 0..spectrum as usize {
        for z in 0..depth as usize {
            for sy in 0..src.height() as usize {
                let y = y0 + sy as i64;
                if !(0..i64::from(dst.height())).contains(&y) {
                    continue;
                }
                for sx in 0..src.width() as usize {
                    let x = x0 + sx as i64;
                    if !(0..i64::from(dst.width())).contains(&x) {
                        continue;
                    }
                    let s = src.data()[src.offset(sx, sy, z, c)];
                    let di = dst.offset(x as usize, y as usize, z, c);
                    let d = &mut dst.data_mut()[di];
                    *d = if o >= 1.0 {
                        s
                    } else {
                        u8::from_f64(f64::from(*d) * (1.0 - o) + f64::from(s) * o)
                    };
                }
            }
        }
    }
}

/// Flip along `axis` in place.
pub fn mirror<T: Sample>(img: &mut PixelBuffer<T>, axis: Axis) {
    let w = img.width() as usize;
    let h = img.height() as usize;
    if w == 0 || h == 0 {
        return;
    }
    for plane in img.planes_mut() {
        match axis {
            Axis::X => plane.chunks_exact_mut(w).for_each(<[T]>::reverse),
            Axis::Y => {
                for y in 0..h / 2 {
                    let (top, bottom) = plane.split_at_mut((h - 1 - y) * w);
                    top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
                }
            }
        }
    }
}

/// Swap the x and y axes in place.
pub fn transpose<T: Sample>(img: &mut PixelBuffer<T>) -> BridgeResult<()> {
    let d = img.dims();
    if img.is_empty() {
        return Ok(());
    }
    let (w, h) = (d.width as usize, d.height as usize);
    let mut data = Vec::with_capacity(img.len());
    for plane in img.data().chunks_exact(d.plane_len()) {
        for x in 0..w {
            for y in 0..h {
                data.push(plane[y * w + x]);
            }
        }
    }
    *img = PixelBuffer::from_vec(Dims::new(d.height, d.width, d.depth, d.spectrum), data)?;
    Ok(())
}

/// Binarize in place (or soft-shrink toward zero when `soft`).
///
/// Non-strict comparison is `>=`; strict is `>`.
pub fn threshold(img: &mut Image, value: u8, soft: bool, strict: bool) {
    let above = |v: u8| if strict { v > value } else { v >= value };
    for v in img.data_mut() {
        *v = if soft {
            if above(*v) { *v - value } else { 0 }
        } else {
            u8::from(above(*v))
        };
    }
}

/// Luma of an RGB image as a single-channel image; `negative` inverts it.
pub fn gray(img: &Image, negative: bool, max_elements: usize) -> BridgeResult<Image> {
    require_rgb(img)?;
    let d = img.dims();
    let mut out = Image::new(Dims::new(d.width, d.height, d.depth, 1), 0, max_elements)?;
    let n = d.plane_len() * d.depth as usize;
    let (r, rest) = img.data().split_at(n);
    let (g, b) = rest.split_at(n);
    for (i, y) in out.data_mut().iter_mut().enumerate() {
        let luma = u8::from_f64_trunc(
            0.299 * f64::from(r[i]) + 0.587 * f64::from(g[i]) + 0.114 * f64::from(b[i]),
        );
        *y = if negative { u8::MAX - luma } else { luma };
    }
    Ok(out)
}

fn require_rgb(img: &Image) -> BridgeResult<()> {
    if img.spectrum() != 3 {
        return Err(BridgeError::library("not an RGB image"));
    }
    Ok(())
}

/// Bitwise complement in place.
pub fn invert(img: &mut Image) {
    for v in img.data_mut() {
        *v = !*v;
    }
}

/// RGB to YUV with U and V offset into the byte range.
pub fn rgb_to_yuv(img: &Image) -> BridgeResult<Image> {
    require_rgb(img)?;
    let mut out = img.clone();
    let n = img.len() / 3;
    let src = img.data();
    let dst = out.data_mut();
    for i in 0..n {
        let r = f64::from(src[i]) / 255.0;
        let g = f64::from(src[n + i]) / 255.0;
        let b = f64::from(src[2 * n + i]) / 255.0;
        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        let u = -0.14713 * r - 0.28886 * g + 0.436 * b;
        let v = 0.615 * r - 0.51499 * g - 0.10001 * b;
        dst[i] = u8::from_f64(255.0 * y);
        dst[n + i] = u8::from_f64(255.0 * (u + 0.436) / (2.0 * 0.436));
        dst[2 * n + i] = u8::from_f64(255.0 * (v + 0.615) / (2.0 * 0.615));
    }
    Ok(out)
}

/// Gaussian blur in place along x, y and (for volumes) z.
///
/// A negative `sigma` is a percentage of the largest spatial extent. `neumann` clamps reads
/// at the edges; otherwise out-of-range reads are zero.
#[tracing::instrument(skip(img), fields(dims = %img.dims()))]
pub fn blur(img: &mut Image, sigma: f64, neumann: bool) -> BridgeResult<()> {
    let d = img.dims();
    let sigma = if sigma >= 0.0 {
        sigma
    } else {
        -sigma * f64::from(d.width.max(d.height).max(d.depth)) / 100.0
    };
    if img.is_empty() || !sigma.is_finite() || sigma < 0.1 {
        return Ok(());
    }
    // Taps past the largest spatial extent only read boundary values.
    let extent = d.width.max(d.height).max(d.depth) as usize;
    let radius = ((3.0 * sigma).ceil() as usize).min(extent);
    let kernel = gaussian_kernel_q16(radius, sigma);
    let boundary = if neumann {
        Boundary::Neumann
    } else {
        Boundary::Dirichlet
    };

    let (w, h) = (d.width as usize, d.height as usize);
    let plane_len = d.plane_len();
    img.data_mut()
        .par_chunks_exact_mut(plane_len)
        .for_each_init(
            || vec![0u8; plane_len],
            |scratch, plane| {
                convolve(plane, scratch, h, w, 1, &kernel, boundary);
                convolve(scratch, plane, w, h, w, &kernel, boundary);
            },
        );

    if d.depth > 1 {
        // Slices of one channel are `plane_len` apart; treat each channel block as a column
        // stack and blur along z.
        let depth = d.depth as usize;
        let block = plane_len * depth;
        img.data_mut()
            .par_chunks_exact_mut(block)
            .for_each_init(
                || vec![0u8; block],
                |scratch, chan| {
                    convolve(chan, scratch, plane_len, depth, plane_len, &kernel, boundary);
                    chan.copy_from_slice(scratch);
                },
            );
    }
    Ok(())
}

fn gaussian_kernel_q16(radius: usize, sigma: f64) -> Vec<u32> {
    let r = radius as i64;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-r..=r)
        .map(|i| (-(i * i) as f64 / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();

    let mut q: Vec<u32> = weights
        .iter()
        .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = q.iter().map(|&v| i64::from(v)).sum();
    let mid = q.len() / 2;
    q[mid] = (i64::from(q[mid]) + 65536 - acc).clamp(0, 65536) as u32;
    q
}

/// One separable pass. `count` lines of `len` samples; consecutive samples of a line are
/// `stride` apart; lines are packed when `stride == 1` and interleaved otherwise.
fn convolve(
    src: &[u8],
    dst: &mut [u8],
    count: usize,
    len: usize,
    stride: usize,
    kernel: &[u32],
    boundary: Boundary,
) {
    let radius = (kernel.len() / 2) as i64;
    let line_step = if stride == 1 { len } else { 1 };
    for line in 0..count {
        let base = line * line_step;
        for i in 0..len {
            let mut acc = 0u64;
            for (k, &kw) in kernel.iter().enumerate() {
                let j = i as i64 + k as i64 - radius;
                if let Some(j) = boundary.resolve(j, len) {
                    acc += u64::from(kw) * u64::from(src[base + j * stride]);
                }
            }
            dst[base + i * stride] = ((acc + 32768) >> 16).min(255) as u8;
        }
    }
}

/// Sub-volume `[p0, p1]` (inclusive, either order per axis), reading outside the source
/// through `boundary`.
pub fn crop<T: Sample>(
    img: &PixelBuffer<T>,
    p0: [i32; 4],
    p1: [i32; 4],
    boundary: Boundary,
    max_elements: usize,
) -> BridgeResult<PixelBuffer<T>> {
    let lo: [i64; 4] = std::array::from_fn(|i| i64::from(p0[i].min(p1[i])));
    let hi: [i64; 4] = std::array::from_fn(|i| i64::from(p0[i].max(p1[i])));
    let mut ext = [0u32; 4];
    for i in 0..4 {
        ext[i] = u32::try_from(hi[i] - lo[i] + 1).map_err(|_| {
            BridgeError::allocation(format!(
                "crop extent {}..={} along axis {i} is too large",
                lo[i], hi[i]
            ))
        })?;
    }
    let dims = Dims::new(ext[0], ext[1], ext[2], ext[3]);
    let mut out = PixelBuffer::new(dims, T::default(), max_elements)?;
    if img.is_empty() || out.is_empty() {
        return Ok(out);
    }

    let src = img.dims();
    let src_len = [src.width, src.height, src.depth, src.spectrum].map(|v| v as usize);
    let mut i = 0usize;
    for c in 0..ext[3] as i64 {
        let sc = boundary.resolve(lo[3] + c, src_len[3]);
        for z in 0..ext[2] as i64 {
            let sz = boundary.resolve(lo[2] + z, src_len[2]);
            for y in 0..ext[1] as i64 {
                let sy = boundary.resolve(lo[1] + y, src_len[1]);
                for x in 0..ext[0] as i64 {
                    let sx = boundary.resolve(lo[0] + x, src_len[0]);
                    if let (Some(sx), Some(sy), Some(sz), Some(sc)) = (sx, sy, sz, sc) {
                        out.data_mut()[i] = img.data()[img.offset(sx, sy, sz, sc)];
                    }
                    i += 1;
                }
            }
        }
    }
    Ok(out)
}

/// `(1 - ratio) * img + ratio * other`, in place. Shapes must match.
pub fn blend(img: &mut Image, other: &Image, ratio: f64) -> BridgeResult<()> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(BridgeError::bad_argument(format!(
            "blend ratio must be in [0, 1], got {ratio}"
        )));
    }
    if img.dims() != other.dims() {
        return Err(BridgeError::library(format!(
            "blend: shape {} does not match {}",
            other.dims(),
            img.dims()
        )));
    }
    for (d, &s) in img.data_mut().iter_mut().zip(other.data()) {
        *d = u8::from_f64((1.0 - ratio) * f64::from(*d) + ratio * f64::from(s));
    }
    Ok(())
}

/// Replace each value with its entry in `lut` (one LUT color per column of `lut`).
///
/// The result has `spectrum * lut.spectrum` channels: channel `c * ls + k` holds LUT
/// component `k` for source channel `c`. Indices past the LUT resolve through `boundary`.
pub fn map_lut(
    img: &Image,
    lut: &Image,
    boundary: Boundary,
    max_elements: usize,
) -> BridgeResult<Image> {
    if lut.is_empty() {
        return Err(BridgeError::library("color map is empty"));
    }
    let d = img.dims();
    let ls = lut.spectrum();
    let spectrum = d
        .spectrum
        .checked_mul(ls)
        .ok_or_else(|| BridgeError::allocation("mapped spectrum overflows"))?;
    let mut out = Image::new(Dims::new(d.width, d.height, d.depth, spectrum), 0, max_elements)?;
    if img.is_empty() {
        return Ok(out);
    }

    let n = d.plane_len() * d.depth as usize;
    let entries = lut.len() / ls as usize;
    for c in 0..d.spectrum as usize {
        let src = &img.data()[c * n..(c + 1) * n];
        for k in 0..ls as usize {
            let palette = &lut.data()[k * entries..(k + 1) * entries];
            let base = (c * ls as usize + k) * n;
            let dst = &mut out.data_mut()[base..base + n];
            for (o, &v) in dst.iter_mut().zip(src) {
                *o = boundary
                    .resolve(i64::from(v), entries)
                    .map_or(0, |i| palette[i]);
            }
        }
    }
    Ok(out)
}

/// Copy pixels `src(p + offset)` to `dst(q + offset)` for each `(q, p)` pair.
///
/// Pairs with either end outside its buffer are skipped.
pub fn transfer(dst: &mut Image, src: &Image, pairs: &[(Pos3, Pos3)], offset: Pos3) {
    let spectrum = dst.spectrum().min(src.spectrum()) as usize;
    for &(q, p) in pairs {
        let [qx, qy, qz] = q.offset(offset).0.map(i64::from);
        let [px, py, pz] = p.offset(offset).0.map(i64::from);
        if !dst.contains_xyz(qx, qy, qz) || !src.contains_xyz(px, py, pz) {
            continue;
        }
        for c in 0..spectrum {
            let v = src.data()[src.offset(px as usize, py as usize, pz as usize, c)];
            let i = dst.offset(qx as usize, qy as usize, qz as usize, c);
            dst.data_mut()[i] = v;
        }
    }
}

/// Pack `(q, p)` position pairs into an `N x 1 x 1 x 6` integer map.
pub fn pairs_to_map(pairs: &[(Pos3, Pos3)], max_elements: usize) -> BridgeResult<IntMap> {
    let n = u32::try_from(pairs.len())
        .map_err(|_| BridgeError::allocation("too many position pairs"))?;
    let mut map = IntMap::new(Dims::new(n, 1, 1, 6), 0, max_elements)?;
    let len = pairs.len();
    for (i, (q, p)) in pairs.iter().enumerate() {
        for (k, v) in q.0.iter().chain(p.0.iter()).enumerate() {
            map.data_mut()[k * len + i] = *v;
        }
    }
    Ok(map)
}

/// Unpack an integer map built by [`pairs_to_map`].
pub fn map_to_pairs(map: &IntMap) -> BridgeResult<Vec<(Pos3, Pos3)>> {
    if map.is_empty() {
        return Ok(Vec::new());
    }
    if map.spectrum() != 6 || map.height() != 1 || map.depth() != 1 {
        return Err(BridgeError::bad_argument(format!(
            "position map must be Nx1x1x6, got {}",
            map.dims()
        )));
    }
    let n = map.width() as usize;
    let at = |k: usize, i: usize| map.data()[k * n + i];
    Ok((0..n)
        .map(|i| {
            (
                Pos3([at(0, i), at(1, i), at(2, i)]),
                Pos3([at(3, i), at(4, i), at(5, i)]),
            )
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/ops.rs"]
mod tests;
