//! In-place 2-D drawing on the first slice of an image.
//!
//! Colors write channels `0..min(spectrum, 3)`; further channels are left as they are.

use kurbo::{BezPath, Point, Shape};

use crate::foundation::core::Color;
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::pixel::buffer::{Image, Sample};
use crate::pixel::font;

/// Solid 32-bit line pattern.
pub const SOLID: u32 = !0;

/// Color, opacity and dash pattern shared by every primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    /// Stroke/fill color.
    pub color: Color,
    /// Blend factor, clamped to `[0, 1]`.
    pub opacity: f64,
    /// Bit mask walked MSB first, one bit per plotted pixel; 0 draws nothing.
    pub pattern: u32,
}

impl Pen {
    /// Solid pen.
    pub fn new(color: Color, opacity: f64) -> Self {
        Self {
            color,
            opacity,
            pattern: SOLID,
        }
    }

    /// Same pen with `pattern`.
    pub fn with_pattern(self, pattern: u32) -> Self {
        Self { pattern, ..self }
    }
}

/// Whether step `k` of a primitive is drawn under `pattern` (MSB first, repeating).
fn pattern_on(pattern: u32, k: i64) -> bool {
    pattern & ((1u32 << 31) >> k.rem_euclid(32)) != 0
}

/// `num / den` rounded half up; `den > 0`.
fn div_round(num: i128, den: i128) -> i64 {
    (2 * num + den).div_euclid(2 * den) as i64
}

fn bounds(img: &Image) -> (i64, i64) {
    (i64::from(img.width()), i64::from(img.height()))
}

/// Visit the pixels of segment `a-b` as `(step, x, y)`, both ends included.
///
/// Steps advance one pixel along the major axis. Only steps whose major coordinate lies
/// inside `w x h` are visited, so the cost is bounded by the image extent.
fn walk_line(
    a: (i64, i64),
    b: (i64, i64),
    (w, h): (i64, i64),
    mut visit: impl FnMut(i64, i64, i64),
) {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let n = dx.abs().max(dy.abs());
    if n == 0 {
        visit(0, a.0, a.1);
        return;
    }
    let (m0, dir, extent) = if dx.abs() >= dy.abs() {
        (a.0, dx.signum(), w)
    } else {
        (a.1, dy.signum(), h)
    };
    let (k_lo, k_hi) = if dir > 0 {
        (-m0, extent - 1 - m0)
    } else {
        (m0 - (extent - 1), m0)
    };
    for k in k_lo.max(0)..=k_hi.min(n) {
        let x = a.0 + div_round(i128::from(k) * i128::from(dx), i128::from(n));
        let y = a.1 + div_round(i128::from(k) * i128::from(dy), i128::from(n));
        visit(k, x, y);
    }
}

fn plot(img: &mut Image, x: i64, y: i64, color: Color, opacity: f64) {
    if !img.contains_xyz(x, y, 0) {
        return;
    }
    let o = opacity.clamp(0.0, 1.0);
    let channels = img.spectrum().min(3) as usize;
    for c in 0..channels {
        let i = img.offset(x as usize, y as usize, 0, c);
        let v = color.channel(c);
        let d = &mut img.data_mut()[i];
        *d = if o >= 1.0 {
            v
        } else {
            u8::from_f64(f64::from(*d) * (1.0 - o) + f64::from(v) * o)
        };
    }
}

fn hline(img: &mut Image, x0: i64, x1: i64, y: i64, pen: &Pen) {
    let (a, b) = (x0.min(x1).max(0), x0.max(x1).min(i64::from(img.width()) - 1));
    for x in a..=b {
        plot(img, x, y, pen.color, pen.opacity);
    }
}

fn segment(img: &mut Image, a: (i64, i64), b: (i64, i64), pen: &Pen) {
    if pen.pattern == 0 {
        return;
    }
    let extent = bounds(img);
    walk_line(a, b, extent, |k, x, y| {
        if pattern_on(pen.pattern, k) {
            plot(img, x, y, pen.color, pen.opacity);
        }
    });
}

/// One-pixel line, both ends included.
pub fn line(img: &mut Image, x0: i32, y0: i32, x1: i32, y1: i32, pen: &Pen) {
    segment(
        img,
        (i64::from(x0), i64::from(y0)),
        (i64::from(x1), i64::from(y1)),
        pen,
    );
}

/// Line of width `thick`; widths above 2 are drawn as a filled quadrilateral.
pub fn thick_line(img: &mut Image, x0: i32, y0: i32, x1: i32, y1: i32, thick: u32, pen: &Pen) {
    let (ax, ay, bx, by) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    let (dx, dy) = ((ax - bx) as f64, (ay - by) as f64);
    let len = dx.hypot(dy);
    if thick <= 2 || len == 0.0 {
        segment(img, (ax, ay), (bx, by), pen);
        return;
    }
    let half = f64::from(thick) / 2.0;
    let x_adj = (dy * half / len) as i64;
    let y_adj = (dx * half / len) as i64;
    let quad = [
        (ax - x_adj, ay + y_adj),
        (ax + x_adj, ay - y_adj),
        (bx + x_adj, by - y_adj),
        (bx - x_adj, by + y_adj),
    ];
    polygon_filled(img, &quad, pen.color, pen.opacity);
}

/// Fill the polygon through `points` (non-zero winding at pixel centers, edges included).
pub fn polygon_filled(img: &mut Image, points: &[(i64, i64)], color: Color, opacity: f64) {
    let Some((&first, rest)) = points.split_first() else {
        return;
    };
    let mut path = BezPath::new();
    path.move_to((first.0 as f64, first.1 as f64));
    for &(x, y) in rest {
        path.line_to((x as f64, y as f64));
    }
    path.close_path();

    let (w, h) = bounds(img);
    let bbox = path.bounding_box();
    let x_lo = (bbox.x0.floor() as i64).max(0);
    let y_lo = (bbox.y0.floor() as i64).max(0);
    let x_hi = (bbox.x1.ceil() as i64).min(w - 1);
    let y_hi = (bbox.y1.ceil() as i64).min(h - 1);
    // Interior by winding, then the outline so pixels on an edge are covered exactly once.
    let mut covered = Vec::new();
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            if path.winding(Point::new(x as f64, y as f64)) != 0 {
                covered.push((x, y));
            }
        }
    }
    let mut ring = points.to_vec();
    ring.push(first);
    for edge in ring.windows(2) {
        walk_line(edge[0], edge[1], (w, h), |_, x, y| {
            if (0..w).contains(&x) && (0..h).contains(&y) {
                covered.push((x, y));
            }
        });
    }
    covered.sort_unstable();
    covered.dedup();
    for (x, y) in covered {
        plot(img, x, y, color, opacity);
    }
}

/// Offsets `d >= 0` with `center + d` or `center - d` in `0..extent`, capped at `limit`.
fn near_offsets(center: i64, extent: i64, limit: i64, out: &mut Vec<i64>) {
    for (lo, hi) in [(-center, extent - 1 - center), (center - (extent - 1), center)] {
        out.extend(lo.max(0)..=hi.min(limit));
    }
}

/// Circle outline, one octant step per row offset `y` with `x = round(sqrt(r^2 - y^2))`.
///
/// Only offsets that can land on the image are visited; the pattern still advances by
/// eight points per step.
pub fn circle(img: &mut Image, cx: i32, cy: i32, radius: i32, pen: &Pen) {
    if pen.pattern == 0 || radius < 0 {
        return;
    }
    let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
    let (w, h) = bounds(img);
    let mut steps = Vec::new();
    near_offsets(cy, h, r, &mut steps);
    near_offsets(cx, w, r, &mut steps);
    steps.sort_unstable();
    steps.dedup();
    for y in steps {
        let x = ((r * r - y * y) as f64).sqrt().round() as i64;
        if x < y {
            continue;
        }
        let points = [
            (cx + x, cy + y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx - x, cy + y),
            (cx - x, cy - y),
            (cx - y, cy - x),
            (cx + y, cy - x),
            (cx + x, cy - y),
        ];
        for (j, (px, py)) in (0i64..).zip(points) {
            if pattern_on(pen.pattern, 8 * y + j) {
                plot(img, px, py, pen.color, pen.opacity);
            }
        }
    }
}

/// Filled disc.
pub fn circle_filled(img: &mut Image, cx: i32, cy: i32, radius: i32, pen: &Pen) {
    if radius < 0 {
        return;
    }
    let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
    let h = i64::from(img.height());
    for y in (cy - r).max(0)..=(cy + r).min(h - 1) {
        let dy = y - cy;
        let half = (((r * r - dy * dy) as f64).sqrt() + 0.5) as i64;
        hline(img, cx - half, cx + half, y, pen);
    }
}

/// Rectangle outline between two corners (inclusive).
pub fn rectangle(img: &mut Image, x0: i32, y0: i32, x1: i32, y1: i32, pen: &Pen) {
    let (l, r) = (x0.min(x1), x0.max(x1));
    let (t, b) = (y0.min(y1), y0.max(y1));
    line(img, l, t, r, t, pen);
    line(img, r, t, r, b, pen);
    line(img, r, b, l, b, pen);
    line(img, l, b, l, t, pen);
}

/// Filled rectangle between two corners (inclusive).
pub fn rectangle_filled(img: &mut Image, x0: i32, y0: i32, x1: i32, y1: i32, pen: &Pen) {
    let h = i64::from(img.height());
    let t = i64::from(y0.min(y1)).max(0);
    let b = i64::from(y0.max(y1)).min(h - 1);
    for y in t..=b {
        hline(img, i64::from(x0), i64::from(x1), y, pen);
    }
}

/// Triangle outline.
pub fn triangle(img: &mut Image, p: [(i32, i32); 3], pen: &Pen) {
    line(img, p[0].0, p[0].1, p[1].0, p[1].1, pen);
    line(img, p[1].0, p[1].1, p[2].0, p[2].1, pen);
    line(img, p[2].0, p[2].1, p[0].0, p[0].1, pen);
}

/// Filled triangle.
pub fn triangle_filled(img: &mut Image, p: [(i32, i32); 3], pen: &Pen) {
    let points = p.map(|(x, y)| (i64::from(x), i64::from(y)));
    polygon_filled(img, &points, pen.color, pen.opacity);
}

/// Scale a ratio coordinate to pixels (truncating toward zero).
pub fn ratio_to_px(ratio: f64, extent: u32) -> i32 {
    (ratio * f64::from(extent)) as i32
}

/// How [`graph`] joins data points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotType {
    /// Vertices only.
    None,
    /// Straight segments.
    Segments,
    /// Smoothed curve (drawn as segments).
    Spline,
    /// Vertical bars from the baseline.
    Bars,
}

impl PlotType {
    /// Decode the numeric plot type (0..=3).
    pub fn from_code(code: u32) -> BridgeResult<Self> {
        Ok(match code {
            0 => Self::None,
            1 => Self::Segments,
            2 => Self::Spline,
            3 => Self::Bars,
            other => {
                return Err(BridgeError::bad_argument(format!(
                    "plot type must be 0..=3, got {other}"
                )));
            }
        })
    }
}

/// Plot the values of `data` (first channel, storage order) across the image width.
///
/// `ymin == ymax` scales to the data range. `vertex` selects the marker drawn at each
/// point: 0 none, 1 point, 2/3 cross, 4/5 disc/circle, 6/7 filled/outlined square.
pub fn graph(
    img: &mut Image,
    data: &Image,
    pen: &Pen,
    plot: PlotType,
    vertex: i32,
    ymin: f64,
    ymax: f64,
) -> BridgeResult<()> {
    if !(0..=7).contains(&vertex) {
        return Err(BridgeError::bad_argument(format!(
            "vertex type must be 0..=7, got {vertex}"
        )));
    }
    let n = (data.len() / data.spectrum().max(1) as usize).min(data.len());
    if img.is_empty() || n == 0 {
        return Ok(());
    }
    let values = &data.data()[..n];
    let (lo, hi) = if ymin == ymax {
        let lo = values.iter().copied().min().map_or(0.0, f64::from);
        let hi = values.iter().copied().max().map_or(0.0, f64::from);
        (lo, hi)
    } else {
        (ymin, ymax)
    };
    let span = if hi == lo { 1.0 } else { hi - lo };
    let w1 = f64::from(img.width() - 1);
    let h1 = f64::from(img.height() - 1);

    let points: Vec<(i32, i32)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = if n == 1 { w1 / 2.0 } else { i as f64 * w1 / (n - 1) as f64 };
            let y = h1 * (hi - f64::from(v)) / span;
            (x.round() as i32, y.round() as i32)
        })
        .collect();

    match plot {
        PlotType::None => {}
        PlotType::Segments | PlotType::Spline => {
            for seg in points.windows(2) {
                line(img, seg[0].0, seg[0].1, seg[1].0, seg[1].1, pen);
            }
        }
        PlotType::Bars => {
            let base = (h1 * hi / span).round().clamp(0.0, h1) as i32;
            for &(x, y) in &points {
                line(img, x, base, x, y, pen);
            }
        }
    }

    let solid = pen.with_pattern(SOLID);
    for &(x, y) in &points {
        match vertex {
            1 => plot_point(img, x, y, &solid),
            2 | 3 => {
                line(img, x - 3, y, x + 3, y, &solid);
                line(img, x, y - 3, x, y + 3, &solid);
            }
            4 => circle_filled(img, x, y, 3, &solid),
            5 => circle(img, x, y, 3, &solid),
            6 => rectangle_filled(img, x - 3, y - 3, x + 3, y + 3, &solid),
            7 => rectangle(img, x - 3, y - 3, x + 3, y + 3, &solid),
            _ => {}
        }
    }
    Ok(())
}

fn plot_point(img: &mut Image, x: i32, y: i32, pen: &Pen) {
    plot(img, i64::from(x), i64::from(y), pen.color, pen.opacity);
}

/// Render `text` with the built-in bitmap font.
///
/// `font_height` is the line height in pixels; glyphs scale by whole multiples of the
/// 8-pixel cell. `bg` paints each character cell first; `None` leaves it transparent.
#[allow(clippy::too_many_arguments)]
pub fn text(
    img: &mut Image,
    x: i32,
    y: i32,
    text: &str,
    fg: Option<Color>,
    bg: Option<Color>,
    opacity: f64,
    font_height: u32,
) {
    let scale = i64::from((font_height / font::CELL_H).max(1));
    let cell_w = i64::from(font::CELL_W) * scale;
    let cell_h = i64::from(font::CELL_H) * scale;
    let (w, h) = bounds(img);
    let (mut cx, mut cy) = (i64::from(x), i64::from(y));

    for ch in text.chars() {
        if ch == '\n' {
            cx = i64::from(x);
            cy += cell_h;
            continue;
        }
        // Only the part of the cell that lands on the image.
        let rows = (-cy).max(0)..cell_h.min(h - cy);
        let cols = (-cx).max(0)..cell_w.min(w - cx);
        for py in rows {
            for px in cols.clone() {
                let (col, row) = ((px / scale) as u32, (py / scale) as u32);
                let color = if font::ink(ch, col, row) { fg } else { bg };
                if let Some(color) = color {
                    plot(img, cx + px, cy + py, color, opacity);
                }
            }
        }
        cx += cell_w;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/draw.rs"]
mod tests;
