//! Boundary functions and the name -> function table behind [`crate::Bridge::call`].
//!
//! Constructing functions answer `{:ok, handle}`. In-place functions answer their first
//! argument unchanged, so the host can chain calls on one handle. Queries answer plain
//! values.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::codec::tensor::{self, ElemType, Layout};
use crate::command::table::gray_mode;
use crate::display::window::{Display, Normalization};
use crate::foundation::core::{Axis, Boundary, Color, Pos3};
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::nif::bridge::Bridge;
use crate::pixel::buffer::{Dims, Image, IntMap};
use crate::pixel::draw::{self, Pen, PlotType};
use crate::pixel::io::{self, EncodeFormat};
use crate::pixel::{lut, ops};
use crate::registry::handle::Handle;
use crate::term::marshal::{Args, FromTerm, IntoTerm};
use crate::term::value::Term;

pub(crate) type Nif = fn(&Bridge, &[Term]) -> BridgeResult<Term>;

const FUNCS: &[(&str, Nif)] = &[
    ("create", create),
    ("create_from_bin", create_from_bin),
    ("create_list", create_list),
    ("create_map", create_map),
    ("duplicate", duplicate),
    ("load", load),
    ("load_from_memory", load_from_memory),
    ("save", save),
    ("convert_to", convert_to),
    ("set", set),
    ("get", get),
    ("assign", assign),
    ("fill", fill),
    ("clear", clear),
    ("shape", shape),
    ("size", size),
    ("resize", resize),
    ("get_resize", get_resize),
    ("mirror", mirror),
    ("transpose", transpose),
    ("threshold", threshold),
    ("get_threshold", get_threshold),
    ("get_gray", get_gray),
    ("get_invert", get_invert),
    ("get_yuv", get_yuv),
    ("blur", blur),
    ("get_crop", get_crop),
    ("draw_graph", draw_graph),
    ("draw_circle", draw_circle),
    ("draw_circle_filled", draw_circle_filled),
    ("draw_line", draw_line),
    ("draw_rect", draw_rect),
    ("draw_rect_filled", draw_rect_filled),
    ("draw_triangle", draw_triangle),
    ("draw_triangle_filled", draw_triangle_filled),
    ("blend", blend),
    ("draw_text", draw_text),
    ("color_mapping", color_mapping),
    ("color_mapping_by", color_mapping_by),
    ("display", display),
    ("to_bin", to_bin),
    ("from_bin", from_bin),
    ("transfer", transfer),
    ("run", run),
    ("release", release),
    ("display_create", display_create),
    ("display_wait", display_wait),
    ("display_wait_time", display_wait_time),
    ("display_is_closed", display_is_closed),
    ("display_button", display_button),
    ("display_mouse_x", display_mouse_x),
    ("display_mouse_y", display_mouse_y),
];

static TABLE: LazyLock<HashMap<&'static str, Nif>> =
    LazyLock::new(|| FUNCS.iter().copied().collect());

pub(crate) fn lookup(name: &str) -> Option<Nif> {
    TABLE.get(name).copied()
}

/// Every boundary function name, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    FUNCS.iter().map(|(name, _)| *name)
}

/// Lock the image named by `target`, mutate it, and answer `target`.
fn in_place(
    b: &Bridge,
    target: &Term,
    f: impl FnOnce(&mut Image) -> BridgeResult<()>,
) -> BridgeResult<Term> {
    let img = b.shared::<Image>(target)?;
    let mut guard = img.lock()?;
    f(&mut *guard)?;
    Ok(target.clone())
}

/// Build a new image from the one named by `source` and register it.
fn derive(
    b: &Bridge,
    source: &Term,
    f: impl FnOnce(&Image) -> BridgeResult<Image>,
) -> BridgeResult<Term> {
    let out = {
        let img = b.shared::<Image>(source)?;
        let guard = img.lock()?;
        f(&*guard)?
    };
    b.adopt(out)
}

fn dims(a: &mut Args<'_>) -> BridgeResult<Dims> {
    Ok(Dims::new(a.next()?, a.next()?, a.next()?, a.next()?))
}

fn corners(a: &mut Args<'_>) -> BridgeResult<[i32; 4]> {
    Ok([a.next()?, a.next()?, a.next()?, a.next()?])
}

/// `color, opacity` followed by an optional line pattern.
fn pen(a: &mut Args<'_>, patterned: bool) -> BridgeResult<Pen> {
    let color: Color = a.next()?;
    let pen = Pen::new(color, a.next()?);
    Ok(if patterned {
        pen.with_pattern(a.next()?)
    } else {
        pen
    })
}

// ---- construction ----

fn create(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("create", args, 5)?;
    let dims = dims(&mut a)?;
    let value: u8 = a.next()?;
    b.adopt(Image::new(dims, value, b.max_elements())?)
}

fn create_from_bin(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("create_from_bin", args, 6)?;
    let bytes = a.binary()?;
    let dims = dims(&mut a)?;
    let elem: ElemType = a.next()?;
    b.adopt(tensor::create_from_bytes(bytes, dims, elem, b.max_elements())?)
}

/// Planar values (x fastest, then y, z, c), one list element per sample.
fn create_list(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("create_list", args, 5)?;
    let dims = dims(&mut a)?;
    let values: Vec<u8> = a.next()?;
    let want = dims.checked_len(b.max_elements())?;
    if values.len() != want {
        return Err(BridgeError::bad_argument(format!(
            "create_list: {dims} needs {want} values, got {}",
            values.len()
        )));
    }
    b.adopt(Image::from_vec(dims, values)?)
}

/// Pack `[{q, p}, ...]` position pairs into an integer map for `transfer`.
fn create_map(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("create_map", args, 1)?;
    let pairs: Vec<(Pos3, Pos3)> = a.next()?;
    b.adopt(ops::pairs_to_map(&pairs, b.max_elements())?)
}

fn duplicate(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("duplicate", args, 1)?;
    b.adopt(b.snapshot::<Image>(a.term()?)?)
}

fn load(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("load", args, 1)?;
    let path: String = a.next()?;
    b.adopt(io::load(Path::new(&path), b.max_elements())?)
}

fn load_from_memory(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("load_from_memory", args, 1)?;
    b.adopt(io::decode(a.binary()?, b.max_elements())?)
}

fn save(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("save", args, 2)?;
    let img = b.shared::<Image>(a.term()?)?;
    let path: String = a.next()?;
    io::save(&*img.lock()?, Path::new(&path), b.opts().jpeg_quality)?;
    Ok(Term::ok())
}

fn convert_to(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("convert_to", args, 2)?;
    let img = b.shared::<Image>(a.term()?)?;
    let format = EncodeFormat::parse(a.atom()?)?;
    let bytes = io::encode(&*img.lock()?, format, b.opts().jpeg_quality)?;
    Ok(Term::ok_tuple(Term::Binary(bytes)))
}

// ---- pixels and whole-buffer edits ----

/// `set(value, img, x, y, z, c)`: answers the image.
fn set(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("set", args, 6)?;
    let value: u8 = a.next()?;
    let target = a.term()?;
    let (x, y, z, c) = (a.next()?, a.next()?, a.next()?, a.next()?);
    in_place(b, target, |img| img.set(x, y, z, c, value))
}

fn get(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("get", args, 5)?;
    let img = b.shared::<Image>(a.term()?)?;
    let (x, y, z, c) = (a.next()?, a.next()?, a.next()?, a.next()?);
    let value = img.lock()?.get(x, y, z, c)?;
    Ok(value.into_term())
}

fn assign(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("assign", args, 2)?;
    let target = a.term()?;
    let src = b.snapshot::<Image>(a.term()?)?;
    in_place(b, target, |img| {
        *img = src;
        Ok(())
    })
}

fn fill(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("fill", args, 2)?;
    let target = a.term()?;
    let value: u8 = a.next()?;
    in_place(b, target, |img| {
        img.fill(value);
        Ok(())
    })
}

fn clear(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("clear", args, 1)?;
    in_place(b, a.term()?, |img| {
        img.clear();
        Ok(())
    })
}

fn shape(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("shape", args, 1)?;
    let img = b.shared::<Image>(a.term()?)?;
    let dims = img.lock()?.dims();
    Ok(dims.into_term())
}

fn size(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("size", args, 1)?;
    let img = b.shared::<Image>(a.term()?)?;
    let len = img.lock()?.len();
    Ok(len.into_term())
}

fn resize(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("resize", args, 3)?;
    let target = a.term()?;
    let (w, h): (i32, i32) = (a.next()?, a.next()?);
    let max = b.max_elements();
    in_place(b, target, |img| {
        *img = ops::resize(img, w, h, max)?;
        Ok(())
    })
}

fn get_resize(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("get_resize", args, 5)?;
    let source = a.term()?;
    let (w, h, align, fill) = (a.next()?, a.next()?, a.next()?, a.next()?);
    derive(b, source, |img| ops::resize_fit(img, w, h, align, fill, b.max_elements()))
}

fn mirror(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("mirror", args, 2)?;
    let target = a.term()?;
    let axis = Axis::parse(a.atom()?)?;
    in_place(b, target, |img| {
        ops::mirror(img, axis);
        Ok(())
    })
}

fn transpose(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("transpose", args, 1)?;
    in_place(b, a.term()?, ops::transpose)
}

fn threshold_args(a: &mut Args<'_>) -> BridgeResult<(u8, bool, bool)> {
    Ok((a.next()?, a.next()?, a.next()?))
}

fn threshold(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("threshold", args, 4)?;
    let target = a.term()?;
    let (value, soft, strict) = threshold_args(&mut a)?;
    in_place(b, target, |img| {
        ops::threshold(img, value, soft, strict);
        Ok(())
    })
}

fn get_threshold(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("get_threshold", args, 4)?;
    let source = a.term()?;
    let (value, soft, strict) = threshold_args(&mut a)?;
    derive(b, source, |img| {
        let mut out = img.clone();
        ops::threshold(&mut out, value, soft, strict);
        Ok(out)
    })
}

fn get_gray(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("get_gray", args, 2)?;
    let source = a.term()?;
    let negative = gray_mode(a.next()?)?;
    derive(b, source, |img| ops::gray(img, negative, b.max_elements()))
}

fn get_invert(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("get_invert", args, 1)?;
    derive(b, a.term()?, |img| {
        let mut out = img.clone();
        ops::invert(&mut out);
        Ok(out)
    })
}

fn get_yuv(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("get_yuv", args, 1)?;
    derive(b, a.term()?, ops::rgb_to_yuv)
}

/// `blur(img, sigma, neumann, gaussian)`; every blur is gaussian.
fn blur(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("blur", args, 4)?;
    let target = a.term()?;
    let sigma: f64 = a.next()?;
    let neumann: bool = a.next()?;
    let _gaussian: bool = a.next()?;
    in_place(b, target, |img| ops::blur(img, sigma, neumann))
}

fn get_crop(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("get_crop", args, 10)?;
    let source = a.term()?;
    let p0 = corners(&mut a)?;
    let p1 = corners(&mut a)?;
    let boundary = Boundary::from_code(a.next()?)?;
    derive(b, source, |img| ops::crop(img, p0, p1, boundary, b.max_elements()))
}

// ---- drawing ----

fn draw_graph(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("draw_graph", args, 9)?;
    let target = a.term()?;
    let data = b.snapshot::<Image>(a.term()?)?;
    let color: Color = a.next()?;
    let opacity: f64 = a.next()?;
    let plot = PlotType::from_code(a.next()?)?;
    let vertex: i32 = a.next()?;
    let (ymin, ymax): (f64, f64) = (a.next()?, a.next()?);
    let pen = Pen::new(color, opacity).with_pattern(a.next()?);
    in_place(b, target, |img| {
        draw::graph(img, &data, &pen, plot, vertex, ymin, ymax)
    })
}

fn draw_circle(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("draw_circle", args, 7)?;
    let target = a.term()?;
    let (x, y, r) = (a.next()?, a.next()?, a.next()?);
    let pen = pen(&mut a, true)?;
    in_place(b, target, |img| {
        draw::circle(img, x, y, r, &pen);
        Ok(())
    })
}

fn draw_circle_filled(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("draw_circle_filled", args, 6)?;
    let target = a.term()?;
    let (x, y, r) = (a.next()?, a.next()?, a.next()?);
    let pen = pen(&mut a, false)?;
    in_place(b, target, |img| {
        draw::circle_filled(img, x, y, r, &pen);
        Ok(())
    })
}

/// `draw_line(img, x0, y0, x1, y1, color, thick, opacity, pattern)`.
fn draw_line(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("draw_line", args, 9)?;
    let target = a.term()?;
    let [x0, y0, x1, y1] = corners(&mut a)?;
    let color: Color = a.next()?;
    let thick: u32 = a.next()?;
    let opacity: f64 = a.next()?;
    let pen = Pen::new(color, opacity).with_pattern(a.next()?);
    in_place(b, target, |img| {
        draw::thick_line(img, x0, y0, x1, y1, thick, &pen);
        Ok(())
    })
}

fn draw_rect(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("draw_rect", args, 8)?;
    let target = a.term()?;
    let [x0, y0, x1, y1] = corners(&mut a)?;
    let pen = pen(&mut a, true)?;
    in_place(b, target, |img| {
        draw::rectangle(img, x0, y0, x1, y1, &pen);
        Ok(())
    })
}

fn draw_rect_filled(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("draw_rect_filled", args, 7)?;
    let target = a.term()?;
    let [x0, y0, x1, y1] = corners(&mut a)?;
    let pen = pen(&mut a, false)?;
    in_place(b, target, |img| {
        draw::rectangle_filled(img, x0, y0, x1, y1, &pen);
        Ok(())
    })
}

fn triangle_points(a: &mut Args<'_>) -> BridgeResult<[(i32, i32); 3]> {
    Ok([
        (a.next()?, a.next()?),
        (a.next()?, a.next()?),
        (a.next()?, a.next()?),
    ])
}

fn draw_triangle(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("draw_triangle", args, 10)?;
    let target = a.term()?;
    let points = triangle_points(&mut a)?;
    let pen = pen(&mut a, true)?;
    in_place(b, target, |img| {
        draw::triangle(img, points, &pen);
        Ok(())
    })
}

fn draw_triangle_filled(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("draw_triangle_filled", args, 9)?;
    let target = a.term()?;
    let points = triangle_points(&mut a)?;
    let pen = pen(&mut a, false)?;
    in_place(b, target, |img| {
        draw::triangle_filled(img, points, &pen);
        Ok(())
    })
}

fn blend(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("blend", args, 3)?;
    let target = a.term()?;
    let other = b.snapshot::<Image>(a.term()?)?;
    let ratio: f64 = a.next()?;
    in_place(b, target, |img| ops::blend(img, &other, ratio))
}

/// `draw_text(img, x, y, text, fg, bg, opacity, font_height)`; colors are palette names.
fn draw_text(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("draw_text", args, 8)?;
    let target = a.term()?;
    let (x, y) = (a.next()?, a.next()?);
    let text: String = a.next()?;
    let fg = a.color_name()?;
    let bg = a.color_name()?;
    let opacity: f64 = a.next()?;
    let font_height: u32 = a.next()?;
    in_place(b, target, |img| {
        draw::text(img, x, y, &text, fg, bg, opacity, font_height);
        Ok(())
    })
}

fn color_mapping(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("color_mapping", args, 3)?;
    let source = a.term()?;
    let table = lut::named(a.atom()?)?;
    let boundary = Boundary::from_code(a.next()?)?;
    derive(b, source, |img| ops::map_lut(img, &table, boundary, b.max_elements()))
}

fn color_mapping_by(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("color_mapping_by", args, 3)?;
    let source = a.term()?;
    let colors: Vec<Color> = a.next()?;
    let table = lut::custom(&colors)?;
    let boundary = Boundary::from_code(a.next()?)?;
    derive(b, source, |img| ops::map_lut(img, &table, boundary, b.max_elements()))
}

/// `display(img, display)`: show `img` and answer it.
fn display(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("display", args, 2)?;
    let target = a.term()?;
    let frame = b.snapshot::<Image>(target)?;
    let disp = b.shared::<Display>(a.term()?)?;
    disp.lock()?.show(&frame);
    Ok(target.clone())
}

// ---- tensor codec ----

/// `to_bin(img, dtype, mode, params, nchw, bgr)` -> `{:ok, shape, blob}`.
fn to_bin(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("to_bin", args, 6)?;
    let img = b.shared::<Image>(a.term()?)?;
    let layout = Layout::from_args(&mut a)?;
    let encoded = tensor::to_bin(&*img.lock()?, &layout)?;
    Ok(encoded.into_term())
}

/// `from_bin(blob, w, h, d, c, dtype, mode, params, nchw, bgr)` -> `{:ok, handle}`.
fn from_bin(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("from_bin", args, 10)?;
    let bytes = a.binary()?;
    let dims = dims(&mut a)?;
    let layout = Layout::from_args(&mut a)?;
    b.adopt(tensor::from_bin(bytes, dims, &layout, b.max_elements())?)
}

/// `transfer(dst, src, pairs, cx, cy, cz)`; `pairs` is a list of `{q, p}` or an integer
/// map from `create_map`.
fn transfer(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("transfer", args, 6)?;
    let target = a.term()?;
    let src = b.snapshot::<Image>(a.term()?)?;
    let pairs = match a.term()? {
        list @ Term::List(_) => Vec::<(Pos3, Pos3)>::from_term(list)?,
        other => ops::map_to_pairs(&b.snapshot::<IntMap>(other)?)?,
    };
    let offset = Pos3([a.next()?, a.next()?, a.next()?]);
    in_place(b, target, |img| {
        ops::transfer(img, &src, &pairs, offset);
        Ok(())
    })
}

// ---- scripts and lifetime ----

fn run(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("run", args, 1)?;
    b.run(a.list()?)
}

/// Answers `true` when this call released the handle, `false` when it was already gone.
fn release(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("release", args, 1)?;
    let handle: Handle = a.next()?;
    Ok(b.registry().release(&handle).into_term())
}

// ---- display ----

/// `display_create(img, title, normalization, fullscreen, closed)`.
fn display_create(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("display_create", args, 5)?;
    let frame = b.snapshot::<Image>(a.term()?)?;
    let title = String::from_utf8_lossy(a.binary()?).into_owned();
    let normalization = Normalization::from_code(a.next()?)?;
    let (fullscreen, closed) = (a.next()?, a.next()?);
    b.adopt(Display::new(frame, title, normalization, fullscreen, closed))
}

/// Run `f` on the display named by `target`.
fn with_display<R>(
    b: &Bridge,
    target: &Term,
    f: impl FnOnce(&mut Display) -> R,
) -> BridgeResult<R> {
    let disp = b.shared::<Display>(target)?;
    let mut guard = disp.lock()?;
    Ok(f(&mut *guard))
}

fn display_wait(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("display_wait", args, 1)?;
    let target = a.term()?;
    with_display(b, target, Display::wait)?;
    Ok(target.clone())
}

fn display_wait_time(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("display_wait_time", args, 2)?;
    let target = a.term()?;
    let ms: u32 = a.next()?;
    with_display(b, target, |d| d.wait_time(ms))?;
    Ok(target.clone())
}

fn display_is_closed(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("display_is_closed", args, 1)?;
    Ok(with_display(b, a.term()?, |d| d.is_closed())?.into_term())
}

fn display_button(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("display_button", args, 1)?;
    Ok(with_display(b, a.term()?, |d| d.button())?.into_term())
}

fn display_mouse_x(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("display_mouse_x", args, 1)?;
    Ok(with_display(b, a.term()?, |d| d.mouse_x())?.into_term())
}

fn display_mouse_y(b: &Bridge, args: &[Term]) -> BridgeResult<Term> {
    let mut a = Args::exact("display_mouse_y", args, 1)?;
    Ok(with_display(b, a.term()?, |d| d.mouse_y())?.into_term())
}

#[cfg(test)]
#[path = "../../tests/unit/nif/funcs.rs"]
mod tests;
