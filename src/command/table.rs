//! Script commands and the name -> command table.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::codec::tensor::{self, Layout};
use crate::display::window::{Display, Normalization};
use crate::foundation::config::BridgeOpts;
use crate::foundation::core::{Axis, Boundary, Color, Pos3};
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::pixel::buffer::{Dims, Image};
use crate::pixel::draw::{self, Pen};
use crate::pixel::io::{self, EncodeFormat};
use crate::pixel::{lut, ops};
use crate::registry::handle::Handle;
use crate::registry::table::{Registry, Shared};
use crate::term::marshal::{Args, FromTerm, IntoTerm};
use crate::term::value::Term;

/// Where in a script a command may run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Builds the pipeline image; allowed until the first mutation.
    Seed,
    /// Mutates the image in place.
    Grow,
    /// Produces the script result and ends the script.
    Crop,
}

/// What a command asks the interpreter to do next.
#[derive(Debug)]
pub enum Step {
    /// Image (re)created; continue.
    Seed,
    /// Image mutated; continue.
    Grow,
    /// Stop and return this term.
    Crop(Term),
}

/// State a script runs against: the pipeline image plus the bridge it was sent to.
pub struct ScriptCtx<'a> {
    pub(crate) registry: &'a Registry,
    pub(crate) opts: &'a BridgeOpts,
    pub(crate) img: Image,
}

impl<'a> ScriptCtx<'a> {
    /// Fresh context with an empty pipeline image.
    pub fn new(registry: &'a Registry, opts: &'a BridgeOpts) -> Self {
        Self {
            registry,
            opts,
            img: Image::empty(),
        }
    }

    fn max(&self) -> usize {
        self.opts.max_elements
    }

    fn image(&self, term: &Term) -> BridgeResult<Shared<Image>> {
        self.registry.resolve(&Handle::from_term(term)?)
    }

    fn register(&self, img: Image) -> BridgeResult<Term> {
        Ok(Term::ok_tuple(self.registry.register(img)?.into_term()))
    }
}

type Handler = fn(&mut ScriptCtx<'_>, &[Term]) -> BridgeResult<Step>;

/// One dispatch table entry.
#[derive(Clone, Copy)]
pub struct Command {
    /// Script name.
    pub name: &'static str,
    /// Phase the command belongs to.
    pub phase: Phase,
    pub(crate) run: Handler,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

const COMMANDS: &[(&str, Phase, Handler)] = &[
    ("copy", Phase::Seed, copy),
    ("create", Phase::Seed, create),
    ("create_from_bin", Phase::Seed, create_from_bin),
    ("load", Phase::Seed, load),
    ("load_from_memory", Phase::Seed, load_from_memory),
    ("clear", Phase::Grow, clear),
    ("fill", Phase::Grow, fill),
    ("invert", Phase::Grow, invert),
    ("gray", Phase::Grow, gray),
    ("threshold", Phase::Grow, threshold),
    ("blend", Phase::Grow, blend),
    ("color_mapping", Phase::Grow, color_mapping),
    ("color_mapping_by", Phase::Grow, color_mapping_by),
    ("blur", Phase::Grow, blur),
    ("mirror", Phase::Grow, mirror),
    ("transpose", Phase::Grow, transpose),
    ("resize", Phase::Grow, resize),
    ("set", Phase::Grow, set),
    ("draw_line", Phase::Grow, draw_line),
    ("draw_line_ratio", Phase::Grow, draw_line_ratio),
    ("draw_circle", Phase::Grow, draw_circle),
    ("fill_circle", Phase::Grow, fill_circle),
    ("draw_rectangle", Phase::Grow, draw_rectangle),
    ("draw_rectangle_ratio", Phase::Grow, draw_rectangle_ratio),
    ("fill_rectangle", Phase::Grow, fill_rectangle),
    ("fill_rectangle_ratio", Phase::Grow, fill_rectangle_ratio),
    ("draw_triangle", Phase::Grow, draw_triangle),
    ("draw_triangle_filled", Phase::Grow, draw_triangle_filled),
    ("draw_graph", Phase::Grow, draw_graph),
    ("draw_morph", Phase::Grow, draw_morph),
    ("draw_text", Phase::Grow, draw_text),
    ("get_image", Phase::Crop, get_image),
    ("get_shape", Phase::Crop, get_shape),
    ("get_size", Phase::Crop, get_size),
    ("save", Phase::Crop, save),
    ("to_image", Phase::Crop, to_image),
    ("to_bin", Phase::Crop, to_bin),
    ("get", Phase::Crop, get),
    ("get_crop", Phase::Crop, get_crop),
    ("display", Phase::Crop, display),
    ("display_on", Phase::Crop, display_on),
];

static TABLE: LazyLock<HashMap<&'static str, Command>> = LazyLock::new(|| {
    COMMANDS
        .iter()
        .map(|&(name, phase, run)| (name, Command { name, phase, run }))
        .collect()
});

/// Exact-name lookup.
pub fn lookup(name: &str) -> Option<&'static Command> {
    TABLE.get(name)
}

/// Phase of the command called `name`.
pub fn phase_of(name: &str) -> Option<Phase> {
    lookup(name).map(|command| command.phase)
}

/// Every command name, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|(name, _, _)| *name)
}

// ---- creation ----

fn copy(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("copy", args, 1)?;
    let src = ctx.image(a.term()?)?;
    ctx.img = src.lock()?.clone();
    Ok(Step::Seed)
}

fn create(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("create", args, 5)?;
    let dims = Dims::new(a.next()?, a.next()?, a.next()?, a.next()?);
    let value: u8 = a.next()?;
    ctx.img = Image::new(dims, value, ctx.max())?;
    Ok(Step::Seed)
}

fn create_from_bin(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("create_from_bin", args, 10)?;
    let bytes = a.binary()?;
    let dims = Dims::new(a.next()?, a.next()?, a.next()?, a.next()?);
    let layout = Layout::from_args(&mut a)?;
    ctx.img = tensor::from_bin(bytes, dims, &layout, ctx.max())?;
    Ok(Step::Seed)
}

fn load(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("load", args, 1)?;
    let path: String = a.next()?;
    ctx.img = io::load(Path::new(&path), ctx.max())?;
    Ok(Step::Seed)
}

fn load_from_memory(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("load_from_memory", args, 1)?;
    ctx.img = io::decode(a.binary()?, ctx.max())?;
    Ok(Step::Seed)
}

// ---- mutation ----

fn clear(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    Args::exact("clear", args, 0)?;
    ctx.img.clear();
    Ok(Step::Grow)
}

fn fill(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("fill", args, 1)?;
    ctx.img.fill(a.next()?);
    Ok(Step::Grow)
}

fn invert(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    Args::exact("invert", args, 0)?;
    ops::invert(&mut ctx.img);
    Ok(Step::Grow)
}

/// Decode the gray mode: 0 positive, 1 negative.
pub(crate) fn gray_mode(mode: i32) -> BridgeResult<bool> {
    match mode {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(BridgeError::bad_argument(format!(
            "gray mode must be 0 or 1, got {other}"
        ))),
    }
}

fn gray(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("gray", args, 1)?;
    let negative = gray_mode(a.next()?)?;
    ctx.img = ops::gray(&ctx.img, negative, ctx.max())?;
    Ok(Step::Grow)
}

fn threshold(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("threshold", args, 3)?;
    let (value, soft, strict) = (a.next()?, a.next()?, a.next()?);
    ops::threshold(&mut ctx.img, value, soft, strict);
    Ok(Step::Grow)
}

fn blend(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("blend", args, 2)?;
    let other = ctx.image(a.term()?)?;
    let ratio: f64 = a.next()?;
    ops::blend(&mut ctx.img, &*other.lock()?, ratio)?;
    Ok(Step::Grow)
}

fn color_mapping(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("color_mapping", args, 2)?;
    let table = lut::named(a.atom()?)?;
    let boundary = Boundary::from_code(a.next()?)?;
    ctx.img = ops::map_lut(&ctx.img, &table, boundary, ctx.max())?;
    Ok(Step::Grow)
}

fn color_mapping_by(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("color_mapping_by", args, 2)?;
    let colors: Vec<Color> = a.next()?;
    let boundary = Boundary::from_code(a.next()?)?;
    ctx.img = ops::map_lut(&ctx.img, &lut::custom(&colors)?, boundary, ctx.max())?;
    Ok(Step::Grow)
}

fn blur(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("blur", args, 3)?;
    let sigma: f64 = a.next()?;
    let neumann: bool = a.next()?;
    let _gaussian: bool = a.next()?;
    ops::blur(&mut ctx.img, sigma, neumann)?;
    Ok(Step::Grow)
}

fn mirror(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("mirror", args, 1)?;
    ops::mirror(&mut ctx.img, Axis::parse(a.atom()?)?);
    Ok(Step::Grow)
}

fn transpose(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    Args::exact("transpose", args, 0)?;
    ops::transpose(&mut ctx.img)?;
    Ok(Step::Grow)
}

fn resize(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("resize", args, 4)?;
    let (w, h, align, fill) = (a.next()?, a.next()?, a.next()?, a.next()?);
    ctx.img = ops::resize_fit(&ctx.img, w, h, align, fill, ctx.max())?;
    Ok(Step::Grow)
}

fn set(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("set", args, 5)?;
    let value: u8 = a.next()?;
    let (x, y, z, c) = (a.next()?, a.next()?, a.next()?, a.next()?);
    ctx.img.set(x, y, z, c, value)?;
    Ok(Step::Grow)
}

/// `color, opacity, pattern`.
fn pen(a: &mut Args<'_>) -> BridgeResult<Pen> {
    let color: Color = a.next()?;
    let opacity: f64 = a.next()?;
    Ok(Pen::new(color, opacity).with_pattern(a.next()?))
}

/// `color, thick, opacity, pattern`.
fn line_pen(a: &mut Args<'_>) -> BridgeResult<(Pen, u32)> {
    let color: Color = a.next()?;
    let thick: u32 = a.next()?;
    let opacity: f64 = a.next()?;
    Ok((Pen::new(color, opacity).with_pattern(a.next()?), thick))
}

fn ratio_corners(a: &mut Args<'_>, img: &Image) -> BridgeResult<[i32; 4]> {
    let (w, h) = (img.width(), img.height());
    Ok([
        draw::ratio_to_px(a.next()?, w),
        draw::ratio_to_px(a.next()?, h),
        draw::ratio_to_px(a.next()?, w),
        draw::ratio_to_px(a.next()?, h),
    ])
}

fn int_corners(a: &mut Args<'_>) -> BridgeResult<[i32; 4]> {
    Ok([a.next()?, a.next()?, a.next()?, a.next()?])
}

fn draw_line(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_line", args, 8)?;
    let [x0, y0, x1, y1] = int_corners(&mut a)?;
    let (pen, thick) = line_pen(&mut a)?;
    draw::thick_line(&mut ctx.img, x0, y0, x1, y1, thick, &pen);
    Ok(Step::Grow)
}

fn draw_line_ratio(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_line_ratio", args, 8)?;
    let [x0, y0, x1, y1] = ratio_corners(&mut a, &ctx.img)?;
    let (pen, thick) = line_pen(&mut a)?;
    draw::thick_line(&mut ctx.img, x0, y0, x1, y1, thick, &pen);
    Ok(Step::Grow)
}

fn draw_circle(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_circle", args, 6)?;
    let (x, y, r) = (a.next()?, a.next()?, a.next()?);
    draw::circle(&mut ctx.img, x, y, r, &pen(&mut a)?);
    Ok(Step::Grow)
}

fn fill_circle(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("fill_circle", args, 6)?;
    let (x, y, r) = (a.next()?, a.next()?, a.next()?);
    let pen = pen(&mut a)?;
    draw::circle_filled(&mut ctx.img, x, y, r, &pen);
    if pen.pattern != 0 {
        draw::circle(&mut ctx.img, x, y, r, &pen);
    }
    Ok(Step::Grow)
}

fn draw_rectangle(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_rectangle", args, 7)?;
    let [x0, y0, x1, y1] = int_corners(&mut a)?;
    draw::rectangle(&mut ctx.img, x0, y0, x1, y1, &pen(&mut a)?);
    Ok(Step::Grow)
}

fn draw_rectangle_ratio(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_rectangle_ratio", args, 7)?;
    let [x0, y0, x1, y1] = ratio_corners(&mut a, &ctx.img)?;
    draw::rectangle(&mut ctx.img, x0, y0, x1, y1, &pen(&mut a)?);
    Ok(Step::Grow)
}

/// Filled box, then an opaque outline when the pattern is non-zero.
fn filled_box(img: &mut Image, [x0, y0, x1, y1]: [i32; 4], pen: &Pen) {
    draw::rectangle_filled(img, x0, y0, x1, y1, pen);
    if pen.pattern != 0 {
        let outline = Pen {
            opacity: 1.0,
            ..*pen
        };
        draw::rectangle(img, x0, y0, x1, y1, &outline);
    }
}

fn fill_rectangle(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("fill_rectangle", args, 7)?;
    let corners = int_corners(&mut a)?;
    filled_box(&mut ctx.img, corners, &pen(&mut a)?);
    Ok(Step::Grow)
}

fn fill_rectangle_ratio(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("fill_rectangle_ratio", args, 7)?;
    let corners = ratio_corners(&mut a, &ctx.img)?;
    filled_box(&mut ctx.img, corners, &pen(&mut a)?);
    Ok(Step::Grow)
}

fn triangle_points(a: &mut Args<'_>) -> BridgeResult<[(i32, i32); 3]> {
    Ok([
        (a.next()?, a.next()?),
        (a.next()?, a.next()?),
        (a.next()?, a.next()?),
    ])
}

fn draw_triangle(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_triangle", args, 9)?;
    let points = triangle_points(&mut a)?;
    draw::triangle(&mut ctx.img, points, &pen(&mut a)?);
    Ok(Step::Grow)
}

fn draw_triangle_filled(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_triangle_filled", args, 8)?;
    let points = triangle_points(&mut a)?;
    let color: Color = a.next()?;
    draw::triangle_filled(&mut ctx.img, points, &Pen::new(color, a.next()?));
    Ok(Step::Grow)
}

fn draw_graph(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_graph", args, 8)?;
    let data = ctx.image(a.term()?)?;
    let color: Color = a.next()?;
    let opacity: f64 = a.next()?;
    let plot = draw::PlotType::from_code(a.next()?)?;
    let vertex: i32 = a.next()?;
    let (ymin, ymax) = (a.next()?, a.next()?);
    let pen = Pen::new(color, opacity).with_pattern(a.next()?);
    draw::graph(&mut ctx.img, &*data.lock()?, &pen, plot, vertex, ymin, ymax)?;
    Ok(Step::Grow)
}

fn draw_morph(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_morph", args, 4)?;
    let pairs: Vec<(Pos3, Pos3)> = a.next()?;
    let offset = Pos3([a.next()?, a.next()?, a.next()?]);
    let src = ctx.img.clone();
    ops::transfer(&mut ctx.img, &src, &pairs, offset);
    Ok(Step::Grow)
}

fn draw_text(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("draw_text", args, 7)?;
    let (x, y) = (a.next()?, a.next()?);
    let text: String = a.next()?;
    let fg = a.color_name()?;
    let bg = a.color_name()?;
    let opacity: f64 = a.next()?;
    let font_height: u32 = a.next()?;
    draw::text(&mut ctx.img, x, y, &text, fg, bg, opacity, font_height);
    Ok(Step::Grow)
}

// ---- extraction ----

fn get_image(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    Args::exact("get_image", args, 0)?;
    let img = std::mem::take(&mut ctx.img);
    Ok(Step::Crop(ctx.register(img)?))
}

fn get_shape(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    Args::exact("get_shape", args, 0)?;
    Ok(Step::Crop(ctx.img.dims().into_term()))
}

fn get_size(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    Args::exact("get_size", args, 0)?;
    Ok(Step::Crop(ctx.img.len().into_term()))
}

fn save(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("save", args, 1)?;
    let path: String = a.next()?;
    io::save(&ctx.img, Path::new(&path), ctx.opts.jpeg_quality)?;
    Ok(Step::Crop(Term::ok()))
}

fn to_image(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("to_image", args, 1)?;
    let format = EncodeFormat::parse(a.atom()?)?;
    let bytes = io::encode(&ctx.img, format, ctx.opts.jpeg_quality)?;
    Ok(Step::Crop(Term::ok_tuple(Term::Binary(bytes))))
}

fn to_bin(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("to_bin", args, 5)?;
    let layout = Layout::from_args(&mut a)?;
    Ok(Step::Crop(tensor::to_bin(&ctx.img, &layout)?.into_term()))
}

fn get(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("get", args, 4)?;
    let (x, y, z, c) = (a.next()?, a.next()?, a.next()?, a.next()?);
    Ok(Step::Crop(ctx.img.get(x, y, z, c)?.into_term()))
}

fn get_crop(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("get_crop", args, 9)?;
    let p0 = [a.next()?, a.next()?, a.next()?, a.next()?];
    let p1 = [a.next()?, a.next()?, a.next()?, a.next()?];
    let boundary = Boundary::from_code(a.next()?)?;
    let cropped = ops::crop(&ctx.img, p0, p1, boundary, ctx.max())?;
    Ok(Step::Crop(ctx.register(cropped)?))
}

/// Show the pipeline image on a fresh display that is never registered.
fn display(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    Args::exact("display", args, 0)?;
    let normalization = Normalization::from_code(0)?;
    let shown = Display::new(ctx.img.clone(), "pixbridge", normalization, false, false);
    tracing::debug!(dims = %shown.frame().dims(), "script display");
    Ok(Step::Crop(Term::ok()))
}

fn display_on(ctx: &mut ScriptCtx<'_>, args: &[Term]) -> BridgeResult<Step> {
    let mut a = Args::exact("display_on", args, 1)?;
    let handle: Handle = a.next()?;
    let display = ctx.registry.resolve::<Display>(&handle)?;
    display.lock()?.show(&ctx.img);
    Ok(Step::Crop(Term::ok()))
}

#[cfg(test)]
#[path = "../../tests/unit/command/table.rs"]
mod tests;
