//! Flat binary tensors to and from pixel buffers.
//!
//! A blob is written slice by slice; within a slice the order is either channel-major
//! (`nchw`: c, y, x) or pixel-major (`nhwc`: y, x, c). With `bgr`, output position 0 holds
//! native channel 2 and vice versa (only when there are at least 3 channels).
//!
//! `f4` elements go through an affine map per native channel:
//! encode `x = a * byte + b`, decode `byte = a' * (x - b')`. Channels from the fourth on
//! are alpha and always use scale 255, offset 0.

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::pixel::buffer::{Dims, Image, Sample};
use crate::term::marshal::{Args, FromTerm, IntoTerm, tuple};
use crate::term::value::Term;

/// Element encoding inside a blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElemType {
    /// One unsigned byte per element.
    U1,
    /// Little-endian IEEE-754 single per element.
    F4,
}

impl ElemType {
    /// Parse `u1`/`<u1` or `f4`/`<f4`.
    pub fn parse(name: &str) -> BridgeResult<Self> {
        match name {
            "u1" | "<u1" => Ok(Self::U1),
            "f4" | "<f4" => Ok(Self::F4),
            other => Err(BridgeError::bad_argument(format!(
                "element type must be u1 or f4, got '{other}'"
            ))),
        }
    }

    /// Bytes per element.
    pub fn size(self) -> usize {
        match self {
            Self::U1 => 1,
            Self::F4 => 4,
        }
    }
}

impl FromTerm for ElemType {
    fn from_term(term: &Term) -> BridgeResult<Self> {
        match term {
            Term::Atom(name) => Self::parse(name),
            Term::Binary(_) => Self::parse(&String::from_term(term)?),
            other => Err(BridgeError::bad_argument(format!(
                "expected element type, got {}",
                other.kind_name()
            ))),
        }
    }
}

/// How `f4` values relate to bytes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Normalization {
    /// `byte = 255 * (x - lo) / (hi - lo)` on color channels.
    Range {
        /// Float value of byte 0.
        lo: f64,
        /// Float value of byte 255.
        hi: f64,
    },
    /// Standard score: `x = (byte - mean) / std` per color channel, indexed by native
    /// channel.
    Gauss([(f64, f64); 3]),
}

impl Normalization {
    /// Decode the `{mode, params}` pair: `range, {lo, hi}` or
    /// `gauss, {{mean, std}, {mean, std}, {mean, std}}`.
    pub fn from_terms(mode: &str, params: &Term) -> BridgeResult<Self> {
        let items = tuple(params)?;
        match (mode, items.len()) {
            ("range", 2) => {
                let lo = f64::from_term(&items[0])?;
                let hi = f64::from_term(&items[1])?;
                if lo == hi || !lo.is_finite() || !hi.is_finite() {
                    return Err(BridgeError::bad_argument(format!(
                        "range normalization needs finite lo != hi, got ({lo}, {hi})"
                    )));
                }
                Ok(Self::Range { lo, hi })
            }
            ("gauss", 3) => {
                let mut stats = [(0.0, 1.0); 3];
                for (slot, item) in stats.iter_mut().zip(items) {
                    let pair = tuple(item)?;
                    if pair.len() != 2 {
                        return Err(BridgeError::bad_argument(
                            "gauss parameters are {mean, std} pairs",
                        ));
                    }
                    let (mean, std) = (f64::from_term(&pair[0])?, f64::from_term(&pair[1])?);
                    if std == 0.0 || !std.is_finite() {
                        return Err(BridgeError::bad_argument(format!(
                            "gauss std must be finite and non-zero, got {std}"
                        )));
                    }
                    *slot = (mean, std);
                }
                Ok(Self::Gauss(stats))
            }
            (mode, n) => Err(BridgeError::bad_argument(format!(
                "normalization '{mode}' with {n} parameters is not supported"
            ))),
        }
    }

    /// `(a, b)` for `x = a * byte + b` on native channel `c`.
    fn encode_coeffs(self, c: usize) -> (f64, f64) {
        match self {
            _ if c >= 3 => (1.0 / 255.0, 0.0),
            Self::Range { lo, hi } => ((hi - lo) / 255.0, lo),
            Self::Gauss(stats) => {
                let (mean, std) = stats[c];
                (1.0 / std, -mean / std)
            }
        }
    }

    /// `(a, b)` for `byte = a * (x - b)` on native channel `c`.
    fn decode_coeffs(self, c: usize) -> (f64, f64) {
        match self {
            _ if c >= 3 => (255.0, 0.0),
            Self::Range { lo, hi } => (255.0 / (hi - lo), lo),
            Self::Gauss(stats) => {
                let (mean, std) = stats[c];
                (std, -mean / std)
            }
        }
    }
}

/// Everything that fixes the byte layout of a blob.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    /// Element encoding.
    pub elem: ElemType,
    /// Required for [`ElemType::F4`], ignored for [`ElemType::U1`].
    pub norm: Option<Normalization>,
    /// Channel-major when `true`, pixel-major otherwise.
    pub nchw: bool,
    /// Swap channels 0 and 2.
    pub bgr: bool,
}

impl Layout {
    /// Decode the five layout arguments `dtype, mode, params, nchw, bgr`.
    ///
    /// `mode`/`params` must be an atom and a tuple; they are interpreted only for `f4`.
    pub fn from_args(args: &mut Args<'_>) -> BridgeResult<Self> {
        let elem: ElemType = args.next()?;
        let mode = args.atom()?;
        let params = args.term()?;
        tuple(params)?;
        let nchw = args.next()?;
        let bgr = args.next()?;
        let norm = match elem {
            ElemType::U1 => None,
            ElemType::F4 => Some(Normalization::from_terms(mode, params)?),
        };
        Ok(Self {
            elem,
            norm,
            nchw,
            bgr,
        })
    }

    fn norm(&self) -> BridgeResult<Normalization> {
        self.norm
            .ok_or_else(|| BridgeError::bad_argument("f4 tensors need a normalization"))
    }
}

/// Blob plus the shape describing it.
#[derive(Clone, Debug, PartialEq)]
pub struct Encoded {
    /// `(c, h, w)` for `nchw`, `(h, w, c)` otherwise; `h` counts every slice.
    pub shape: [u32; 3],
    /// Packed elements.
    pub bytes: Vec<u8>,
}

impl IntoTerm for Encoded {
    fn into_term(self) -> Term {
        let [a, b, c] = self.shape;
        Term::tuple(vec![
            Term::ok(),
            (a, b, c).into_term(),
            Term::Binary(self.bytes),
        ])
    }
}

/// Native channel at output position `p`.
fn permutation(spectrum: usize, bgr: bool) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..spectrum).collect();
    if bgr && spectrum >= 3 {
        perm.swap(0, 2);
    }
    perm
}

/// Visit every element in blob order as `(blob_index, buffer_offset, native_channel)`.
fn for_each_in_order(dims: Dims, nchw: bool, perm: &[usize], mut f: impl FnMut(usize, usize, usize)) {
    let (w, h, d) = (dims.width as usize, dims.height as usize, dims.depth as usize);
    let plane = w * h;
    let at = |x: usize, y: usize, z: usize, c: usize| x + w * (y + h * (z + d * c));
    let mut i = 0;
    for z in 0..d {
        if nchw {
            for &c in perm {
                for y in 0..h {
                    for x in 0..w {
                        f(i, at(x, y, z, c), c);
                        i += 1;
                    }
                }
            }
        } else {
            for j in 0..plane {
                let (x, y) = (j % w, j / w);
                for &c in perm {
                    f(i, at(x, y, z, c), c);
                    i += 1;
                }
            }
        }
    }
}

fn blob_len(dims: Dims, elem: ElemType) -> BridgeResult<usize> {
    dims.len()
        .and_then(|n| n.checked_mul(elem.size()))
        .ok_or_else(|| BridgeError::allocation(format!("{dims} tensor overflows the address space")))
}

/// Flatten `img` into a blob.
#[tracing::instrument(skip(img), fields(dims = %img.dims()))]
pub fn to_bin(img: &Image, layout: &Layout) -> BridgeResult<Encoded> {
    let dims = img.dims();
    let norm = match layout.elem {
        ElemType::U1 => None,
        ElemType::F4 => Some(layout.norm()?),
    };
    let len = blob_len(dims, layout.elem)?;
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|e| BridgeError::allocation(format!("tensor blob of {len} bytes: {e}")))?;
    bytes.resize(len, 0);

    let perm = permutation(dims.spectrum as usize, layout.bgr);
    let data = img.data();
    match norm {
        None => for_each_in_order(dims, layout.nchw, &perm, |i, off, _| {
            bytes[i] = data[off];
        }),
        Some(norm) => {
            let coeffs: Vec<_> = (0..dims.spectrum as usize)
                .map(|c| norm.encode_coeffs(c))
                .collect();
            for_each_in_order(dims, layout.nchw, &perm, |i, off, c| {
                let (a, b) = coeffs[c];
                let x = (a * f64::from(data[off]) + b) as f32;
                bytes[4 * i..4 * i + 4].copy_from_slice(&x.to_le_bytes());
            });
        }
    }

    let rows = dims.depth.saturating_mul(dims.height);
    let shape = if layout.nchw {
        [dims.spectrum, rows, dims.width]
    } else {
        [rows, dims.width, dims.spectrum]
    };
    Ok(Encoded { shape, bytes })
}

fn check_len(bytes: &[u8], dims: Dims, elem: ElemType) -> BridgeResult<()> {
    let want = blob_len(dims, elem)?;
    if bytes.len() != want {
        return Err(BridgeError::bad_argument(format!(
            "{dims} {elem:?} tensor needs {want} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(())
}

fn f4_at(bytes: &[u8], i: usize) -> f64 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[4 * i..4 * i + 4]);
    f64::from(f32::from_le_bytes(raw))
}

/// Rebuild a buffer from a blob written with `layout`.
///
/// The length is validated before anything is allocated.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn from_bin(bytes: &[u8], dims: Dims, layout: &Layout, max_elements: usize) -> BridgeResult<Image> {
    check_len(bytes, dims, layout.elem)?;
    let norm = match layout.elem {
        ElemType::U1 => None,
        ElemType::F4 => Some(layout.norm()?),
    };
    let mut img = Image::new(dims, 0, max_elements)?;
    if img.is_empty() {
        return Ok(img);
    }

    let perm = permutation(dims.spectrum as usize, layout.bgr);
    let data = img.data_mut();
    match norm {
        None => for_each_in_order(dims, layout.nchw, &perm, |i, off, _| {
            data[off] = bytes[i];
        }),
        Some(norm) => {
            let coeffs: Vec<_> = (0..dims.spectrum as usize)
                .map(|c| norm.decode_coeffs(c))
                .collect();
            for_each_in_order(dims, layout.nchw, &perm, |i, off, c| {
                let (a, b) = coeffs[c];
                data[off] = u8::from_f64(a * (f4_at(bytes, i) - b));
            });
        }
    }
    Ok(img)
}

/// Pixel-major blob without normalization; `f4` values map as `round(256 * v)`.
pub fn create_from_bytes(
    bytes: &[u8],
    dims: Dims,
    elem: ElemType,
    max_elements: usize,
) -> BridgeResult<Image> {
    check_len(bytes, dims, elem)?;
    let mut img = Image::new(dims, 0, max_elements)?;
    if img.is_empty() {
        return Ok(img);
    }
    let perm = permutation(dims.spectrum as usize, false);
    let data = img.data_mut();
    for_each_in_order(dims, false, &perm, |i, off, _| {
        data[off] = match elem {
            ElemType::U1 => bytes[i],
            ElemType::F4 => u8::from_f64(256.0 * f4_at(bytes, i)),
        };
    });
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/tensor.rs"]
mod tests;
