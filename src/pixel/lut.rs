//! Color lookup tables for `color_mapping`.
//!
//! A LUT is an `N x 1 x 1 x 3` image: entry `i` is the color in column `i`.

use crate::foundation::core::Color;
use crate::foundation::error::{BridgeError, BridgeResult};
use crate::pixel::buffer::{Dims, Image, Sample};

const ENTRIES: usize = 256;

fn from_colors(colors: &[Color]) -> BridgeResult<Image> {
    let n = colors.len();
    let width = u32::try_from(n).map_err(|_| BridgeError::allocation("color map too long"))?;
    let mut data = vec![0u8; n * 3];
    for (i, color) in colors.iter().enumerate() {
        for c in 0..3 {
            data[c * n + i] = color.0[c];
        }
    }
    Image::from_vec(Dims::new(width, 1, 1, 3), data)
}

/// Stretch `anchors` over 256 entries, linear between neighbours, ends exact.
fn ramp(anchors: &[[u8; 3]]) -> Vec<Color> {
    let last = anchors.len() - 1;
    (0..ENTRIES)
        .map(|i| {
            let p = i as f64 * last as f64 / (ENTRIES - 1) as f64;
            let i0 = (p.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let t = p - i0 as f64;
            Color(std::array::from_fn(|c| {
                let (a, b) = (f64::from(anchors[i0][c]), f64::from(anchors[i1][c]));
                u8::from_f64(a + (b - a) * t)
            }))
        })
        .collect()
}

/// Uniform 8x8x4 sampling of the RGB cube.
fn default_colors() -> Vec<Color> {
    let mut out = Vec::with_capacity(ENTRIES);
    for r in (16..256).step_by(32) {
        for g in (16..256).step_by(32) {
            for b in (32..256).step_by(64) {
                out.push(Color([r as u8, g as u8, b as u8]));
            }
        }
    }
    out
}

/// Saturated colors cycling quickly, so neighbouring labels stay distinguishable.
fn lines_colors() -> Vec<Color> {
    const HUES: [[u8; 3]; 6] = [
        [255, 0, 0],
        [255, 255, 0],
        [0, 255, 0],
        [0, 255, 255],
        [0, 0, 255],
        [255, 0, 255],
    ];
    (0..ENTRIES)
        .map(|i| {
            if i == 0 {
                return Color::BLACK;
            }
            let hue = HUES[i % HUES.len()];
            let level = 255 - ((i / HUES.len()) % 4) as u16 * 48;
            Color(hue.map(|v| (u16::from(v) * level / 255) as u8))
        })
        .collect()
}

/// Predefined table by name: `default lines hot cool jet`.
pub fn named(name: &str) -> BridgeResult<Image> {
    let colors = match name {
        "default" => default_colors(),
        "lines" => lines_colors(),
        "hot" => ramp(&[[0, 0, 0], [255, 0, 0], [255, 255, 0], [255, 255, 255]]),
        "cool" => ramp(&[[0, 255, 255], [255, 0, 255]]),
        "jet" => ramp(&[[0, 0, 255], [0, 255, 255], [255, 255, 0], [255, 0, 0]]),
        other => {
            return Err(BridgeError::bad_argument(format!(
                "unknown color map '{other}'"
            )));
        }
    };
    from_colors(&colors)
}

/// Table built from host-supplied colors, in order.
pub fn custom(colors: &[Color]) -> BridgeResult<Image> {
    if colors.is_empty() {
        return Err(BridgeError::bad_argument("color map needs at least one color"));
    }
    from_colors(colors)
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/lut.rs"]
mod tests;
