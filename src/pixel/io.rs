//! File and in-memory codecs backed by the `image` crate.

use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;
use image::{DynamicImage, ExtendedColorType, ImageEncoder as _};

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::pixel::buffer::{Dims, Image};

/// Encoded output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeFormat {
    /// Baseline JPEG; alpha is dropped.
    Jpeg,
    /// Lossless PNG.
    Png,
}

impl EncodeFormat {
    /// Parse the format atom (`jpeg` or `png`).
    pub fn parse(name: &str) -> BridgeResult<Self> {
        match name {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(BridgeError::bad_argument(format!(
                "image format must be 'jpeg' or 'png', got '{other}'"
            ))),
        }
    }

    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> BridgeResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(BridgeError::library(format!(
                "cannot save '{}': unsupported file extension",
                path.display()
            ))),
        }
    }
}

fn library(err: anyhow::Error) -> BridgeError {
    BridgeError::library(format!("{err:#}"))
}

/// Decode PNG/JPEG/... bytes, keeping the stored channel count (1..=4).
pub fn decode(bytes: &[u8], max_elements: usize) -> BridgeResult<Image> {
    let dynamic = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(library)?;
    from_dynamic(dynamic, max_elements)
}

/// Read and decode an image file.
pub fn load(path: &Path, max_elements: usize) -> BridgeResult<Image> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image '{}'", path.display()))
        .map_err(library)?;
    let dynamic = image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))
        .map_err(library)?;
    from_dynamic(dynamic, max_elements)
}

fn from_dynamic(dynamic: DynamicImage, max_elements: usize) -> BridgeResult<Image> {
    let (width, height) = (dynamic.width(), dynamic.height());
    let (spectrum, interleaved) = match dynamic {
        DynamicImage::ImageLuma8(b) => (1, b.into_raw()),
        DynamicImage::ImageLumaA8(b) => (2, b.into_raw()),
        DynamicImage::ImageRgb8(b) => (3, b.into_raw()),
        DynamicImage::ImageRgba8(b) => (4, b.into_raw()),
        other if other.color().has_alpha() => (4, other.to_rgba8().into_raw()),
        other if other.color().has_color() => (3, other.to_rgb8().into_raw()),
        other => (1, other.to_luma8().into_raw()),
    };
    let dims = Dims::new(width, height, 1, spectrum);
    let mut img = Image::new(dims, 0, max_elements)?;
    let n = dims.plane_len();
    let s = spectrum as usize;
    let planar = img.data_mut();
    for (i, px) in interleaved.chunks_exact(s).enumerate() {
        for (c, &v) in px.iter().enumerate() {
            planar[c * n + i] = v;
        }
    }
    Ok(img)
}

/// Encode the first slice of `img`.
#[tracing::instrument(skip(img), fields(dims = %img.dims()))]
pub fn encode(img: &Image, format: EncodeFormat, jpeg_quality: u8) -> BridgeResult<Vec<u8>> {
    if img.is_empty() {
        return Err(BridgeError::library("can't convert empty image"));
    }
    if img.depth() > 1 {
        tracing::warn!(depth = img.depth(), "volumetric image, only the first slice is saved");
    }
    let channels = match (format, img.spectrum()) {
        (EncodeFormat::Jpeg, 1 | 2) => 1,
        (EncodeFormat::Jpeg, _) => 3,
        (EncodeFormat::Png, s) => s.min(4),
    };
    let color = match channels {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        _ => ExtendedColorType::Rgba8,
    };

    let n = img.dims().plane_len();
    let mut interleaved = Vec::new();
    interleaved
        .try_reserve_exact(n * channels as usize)
        .map_err(|e| BridgeError::allocation(format!("encode buffer: {e}")))?;
    for i in 0..n {
        for c in 0..channels {
            // Gray sources replicate into color slots the format requires.
            let src = c.min(img.spectrum() - 1);
            interleaved.push(img.plane(0, src)[i]);
        }
    }

    let mut out = Vec::new();
    let (w, h) = (img.width(), img.height());
    let written = match format {
        EncodeFormat::Jpeg => image::codecs::jpeg::JpegEncoder::new_with_quality(
            Cursor::new(&mut out),
            jpeg_quality,
        )
        .write_image(&interleaved, w, h, color),
        EncodeFormat::Png => image::codecs::png::PngEncoder::new(Cursor::new(&mut out))
            .write_image(&interleaved, w, h, color),
    };
    written
        .with_context(|| format!("encode {format:?} image"))
        .map_err(library)?;
    Ok(out)
}

/// Encode by file extension and write to `path`.
pub fn save(img: &Image, path: &Path, jpeg_quality: u8) -> BridgeResult<()> {
    let format = EncodeFormat::from_path(path)?;
    let bytes = encode(img, format, jpeg_quality)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("write image '{}'", path.display()))
        .map_err(library)
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/io.rs"]
mod tests;
