use std::fmt;

use crate::foundation::error::{BridgeError, BridgeResult};
use crate::registry::handle::{Resource, ResourceKind};
use crate::term::marshal::IntoTerm;
use crate::term::value::Term;

/// Element type a [`PixelBuffer`] can hold.
pub trait Sample: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Largest representable value, used by negative-mode conversions.
    const MAX: Self;

    /// Widen to `f64` for arithmetic.
    fn to_f64(self) -> f64;

    /// Round to nearest and saturate into the element range.
    fn from_f64(v: f64) -> Self;

    /// Truncate toward zero and saturate into the element range.
    fn from_f64_trunc(v: f64) -> Self;
}

impl Sample for u8 {
    const MAX: Self = u8::MAX;

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(v: f64) -> Self {
        // `as` saturates and maps NaN to zero.
        (v + 0.5).floor() as u8
    }

    fn from_f64_trunc(v: f64) -> Self {
        v as u8
    }
}

impl Sample for i32 {
    const MAX: Self = i32::MAX;

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(v: f64) -> Self {
        v.round() as i32
    }

    fn from_f64_trunc(v: f64) -> Self {
        v as i32
    }
}

/// Extent of a buffer along its four axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dims {
    /// Columns (x).
    pub width: u32,
    /// Rows (y).
    pub height: u32,
    /// Slices (z).
    pub depth: u32,
    /// Channels (c).
    pub spectrum: u32,
}

impl Dims {
    /// Build from `(width, height, depth, spectrum)`.
    pub const fn new(width: u32, height: u32, depth: u32, spectrum: u32) -> Self {
        Self {
            width,
            height,
            depth,
            spectrum,
        }
    }

    /// Element count, or `None` on `usize` overflow.
    pub fn len(self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.depth as usize)?
            .checked_mul(self.spectrum as usize)
    }

    /// Element count checked against `max_elements`.
    pub fn checked_len(self, max_elements: usize) -> BridgeResult<usize> {
        let n = self
            .len()
            .ok_or_else(|| BridgeError::allocation(format!("{self} overflows the address space")))?;
        if n > max_elements {
            return Err(BridgeError::allocation(format!(
                "{self} holds {n} elements, limit is {max_elements}"
            )));
        }
        Ok(n)
    }

    /// Any axis of zero extent.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0 || self.spectrum == 0
    }

    /// Elements in one `(z, c)` plane.
    pub fn plane_len(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{}x{}",
            self.width, self.height, self.depth, self.spectrum
        )
    }
}

impl IntoTerm for Dims {
    fn into_term(self) -> Term {
        (self.width, self.height, self.depth, self.spectrum).into_term()
    }
}

/// Dense 4-D buffer, planar: x varies fastest, then y, then z, then channel.
///
/// Invariant: `data.len() == dims.len()`; an empty buffer has all-zero dims.
#[derive(Clone, PartialEq)]
pub struct PixelBuffer<T> {
    dims: Dims,
    data: Vec<T>,
}

/// 8-bit image, the main resource type.
pub type Image = PixelBuffer<u8>;

/// 32-bit integer buffer used for position maps.
pub type IntMap = PixelBuffer<i32>;

impl Resource for Image {
    const KIND: ResourceKind = ResourceKind::Image;
}

impl Resource for IntMap {
    const KIND: ResourceKind = ResourceKind::IntMap;
}

impl<T> fmt::Debug for PixelBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("dims", &self.dims)
            .finish_non_exhaustive()
    }
}

impl<T: Sample> Default for PixelBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Sample> PixelBuffer<T> {
    /// A buffer with no elements.
    pub fn empty() -> Self {
        Self {
            dims: Dims::default(),
            data: Vec::new(),
        }
    }

    /// Allocate a buffer filled with `value`.
    ///
    /// Zero along any axis yields [`PixelBuffer::empty`].
    pub fn new(dims: Dims, value: T, max_elements: usize) -> BridgeResult<Self> {
        if dims.is_empty() {
            return Ok(Self::empty());
        }
        let n = dims.checked_len(max_elements)?;
        let mut data = Vec::new();
        data.try_reserve_exact(n)
            .map_err(|e| BridgeError::allocation(format!("{dims} buffer: {e}")))?;
        data.resize(n, value);
        Ok(Self { dims, data })
    }

    /// Wrap planar `data` whose length must match `dims`.
    pub fn from_vec(dims: Dims, data: Vec<T>) -> BridgeResult<Self> {
        if dims.is_empty() {
            return Ok(Self::empty());
        }
        let n = dims
            .len()
            .ok_or_else(|| BridgeError::allocation(format!("{dims} overflows the address space")))?;
        if data.len() != n {
            return Err(BridgeError::bad_argument(format!(
                "{dims} needs {n} elements, got {}",
                data.len()
            )));
        }
        Ok(Self { dims, data })
    }

    /// Extent along each axis.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Columns.
    pub fn width(&self) -> u32 {
        self.dims.width
    }

    /// Rows.
    pub fn height(&self) -> u32 {
        self.dims.height
    }

    /// Slices.
    pub fn depth(&self) -> u32 {
        self.dims.depth
    }

    /// Channels.
    pub fn spectrum(&self) -> u32 {
        self.dims.spectrum
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// No elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Planar element storage.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable planar element storage.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Linear offset of `(x, y, z, c)`; the caller guarantees it is in range.
    pub(crate) fn offset(&self, x: usize, y: usize, z: usize, c: usize) -> usize {
        let d = self.dims;
        x + d.width as usize * (y + d.height as usize * (z + d.depth as usize * c))
    }

    /// `true` when `(x, y, z)` lies inside the buffer.
    pub fn contains_xyz(&self, x: i64, y: i64, z: i64) -> bool {
        (0..i64::from(self.dims.width)).contains(&x)
            && (0..i64::from(self.dims.height)).contains(&y)
            && (0..i64::from(self.dims.depth)).contains(&z)
    }

    fn in_range(&self, x: u32, y: u32, z: u32, c: u32) -> bool {
        x < self.dims.width && y < self.dims.height && z < self.dims.depth && c < self.dims.spectrum
    }

    /// Read one element.
    pub fn get(&self, x: u32, y: u32, z: u32, c: u32) -> BridgeResult<T> {
        if !self.in_range(x, y, z, c) {
            return Err(self.out_of_range(x, y, z, c));
        }
        Ok(self.data[self.offset(x as usize, y as usize, z as usize, c as usize)])
    }

    /// Write one element.
    pub fn set(&mut self, x: u32, y: u32, z: u32, c: u32, value: T) -> BridgeResult<()> {
        if !self.in_range(x, y, z, c) {
            return Err(self.out_of_range(x, y, z, c));
        }
        let i = self.offset(x as usize, y as usize, z as usize, c as usize);
        self.data[i] = value;
        Ok(())
    }

    fn out_of_range(&self, x: u32, y: u32, z: u32, c: u32) -> BridgeError {
        BridgeError::bad_argument(format!(
            "pixel ({x},{y},{z},{c}) outside {}",
            self.dims
        ))
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Release storage; the buffer becomes empty.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// One `(z, c)` plane.
    pub fn plane(&self, z: u32, c: u32) -> &[T] {
        let n = self.dims.plane_len();
        let start = self.offset(0, 0, z as usize, c as usize);
        &self.data[start..start + n]
    }

    /// Iterate mutable `(z, c)` planes in storage order.
    pub fn planes_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        let n = self.dims.plane_len().max(1);
        self.data.chunks_exact_mut(n)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/buffer.rs"]
mod tests;
