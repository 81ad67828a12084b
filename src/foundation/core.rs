use crate::foundation::error::{BridgeError, BridgeResult};

/// RGB color triple used by every drawing primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Black.
    pub const BLACK: Self = Self([0, 0, 0]);
    /// White.
    pub const WHITE: Self = Self([255, 255, 255]);

    /// Look up one of the 16 named palette colors.
    ///
    /// `Ok(None)` is the `transparent` pseudo-color (nothing is drawn).
    pub fn from_name(name: &str) -> BridgeResult<Option<Self>> {
        let rgb = match name {
            "white" => [255, 255, 255],
            "silver" => [192, 192, 192],
            "gray" => [128, 128, 128],
            "black" => [0, 0, 0],
            "red" => [255, 0, 0],
            "maroon" => [128, 0, 0],
            "yellow" => [255, 255, 0],
            "olive" => [128, 128, 0],
            "lime" => [0, 255, 0],
            "green" => [0, 128, 0],
            "aqua" => [0, 255, 255],
            "teal" => [0, 128, 128],
            "blue" => [0, 0, 255],
            "navy" => [0, 0, 128],
            "fuchsia" => [255, 0, 255],
            "purple" => [128, 0, 128],
            "transparent" => return Ok(None),
            other => {
                return Err(BridgeError::bad_argument(format!(
                    "unknown color name '{other}'"
                )));
            }
        };
        Ok(Some(Self(rgb)))
    }

    /// Channel value for channel `c`; channels past the third reuse the last component.
    pub fn channel(self, c: usize) -> u8 {
        self.0[c.min(2)]
    }
}

/// Integer 3D position. Shorter host vectors are zero-padded on decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pos3(pub [i32; 3]);

impl Pos3 {
    /// Component-wise translation.
    pub fn offset(self, by: Pos3) -> Self {
        Self([
            self.0[0].saturating_add(by.0[0]),
            self.0[1].saturating_add(by.0[1]),
            self.0[2].saturating_add(by.0[2]),
        ])
    }
}

/// Mirror axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Flip left/right.
    X,
    /// Flip top/bottom.
    Y,
}

impl Axis {
    /// Parse the single-letter axis atom (`x` or `y`).
    pub fn parse(name: &str) -> BridgeResult<Self> {
        match name {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            other => Err(BridgeError::bad_argument(format!(
                "axis must be 'x' or 'y', got '{other}'"
            ))),
        }
    }
}

/// How reads outside a buffer are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Out-of-range reads yield zero.
    Dirichlet,
    /// Out-of-range reads clamp to the nearest edge.
    Neumann,
    /// Out-of-range reads wrap around.
    Periodic,
    /// Out-of-range reads reflect at the edges.
    Mirror,
}

impl Boundary {
    /// Decode the numeric boundary code used at the boundary (0..=3).
    pub fn from_code(code: u32) -> BridgeResult<Self> {
        match code {
            0 => Ok(Self::Dirichlet),
            1 => Ok(Self::Neumann),
            2 => Ok(Self::Periodic),
            3 => Ok(Self::Mirror),
            other => Err(BridgeError::bad_argument(format!(
                "boundary condition must be 0..=3, got {other}"
            ))),
        }
    }

    /// Map a possibly out-of-range coordinate into `0..len`.
    ///
    /// `None` means the read yields zero (Dirichlet outside, or an empty axis).
    pub fn resolve(self, i: i64, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let n = len as i64;
        if (0..n).contains(&i) {
            return Some(i as usize);
        }
        match self {
            Self::Dirichlet => None,
            Self::Neumann => Some(i.clamp(0, n - 1) as usize),
            Self::Periodic => Some(i.rem_euclid(n) as usize),
            Self::Mirror => {
                let period = 2 * n;
                let m = i.rem_euclid(period);
                Some(if m < n { m } else { period - 1 - m } as usize)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
