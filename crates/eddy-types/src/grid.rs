//! Strongly-typed grid geometry.
//!
//! The lattice is a fixed `N×N` interior surrounded by a one-cell boundary
//! ring, stored row-major as a flat array of `(N+2)²` scalars:
//!
//! ```text
//! index(i, j) = i + (N + 2) * j
//! i, j ∈ 1..=N  interior
//! i, j ∈ {0, N+1}  boundary ring
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::MAX_RESOLUTION;
use crate::error::{EddyError, EddyResult};

/// Interior resolution `N` of a uniform square lattice.
///
/// The newtype guarantees `0 < N <= MAX_RESOLUTION` once constructed, so
/// every field sized from it has at least one interior cell and `(N+2)²`
/// cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GridSize(u32);

impl GridSize {
    /// Creates a grid size, rejecting `N == 0` and `N > MAX_RESOLUTION`.
    pub fn new(n: u32) -> EddyResult<Self> {
        if n == 0 {
            return Err(EddyError::InvalidGrid(
                "Resolution N must be positive".into(),
            ));
        }
        if n > MAX_RESOLUTION {
            return Err(EddyError::InvalidGrid(format!(
                "Resolution N={n} exceeds the maximum of {MAX_RESOLUTION}"
            )));
        }
        Ok(Self(n))
    }

    /// Interior resolution `N`.
    #[inline]
    pub fn n(self) -> usize {
        self.0 as usize
    }

    /// Row stride `N + 2` (interior plus both ring cells).
    #[inline]
    pub fn stride(self) -> usize {
        self.0 as usize + 2
    }

    /// Total number of cells, `(N+2)²`.
    #[inline]
    pub fn cell_count(self) -> usize {
        self.stride() * self.stride()
    }

    /// Flat index of cell `(i, j)`.
    #[inline]
    pub fn index(self, i: usize, j: usize) -> usize {
        i + self.stride() * j
    }

    /// Cell spacing `h = 1/N` on the unit square.
    #[inline]
    pub fn spacing(self) -> f32 {
        1.0 / self.0 as f32
    }

    /// Returns an error unless `len` matches the `(N+2)²` layout.
    pub fn check_len(self, len: usize, what: &str) -> EddyResult<()> {
        if len != self.cell_count() {
            return Err(EddyError::InvalidGrid(format!(
                "{what} has {len} cells, expected {} for N={}",
                self.cell_count(),
                self.0
            )));
        }
        Ok(())
    }
}

impl TryFrom<u32> for GridSize {
    type Error = EddyError;

    fn try_from(val: u32) -> EddyResult<Self> {
        Self::new(val)
    }
}

impl TryFrom<i32> for GridSize {
    type Error = EddyError;

    fn try_from(val: i32) -> EddyResult<Self> {
        if val <= 0 {
            return Err(EddyError::InvalidGrid(format!(
                "Resolution N must be positive, got {val}"
            )));
        }
        Self::new(val as u32)
    }
}

impl From<GridSize> for u32 {
    fn from(val: GridSize) -> Self {
        val.0
    }
}
