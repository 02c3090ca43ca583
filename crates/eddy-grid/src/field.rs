//! Scalar field over the padded lattice.
//!
//! A field is a flat `Vec<f32>` of length `(N+2)²`, indexed
//! `i + (N+2)*j`. Interior cells are `1..=N` on each axis; index `0` and
//! `N+1` form the boundary ring. The flat layout is exactly what device
//! buffers hold, so uploads and downloads are plain slice copies.

use serde::{Deserialize, Serialize};

use eddy_types::{BoundaryType, EddyError, EddyResult, GridSize};

use crate::boundary::enforce_boundary;

/// One simulated quantity (velocity component or density) on the lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    grid: GridSize,
    data: Vec<f32>,
}

impl Field {
    /// Creates a field filled with zeros.
    pub fn zeros(grid: GridSize) -> Self {
        Self::filled(grid, 0.0)
    }

    /// Creates a field with every cell (ring included) set to `value`.
    pub fn filled(grid: GridSize, value: f32) -> Self {
        Self {
            grid,
            data: vec![value; grid.cell_count()],
        }
    }

    /// Wraps existing data, checking it matches the `(N+2)²` layout.
    pub fn from_data(grid: GridSize, data: Vec<f32>) -> EddyResult<Self> {
        grid.check_len(data.len(), "field data")?;
        Ok(Self { grid, data })
    }

    /// Grid this field is laid out on.
    #[inline]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Number of cells, ring included.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: a valid grid has at least one interior cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at cell `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[self.grid.index(i, j)]
    }

    /// Sets cell `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        let k = self.grid.index(i, j);
        self.data[k] = value;
    }

    /// Adds `value` to cell `(i, j)`.
    #[inline]
    pub fn add(&mut self, i: usize, j: usize, value: f32) {
        let k = self.grid.index(i, j);
        self.data[k] += value;
    }

    /// Flat view of all cells.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable flat view of all cells.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Sets every cell, ring included, to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Copies all cells from `other`. Both fields must share a grid.
    pub fn copy_from(&mut self, other: &Field) -> EddyResult<()> {
        self.ensure_same_grid(other)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// `self[k] += dt * source[k]` over every cell.
    pub fn add_scaled(&mut self, source: &Field, dt: f32) -> EddyResult<()> {
        self.ensure_same_grid(source)?;
        for (x, s) in self.data.iter_mut().zip(&source.data) {
            *x += dt * s;
        }
        Ok(())
    }

    /// Applies the boundary rule for `boundary` to this field's ring.
    pub fn enforce_boundary(&mut self, boundary: BoundaryType) -> EddyResult<()> {
        enforce_boundary(self.grid, boundary, &mut self.data)
    }

    /// Iterator over interior coordinates `(i, j)`, row by row.
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.grid.n();
        (1..=n).flat_map(move |j| (1..=n).map(move |i| (i, j)))
    }

    /// Sum of interior cells, accumulated in `f64`.
    pub fn interior_sum(&self) -> f64 {
        self.interior().map(|(i, j)| self.get(i, j) as f64).sum()
    }

    /// Largest absolute interior value.
    pub fn interior_max_abs(&self) -> f32 {
        self.interior()
            .map(|(i, j)| self.get(i, j).abs())
            .fold(0.0f32, f32::max)
    }

    /// True when no cell holds NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    fn ensure_same_grid(&self, other: &Field) -> EddyResult<()> {
        if self.grid != other.grid {
            return Err(EddyError::InvalidGrid(format!(
                "Field grid mismatch: N={} vs N={}",
                self.grid.n(),
                other.grid.n()
            )));
        }
        Ok(())
    }
}
