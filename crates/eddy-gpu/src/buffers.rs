//! Compute buffers and the double-buffered scratch state.
//!
//! [`ComputeBuffer`] is the host-side buffer used by the CPU backends.
//! [`DoubleBuffer`] and [`GpuState`] are generic over the backend's buffer
//! type so the same ping-pong logic drives host and device memory.

use eddy_types::{EddyError, EddyResult, GridSize};

use crate::backend::GpuBackend;

/// A compute buffer held in host memory.
///
/// In the CPU backends, this is simply a `Vec<f32>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeBuffer {
    data: Vec<f32>,
}

impl ComputeBuffer {
    /// Creates a new buffer filled with zeros.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    /// Creates a zeroed buffer, reporting allocation failure instead of
    /// aborting.
    pub fn try_zeros(len: usize) -> EddyResult<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            EddyError::Gpu(format!("Failed to allocate {len} cells: {e}"))
        })?;
        data.resize(len, 0.0);
        Ok(Self { data })
    }

    /// Creates a buffer from existing data.
    pub fn from_data(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a slice of the data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns a mutable slice of the data.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

/// Two same-size buffers with alternating read/write roles.
///
/// Exactly one buffer is the readable state at any time. [`swap`](Self::swap)
/// relabels the freshly written buffer as readable; no data moves.
#[derive(Debug)]
pub struct DoubleBuffer<T> {
    buffers: [T; 2],
    front: usize,
}

impl<T> DoubleBuffer<T> {
    /// Wraps two buffers; `first` starts as the readable one.
    pub fn new(first: T, second: T) -> Self {
        Self {
            buffers: [first, second],
            front: 0,
        }
    }

    /// The current readable buffer.
    #[inline]
    pub fn read(&self) -> &T {
        &self.buffers[self.front]
    }

    /// Mutable access to the readable buffer (for uploads and boundary
    /// passes on the initial state).
    #[inline]
    pub fn read_mut(&mut self) -> &mut T {
        &mut self.buffers[self.front]
    }

    /// Borrows `(read, write)` simultaneously.
    pub fn split(&mut self) -> (&T, &mut T) {
        let (first, second) = self.buffers.split_at_mut(1);
        if self.front == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        }
    }

    /// Makes the write buffer the readable one.
    #[inline]
    pub fn swap(&mut self) {
        self.front ^= 1;
    }

    /// Index (0 or 1) of the readable buffer.
    #[inline]
    pub fn front_index(&self) -> usize {
        self.front
    }
}

/// Device-resident scratch for one relaxation call at a time.
///
/// Holds the ping-pong pair plus a slot for the right-hand side `x0`, all
/// sized `(N+2)²`. The caller allocates it once per grid and lends it to
/// each solve with `&mut`, which statically rules out two in-flight solves
/// aliasing the same scratch.
#[derive(Debug)]
pub struct GpuState<T> {
    grid: GridSize,
    pair: DoubleBuffer<T>,
    source: T,
}

impl<T> GpuState<T> {
    /// Allocates the pair and the source slot on `backend`'s device.
    pub fn allocate<B>(backend: &B, grid: GridSize) -> EddyResult<Self>
    where
        B: GpuBackend<Buffer = T>,
    {
        let len = grid.cell_count();
        let first = backend.allocate(len)?;
        let second = backend.allocate(len)?;
        let source = backend.allocate(len)?;
        tracing::debug!(
            backend = backend.name(),
            n = grid.n(),
            cells = len,
            "allocated relaxation scratch"
        );
        Ok(Self {
            grid,
            pair: DoubleBuffer::new(first, second),
            source,
        })
    }

    /// Grid the scratch buffers are sized for.
    #[inline]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// The ping-pong pair.
    pub fn pair(&self) -> &DoubleBuffer<T> {
        &self.pair
    }

    /// Borrows the pair and the source slot together.
    pub fn parts_mut(&mut self) -> (&mut DoubleBuffer<T>, &mut T) {
        (&mut self.pair, &mut self.source)
    }
}
