//! Data-parallel host backend.
//!
//! Each interior row of a sweep is an independent rayon task reading only
//! the frozen `read` buffer, so rows never observe each other's writes.
//! The parallel call returns only after every row has finished, which is
//! the barrier between sweeps. Boundary passes touch `O(N)` cells and run
//! sequentially.

use rayon::prelude::*;

use eddy_grid::enforce_boundary;
use eddy_types::{BoundaryType, EddyError, EddyResult, GridSize};

use crate::backend::{check_sweep_buffers, host_download, host_upload, relax_row, GpuBackend};
use crate::buffers::ComputeBuffer;

/// Below this many interior rows a sweep runs on the calling thread.
const DEFAULT_MIN_PARALLEL_ROWS: usize = 64;

/// rayon-backed backend: one task per interior row.
pub struct ParallelBackend {
    min_parallel_rows: usize,
    initialized: bool,
}

impl ParallelBackend {
    /// Creates a parallel backend with the default small-grid threshold.
    pub fn new() -> Self {
        Self {
            min_parallel_rows: DEFAULT_MIN_PARALLEL_ROWS,
            initialized: false,
        }
    }

    /// Overrides the row count below which sweeps stay sequential.
    /// `0` forces every sweep through the thread pool.
    pub fn with_min_parallel_rows(mut self, rows: usize) -> Self {
        self.min_parallel_rows = rows;
        self
    }

    /// Worker threads available to sweeps.
    pub fn thread_count(&self) -> usize {
        rayon::current_num_threads()
    }
}

impl Default for ParallelBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuBackend for ParallelBackend {
    type Buffer = ComputeBuffer;

    fn init(&mut self) -> EddyResult<()> {
        self.initialized = true;
        tracing::info!(threads = self.thread_count(), "parallel backend ready");
        Ok(())
    }

    fn name(&self) -> &str {
        "parallel"
    }

    fn is_gpu(&self) -> bool {
        false
    }

    fn allocate(&self, len: usize) -> EddyResult<ComputeBuffer> {
        if !self.initialized {
            return Err(EddyError::Gpu(
                "Backend not initialized. Call init() first.".into(),
            ));
        }
        ComputeBuffer::try_zeros(len)
    }

    fn upload(&self, src: &[f32], dst: &mut ComputeBuffer) -> EddyResult<()> {
        host_upload(src, dst)
    }

    fn download(&self, src: &ComputeBuffer, dst: &mut [f32]) -> EddyResult<()> {
        host_download(src, dst)
    }

    fn relax_sweep(
        &self,
        grid: GridSize,
        read: &ComputeBuffer,
        source: &ComputeBuffer,
        a: f32,
        c: f32,
        write: &mut ComputeBuffer,
    ) -> EddyResult<()> {
        check_sweep_buffers(grid, read, source, write)?;

        let n = grid.n();
        let stride = grid.stride();
        let r = read.as_slice();
        let s = source.as_slice();
        let w = write.as_mut_slice();

        if n < self.min_parallel_rows {
            for (j, row) in w.chunks_mut(stride).enumerate().skip(1).take(n) {
                relax_row(grid, j, r, s, a, c, row);
            }
        } else {
            w.par_chunks_mut(stride)
                .enumerate()
                .skip(1)
                .take(n)
                .for_each(|(j, row)| relax_row(grid, j, r, s, a, c, row));
        }
        Ok(())
    }

    fn enforce_boundary(
        &self,
        grid: GridSize,
        boundary: BoundaryType,
        field: &mut ComputeBuffer,
    ) -> EddyResult<()> {
        enforce_boundary(grid, boundary, field.as_mut_slice())
    }

    fn synchronize(&self) -> EddyResult<()> {
        Ok(())
    }
}
