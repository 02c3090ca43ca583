//! Device backend trait and CPU fallback.
//!
//! The [`GpuBackend`] trait defines the kernels the relaxation solver
//! dispatches. The [`CpuFallback`] implementation executes them
//! sequentially on the host, serving as the reference for correctness.

use eddy_grid::enforce_boundary;
use eddy_types::{BoundaryType, EddyError, EddyResult, GridSize};

use crate::buffers::ComputeBuffer;

/// Trait for device compute backends.
///
/// The solver drives every relaxation through this trait, so the same
/// orchestration code runs on a GPU or on the host.
///
/// # Ordering
///
/// Commands issued through one backend execute in issue order: a sweep or
/// boundary pass never starts before every write of the previous command
/// is visible. That is the inter-sweep barrier. [`synchronize`](Self::synchronize)
/// additionally blocks the host until the device is idle.
///
/// # Implementations
/// - [`CpuFallback`] — Sequential host reference (always available)
/// - [`ParallelBackend`](crate::parallel::ParallelBackend) — rayon, one task per interior row
/// - `WgpuBackend` — WGSL compute shaders (feature `wgpu`)
pub trait GpuBackend: Send + Sync {
    /// Device-resident buffer of `f32` cells.
    type Buffer: Send;

    /// Initialize the backend. Called once before any allocation.
    fn init(&mut self) -> EddyResult<()>;

    /// Returns the backend name (e.g., "cpu_fallback", "wgpu").
    fn name(&self) -> &str;

    /// Returns true if kernels execute on a GPU.
    fn is_gpu(&self) -> bool;

    /// Allocates a zeroed buffer of `len` cells.
    fn allocate(&self, len: usize) -> EddyResult<Self::Buffer>;

    /// Copies host data into a device buffer of the same length.
    fn upload(&self, src: &[f32], dst: &mut Self::Buffer) -> EddyResult<()>;

    /// Copies a device buffer back into host memory of the same length.
    fn download(&self, src: &Self::Buffer, dst: &mut [f32]) -> EddyResult<()>;

    /// One Jacobi sweep over the interior:
    ///
    /// `write[i,j] = (source[i,j] + a·(read[i-1,j] + read[i+1,j] + read[i,j-1] + read[i,j+1])) / c`
    ///
    /// Every cell reads only `read`, so all cells may run concurrently.
    /// The ring of `write` is left stale for [`enforce_boundary`](Self::enforce_boundary).
    fn relax_sweep(
        &self,
        grid: GridSize,
        read: &Self::Buffer,
        source: &Self::Buffer,
        a: f32,
        c: f32,
        write: &mut Self::Buffer,
    ) -> EddyResult<()>;

    /// Applies the edge rule for `boundary` to the ring of `field`.
    fn enforce_boundary(
        &self,
        grid: GridSize,
        boundary: BoundaryType,
        field: &mut Self::Buffer,
    ) -> EddyResult<()>;

    /// Blocks until all issued work has completed.
    fn synchronize(&self) -> EddyResult<()>;
}

/// Relaxes interior row `j` of `read` into `out_row`.
///
/// `out_row` is row `j` of the write buffer (`stride` cells). Shared by the
/// sequential and parallel host backends so they agree bit-for-bit.
#[inline]
pub(crate) fn relax_row(
    grid: GridSize,
    j: usize,
    read: &[f32],
    source: &[f32],
    a: f32,
    c: f32,
    out_row: &mut [f32],
) {
    let n = grid.n();
    let stride = grid.stride();
    let row = j * stride;
    for i in 1..=n {
        let k = row + i;
        let neighbours = read[k - 1] + read[k + 1] + read[k - stride] + read[k + stride];
        out_row[i] = (source[k] + a * neighbours) / c;
    }
}

pub(crate) fn check_sweep_buffers(
    grid: GridSize,
    read: &ComputeBuffer,
    source: &ComputeBuffer,
    write: &ComputeBuffer,
) -> EddyResult<()> {
    grid.check_len(read.len(), "sweep read buffer")?;
    grid.check_len(source.len(), "sweep source buffer")?;
    grid.check_len(write.len(), "sweep write buffer")
}

pub(crate) fn host_upload(src: &[f32], dst: &mut ComputeBuffer) -> EddyResult<()> {
    if src.len() != dst.len() {
        return Err(EddyError::Gpu(format!(
            "Upload length mismatch: {} host cells into {} device cells",
            src.len(),
            dst.len()
        )));
    }
    dst.as_mut_slice().copy_from_slice(src);
    Ok(())
}

pub(crate) fn host_download(src: &ComputeBuffer, dst: &mut [f32]) -> EddyResult<()> {
    if src.len() != dst.len() {
        return Err(EddyError::Gpu(format!(
            "Download length mismatch: {} device cells into {} host cells",
            src.len(),
            dst.len()
        )));
    }
    dst.copy_from_slice(src.as_slice());
    Ok(())
}

/// CPU fallback backend — sequential reference implementation.
///
/// Always available, used for:
/// - Platforms without GPU support
/// - Correctness validation (device results should match it)
/// - Small grids where dispatch overhead isn't worthwhile
pub struct CpuFallback {
    initialized: bool,
}

impl CpuFallback {
    /// Creates a new CPU fallback backend.
    pub fn new() -> Self {
        Self { initialized: false }
    }
}

impl Default for CpuFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuBackend for CpuFallback {
    type Buffer = ComputeBuffer;

    fn init(&mut self) -> EddyResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "cpu_fallback"
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

        let stride = grid.stride();
        let r = read.as_slice();
        let s = source.as_slice();
        let w = write.as_mut_slice();
        for j in 1..=grid.n() {
            relax_row(grid, j, r, s, a, c, &mut w[j * stride..(j + 1) * stride]);
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
