//! # eddy-gpu
//!
//! Device abstraction for the eddy relaxation solver.
//!
//! Provides a [`GpuBackend`] trait with three implementations:
//! - [`CpuFallback`] — Sequential reference implementation (always available)
//! - [`ParallelBackend`] — Data-parallel host execution via rayon
//! - `WgpuBackend` — WGSL compute via wgpu (feature `wgpu`)
//!
//! and the [`GpuState`] scratch pair that makes repeated Jacobi sweeps
//! race-free: one buffer is read while the other is written, and their
//! roles swap after every sweep.

pub mod backend;
pub mod buffers;
pub mod parallel;
#[cfg(feature = "wgpu")]
pub mod wgpu_backend;

pub use backend::{CpuFallback, GpuBackend};
pub use buffers::{ComputeBuffer, DoubleBuffer, GpuState};
pub use parallel::ParallelBackend;
#[cfg(feature = "wgpu")]
pub use wgpu_backend::{WgpuBackend, WgpuField};
