//! WGSL compute backend.
//!
//! Each sweep and each boundary pass is its own queue submission. wgpu
//! executes submissions in order and tracks storage hazards between
//! passes, so every dispatch sees the complete output of the previous one.

use eddy_types::{BoundaryType, EddyError, EddyResult, GridSize};
use wgpu::util::DeviceExt;

use crate::backend::GpuBackend;

const RELAX_WORKGROUP: u32 = 8;
const EDGE_WORKGROUP: u32 = 64;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct RelaxParams {
    n: u32,
    a: f32,
    c: f32,
    _pad: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct BoundaryParams {
    n: u32,
    boundary: u32,
    _pad0: u32,
    _pad1: u32,
}

/// A field resident in device memory.
pub struct WgpuField {
    buffer: wgpu::Buffer,
    len: usize,
}

impl WgpuField {
    /// Number of `f32` cells.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the field holds no cells.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn byte_size(&self) -> u64 {
        (self.len * std::mem::size_of::<f32>()) as u64
    }
}

struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_name: String,
    relax_layout: wgpu::BindGroupLayout,
    relax_pipeline: wgpu::ComputePipeline,
    boundary_layout: wgpu::BindGroupLayout,
    edges_pipeline: wgpu::ComputePipeline,
    corners_pipeline: wgpu::ComputePipeline,
}

/// Returns true if a wgpu adapter can be acquired on this machine.
pub fn is_available() -> bool {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .is_some()
}

/// wgpu-backed device backend.
///
/// Construct with [`WgpuBackend::new`], then call [`init`](GpuBackend::init)
/// to acquire the adapter and build the pipelines. `init` fails with
/// [`EddyError::Gpu`] when no adapter is present, so callers can fall back
/// to a host backend.
#[derive(Default)]
pub struct WgpuBackend {
    ctx: Option<WgpuContext>,
}

impl WgpuBackend {
    pub fn new() -> Self {
        Self { ctx: None }
    }

    /// Adapter name reported by the driver, once initialized.
    pub fn adapter_name(&self) -> Option<&str> {
        self.ctx.as_ref().map(|c| c.adapter_name.as_str())
    }

    fn ctx(&self) -> EddyResult<&WgpuContext> {
        self.ctx
            .as_ref()
            .ok_or_else(|| EddyError::Gpu("Backend not initialized. Call init() first.".into()))
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn compute_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    module: &wgpu::ShaderModule,
    entry_point: &str,
) -> wgpu::ComputePipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        module,
        entry_point: Some(entry_point),
        compilation_options: Default::default(),
        cache: None,
    })
}

impl WgpuContext {
    fn create() -> EddyResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| EddyError::Gpu("No suitable GPU adapter found".into()))?;

        let adapter_name = adapter.get_info().name;
        tracing::info!(adapter = %adapter_name, "wgpu adapter acquired");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("eddy_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::Performance,
            },
            None,
        ))
        .map_err(|e| EddyError::Gpu(format!("Failed to create device: {e}")))?;

        let relax_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Relax Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/relax.wgsl").into()),
        });
        let boundary_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Boundary Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/boundary.wgsl").into()),
        });

        let relax_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Relax Bind Group Layout"),
            entries: &[
                uniform_entry(0),
                storage_entry(1, true),
                storage_entry(2, true),
                storage_entry(3, false),
            ],
        });
        let boundary_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Boundary Bind Group Layout"),
            entries: &[uniform_entry(0), storage_entry(1, false)],
        });

        let relax_pipeline = compute_pipeline(
            &device,
            "Relax Pipeline",
            &relax_layout,
            &relax_shader,
            "relax_sweep",
        );
        let edges_pipeline = compute_pipeline(
            &device,
            "Boundary Edges Pipeline",
            &boundary_layout,
            &boundary_shader,
            "enforce_edges",
        );
        let corners_pipeline = compute_pipeline(
            &device,
            "Boundary Corners Pipeline",
            &boundary_layout,
            &boundary_shader,
            "enforce_corners",
        );

        Ok(Self {
            device,
            queue,
            adapter_name,
            relax_layout,
            relax_pipeline,
            boundary_layout,
            edges_pipeline,
            corners_pipeline,
        })
    }
}

impl GpuBackend for WgpuBackend {
    type Buffer = WgpuField;

    fn init(&mut self) -> EddyResult<()> {
        if self.ctx.is_none() {
            self.ctx = Some(WgpuContext::create()?);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "wgpu"
    }

    fn is_gpu(&self) -> bool {
        true
    }

    fn allocate(&self, len: usize) -> EddyResult<WgpuField> {
        let ctx = self.ctx()?;
        let size = (len * std::mem::size_of::<f32>()) as u64;
        if size > ctx.device.limits().max_storage_buffer_binding_size as u64 {
            return Err(EddyError::Gpu(format!(
                "Field of {len} cells exceeds the device storage binding limit"
            )));
        }
        // Buffers are zero-initialized by wgpu.
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Eddy Field"),
            size,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        Ok(WgpuField { buffer, len })
    }

    fn upload(&self, src: &[f32], dst: &mut WgpuField) -> EddyResult<()> {
        let ctx = self.ctx()?;
        if src.len() != dst.len {
            return Err(EddyError::Gpu(format!(
                "Upload length mismatch: {} host cells into {} device cells",
                src.len(),
                dst.len
            )));
        }
        ctx.queue
            .write_buffer(&dst.buffer, 0, bytemuck::cast_slice(src));
        Ok(())
    }

    fn download(&self, src: &WgpuField, dst: &mut [f32]) -> EddyResult<()> {
        let ctx = self.ctx()?;
        if src.len != dst.len() {
            return Err(EddyError::Gpu(format!(
                "Download length mismatch: {} device cells into {} host cells",
                src.len,
                dst.len()
            )));
        }

        let size = src.byte_size();
        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Field Staging"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Read Field Encoder"),
            });
        encoder.copy_buffer_to_buffer(&src.buffer, 0, &staging, 0, size);
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|e| EddyError::Gpu(format!("Readback channel closed: {e}")))?
            .map_err(|e| EddyError::Gpu(format!("Failed to map staging buffer: {e}")))?;

        {
            let data = slice.get_mapped_range();
            dst.copy_from_slice(bytemuck::cast_slice(&data));
        }
        staging.unmap();
        Ok(())
    }

    fn relax_sweep(
        &self,
        grid: GridSize,
        read: &WgpuField,
        source: &WgpuField,
        a: f32,
        c: f32,
        write: &mut WgpuField,
    ) -> EddyResult<()> {
        let ctx = self.ctx()?;
        grid.check_len(read.len, "sweep read buffer")?;
        grid.check_len(source.len, "sweep source buffer")?;
        grid.check_len(write.len, "sweep write buffer")?;

        let n = grid.n() as u32;
        let params = RelaxParams { n, a, c, _pad: 0 };
        let params_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Relax Params"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Relax Bind Group"),
            layout: &ctx.relax_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: read.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: source.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: write.buffer.as_entire_binding(),
                },
            ],
        });

        let groups = n.div_ceil(RELAX_WORKGROUP);
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Relax Encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Relax Sweep"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&ctx.relax_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(groups, groups, 1);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn enforce_boundary(
        &self,
        grid: GridSize,
        boundary: BoundaryType,
        field: &mut WgpuField,
    ) -> EddyResult<()> {
        let ctx = self.ctx()?;
        grid.check_len(field.len, "boundary target")?;

        let n = grid.n() as u32;
        let params = BoundaryParams {
            n,
            boundary: boundary.tag(),
            _pad0: 0,
            _pad1: 0,
        };
        let params_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Boundary Params"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Boundary Bind Group"),
            layout: &ctx.boundary_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: field.buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Boundary Encoder"),
            });
        // Separate passes: corners read the edges written by the first pass.
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Boundary Edges"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&ctx.edges_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(n.div_ceil(EDGE_WORKGROUP), 1, 1);
        }
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Boundary Corners"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&ctx.corners_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(1, 1, 1);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn synchronize(&self) -> EddyResult<()> {
        let ctx = self.ctx()?;
        ctx.device.poll(wgpu::Maintain::Wait);
        Ok(())
    }
}
