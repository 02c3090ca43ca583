//! CLI command implementations.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use eddy_bench::metrics::BenchmarkMetrics;
use eddy_bench::runner::BenchmarkRunner;
use eddy_bench::scenarios::{Scenario, ScenarioKind};
use eddy_debug::hooks::{DivergenceWatch, InspectionHook, TelemetryHook};
use eddy_debug::snapshot::StateSnapshot;
use eddy_gpu::{CpuFallback, GpuBackend, ParallelBackend};
use eddy_grid::diagnostics::{kinetic_energy, max_abs_divergence, max_speed, total_mass};
use eddy_solver::{BackendKind, Simulation, SolverConfig};
use eddy_telemetry::{EventBus, EventKind, JsonLinesSink, SimulationEvent, TracingSink};

use crate::scene::Scene;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Divergence above which the simulate command warns.
const DIVERGENCE_WARN_LIMIT: f32 = 1.0;

/// A constructed backend, one variant per [`BackendKind`].
enum Selected {
    Cpu(CpuFallback),
    Parallel(ParallelBackend),
    #[cfg(feature = "wgpu")]
    Wgpu(eddy_gpu::WgpuBackend),
}

/// Runs `$body` with `$b` bound to the concrete backend inside `$selected`.
macro_rules! with_backend {
    ($selected:expr, |$b:ident| $body:expr) => {
        match $selected {
            Selected::Cpu($b) => $body,
            Selected::Parallel($b) => $body,
            #[cfg(feature = "wgpu")]
            Selected::Wgpu($b) => $body,
        }
    };
}

/// Builds the backend for `kind`. A wgpu request falls back to the
/// parallel host backend when no adapter is available or the binary was
/// built without the `wgpu` feature.
fn select_backend(kind: BackendKind) -> Selected {
    match kind {
        BackendKind::Cpu => Selected::Cpu(CpuFallback::new()),
        BackendKind::Parallel => Selected::Parallel(ParallelBackend::new()),
        BackendKind::Wgpu => {
            #[cfg(feature = "wgpu")]
            {
                let mut gpu = eddy_gpu::WgpuBackend::new();
                match gpu.init() {
                    Ok(()) => return Selected::Wgpu(gpu),
                    Err(e) => tracing::warn!(error = %e, "wgpu unavailable, using parallel backend"),
                }
            }
            #[cfg(not(feature = "wgpu"))]
            tracing::warn!("built without the `wgpu` feature, using parallel backend");
            Selected::Parallel(ParallelBackend::new())
        }
    }
}

/// Run a simulation from a scene file.
pub fn simulate(scene_path: &str, steps: Option<u32>, backend: Option<BackendKind>) -> CmdResult {
    let mut scene = Scene::load(Path::new(scene_path))?;
    if let Some(steps) = steps {
        scene.steps = steps;
    }
    if let Some(kind) = backend {
        scene.solver.backend = kind;
    }
    scene.validate()?;

    println!("Eddy Simulation");
    println!("───────────────");
    println!("Scene:      {scene_path}");
    println!("Grid:       {0}x{0}", scene.solver.resolution);
    println!("Steps:      {}", scene.steps);
    println!("Sweeps:     {}", scene.solver.relax_iterations);
    println!("Sources:    {}", scene.sources.len());
    println!();

    let selected = select_backend(scene.solver.backend);
    with_backend!(selected, |b| run_scene(&scene, b))
}

fn run_scene<B: GpuBackend>(scene: &Scene, backend: B) -> CmdResult {
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(TracingSink::new(tracing::Level::DEBUG)));
    if let Some(path) = &scene.events {
        let file = BufWriter::new(File::create(path)?);
        bus.add_sink(Box::new(JsonLinesSink::new(file)));
    }

    let mut sim = Simulation::new(backend, scene.solver.clone())?;
    let backend_name = sim.solver().backend().name().to_string();
    bus.emit(SimulationEvent::new(
        0,
        EventKind::BackendSelected {
            name: backend_name.clone(),
            gpu: sim.solver().backend().is_gpu(),
        },
    ));
    println!("Backend:    {backend_name}");

    let mut telemetry = TelemetryHook::new();
    let mut watch = DivergenceWatch::new(DIVERGENCE_WARN_LIMIT);
    let start = Instant::now();

    for _ in 0..scene.steps {
        let timestep = sim.timestep();
        {
            let hooks: [&mut dyn InspectionHook; 2] = [&mut telemetry, &mut watch];
            for hook in hooks {
                hook.on_timestep_begin(timestep, sim.time());
            }
        }

        scene.inject(sim.state_mut())?;
        let report = sim.step()?;
        sim.state().check_finite()?;

        {
            let hooks: [&mut dyn InspectionHook; 2] = [&mut telemetry, &mut watch];
            for hook in hooks {
                hook.on_step_report(timestep, &report);
                hook.on_timestep_end(timestep, report.wall_time);
            }
        }
        bus.extend(telemetry.drain_events());
        bus.flush();
    }
    telemetry.on_simulation_end();
    watch.on_simulation_end();
    bus.close();

    let elapsed = start.elapsed().as_secs_f64();
    let state = sim.state();
    println!();
    println!("Wall time:     {elapsed:.3}s");
    println!("Sim time:      {:.3}s", sim.time());
    println!("Total density: {:.6}", state.total_density());
    println!("Kinetic:       {:.6e}", state.kinetic_energy());
    println!("Max |div|:     {:.6e}", state.max_divergence());
    if let Some((step, worst)) = watch.worst() {
        println!(
            "Divergence above {DIVERGENCE_WARN_LIMIT} on {} steps (worst {worst:.4} at step {step})",
            watch.violations()
        );
    }

    if let Some(path) = &scene.snapshot {
        StateSnapshot::capture(state, sim.timestep(), sim.time()).save(path)?;
        println!("Snapshot written to: {}", path.display());
    }
    Ok(())
}

/// Run benchmark suite.
pub fn benchmark(
    scenario_name: &str,
    backend: BackendKind,
    resolution: Option<u32>,
    steps: Option<u32>,
    output_path: Option<&str>,
) -> CmdResult {
    println!("Eddy Benchmark Suite");
    println!("════════════════════");
    println!();

    let kinds: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        match ScenarioKind::from_name(scenario_name) {
            Some(kind) => vec![kind],
            None => {
                let names: Vec<&str> = ScenarioKind::all().iter().map(|k| k.name()).collect();
                return Err(format!(
                    "Unknown scenario: '{scenario_name}'. Available: {}, all",
                    names.join(", ")
                )
                .into());
            }
        }
    };

    let mut all_metrics = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let mut scenario = Scenario::from_kind(kind);
        scenario.config.backend = backend;
        if let Some(n) = resolution {
            scenario = scenario.with_resolution(n);
        }
        if let Some(steps) = steps {
            scenario.timesteps = steps;
        }

        println!(
            "Running: {} ({1}x{1}, {2} steps, {3} sweeps)",
            kind.name(),
            scenario.config.resolution,
            scenario.timesteps,
            scenario.config.relax_iterations,
        );

        let metrics = with_backend!(select_backend(backend), |b| BenchmarkRunner::run(&scenario, b))
            .map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Backend:       {}", metrics.backend);
        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg step:      {:.3}ms", metrics.avg_step_time * 1000.0);
        println!("  Cell updates:  {:.3e}/s", metrics.cell_updates_per_second);
        println!("  Max |div|:     {:.4e}", metrics.max_divergence);
        println!("  Mass drift:    {:.4e}", metrics.relative_mass_drift());
        println!();

        all_metrics.push(metrics);
    }

    match output_path {
        Some(path) if path.ends_with(".json") => {
            std::fs::write(path, BenchmarkMetrics::to_json(&all_metrics)?)?;
            println!("Results written to: {path}");
        }
        Some(path) => {
            std::fs::write(path, BenchmarkMetrics::to_csv(&all_metrics))?;
            println!("Results written to: {path}");
        }
        None => {
            println!("CSV Output:");
            println!("{}", BenchmarkMetrics::to_csv(&all_metrics));
        }
    }

    Ok(())
}

/// Inspect a state snapshot.
pub fn inspect(path: &str) -> CmdResult {
    println!("Eddy Snapshot Inspector");
    println!("───────────────────────");
    println!();

    let snapshot = StateSnapshot::load(Path::new(path))
        .map_err(|e| format!("Failed to read snapshot: {e}"))?;
    let (u, v, density) = snapshot.fields()?;

    println!("Timestep:      {}", snapshot.timestep);
    println!("Sim time:      {:.4}s", snapshot.sim_time);
    println!("Grid:          {0}x{0}", snapshot.resolution);
    println!("Total density: {:.6}", total_mass(&density));
    println!("Kinetic:       {:.6e}", kinetic_energy(&u, &v));
    println!("Max speed:     {:.6}", max_speed(&u, &v));
    println!("Max |div|:     {:.6e}", max_abs_divergence(&u, &v));

    let (lo, hi) = density
        .interior()
        .map(|(i, j)| density.get(i, j))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)));
    println!("Density range: [{lo:.4}, {hi:.4}]");

    Ok(())
}

/// Validate a scene/config file or a snapshot.
pub fn validate(path: &str) -> CmdResult {
    println!("Eddy Validator");
    println!("──────────────");
    println!();

    if path.ends_with(".toml") {
        println!("Validating scene: {path}");
        let scene = Scene::load(Path::new(path))?;
        scene.validate()?;
        println!("✅ Scene is valid.");
        println!("  Grid:     {0}x{0}", scene.solver.resolution);
        println!("  dt:       {}", scene.solver.dt);
        println!("  Sweeps:   {}", scene.solver.relax_iterations);
        println!("  Backend:  {}", scene.solver.backend);
        println!("  Steps:    {}", scene.steps);
        println!("  Sources:  {}", scene.sources.len());
    } else if path.ends_with(".bin") {
        println!("Validating snapshot: {path}");
        let snapshot = StateSnapshot::load(Path::new(path))?;
        let (u, v, density) = snapshot.fields()?;
        for (name, field) in [("u", &u), ("v", &v), ("density", &density)] {
            if !field.is_finite() {
                return Err(format!("Field '{name}' contains non-finite values").into());
            }
        }
        println!("✅ Snapshot is valid ({0}x{0}, step {1}).", snapshot.resolution, snapshot.timestep);
    } else {
        return Err(format!("Unsupported file type: {path} (expected .toml or .bin)").into());
    }

    Ok(())
}

/// Print the built-in solver presets as TOML.
pub fn presets() -> CmdResult {
    for (name, config) in [
        ("default", SolverConfig::default()),
        ("debug", SolverConfig::debug()),
        ("high_quality", SolverConfig::high_quality()),
    ] {
        println!("# {name}");
        println!("[solver]");
        print!("{}", toml::to_string(&config)?);
        println!();
    }
    Ok(())
}
