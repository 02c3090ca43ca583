//! Eddy CLI — simulation, benchmarking, and debugging.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use eddy_solver::BackendKind;

mod commands;
mod scene;

#[derive(Parser)]
#[command(name = "eddy")]
#[command(version, about = "Eddy — GPU-accelerated stable-fluids solver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a scene file.
    Simulate {
        /// Path to scene file (TOML).
        #[arg(short, long, default_value = "scene.toml")]
        config: String,

        /// Override the scene's step count.
        #[arg(short, long)]
        steps: Option<u32>,

        /// Override the scene's backend (cpu, parallel, wgpu).
        #[arg(short, long)]
        backend: Option<BackendKind>,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (smoke_plume, vortex, quiescent_blob, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Backend to run on (cpu, parallel, wgpu).
        #[arg(short, long, default_value = "parallel")]
        backend: BackendKind,

        /// Override the scenario resolution N.
        #[arg(short = 'n', long)]
        resolution: Option<u32>,

        /// Override the scenario step count.
        #[arg(long)]
        steps: Option<u32>,

        /// Output file path (.csv or .json).
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Inspect a state snapshot file.
    Inspect {
        /// Path to snapshot file.
        path: String,
    },

    /// Validate a scene file or snapshot.
    Validate {
        /// Path to scene (.toml) or snapshot (.bin).
        path: String,
    },

    /// Print the built-in solver presets.
    Presets,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate { config, steps, backend } => commands::simulate(&config, steps, backend),
        Commands::Benchmark {
            scenario,
            backend,
            resolution,
            steps,
            output,
        } => commands::benchmark(&scenario, backend, resolution, steps, output.as_deref()),
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Validate { path } => commands::validate(&path),
        Commands::Presets => commands::presets(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
