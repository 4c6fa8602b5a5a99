//! pfield command-line interface.
//!
//! # Commands
//!
//! - `pfield run --model <model>` - Run a phase-field simulation
//! - `pfield devices` - List compute platforms and devices
//!
//! # Examples
//!
//! ```bash
//! # Anisotropic dendrite with the default input and kernel files
//! pfield run --model kobayashi-aniso
//!
//! # Reproducible Cahn-Hilliard run into a scratch directory
//! pfield run --model cahn-hilliard --seed 7 --output-root /tmp/ch
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use pfield::models::ModelKind;
use pfield::RunOptions;
use tracing_subscriber::EnvFilter;

/// Phase-field simulation driver
#[derive(Parser)]
#[command(name = "pfield")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        /// Physical model
        #[arg(short, long, value_enum)]
        model: ModelArg,

        /// Configuration file (default: InputFiles/<Model>.in)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Kernel source file (default: kernels/<Model>Kern.cl)
        #[arg(short, long)]
        kernel: Option<PathBuf>,

        /// Root of the output tree
        #[arg(short, long, default_value = "OutDataFiles")]
        output_root: PathBuf,

        /// RNG seed; overrides the input file and disables clock seeding
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List compute platforms and devices
    Devices,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    Diffusion,
    CahnHilliard,
    KobayashiIso,
    KobayashiAniso,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Diffusion => ModelKind::Diffusion,
            ModelArg::CahnHilliard => ModelKind::CahnHilliard,
            ModelArg::KobayashiIso => ModelKind::KobayashiIso,
            ModelArg::KobayashiAniso => ModelKind::KobayashiAniso,
        }
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Run {
            model,
            input,
            kernel,
            output_root,
            seed,
        } => {
            let defaults = RunOptions::for_model(model.into());
            let options = RunOptions {
                input: input.unwrap_or(defaults.input),
                kernel: kernel.unwrap_or(defaults.kernel),
                output_root,
                seed,
                ..defaults
            };
            match pfield::run_simulation(&options) {
                Ok(report) => {
                    tracing::info!(
                        checkpoints = report.checkpoints.len(),
                        work_group = report.work_group_size,
                        wall_secs = report.wall_time.as_secs_f64(),
                        "run complete"
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Devices => {
            print!("{}", pfield::device_report());
            ExitCode::SUCCESS
        }
    }
}
