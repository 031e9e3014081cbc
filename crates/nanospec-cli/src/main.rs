//! NanoSpec command-line interface.
//!
//! Compute nanoparticle spectra from TOML job files:
//! ```sh
//! nanospec-cli run job.toml
//! nanospec-cli validate job.toml
//! nanospec-cli materials
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nanospec_materials::{MaterialCatalogue, MaterialDatabase, MaterialProvider};

#[derive(Parser)]
#[command(name = "nanospec-cli")]
#[command(about = "NanoSpec: optical spectra and colour of core-shell nanoparticles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a spectrum from a TOML job file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a job file against the particle's validation rules without
    /// computing anything.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// List the built-in materials.
    Materials,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("NanoSpec");
            println!("========");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_job(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            // CSV (default on)
            if job.output.save_spectrum {
                runner::write_spectrum_csv(&result, &out_dir.join("spectrum.csv"), &job)?;
            }

            // JSON (optional)
            if job.output.save_json {
                runner::write_spectrum_json(&result, &out_dir.join("spectrum.json"))?;
            }

            runner::print_colour(&result);
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let particle = runner::build_particle(&job)?;
            runner::describe(&particle)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Materials => {
            let catalogue = MaterialCatalogue::shared();
            println!("Available materials:");
            println!();
            for (index, name) in catalogue.names().into_iter().enumerate() {
                let provider = catalogue.provider(index)?;
                let (min, max) = provider.wavelength_range();
                let drude = if catalogue.drude_parameters(index)?.is_some() {
                    ", size correction"
                } else {
                    ""
                };
                println!(
                    "  {:<7} {}, {}–{} nm{}",
                    name,
                    provider.name(),
                    min,
                    max,
                    drude
                );
            }
            Ok(())
        }
    }
}
