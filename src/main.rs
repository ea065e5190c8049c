//! Chromatone - grids of integers as color and sound

use anyhow::{Context, Result};
use chromatone::config;
use chromatone::engine::Engine;
use chromatone::mapping::value_to_rgb;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chromatone=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            out_dir,
            config: config_path,
        } => {
            let cfg = config::load_or_default(&config_path)?;
            let bytes = std::fs::read(&input)
                .with_context(|| format!("failed to read input: {:?}", input))?;

            println!("Encoding {:?}...", input);
            let mut engine = Engine::new(cfg);
            let encoded = engine.encode(&bytes)?;

            let (rows, cols) = encoded.grid.shape();
            println!("  Grid: {}x{} ({} values)", rows, cols, encoded.sequence.len());
            if encoded.dropped > 0 {
                println!("  Dropped {} trailing values", encoded.dropped);
            }
            println!("  Distinct values: {}", encoded.frequencies.len());

            let written = encoded.bundle.write_to_dir(&out_dir)?;

            println!("\nReconstructed values:");
            println!("{}", encoded.decoded);

            println!("\nWrote:");
            for path in written {
                println!("  {}", path.display());
            }
        }

        Commands::Inspect {
            input,
            config: config_path,
        } => {
            let cfg = config::load_or_default(&config_path)?;
            let bytes = std::fs::read(&input)
                .with_context(|| format!("failed to read input: {:?}", input))?;

            let mut engine = Engine::new(cfg);
            let (sequence, grid, frequencies) = engine.analyze(&bytes)?;

            let (rows, cols) = grid.shape();
            println!("Values: {}", sequence.len());
            println!("Grid: {}x{} ({} dropped)", rows, cols, sequence.len() - grid.len());
            println!("Frequency step: {:.5} Hz", frequencies.step());
            println!("\n  value  rgb              frequency");
            for (value, freq) in frequencies.iter() {
                let [r, g, b] = value_to_rgb(value as i64);
                println!("  {:>5}  ({:>3},{:>3},{:>3})    {:>10.5} Hz", value, r, g, b, freq);
            }
            println!("\n{}", grid);
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Tone duration: {} ms", cfg.audio.tone_duration_ms);
                    println!("  Amplitude: {:.0}%", cfg.audio.amplitude * 100.0);
                    println!(
                        "  Band: {} - {} Hz (precision {})",
                        cfg.frequency.min_hz, cfg.frequency.max_hz, cfg.frequency.precision
                    );
                    println!("  Grid policy: {:?}", cfg.grid.policy);
                    println!("  Max values: {}", cfg.limits.max_values);
                    println!("  Cache capacity: {}", cfg.limits.cache_capacity);
                }
                Err(e) => {
                    println!("Configuration is invalid: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let path = "chromatone.yaml";
            if std::path::Path::new(path).exists() {
                println!("chromatone.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, config::EXAMPLE_CONFIG)?;
                println!("Created chromatone.yaml with example configuration.");
            }
        }
    }

    Ok(())
}
