//! CLI interface for Chromatone

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Turn a grid of integers into a color image and a tone sequence
#[derive(Parser)]
#[command(name = "chromatone")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a CSV file into an image, audio, metadata and decoded CSV
    Encode {
        /// Input CSV file of integers
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the output files
        #[arg(short, long, default_value = "chromatone-out")]
        out_dir: PathBuf,

        /// Configuration file path (defaults apply if missing)
        #[arg(short, long, default_value = "chromatone.yaml")]
        config: PathBuf,
    },

    /// Show the grid, colors and frequencies for a CSV file without writing anything
    Inspect {
        /// Input CSV file of integers
        #[arg(short, long)]
        input: PathBuf,

        /// Configuration file path (defaults apply if missing)
        #[arg(short, long, default_value = "chromatone.yaml")]
        config: PathBuf,
    },

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "chromatone.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}
