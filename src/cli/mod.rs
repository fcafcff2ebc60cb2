//! Command-line interface for transvar-config.
//!
//! Available commands:
//!
//! - **config**: set options, switch builds, and download resources
//! - **catalog**: inspect the built-in resource catalog
//!
//! ## Usage
//!
//! ```text
//! # Show the active configuration
//! transvar-config config
//!
//! # Download pre-built annotations for hg38 and make it the active build
//! transvar-config config --download-anno --refversion hg38
//!
//! # Point a build at a local FASTA
//! transvar-config config -k reference -v ~/ref/hg38.fa --refversion hg38
//!
//! # Fetch genome and GTF for a species from a live Ensembl release
//! transvar-config config --download-ensembl --ensembl-release 95
//!
//! # What can be downloaded
//! transvar-config catalog list --format tsv
//! ```

use clap::{Parser, Subcommand};

pub mod catalog;
pub mod config;

#[derive(Parser)]
#[command(name = "transvar-config")]
#[command(version)]
#[command(about = "Configure and download reference and annotation resources for TransVar")]
#[command(
    long_about = "transvar-config maintains the TransVar configuration file.\n\nIt records, per genome build, where the reference FASTA and the indexed transcript databases live, and can download them:\n- Pre-built annotation databases and their raw sources\n- Reference genomes and dbSNP\n- Genome and GTF straight from an Ensembl release"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show or change the configuration, and download resources
    Config(config::ConfigArgs),

    /// Inspect the built-in resource catalog
    Catalog(catalog::CatalogArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
