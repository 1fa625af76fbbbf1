pub mod report;

use crate::config::ConfigLayer;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for scancat
#[derive(Parser, Debug)]
#[command(name = "scancat")]
#[command(about = "Write per-study CT/PET acquisition logs and archive raw DICOM studies")]
#[command(version)]
pub struct Cli {
    /// Directory containing one subdirectory of DICOM files per study
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Output directory for record files and archives
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// TOML configuration file; command-line options take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Create a .7z archive of every study
    #[arg(short, long)]
    pub archive: bool,

    /// Path to the 7-Zip executable
    #[arg(long, value_name = "PATH")]
    pub compressor: Option<PathBuf>,

    /// 7-Zip compression level (0-9)
    #[arg(short, long, value_name = "N")]
    pub level: Option<u8>,

    /// Number of studies processed in parallel (0 = one per CPU)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Output format of the run summary
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Configuration layer holding only the options given on the command line
    pub fn config_layer(&self) -> ConfigLayer {
        ConfigLayer {
            source_root: self.source.clone(),
            dest_root: self.dest.clone(),
            create_archives: self.archive.then_some(true),
            compressor_path: self.compressor.clone(),
            compression_level: self.level,
            jobs: self.jobs,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
