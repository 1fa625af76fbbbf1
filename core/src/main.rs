use clap::Parser;
use log::{error, info};
use scancat_core::cli::{Cli, OutputFormat};
use scancat_core::config::ConfigLayer;
use scancat_core::{run, DicomHeaderReader, RunConfig, RunSummary, SevenZipArchiver, TextReport};
use std::process;

/// Exit status when any study failed or was flagged
const EXIT_STUDY_FAILURES: i32 = 1;
/// Exit status for configuration errors
const EXIT_CONFIG: i32 = 2;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    info!("Source: {}", config.source_root.display());
    info!("Destination: {}", config.dest_root.display());
    if config.create_archives {
        info!(
            "Archiving with {} at level {}",
            config.compressor_path.display(),
            config.compression_level
        );
    }

    let archiver = SevenZipArchiver::new(config.compressor_path.clone(), config.compression_level);
    let summary = match run(&config, &DicomHeaderReader, Some(&archiver)) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    output_summary(&summary, cli.format);

    if !summary.all_succeeded() {
        process::exit(EXIT_STUDY_FAILURES);
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

/// Layers defaults, the optional config file and command-line options
fn load_config(cli: &Cli) -> scancat_core::Result<RunConfig> {
    let file_layer = match cli.config {
        Some(ref path) => ConfigLayer::load(path)?,
        None => ConfigLayer::default(),
    };
    let config = file_layer.merge(cli.config_layer()).resolve()?;
    config.prepare_directories()?;
    Ok(config)
}

fn output_summary(summary: &RunSummary, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(summary));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(EXIT_STUDY_FAILURES);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                println!("{}", TextReport::new(summary));
            }
        }
    }
}
