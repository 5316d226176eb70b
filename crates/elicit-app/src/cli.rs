//! CLI argument definitions for the elicit binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Elicit — turns recorded UI study sessions into requirement suggestions.
#[derive(Parser, Debug)]
#[command(name = "elicit", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Dataset root directory (one subdirectory per participant).
    #[arg(short = 'd', long = "dataset-root")]
    pub dataset_root: Option<PathBuf>,

    /// Output directory for run artifacts.
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Interaction mode: api or web-ui.
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > ELICIT_CONFIG env var > ./elicit.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("ELICIT_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("elicit.toml")
    }

    /// Resolve the dataset root.
    ///
    /// Priority: --dataset-root flag > ELICIT_DATASET env var > config file value.
    pub fn resolve_dataset_root(&self, config_value: &str) -> PathBuf {
        if let Some(ref p) = self.dataset_root {
            return p.clone();
        }
        if let Ok(p) = std::env::var("ELICIT_DATASET") {
            return PathBuf::from(p);
        }
        PathBuf::from(config_value)
    }

    /// Resolve the output directory.
    ///
    /// Priority: --output-dir flag > config file value.
    pub fn resolve_output_dir(&self, config_value: &str) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(config_value))
    }

    /// Resolve the interaction mode as a string, if overridden.
    ///
    /// Priority: --mode flag > config file value.
    pub fn resolve_mode(&self) -> Option<String> {
        self.mode.clone()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_value: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_value.to_string())
    }
}
