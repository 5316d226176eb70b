//! Elicit application binary - composition root.
//!
//! Ties the pipeline crates together into a single executable:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Wire dataset loader, detector, frame extractor, and inference backend
//! 4. Run the orchestrator with the sink for the selected mode
//! 5. Report the run summary

mod cli;

use std::str::FromStr;

use clap::Parser;

use elicit_core::config::{ElicitConfig, InteractionMode};
use elicit_data::fs::dataset_exists;
use elicit_data::FsDataLoader;
use elicit_detect::AnomalyDetector;
use elicit_frame::FfmpegExtractor;
use elicit_llm::{DynInferenceService, OpenAiInference};
use elicit_pipeline::{CsvSink, GuideSink, Orchestrator, RunSummary};

use cli::CliArgs;

fn print_summary(summary: &RunSummary) {
    println!("Run {} complete.", summary.run_id);
    println!(
        "  participants: {} processed, {} skipped",
        summary.participants_processed, summary.participants_skipped
    );
    println!("  anomalies:    {}", summary.anomalies_found);
    println!("  records:      {}", summary.records_written);
    if summary.inference_failures > 0 {
        println!("  inference failures: {}", summary.inference_failures);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first: its log_level seeds the tracing filter.
    let config_file = args.resolve_config_path();
    let config = ElicitConfig::load_or_default(&config_file);

    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting elicit v{}", env!("CARGO_PKG_VERSION"));
    config.validate()?;

    let dataset_root = args.resolve_dataset_root(&config.general.dataset_root);
    if !dataset_exists(&dataset_root) {
        return Err(format!("dataset root not found: {}", dataset_root.display()).into());
    }
    let output_dir = args.resolve_output_dir(&config.general.output_dir);

    let mode = match args.resolve_mode() {
        Some(raw) => InteractionMode::from_str(&raw)?,
        None => config.inference.mode,
    };
    tracing::info!(?mode, dataset = %dataset_root.display(), "Pipeline configured");

    let loader = FsDataLoader::new(&dataset_root);
    let detector = AnomalyDetector::new(config.detection);
    let extractor = FfmpegExtractor::new(&config.general.frame_cache_dir);

    let inference: Option<Box<dyn DynInferenceService>> = match mode {
        InteractionMode::Api => Some(Box::new(OpenAiInference::from_config(&config.inference)?)),
        InteractionMode::WebUi => None,
    };

    let orchestrator = Orchestrator::new(
        loader,
        extractor,
        detector,
        inference,
        config.tasks.clone(),
        mode,
        &output_dir,
    );

    // Sinks write into the output dir, so it must exist before they open
    // their files.
    std::fs::create_dir_all(&output_dir)?;

    let summary = match mode {
        InteractionMode::Api => {
            let mut sink = CsvSink::new(&output_dir);
            orchestrator.run(&mut sink).await?
        }
        InteractionMode::WebUi => {
            let mut sink = GuideSink::new(&output_dir)?;
            orchestrator.run(&mut sink).await?
        }
    };

    print_summary(&summary);
    Ok(())
}
