//! Command-line entry point for the Tropical Cloud Cluster pipeline.
//!
//! Exposes the orchestrator façade as subcommands:
//!
//! ```bash
//! tcc-cli process-one granule.h5 --out-dir out --weights model.onnx
//! tcc-cli process-directory in_dir --out-dir out --weights model.onnx
//! tcc-cli predict --out-dir out --weights model.onnx --steps 4
//! tcc-cli report --out-dir out --weights model.onnx
//! tcc-cli stats granule.h5
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tcc_common::PipelineConfig;
use tcc_orchestrator::TccOrchestrator;
use tcc_segment::onnx_backend::OnnxSegmenter;
use tcc_segment::SegmenterBackend;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tcc-cli")]
#[command(about = "Tropical Cloud Cluster detection and tracking pipeline")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to the frozen segmenter ONNX weights. Required by every
    /// subcommand except `stats`, which only reads a granule's raw BT field.
    #[arg(long, env = "TCC_MODEL_WEIGHTS")]
    weights: Option<PathBuf>,

    /// Optional YAML config file, overlaid on top of `TCC_*` env vars.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Use a pretty (non-JSON) log formatter.
    #[arg(long, env = "TCC_LOG_FORMAT")]
    log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a single granule.
    ProcessOne {
        path: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(long)]
        id: Option<String>,
    },
    /// Process every granule under a directory, sorted by filename.
    ProcessDirectory {
        in_dir: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Extrapolate active tracks forward without ingesting a new frame.
    Predict {
        #[arg(long, default_value = "4")]
        steps: u32,
    },
    /// Write the full reporting artefact set for the current run.
    Report {
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Print brightness-temperature statistics for a single granule without
    /// running the segmenter.
    Stats { path: PathBuf },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber_builder = FmtSubscriber::builder().with_max_level(level).with_target(true);
    if args.log_format.as_deref() == Some("pretty") {
        tracing::subscriber::set_global_default(subscriber_builder.pretty().finish())?;
    } else {
        tracing::subscriber::set_global_default(subscriber_builder.json().finish())?;
    }

    info!("Starting tcc-cli");

    let config = match &args.config {
        Some(path) => PipelineConfig::from_yaml(path).map_err(anyhow::Error::msg)?,
        None => PipelineConfig::from_env(),
    };
    config.validate().map_err(anyhow::Error::msg)?;

    if let Command::Stats { path } = args.command {
        let (bt, _geo, _timestamp) = tcc_ingest::open(&path, &config)?;
        let stats = tcc_postprocess::stats::get_bt_statistics(&bt.data);
        let intensity = tcc_postprocess::stats::estimate_convective_intensity(&bt.data);
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "bt_stats": stats,
                "intensity": intensity.as_str(),
            }))?
        );
        return Ok(());
    }

    let weights = args
        .weights
        .context("--weights (or TCC_MODEL_WEIGHTS) is required for this subcommand")?;
    let backend: Arc<dyn SegmenterBackend> =
        Arc::new(OnnxSegmenter::load(&weights).context("failed to load segmenter weights")?);
    let mut orchestrator = TccOrchestrator::new(config, backend);

    match args.command {
        Command::ProcessOne { path, out_dir, id } => {
            let result = orchestrator.process_one(&path, &out_dir, id)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::ProcessDirectory { in_dir, out_dir } => {
            let result = orchestrator.process_directory(&in_dir, &out_dir)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Predict { steps } => {
            let result = orchestrator.predict(steps);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Report { out_dir } => {
            let result = orchestrator.report(&out_dir)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Stats { .. } => unreachable!("handled above"),
    }

    Ok(())
}
