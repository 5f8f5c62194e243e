use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use echonote_assemblyai::AssemblyAiClient;
use echonote_core::model::Mode;
use echonote_core::storage::ContextStore;
use echonote_core::EchoConfig;
use echonote_pipeline::{latest_recording, Pipeline, RunOptions};

use crate::output::{format, OutputFormat};

#[derive(Args)]
pub struct ProcessArgs {
    /// Audio file to process (default: newest file in the recordings directory)
    pub audio: Option<PathBuf>,

    /// Report mode: quick, meeting, lecture, story or decision (unknown names fall back to quick)
    #[arg(short, long, default_value = "quick")]
    pub mode: String,

    /// Add a ghost ship simulation of the path not taken (decision mode only)
    #[arg(long)]
    pub ghost_ship: bool,
}

pub fn run(args: &ProcessArgs, config: &EchoConfig, fmt: OutputFormat) -> Result<()> {
    let mode = Mode::parse_lenient(&args.mode);
    if Mode::from_name(&args.mode).is_none() {
        eprintln!("Unknown mode '{}', using {mode}.", args.mode);
    }

    let source = match &args.audio {
        Some(path) => path.clone(),
        None => latest_recording(&config.recordings_dir).with_context(|| {
            format!(
                "No recordings found in {}",
                config.recordings_dir.display()
            )
        })?,
    };
    if !source.is_file() {
        anyhow::bail!("Recording not found: {}", source.display());
    }

    let client = AssemblyAiClient::from_env().context("Failed to configure AssemblyAI")?;
    // The pipeline reports a missing journal as a warning, so don't fail here.
    let store = match super::open_store(config) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!("{e:#}");
            None
        }
    };

    let mut pipeline = Pipeline::new(&client, &client, config);
    if let Some(store) = &store {
        pipeline = pipeline.with_store(store as &dyn ContextStore);
    }
    let outcome = pipeline
        .run(
            &source,
            mode,
            &RunOptions {
                ghost_ship: args.ghost_ship,
            },
        )
        .with_context(|| format!("Failed to process {}", source.display()))?;

    println!("{}", format::format_outcome(&outcome, fmt));
    Ok(())
}
