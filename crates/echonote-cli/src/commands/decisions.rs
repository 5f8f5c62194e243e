use anyhow::{Context, Result};
use clap::Args;
use echonote_core::storage::ContextStore;
use echonote_core::EchoConfig;

use crate::output::{format, OutputFormat};

#[derive(Args)]
pub struct DecisionsArgs {
    /// Only show the most recent N decisions
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

pub fn run(args: &DecisionsArgs, config: &EchoConfig, fmt: OutputFormat) -> Result<()> {
    let store = super::open_store(config)?;
    let decisions = store.get_decisions().context("Failed to read decisions")?;
    let skip = args
        .limit
        .map_or(0, |limit| decisions.len().saturating_sub(limit));
    println!("{}", format::format_decisions(&decisions[skip..], fmt));
    Ok(())
}
