use anyhow::{Context, Result};
use clap::Args;
use echonote_core::model::NewDecision;
use echonote_core::storage::ContextStore;
use echonote_core::EchoConfig;

use crate::output::{format, OutputFormat};

#[derive(Args)]
pub struct DecideArgs {
    /// The dilemma that was faced
    #[arg(long)]
    pub dilemma: String,

    /// The option that was chosen
    #[arg(long)]
    pub choice: String,

    /// What actually happened
    #[arg(long, default_value = "Pending")]
    pub outcome: String,

    /// Imagined outcome of the path not taken
    #[arg(long)]
    pub alternate: Option<String>,
}

pub fn run(args: &DecideArgs, config: &EchoConfig, fmt: OutputFormat) -> Result<()> {
    let store = super::open_store(config)?;
    let decision = store
        .append_decision(NewDecision {
            dilemma: args.dilemma.clone(),
            choice_made: args.choice.clone(),
            actual_outcome: args.outcome.clone(),
            alternate_timeline: args.alternate.clone(),
        })
        .context("Failed to log decision")?;
    println!("{}", format::format_decision_logged(&decision, fmt));
    Ok(())
}
