use anyhow::{Context, Result};
use clap::Args;
use echonote_core::model::Event;
use echonote_core::storage::ContextStore;
use echonote_core::EchoConfig;

#[derive(Args)]
pub struct EventArgs {
    /// Timeline entry text
    pub entry: String,
}

pub fn run(args: &EventArgs, config: &EchoConfig) -> Result<()> {
    if args.entry.trim().is_empty() {
        anyhow::bail!("Event entry must not be empty");
    }
    let store = super::open_store(config)?;
    store
        .append_event(Event::text(args.entry.as_str()))
        .context("Failed to append event")?;
    println!("Event added to timeline.");
    Ok(())
}
