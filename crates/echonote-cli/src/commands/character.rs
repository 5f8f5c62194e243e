use anyhow::{Context, Result};
use clap::Args;
use echonote_core::storage::ContextStore;
use echonote_core::EchoConfig;

#[derive(Args)]
pub struct CharacterArgs {
    /// Character name
    pub name: String,

    /// Note to add; earlier notes are kept
    pub description: String,
}

pub fn run(args: &CharacterArgs, config: &EchoConfig) -> Result<()> {
    if args.name.trim().is_empty() {
        anyhow::bail!("Character name must not be empty");
    }
    let store = super::open_store(config)?;
    store
        .upsert_character(&args.name, &args.description)
        .context("Failed to update character")?;
    let description = store
        .get_memory()
        .context("Failed to read memory")?
        .character_description(&args.name)
        .unwrap_or_default();
    println!("{}: {description}", args.name);
    Ok(())
}
