use anyhow::{Context, Result};
use echonote_core::storage::ContextStore;
use echonote_core::EchoConfig;

use crate::output::{format, OutputFormat};

pub fn run(config: &EchoConfig, fmt: OutputFormat) -> Result<()> {
    let store = super::open_store(config)?;
    let memory = store.get_memory().context("Failed to read memory")?;
    println!("{}", format::format_memory(&memory, fmt));
    Ok(())
}
