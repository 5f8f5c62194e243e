pub mod character;
pub mod decide;
pub mod decisions;
pub mod event;
pub mod init;
pub mod latest;
pub mod mcp;
pub mod memory;
pub mod process;
pub mod version;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use echonote_core::storage::FileStore;
use echonote_core::EchoConfig;

#[derive(Subcommand)]
pub enum Commands {
    /// Create the report, recording and journal directories
    Init(init::InitArgs),
    /// Transcribe and analyze a recording, writing a Markdown report
    Process(process::ProcessArgs),
    /// Show the newest recording in the recordings directory
    Latest,
    /// Show the journal memory (timeline and characters)
    Memory,
    /// Append an entry to the journal timeline
    Event(event::EventArgs),
    /// Add a note about a character
    Character(character::CharacterArgs),
    /// List logged decisions
    Decisions(decisions::DecisionsArgs),
    /// Log a decision by hand
    Decide(decide::DecideArgs),
    /// Serve the journal over MCP on stdio
    Mcp,
    /// Print version information
    Version,
}

/// Environment config, with `--home` (or `ECHONOTE_HOME`) taking the root.
pub fn load_config(home: Option<&Path>) -> Result<EchoConfig> {
    let config = match home {
        Some(home) => {
            let home = home.to_string_lossy().into_owned();
            EchoConfig::load_with(|key| match key {
                "ECHONOTE_HOME" => Some(home.clone()),
                _ => std::env::var(key).ok(),
            })
        }
        None => EchoConfig::load(),
    };
    config.context("Invalid configuration")
}

pub fn open_store(config: &EchoConfig) -> Result<FileStore> {
    FileStore::open(&config.brain_dir).with_context(|| {
        format!(
            "Failed to open journal at {}",
            config.brain_dir.display()
        )
    })
}
