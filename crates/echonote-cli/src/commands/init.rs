use anyhow::{Context, Result};
use clap::Args;
use echonote_core::EchoConfig;

#[derive(Args)]
pub struct InitArgs {
    /// Only print the layout, create nothing
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: &InitArgs, config: &EchoConfig) -> Result<()> {
    let layout = [
        ("Inbox", &config.inbox_dir),
        ("Chronicle", &config.chronicle_dir),
        ("Decisions", &config.decisions_dir),
        ("Recordings", &config.recordings_dir),
        ("Brain", &config.brain_dir),
    ];

    if !args.dry_run {
        config
            .ensure_dirs()
            .context("Failed to create directories")?;
        super::open_store(config)?;
        println!("Echonote initialized at {}", config.root.display());
    }

    for (name, dir) in layout {
        println!("  {name:<11}{}", dir.display());
    }
    if !args.dry_run {
        println!();
        println!("Next steps:");
        println!("  echonote process <audio> --mode meeting   Analyze a recording");
        println!("  echonote latest                           Show the newest recording");
        println!("  echonote memory                           Inspect the journal");
    }
    Ok(())
}
