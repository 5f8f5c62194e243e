use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "echonote",
    version,
    about = "Turn voice notes into mode-driven Markdown reports and a life journal"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    /// Root of the report and journal tree (default: ./Life_OS)
    #[arg(long, global = true, env = "ECHONOTE_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // A missing .env is fine; variables may come from the shell.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = commands::load_config(cli.home.as_deref())?;

    match &cli.command {
        commands::Commands::Init(args) => commands::init::run(args, &config),
        commands::Commands::Process(args) => commands::process::run(args, &config, cli.format),
        commands::Commands::Latest => commands::latest::run(&config, cli.format),
        commands::Commands::Memory => commands::memory::run(&config, cli.format),
        commands::Commands::Event(args) => commands::event::run(args, &config),
        commands::Commands::Character(args) => commands::character::run(args, &config),
        commands::Commands::Decisions(args) => commands::decisions::run(args, &config, cli.format),
        commands::Commands::Decide(args) => commands::decide::run(args, &config, cli.format),
        commands::Commands::Mcp => commands::mcp::run(&config),
        commands::Commands::Version => commands::version::run(),
    }
}
