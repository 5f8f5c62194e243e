use anyhow::Result;
use echonote_core::EchoConfig;
use echonote_pipeline::latest_recording;

use crate::output::OutputFormat;

pub fn run(config: &EchoConfig, fmt: OutputFormat) -> Result<()> {
    let latest = latest_recording(&config.recordings_dir);
    match fmt {
        OutputFormat::Json => {
            let value = serde_json::json!({ "recording": latest });
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        }
        OutputFormat::Text => match latest {
            Some(path) => println!("{}", path.display()),
            None => println!(
                "No recordings found in {}",
                config.recordings_dir.display()
            ),
        },
    }
    Ok(())
}
