use anyhow::{Context, Result};
use echonote_core::EchoConfig;

pub fn run(config: &EchoConfig) -> Result<()> {
    let brain_dir = config.brain_dir.clone();
    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    rt.block_on(async {
        echonote_mcp::run_stdio(brain_dir)
            .await
            .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))
    })
}
