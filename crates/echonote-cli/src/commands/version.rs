use anyhow::Result;

pub fn run() -> Result<()> {
    println!("echonote {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
