use std::io::Write;

use anyhow::{Context, Result};

use ninfo_client::Client;

pub async fn cmd_list(client: &Client) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    client
        .list_plugins(&mut out)
        .await
        .context("failed to fetch plugin list")?;
    out.flush()?;
    Ok(())
}
