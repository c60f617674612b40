pub mod list;
pub mod query;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use ninfo_client::{Client, ClientConfig};

/// Load configuration and build the client.
pub fn connect(config: Option<&Path>, concurrency: Option<usize>) -> Result<Client> {
    let mut cfg = ClientConfig::load(config).context("failed to load configuration")?;
    if let Some(n) = concurrency {
        cfg.concurrency = n.max(1);
    }
    debug!(server = %cfg.server_type, host = %cfg.host, concurrency = cfg.concurrency, "Connecting");

    Client::from_config(&cfg).with_context(|| format!("failed to create client for {}", cfg.host))
}
