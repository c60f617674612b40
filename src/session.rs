//! A transport bound to one server.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::directory::Plugin;
use crate::error::{Error, Result};
use crate::request::{Format, Payload};
use crate::server::Endpoints;
use crate::transport::Transport;

/// Body of the plugin discovery endpoint.
#[derive(Deserialize)]
struct PluginList {
    plugins: Vec<Plugin>,
}

/// Shared, read-only handle used by the directory and by every dispatch worker.
#[derive(Clone)]
pub struct Session {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl Session {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch the plugin list from the discovery endpoint.
    pub async fn fetch_plugins(&self) -> Result<Vec<Plugin>> {
        let url = self.endpoints.plugins_url();
        let body = self.transport.get(&url).await?;
        let list: PluginList = serde_json::from_str(&body).map_err(|e| Error::Decode {
            url,
            message: e.to_string(),
        })?;
        Ok(list.plugins)
    }

    /// Ask one plugin about `query` in the given format.
    pub async fn fetch(&self, format: Format, plugin: &str, query: &str) -> Result<Payload> {
        let url = self.endpoints.info_url(format, plugin, query);
        debug!(plugin, query, url = %url, "Requesting plugin info");
        let body = self.transport.get(&url).await?;

        match format {
            Format::Text => Ok(Payload::Text(body)),
            Format::Json => serde_json::from_str::<Value>(&body)
                .map(Payload::Json)
                .map_err(|e| Error::Decode {
                    url,
                    message: e.to_string(),
                }),
        }
    }
}
