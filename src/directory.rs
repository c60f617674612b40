//! Plugin directory, fetched once per client.

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::Result;
use crate::session::Session;

/// A server-side information source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Unique key used in request URLs.
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Lazily loaded, memoized plugin list.
///
/// The first successful [`plugins`](Self::plugins) call caches the list for the
/// lifetime of the directory. Failures are not cached, so the next call
/// retries. Concurrent first callers share a single fetch.
pub struct PluginDirectory {
    session: Session,
    cache: OnceCell<Vec<Plugin>>,
}

impl PluginDirectory {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            cache: OnceCell::new(),
        }
    }

    pub async fn plugins(&self) -> Result<&[Plugin]> {
        let plugins = self
            .cache
            .get_or_try_init(|| async {
                let plugins = self.session.fetch_plugins().await?;
                info!(
                    count = plugins.len(),
                    url = %self.session.endpoints().plugins_url(),
                    "Loaded plugin directory"
                );
                Ok::<_, crate::Error>(plugins)
            })
            .await?;
        Ok(plugins.as_slice())
    }

    /// Whether the list has already been fetched.
    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }

    /// Plugin names to query.
    ///
    /// A non-empty `filter` is returned verbatim (order and duplicates kept)
    /// without touching the network. Otherwise every discovered plugin, in
    /// discovery order.
    pub async fn plugin_names(&self, filter: Option<&[String]>) -> Result<Vec<String>> {
        match filter {
            Some(names) if !names.is_empty() => Ok(names.to_vec()),
            _ => Ok(self
                .plugins()
                .await?
                .iter()
                .map(|p| p.name.clone())
                .collect()),
        }
    }
}
