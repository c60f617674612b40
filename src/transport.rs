//! HTTP transport
//!
//! Features:
//! - Single pooled `reqwest` client shared by every request (keep-alive, HTTP/2)
//! - TLS 1.3 via rustls
//! - Brotli, Zstd, Gzip compression (auto-negotiated)
//! - Session cookie store
//! - Static `Authorization: Token <key>` header when an API key is configured

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Anything that can perform a GET and hand back the body.
///
/// Implementations must be safe for concurrent use: the dispatcher calls
/// `get` from many tasks at once.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`, failing on network errors and non-2xx statuses.
    async fn get(&self, url: &str) -> Result<String>;
}

/// Transport options.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn with_options(options: &TransportOptions) -> Result<Self> {
        let client = Client::builder()
            // ═══════════════════════════════════════════════════════════════
            // CONNECTION REUSE
            // ═══════════════════════════════════════════════════════════════
            // Let the server negotiate HTTP/2 vs HTTP/1.1
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            // ═══════════════════════════════════════════════════════════════
            // COMPRESSION (auto-negotiated via Accept-Encoding)
            // ═══════════════════════════════════════════════════════════════
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            // ═══════════════════════════════════════════════════════════════
            // SESSION
            // ═══════════════════════════════════════════════════════════════
            .default_headers(auth_headers(options.api_key.as_deref())?)
            .user_agent(concat!("ninfo-client/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            // ═══════════════════════════════════════════════════════════════
            // TIMEOUTS & REDIRECTS
            // ═══════════════════════════════════════════════════════════════
            .connect_timeout(Duration::from_secs(10))
            .timeout(options.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self), fields(url = %url))]
    async fn get(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await.map_err(|e| Error::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        debug!(status = %status, version = ?response.version(), "Response received");

        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| Error::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

fn auth_headers(api_key: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Token {key}"))
            .map_err(|_| Error::Config("API key contains invalid header characters".into()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
