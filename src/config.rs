//! Client configuration loaded from TOML.
//!
//! Without an explicit path, two files are read in order and merged key by
//! key, later files winning:
//!
//! 1. `~/.config/ninfo/config.toml` (platform config dir)
//! 2. `./ninfo.toml`
//!
//! ```toml
//! server-type = "ninfo-web"
//! host = "https://ninfo.example.com"
//! user = "alice"
//! api-key = "secret"
//! concurrency = 6
//! timeout-secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::dispatch::DEFAULT_CONCURRENCY;
use crate::error::{Error, Result};
use crate::server::ServerKind;
use crate::transport::TransportOptions;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fully resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_type: ServerKind,
    pub host: String,
    pub user: Option<String>,
    pub api_key: Option<String>,
    pub concurrency: usize,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(server_type: ServerKind, host: impl Into<String>) -> Self {
        Self {
            server_type,
            host: host.into(),
            user: None,
            api_key: None,
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from `path`, or from the default locations when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!("config file {} not found", path.display())));
                }
                ConfigFile::read(path)?.resolve()
            }
            None => {
                let found: Vec<PathBuf> = default_paths().into_iter().filter(|p| p.exists()).collect();
                if found.is_empty() {
                    return Err(Error::Config(
                        "no config file found (looked for ~/.config/ninfo/config.toml and ./ninfo.toml)"
                            .to_string(),
                    ));
                }
                let mut merged = ConfigFile::default();
                for path in &found {
                    merged = merged.merge(ConfigFile::read(path)?);
                }
                merged.resolve()
            }
        }
    }

    /// Parse a single TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        ConfigFile::parse(content, "<inline>")?.resolve()
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// One config file; every key optional so files can be layered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    server_type: Option<ServerKind>,
    host: Option<String>,
    user: Option<String>,
    api_key: Option<String>,
    concurrency: Option<usize>,
    timeout_secs: Option<u64>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading config");
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid TOML in {origin}: {e}")))
    }

    fn merge(self, later: Self) -> Self {
        Self {
            server_type: later.server_type.or(self.server_type),
            host: later.host.or(self.host),
            user: later.user.or(self.user),
            api_key: later.api_key.or(self.api_key),
            concurrency: later.concurrency.or(self.concurrency),
            timeout_secs: later.timeout_secs.or(self.timeout_secs),
        }
    }

    fn resolve(self) -> Result<ClientConfig> {
        let server_type = self
            .server_type
            .ok_or_else(|| Error::Config("missing 'server-type'".to_string()))?;
        let host = self
            .host
            .ok_or_else(|| Error::Config("missing 'host'".to_string()))?;

        Ok(ClientConfig {
            server_type,
            host,
            user: self.user,
            api_key: self.api_key.filter(|k| !k.is_empty()),
            concurrency: self.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Default config locations, lowest precedence first.
fn default_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("ninfo").join("config.toml"));
    }
    paths.push(PathBuf::from("ninfo.toml"));
    paths
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg = ClientConfig::from_toml(
            r#"
server-type = "django-ninfo"
host = "https://ninfo.example.com"
user = "alice"
api-key = "k3y"
concurrency = 10
timeout-secs = 5
"#,
        )
        .unwrap();

        assert_eq!(cfg.server_type, ServerKind::DjangoNinfo);
        assert_eq!(cfg.host, "https://ninfo.example.com");
        assert_eq!(cfg.user.as_deref(), Some("alice"));
        assert_eq!(cfg.api_key.as_deref(), Some("k3y"));
        assert_eq!(cfg.concurrency, 10);
        assert_eq!(cfg.transport_options().timeout, Duration::from_secs(5));
    }

    #[test]
    fn applies_defaults() {
        let cfg = ClientConfig::from_toml("server-type = \"ninfo-web\"\nhost = \"http://h\"\n").unwrap();
        assert_eq!(cfg, ClientConfig::new(ServerKind::NinfoWeb, "http://h"));
    }

    #[test]
    fn requires_host_and_server_type() {
        let err = ClientConfig::from_toml("host = \"http://h\"").unwrap_err();
        assert!(err.to_string().contains("server-type"));
        let err = ClientConfig::from_toml("server-type = \"ninfo-web\"").unwrap_err();
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn rejects_unknown_server_type() {
        assert!(ClientConfig::from_toml("server-type = \"gopher\"\nhost = \"http://h\"").is_err());
    }

    #[test]
    fn later_file_overrides_earlier() {
        let base = ConfigFile::parse(
            "server-type = \"ninfo-web\"\nhost = \"http://global\"\napi-key = \"abc\"",
            "base",
        )
        .unwrap();
        let local = ConfigFile::parse("host = \"http://local\"", "local").unwrap();
        let cfg = base.merge(local).resolve().unwrap();
        assert_eq!(cfg.host, "http://local");
        assert_eq!(cfg.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn loads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server-type = \"ninfo-web\"\nhost = \"http://from-file\"").unwrap();
        let cfg = ClientConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.host, "http://from-file");
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let err = ClientConfig::load(Some(Path::new("/nonexistent/ninfo.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
