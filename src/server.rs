//! Server variants and their URL layouts.
//!
//! Two server implementations expose the same plugin API under different
//! paths:
//!
//! | variant        | plugin list                | plugin info                                  |
//! |----------------|----------------------------|----------------------------------------------|
//! | `ninfo-web`    | `{host}/info/plugins`      | `{host}/info/{fmt}/{plugin}/{q}`             |
//! | `django-ninfo` | `{host}/ninfo/api/plugins` | `{host}/ninfo/api/plugins/{plugin}/{fmt}/{q}`|

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::request::Format;

/// Which server implementation the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServerKind {
    #[default]
    #[serde(rename = "ninfo-web")]
    NinfoWeb,
    #[serde(rename = "django-ninfo")]
    DjangoNinfo,
}

impl ServerKind {
    /// Config/CLI name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NinfoWeb => "ninfo-web",
            Self::DjangoNinfo => "django-ninfo",
        }
    }
}

impl fmt::Display for ServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ninfo-web" => Ok(Self::NinfoWeb),
            "django-ninfo" => Ok(Self::DjangoNinfo),
            other => Err(Error::Config(format!(
                "unknown server type '{other}' (expected ninfo-web or django-ninfo)"
            ))),
        }
    }
}

/// URL builder for one server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    kind: ServerKind,
    host: String,
}

impl Endpoints {
    /// Validate `host` and bind it to a server variant.
    ///
    /// Trailing slashes are dropped so templates never produce `//`.
    pub fn new(kind: ServerKind, host: &str) -> Result<Self> {
        let host = host.trim().trim_end_matches('/');
        let parsed = url::Url::parse(host)
            .map_err(|e| Error::Config(format!("invalid host '{host}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "invalid host '{host}': scheme must be http or https"
            )));
        }

        Ok(Self {
            kind,
            host: host.to_string(),
        })
    }

    pub fn kind(&self) -> ServerKind {
        self.kind
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Discovery endpoint listing all plugins.
    pub fn plugins_url(&self) -> String {
        match self.kind {
            ServerKind::NinfoWeb => format!("{}/info/plugins", self.host),
            ServerKind::DjangoNinfo => format!("{}/ninfo/api/plugins", self.host),
        }
    }

    /// Per-plugin info endpoint. Plugin and query are encoded as single path segments.
    pub fn info_url(&self, format: Format, plugin: &str, query: &str) -> String {
        let fmt = format.path_segment();
        let plugin = urlencoding::encode(plugin);
        let query = urlencoding::encode(query);
        match self.kind {
            ServerKind::NinfoWeb => format!("{}/info/{fmt}/{plugin}/{query}", self.host),
            ServerKind::DjangoNinfo => {
                format!("{}/ninfo/api/plugins/{plugin}/{fmt}/{query}", self.host)
            }
        }
    }
}
