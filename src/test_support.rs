//! In-memory transport for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::server::{Endpoints, ServerKind};
use crate::session::Session;
use crate::transport::Transport;
use crate::{Error, Result};

pub const HOST: &str = "http://ninfo.test";

/// How the fake answers requests for one plugin.
#[derive(Clone)]
pub enum Reply {
    /// Echo `<plugin>:<query>` as the body (JSON string for json requests).
    Echo,
    Body(String),
    Status(u16),
    Panic,
}

/// Routes `/info/{fmt}/{plugin}/{query}` by plugin name and records
/// how many requests were in flight at once.
#[derive(Default)]
pub struct FakeTransport {
    replies: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    plugin_list: Option<String>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, plugin: &str, reply: Reply) -> Self {
        self.replies.insert(plugin.to_string(), reply);
        self
    }

    pub fn delay(mut self, plugin: &str, delay: Duration) -> Self {
        self.delays.insert(plugin.to_string(), delay);
        self
    }

    pub fn default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn plugins(mut self, names: &[&str]) -> Self {
        let plugins: Vec<_> = names
            .iter()
            .map(|n| serde_json::json!({"name": n, "title": n.to_uppercase(), "description": ""}))
            .collect();
        self.plugin_list = Some(serde_json::json!({ "plugins": plugins }).to_string());
        self
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn session(self: &Arc<Self>) -> Session {
        let endpoints = Endpoints::new(ServerKind::NinfoWeb, HOST).unwrap();
        Session::new(self.clone(), endpoints)
    }
}

/// Decrements the in-flight counter even if the request panics.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        let path = url.strip_prefix(HOST).unwrap_or(url);
        if path == "/info/plugins" {
            return self.plugin_list.clone().ok_or(Error::Status {
                url: url.to_string(),
                status: 404,
            });
        }

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let (fmt, plugin, query) = match segments.as_slice() {
            [_, fmt, plugin, query] => (*fmt, *plugin, *query),
            _ => {
                return Err(Error::Status {
                    url: url.to_string(),
                    status: 404,
                })
            }
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(plugin).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match self.replies.get(plugin).cloned().unwrap_or(Reply::Echo) {
            Reply::Echo if fmt == "json" => Ok(format!("\"{plugin}:{query}\"")),
            Reply::Echo => Ok(format!("{plugin}:{query}")),
            Reply::Body(body) => Ok(body),
            Reply::Status(status) => Err(Error::Status {
                url: url.to_string(),
                status,
            }),
            Reply::Panic => panic!("fake transport panic for {plugin}"),
        }
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
