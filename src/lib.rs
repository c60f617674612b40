//! `ninfo-client` - client for ninfo information lookup servers
//!
//! A ninfo server hosts a set of plugins, each able to say something about a
//! query term (an IP, hostname, username, ...). This crate discovers the
//! plugins and asks them all in parallel.
//!
//! # Features
//!
//! - **Plugin directory**: fetched once per client and cached
//! - **Parallel fan-out**: every plugin × query pair runs concurrently under a
//!   fixed worker budget (6 by default)
//! - **Failure isolation**: a failing plugin becomes an error entry, never an
//!   aborted batch
//! - **Aggregation**: flat (plugin → result) or nested (query → plugin → result)
//!   maps, or streamed text output
//!
//! # Example
//!
//! ```rust,no_run
//! use ninfo_client::{Client, ServerKind};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Client::new(ServerKind::NinfoWeb, "https://ninfo.example.com", None)?;
//!     let results = client.get_info_dict("8.8.8.8", None).await?;
//!     for (plugin, payload) in &results {
//!         println!("{plugin}: {}", payload.render());
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod client;
pub mod config;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod server;
pub mod session;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use aggregate::{collect_flat, collect_nested, render_stream, FlatResult, NestedResult};
pub use client::Client;
pub use config::ClientConfig;
pub use directory::{Plugin, PluginDirectory};
pub use dispatch::{Dispatcher, Outcomes, DEFAULT_CONCURRENCY};
pub use error::{Error, Result};
pub use request::{descriptors, Format, Outcome, Payload, RequestDescriptor};
pub use server::{Endpoints, ServerKind};
pub use session::Session;
pub use transport::{HttpTransport, Transport, TransportOptions};

/// Version of ninfo-client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
