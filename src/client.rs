//! High-level client.

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::aggregate::{collect_flat, collect_nested, render_stream, write_block, FlatResult, NestedResult};
use crate::config::ClientConfig;
use crate::directory::{Plugin, PluginDirectory};
use crate::dispatch::{Dispatcher, Outcomes};
use crate::error::{Error, Result};
use crate::request::{Format, Outcome, Payload, RequestDescriptor};
use crate::server::{Endpoints, ServerKind};
use crate::session::Session;
use crate::transport::{HttpTransport, Transport, TransportOptions};

/// Client for one ninfo server.
///
/// Owns the HTTP session, the memoized plugin directory and the dispatcher
/// used for parallel lookups.
pub struct Client {
    session: Session,
    directory: PluginDirectory,
    dispatcher: Dispatcher,
    user: Option<String>,
}

impl Client {
    /// Connect over HTTP with an optional API key.
    pub fn new(server: ServerKind, host: &str, api_key: Option<&str>) -> Result<Self> {
        let options = TransportOptions {
            api_key: api_key.map(str::to_string),
            ..TransportOptions::default()
        };
        let transport = HttpTransport::with_options(&options)?;
        Ok(Self::with_transport(Endpoints::new(server, host)?, Arc::new(transport)))
    }

    /// Build a client from resolved configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::with_options(&config.transport_options())?;
        let endpoints = Endpoints::new(config.server_type, &config.host)?;
        let client = Self::with_transport(endpoints, Arc::new(transport))
            .with_concurrency(config.concurrency)
            .with_user(config.user.clone());
        Ok(client)
    }

    /// Use a caller-provided transport.
    pub fn with_transport(endpoints: Endpoints, transport: Arc<dyn Transport>) -> Self {
        let session = Session::new(transport, endpoints);
        Self {
            directory: PluginDirectory::new(session.clone()),
            dispatcher: Dispatcher::new(session.clone()),
            session,
            user: None,
        }
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.dispatcher = self.dispatcher.with_concurrency(concurrency);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn endpoints(&self) -> &Endpoints {
        self.session.endpoints()
    }

    pub fn concurrency(&self) -> usize {
        self.dispatcher.concurrency()
    }

    /// All plugins offered by the server, fetched once and cached.
    pub async fn plugins(&self) -> Result<&[Plugin]> {
        self.directory.plugins().await
    }

    /// Ask one plugin about `query`.
    pub async fn get_info(&self, format: Format, plugin: &str, query: &str) -> Result<Payload> {
        self.session.fetch(format, plugin, query).await
    }

    pub async fn get_info_text(&self, plugin: &str, query: &str) -> Result<String> {
        match self.get_info(Format::Text, plugin, query).await? {
            Payload::Text(text) => Ok(text),
            other => Err(unexpected_payload(&other)),
        }
    }

    pub async fn get_info_json(&self, plugin: &str, query: &str) -> Result<Value> {
        match self.get_info(Format::Json, plugin, query).await? {
            Payload::Json(value) => Ok(value),
            other => Err(unexpected_payload(&other)),
        }
    }

    /// Fan out `plugins × args` in the given format.
    ///
    /// `plugins = None` (or empty) queries every plugin in the directory.
    /// Only the directory lookup can fail; per-request failures show up as
    /// [`Payload::Error`] outcomes.
    pub async fn make_requests(
        &self,
        format: Format,
        args: &[String],
        plugins: Option<&[String]>,
    ) -> Result<Outcomes> {
        let plugins = self.directory.plugin_names(plugins).await?;
        Ok(self.dispatcher.dispatch(format, &plugins, args))
    }

    /// JSON info from every selected plugin for one argument.
    #[instrument(skip(self, plugins))]
    pub async fn get_info_dict(&self, arg: &str, plugins: Option<&[String]>) -> Result<FlatResult> {
        let outcomes = self
            .make_requests(Format::Json, &[arg.to_string()], plugins)
            .await?;
        Ok(collect_flat(outcomes).await)
    }

    /// JSON info for several arguments, keyed by argument then plugin.
    #[instrument(skip(self, plugins))]
    pub async fn get_info_dict_multiple(
        &self,
        args: &[String],
        plugins: Option<&[String]>,
    ) -> Result<NestedResult> {
        let outcomes = self.make_requests(Format::Json, args, plugins).await?;
        Ok(collect_nested(outcomes).await)
    }

    /// Query plugins one after another and print their text answers.
    pub async fn show_info<W: Write>(
        &self,
        arg: &str,
        plugins: Option<&[String]>,
        out: &mut W,
    ) -> Result<usize> {
        let plugins = self.directory.plugin_names(plugins).await?;
        let mut written = 0;
        for plugin in plugins {
            let payload = self
                .get_info(Format::Text, &plugin, arg)
                .await
                .unwrap_or_else(|e| Payload::Error(e.to_string()));
            let outcome = Outcome::new(RequestDescriptor::new(Format::Text, plugin, arg), payload);
            if write_block(out, &outcome, false)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Parallel text lookup for one argument, printed as results arrive.
    pub async fn show_info_parallel<W: Write>(
        &self,
        arg: &str,
        plugins: Option<&[String]>,
        out: &mut W,
    ) -> Result<usize> {
        let outcomes = self
            .make_requests(Format::Text, &[arg.to_string()], plugins)
            .await?;
        render_stream(outcomes, out, false).await
    }

    /// Parallel text lookup for several arguments, printed as results arrive.
    pub async fn show_info_parallel_multiple<W: Write>(
        &self,
        args: &[String],
        plugins: Option<&[String]>,
        out: &mut W,
    ) -> Result<usize> {
        let outcomes = self.make_requests(Format::Text, args, plugins).await?;
        let written = render_stream(outcomes, out, true).await?;
        debug!(written, "Finished parallel lookup");
        Ok(written)
    }

    /// Print the plugin directory as a table.
    pub async fn list_plugins<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{:<20} {:<20} {}", "Name", "Title", "Description")?;
        for plugin in self.plugins().await? {
            writeln!(out, "{:<20} {:<20} {}", plugin.name, plugin.title, plugin.description)?;
        }
        Ok(())
    }
}

fn unexpected_payload(payload: &Payload) -> Error {
    Error::Decode {
        url: String::new(),
        message: format!("unexpected payload kind: {payload:?}"),
    }
}
