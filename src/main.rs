//! `ninfo` CLI - query every plugin of a ninfo server in parallel

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "ninfo")]
#[command(about = "Ask a ninfo server's plugins about addresses, hosts and other terms")]
#[command(version)]
struct Cli {
    /// Terms to look up
    #[arg(value_name = "QUERY")]
    queries: Vec<String>,

    /// Only query this plugin (repeatable)
    #[arg(short, long = "plugin", value_name = "NAME")]
    plugins: Vec<String>,

    /// List available plugins and exit
    #[arg(short, long)]
    list: bool,

    /// Config file (default: ~/.config/ninfo/config.toml, ./ninfo.toml)
    #[arg(short, long = "cfg", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print aggregated JSON instead of text blocks
    #[arg(long)]
    json: bool,

    /// Maximum requests in flight
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let client = cmd::connect(cli.config.as_deref(), cli.concurrency)?;

    if cli.list {
        return cmd::list::cmd_list(&client).await;
    }

    let plugins = (!cli.plugins.is_empty()).then_some(cli.plugins.as_slice());
    if cli.json {
        cmd::query::cmd_query_json(&client, &cli.queries, plugins).await
    } else {
        cmd::query::cmd_query(&client, &cli.queries, plugins).await
    }
}
