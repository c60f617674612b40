use anyhow::{Context, Result};

use ninfo_client::Client;

/// Stream text answers for every query as they arrive.
pub async fn cmd_query(client: &Client, queries: &[String], plugins: Option<&[String]>) -> Result<()> {
    if queries.is_empty() {
        return Ok(());
    }

    let mut out = std::io::stdout();
    client
        .show_info_parallel_multiple(queries, plugins, &mut out)
        .await
        .context("lookup failed")?;
    Ok(())
}

/// Collect JSON answers and print them as one document.
pub async fn cmd_query_json(client: &Client, queries: &[String], plugins: Option<&[String]>) -> Result<()> {
    if queries.is_empty() {
        return Ok(());
    }

    let result = client
        .get_info_dict_multiple(queries, plugins)
        .await
        .context("lookup failed")?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
