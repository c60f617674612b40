//! Folding dispatcher outcomes into results.

use std::collections::BTreeMap;
use std::io::Write;

use futures::{Stream, StreamExt};

use crate::error::Result;
use crate::request::{Outcome, Payload};

/// plugin → payload, for a single argument.
pub type FlatResult = BTreeMap<String, Payload>;

/// argument → plugin → payload.
pub type NestedResult = BTreeMap<String, FlatResult>;

/// Collect outcomes keyed by plugin.
///
/// If the same plugin appears more than once, the outcome delivered last wins.
pub async fn collect_flat<S>(outcomes: S) -> FlatResult
where
    S: Stream<Item = Outcome>,
{
    outcomes
        .fold(FlatResult::new(), |mut result, outcome| async move {
            result.insert(outcome.plugin, outcome.payload);
            result
        })
        .await
}

/// Collect outcomes keyed by argument, then plugin.
pub async fn collect_nested<S>(outcomes: S) -> NestedResult
where
    S: Stream<Item = Outcome>,
{
    outcomes
        .fold(NestedResult::new(), |mut result, outcome| async move {
            result
                .entry(outcome.argument)
                .or_default()
                .insert(outcome.plugin, outcome.payload);
            result
        })
        .await
}

/// Header line for one outcome block.
pub fn header(outcome: &Outcome, with_argument: bool) -> String {
    if with_argument {
        format!("*** {} {} ***", outcome.plugin, outcome.argument)
    } else {
        format!("*** {} ***", outcome.plugin)
    }
}

/// Write one block for a single outcome. Returns `false` if it was skipped
/// because the payload is empty.
pub fn write_block<W: Write>(out: &mut W, outcome: &Outcome, with_argument: bool) -> Result<bool> {
    if outcome.payload.is_empty() {
        return Ok(false);
    }
    writeln!(out, "{}", header(outcome, with_argument))?;
    writeln!(out, "{}", outcome.payload.render())?;
    Ok(true)
}

/// Print each outcome as soon as it arrives.
///
/// Empty payloads are skipped; errors are printed as `Error: <message>`.
/// Returns the number of blocks written.
pub async fn render_stream<S, W>(outcomes: S, out: &mut W, with_argument: bool) -> Result<usize>
where
    S: Stream<Item = Outcome>,
    W: Write,
{
    let mut outcomes = std::pin::pin!(outcomes);
    let mut written = 0;
    while let Some(outcome) = outcomes.next().await {
        if write_block(out, &outcome, with_argument)? {
            out.flush()?;
            written += 1;
        }
    }
    Ok(written)
}
