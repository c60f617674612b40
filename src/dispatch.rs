//! Parallel fan-out of plugin requests.
//!
//! Every `(plugin, argument)` pair becomes one [`RequestDescriptor`]. Each
//! dispatch call spawns one task per descriptor, gates them with a fresh
//! semaphore of `concurrency` permits, and streams [`Outcome`]s back over a
//! channel as they complete. Failures become [`Payload::Error`] values, so a
//! batch always yields exactly one outcome per descriptor.

use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{FutureExt, Stream};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use crate::request::{descriptors, Format, Outcome, Payload, RequestDescriptor};
use crate::session::Session;

/// Requests in flight at once when nothing else is configured.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Bounded fan-out executor.
#[derive(Clone)]
pub struct Dispatcher {
    session: Session,
    concurrency: usize,
}

impl Dispatcher {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the worker budget. Values below 1 are treated as 1.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Query every plugin about every argument.
    ///
    /// Descriptors are submitted plugins-outer, arguments-inner, but outcomes
    /// arrive in completion order. Must be called from within a tokio runtime.
    pub fn dispatch(&self, format: Format, plugins: &[String], arguments: &[String]) -> Outcomes {
        self.dispatch_all(descriptors(format, plugins, arguments))
    }

    /// Execute an explicit list of descriptors.
    pub fn dispatch_all(&self, requests: Vec<RequestDescriptor>) -> Outcomes {
        let total = requests.len();
        let (tx, rx) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(self.concurrency));

        info!(requests = total, concurrency = self.concurrency, "Dispatching batch");

        for descriptor in requests {
            let tx = tx.clone();
            let permits = Arc::clone(&permits);
            let session = self.session.clone();
            tokio::spawn(async move {
                let outcome = execute(&session, &permits, descriptor).await;
                // A dropped receiver means the caller stopped listening.
                let _ = tx.send(outcome);
            });
        }

        Outcomes {
            rx,
            remaining: total,
        }
    }
}

async fn execute(session: &Session, permits: &Semaphore, descriptor: RequestDescriptor) -> Outcome {
    let Ok(_permit) = permits.acquire().await else {
        return Outcome::new(descriptor, Payload::Error("worker pool closed".to_string()));
    };

    let request = session.fetch(descriptor.format, &descriptor.plugin, &descriptor.argument);
    let payload = match AssertUnwindSafe(request).catch_unwind().await {
        Ok(Ok(payload)) => {
            debug!(plugin = %descriptor.plugin, argument = %descriptor.argument, "Plugin request succeeded");
            payload
        }
        Ok(Err(err)) => {
            warn!(
                plugin = %descriptor.plugin,
                argument = %descriptor.argument,
                error = %err,
                "Plugin request failed"
            );
            Payload::Error(err.to_string())
        }
        Err(_) => {
            warn!(plugin = %descriptor.plugin, argument = %descriptor.argument, "Plugin request panicked");
            Payload::Error(format!("request for plugin '{}' panicked", descriptor.plugin))
        }
    };

    Outcome::new(descriptor, payload)
}

/// Outcomes of one dispatch, in completion order.
///
/// Finite and single-pass: yields exactly one item per submitted descriptor,
/// then ends.
pub struct Outcomes {
    rx: mpsc::UnboundedReceiver<Outcome>,
    remaining: usize,
}

impl Outcomes {
    /// Outcomes not yet delivered.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Stream for Outcomes {
    type Item = Outcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Outcome>> {
        if self.remaining == 0 {
            return Poll::Ready(None);
        }
        let polled = self.rx.poll_recv(cx);
        if let Poll::Ready(Some(_)) = polled {
            self.remaining -= 1;
        }
        polled
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
