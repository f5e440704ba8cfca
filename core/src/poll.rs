//! Timeout-bounded polling of a predicate.
//!
//! # Design
//! `Poller::wait` runs a tick loop: check the overall deadline, sleep one
//! interval, then run the predicate once on its own worker thread and race
//! its answer against the per-tick limit. A predicate may block on the
//! network, so the loop never calls it inline.
//!
//! Each run gets a child `Context` whose deadline is the per-tick limit. The
//! transport honours that deadline, and the context is cancelled when the
//! tick times out, so a stalled predicate is torn down instead of lingering.
//!
//! A timeout of `None` disables both the overall deadline and the per-tick
//! limit: polling continues until the predicate reports completion or an
//! error.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::context::Context;
use crate::error::{ApiError, Result};

/// Fixed delay between predicate runs.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
        }
    }
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll `predicate` until it returns `Ok(true)`, returns an error, or
    /// `timeout` elapses.
    ///
    /// Errors from the predicate are returned unchanged.
    pub fn wait<F>(&self, ctx: &Context, timeout: Option<Duration>, predicate: F) -> Result<()>
    where
        F: Fn(&Context) -> Result<bool> + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        let start = Instant::now();
        let mut tick: u64 = 0;

        loop {
            if let Some(limit) = timeout {
                if start.elapsed() >= limit {
                    debug!(ticks = tick, ?limit, "poll deadline reached");
                    return Err(ApiError::Timeout(limit));
                }
            }
            if ctx.is_cancelled() {
                return Err(ApiError::Cancelled);
            }

            thread::sleep(self.interval);
            tick += 1;

            let tick_ctx = match timeout {
                Some(limit) => ctx.child_with_timeout(limit),
                None => ctx.child(),
            };
            let (tx, rx) = mpsc::sync_channel(1);
            let worker_ctx = tick_ctx.clone();
            let worker_predicate = Arc::clone(&predicate);
            thread::Builder::new()
                .name(format!("awx-poll-{tick}"))
                .spawn(move || {
                    // The receiver is gone once the tick has timed out.
                    let _ = tx.send(worker_predicate(&worker_ctx));
                })
                .map_err(|e| ApiError::PollWorker(format!("failed to spawn predicate: {e}")))?;

            let outcome = match timeout {
                Some(limit) => rx.recv_timeout(limit),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            match outcome {
                Ok(Ok(true)) => {
                    debug!(tick, "poll condition met");
                    return Ok(());
                }
                Ok(Ok(false)) => trace!(tick, "poll condition not met"),
                Ok(Err(err)) => {
                    debug!(tick, error = %err, "predicate failed");
                    return Err(err);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tick_ctx.cancel();
                    warn!(tick, "predicate did not finish before the poll timeout");
                    return Err(ApiError::Timeout(timeout.unwrap_or_default()));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ApiError::PollWorker("predicate panicked".to_string()));
                }
            }
        }
    }
}

/// Poll `predicate` once per [`POLL_INTERVAL`] on a background context.
pub fn wait_for<F>(timeout: Option<Duration>, predicate: F) -> Result<()>
where
    F: Fn(&Context) -> Result<bool> + Send + Sync + 'static,
{
    Poller::new().wait(&Context::background(), timeout, predicate)
}
