// Copyright 2026, The kube-harness authors
// SPDX-License-Identifier: Apache-2.0

//! Condition polling until a caller-supplied predicate is satisfied

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cluster::Cluster;
use crate::constants::wait::{DEFAULT_INTERVAL, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};

/// Predicate over cluster state, invoked repeatedly by
/// [`Cluster::wait_for`] until it reports `Ok(true)`.
///
/// `Ok(false)` means "not yet" and keeps the poll going; any error aborts
/// the poll and is propagated verbatim. A checker wanting retry-on-error
/// semantics must swallow the error and return `Ok(false)` itself.
/// Checkers hold no poll state, so they must be safe to invoke repeatedly.
pub trait Checker: Send + Sync {
    fn check<'a>(&'a self, cluster: &'a Cluster) -> BoxFuture<'a, Result<bool>>;
}

impl<F> Checker for F
where
    F: Send + Sync + for<'a> Fn(&'a Cluster) -> BoxFuture<'a, Result<bool>>,
{
    fn check<'a>(&'a self, cluster: &'a Cluster) -> BoxFuture<'a, Result<bool>> {
        self(cluster)
    }
}

/// Options for [`Cluster::wait_for_with`]
#[derive(Clone, Debug, Default)]
pub struct WaitOpts {
    /// Maximum duration to wait for the condition, 2 minutes when unset
    pub timeout: Option<Duration>,

    /// Pause between checker invocations, 2 seconds when unset
    pub interval: Option<Duration>,

    /// Cancels the wait early. A cancelled wait fails with
    /// [`Error::WaitCancelled`], distinguishable from a timeout.
    pub cancel: Option<CancellationToken>,
}

impl Cluster {
    /// Block until the checker reports the condition is met, with default
    /// timeout (2 minutes) and interval (2 seconds). Equivalent to
    /// `wait_for_with(check, WaitOpts::default())`.
    pub async fn wait_for(&self, check: impl Checker) -> Result<()> {
        self.wait_for_with(check, WaitOpts::default()).await
    }

    /// Invoke the checker until it returns `Ok(true)`, it fails, the
    /// timeout elapses or the caller cancels.
    ///
    /// The first invocation happens immediately; the interval only applies
    /// between invocations. At least one invocation is made even when the
    /// timeout is tiny. Runs entirely on the calling task: the checker is
    /// never invoked concurrently with itself and no background work
    /// outlives the call.
    pub async fn wait_for_with(&self, check: impl Checker, opts: WaitOpts) -> Result<()> {
        let timeout = opts.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let interval = opts.interval.unwrap_or(DEFAULT_INTERVAL);
        if timeout.is_zero() {
            return Err(Error::InvalidWaitConfig("timeout must be greater than zero"));
        }
        if interval.is_zero() {
            return Err(Error::InvalidWaitConfig("interval must be greater than zero"));
        }
        let cancel = opts.cancel.unwrap_or_default();

        let deadline = Instant::now() + timeout;
        let mut invocations: u32 = 0;
        loop {
            invocations += 1;
            let satisfied = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::WaitCancelled),
                result = check.check(self) => result?,
            };
            if satisfied {
                debug!(invocations, "condition met");
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::WaitTimeout(timeout));
            }

            // Never sleep past the deadline.
            let pause = interval.min(deadline - now);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::WaitCancelled),
                _ = sleep(pause) => {}
            }
            // A clamped final sleep wakes at the deadline; don't spend
            // another invocation on a wait that is already over.
            if Instant::now() >= deadline {
                return Err(Error::WaitTimeout(timeout));
            }
        }
    }
}
