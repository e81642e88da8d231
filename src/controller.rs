use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::backlog::Backlog;
use crate::bucket::Bucket;
use crate::request::Request;

/// The single authority over the state of a gate.
///
/// Every state transition (refills, new requests, shutdown) is handled one at
/// a time by [`Controller::run`], which is spawned as its own task.
pub(crate) struct Controller {
    bucket: Bucket,
    backlog: Backlog,
    interval: Duration,
    requests: mpsc::Receiver<Request>,
    shutdown: oneshot::Receiver<()>,
}

impl Controller {
    pub(crate) fn new(
        capacity: u64,
        interval: Duration,
        requests: mpsc::Receiver<Request>,
        shutdown: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            bucket: Bucket::new(capacity),
            backlog: Backlog::new(),
            interval,
            requests,
            shutdown,
        }
    }

    /// Run until the gate is closed or every handle to it has been dropped.
    ///
    /// Events are prioritized: shutdown, then refill, then requests. So a
    /// steady stream of requests can never hold back a refill.
    ///
    /// Requests still in the backlog at shutdown are dropped without being
    /// granted, which their waiters observe as [`Error::Closed`].
    ///
    /// [`Error::Closed`]: crate::Error::Closed
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "faregate",
            skip_all,
            fields(capacity = self.bucket.capacity(), interval = ?self.interval)
        )
    )]
    pub(crate) async fn run(mut self) {
        let first = Instant::now()
            .checked_add(self.interval)
            .unwrap_or_else(Instant::now);

        // The interval at which the bucket is refilled.
        let mut refill = time::interval_at(first, self.interval);
        // A late refill never turns into a burst of refills.
        refill.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!("controller started");

        loop {
            tokio::select! {
                biased;

                _ = &mut self.shutdown => {
                    // NB: an error means the gate was dropped without closing.
                    break;
                }
                _ = refill.tick() => {
                    self.refill();
                }
                request = self.requests.recv() => {
                    match request {
                        Some(request) => self.admit(request),
                        None => break,
                    }
                }
            }

            debug_assert!(self.bucket.remaining() <= self.bucket.capacity());
        }

        debug!(abandoned = self.backlog.len(), "controller stopped");
    }

    /// Reset the bucket and retry the backlog against it.
    fn refill(&mut self) {
        self.bucket.refill();

        if self.backlog.is_empty() {
            return;
        }

        self.backlog.drain(&mut self.bucket);

        trace!(
            remaining = self.bucket.remaining(),
            backlog = self.backlog.len(),
            "drained backlog"
        );
    }

    /// Grant a request on the fast path, or defer it to the backlog.
    fn admit(&mut self, request: Request) {
        if self.bucket.try_take(request.count()) {
            request.grant();
            return;
        }

        trace!(
            count = request.count(),
            remaining = self.bucket.remaining(),
            backlog = self.backlog.len() + 1,
            "deferring request"
        );

        self.backlog.push(request);
    }
}
