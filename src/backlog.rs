use std::collections::VecDeque;

use crate::bucket::Bucket;
use crate::request::Request;

/// Requests which arrived when the bucket could not satisfy them.
///
/// Deferred requests are retried in strict arrival order relative to each
/// other. They are not ordered relative to fresh requests: a fresh request
/// which fits the bucket is granted straight away, even if a larger request
/// is sitting at the head of the backlog. Under sustained load a large
/// request can therefore be passed over repeatedly by smaller ones.
///
/// The queue is unbounded. If requests keep arriving faster than refills can
/// satisfy them it grows without limit; bounding it would turn waiting into
/// rejection, which is a different contract.
#[derive(Default)]
pub(crate) struct Backlog {
    queue: VecDeque<Request>,
}

impl Backlog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Defer a request to the tail of the backlog.
    pub(crate) fn push(&mut self, request: Request) {
        self.queue.push_back(request);
    }

    /// Grant deferred requests from the head for as long as they fit in the
    /// bucket.
    ///
    /// Stops at the first request which does not fit, so that nothing behind
    /// it jumps the queue.
    pub(crate) fn drain(&mut self, bucket: &mut Bucket) {
        while let Some(head) = self.queue.front() {
            if !bucket.try_take(head.count()) {
                break;
            }

            if let Some(request) = self.queue.pop_front() {
                request.grant();
            }
        }
    }
}
