#![deny(missing_docs)]
//! [![Documentation](https://docs.rs/faregate/badge.svg)](https://docs.rs/faregate)
//! [![Crates](https://img.shields.io/crates/v/faregate.svg)](https://crates.io/crates/faregate)
//!
//! A token bucket load shaper.
//!
//! A [Faregate] hands out up to `token_count` tokens per refresh interval. At
//! the start of every interval the bucket is reset to full, and tokens left
//! over from the previous interval are lost.
//!
//! All bucket state is owned by a single controller task which handles
//! refills, new requests and shutdown one at a time, so the gate can be
//! shared between any number of tasks without any further locking.
//!
//! If enough tokens are available, a request is granted straight away through
//! a fast path. Otherwise it is deferred to a backlog which is retried in
//! arrival order after every refill. Token requests are typically answered
//! fairly, but once there is a backlog a fresh small request may be granted
//! before a larger request which has been waiting longer.
//!
//! ## Usage
//!
//! Add the following to your `Cargo.toml`:
//!
//! ```toml
//! faregate = "0.1.0"
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use faregate::Faregate;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), faregate::Error> {
//!     let gate = Faregate::builder()
//!         .refresh_interval(Duration::from_secs(1))
//!         .token_count(5)
//!         .build()?;
//!
//!     println!("Waiting for permit...");
//!     // should take about a second to acquire.
//!     for _ in 0..10 {
//!         gate.acquire_and_wait(1).await?;
//!     }
//!     println!("I made it!");
//!
//!     gate.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! * `tracing` - emit [tracing] events from the controller task.
//!
//! [tracing]: https://docs.rs/tracing

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    }};
}

mod backlog;
mod bucket;
mod builder;
mod controller;
mod error;
mod request;

pub use self::builder::Builder;
pub use self::error::Error;
pub use self::request::Completion;

use self::request::Request;

/// A token bucket load shaper.
///
/// Construct one through [`Faregate::builder`]. To share it between tasks,
/// wrap it in an [`Arc`][std::sync::Arc].
///
/// Dropping the gate closes it.
pub struct Faregate {
    /// Number of tokens restored on each refill.
    capacity: u64,
    /// Period between refills.
    refresh_interval: Duration,
    /// Sender for handing requests to the controller.
    requests: mpsc::Sender<Request>,
    /// Taken on close.
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

impl fmt::Debug for Faregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Faregate")
            .field("capacity", &self.capacity)
            .field("refresh_interval", &self.refresh_interval)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Faregate {
    /// Construct a new gate through a builder.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get the number of tokens the bucket holds after each refill.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Get the period between refills.
    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Test if the gate has been closed.
    pub fn is_closed(&self) -> bool {
        self.shutdown.lock().is_none()
    }

    /// Acquire a single token.
    ///
    /// This is identical to [`acquire`] with an argument of `1`.
    ///
    /// [`acquire`]: Faregate::acquire
    #[inline]
    pub async fn acquire_one(&self) -> Result<Completion, Error> {
        self.acquire(1).await
    }

    /// Acquire `count` tokens from the gate.
    ///
    /// This hands the request over to the controller and returns a
    /// [`Completion`] which fires once the tokens have been granted. It does
    /// not wait for the grant itself; it only suspends while the controller
    /// is busy with another event.
    ///
    /// Tokens are never given back. If the returned [`Completion`] is dropped
    /// before it fires, the tokens are still deducted once the request is
    /// granted.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyRequest`] if `count` is zero.
    /// * [`Error::TooManyTokens`] if `count` is larger than the
    ///   [`capacity`][Faregate::capacity], since such a request could never be
    ///   granted.
    /// * [`Error::Closed`] if the gate has been closed.
    ///
    /// # Examples
    ///
    /// ```
    /// use faregate::{Error, Faregate};
    /// use std::time::Duration;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), Error> {
    /// let gate = Faregate::builder()
    ///     .refresh_interval(Duration::from_millis(100))
    ///     .token_count(5)
    ///     .build()?;
    ///
    /// let completion = gate.acquire(5).await?;
    /// completion.wait().await?;
    ///
    /// assert!(matches!(gate.acquire(6).await, Err(Error::TooManyTokens { .. })));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn acquire(&self, count: u64) -> Result<Completion, Error> {
        if count == 0 {
            return Err(Error::EmptyRequest);
        }

        if count > self.capacity {
            return Err(Error::TooManyTokens {
                requested: count,
                capacity: self.capacity,
            });
        }

        if self.is_closed() {
            return Err(Error::Closed);
        }

        let (request, completion) = Request::new(count);

        self.requests
            .send(request)
            .await
            .map_err(|_| Error::Closed)?;

        Ok(completion)
    }

    /// Acquire `count` tokens and wait until they have been granted.
    ///
    /// # Errors
    ///
    /// Fails for the same reasons as [`acquire`][Faregate::acquire], and with
    /// [`Error::Closed`] if the gate is closed before the request was granted.
    pub async fn acquire_and_wait(&self, count: u64) -> Result<(), Error> {
        self.acquire(count).await?.wait().await
    }

    /// Close the gate, stopping its controller.
    ///
    /// Requests still waiting in the backlog are abandoned, and waiting on them
    /// reports [`Error::Closed`]. Any acquire made after this fails with
    /// [`Error::Closed`].
    ///
    /// Closing an already closed gate does nothing.
    pub fn close(&self) {
        if let Some(shutdown) = self.shutdown.lock().take() {
            // NB: the controller might already be gone if the runtime it was
            // spawned on has shut down.
            let _ = shutdown.send(());
        }
    }
}

impl Drop for Faregate {
    fn drop(&mut self) {
        self.close();
    }
}
