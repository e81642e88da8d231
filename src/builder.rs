use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::controller::Controller;
use crate::{Error, Faregate};

/// Builder for a [`Faregate`].
///
/// Settings are applied in the order they are called, so a later call to the
/// same setter overrides an earlier one. Nothing is validated until
/// [`build`][Builder::build], and both settings are required.
#[derive(Debug, Default, Clone)]
pub struct Builder {
    token_count: Option<u64>,
    refresh_interval: Option<Duration>,
}

impl Builder {
    /// Set how frequently the bucket is refilled.
    ///
    /// Must be non-zero.
    #[inline]
    pub fn refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = Some(refresh_interval);
        self
    }

    /// Set how many tokens the bucket holds after each refill.
    ///
    /// Must be non-zero. This is also the largest number of tokens a single
    /// [`acquire`][Faregate::acquire] can ask for.
    #[inline]
    pub fn token_count(mut self, token_count: u64) -> Self {
        self.token_count = Some(token_count);
        self
    }

    /// Construct a new gate and spawn its controller on the current Tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// * [`Error::IllegalTokenCount`] if the token count is missing or zero.
    /// * [`Error::IllegalRefreshInterval`] if the refresh interval is missing
    ///   or zero.
    /// * [`Error::NoRuntime`] if called outside of a Tokio runtime.
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
    ///     .refresh_interval(Duration::from_secs(1))
    ///     .token_count(60)
    ///     .build()?;
    ///
    /// assert_eq!(gate.capacity(), 60);
    ///
    /// let error = Faregate::builder().token_count(60).build().unwrap_err();
    /// assert_eq!(error, Error::IllegalRefreshInterval);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Faregate, Error> {
        let capacity = match self.token_count {
            Some(token_count) if token_count > 0 => token_count,
            _ => return Err(Error::IllegalTokenCount),
        };

        let refresh_interval = match self.refresh_interval {
            Some(refresh_interval) if !refresh_interval.is_zero() => refresh_interval,
            _ => return Err(Error::IllegalRefreshInterval),
        };

        let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let (requests_tx, requests_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let controller = Controller::new(capacity, refresh_interval, requests_rx, shutdown_rx);
        handle.spawn(controller.run());

        Ok(Faregate {
            capacity,
            refresh_interval,
            requests: requests_tx,
            shutdown: Mutex::new(Some(shutdown_tx)),
        })
    }
}
