use tokio::sync::watch;

use crate::Error;

/// A request for tokens travelling from a caller to the controller.
pub(crate) struct Request {
    /// Number of tokens requested. Always in `1..=capacity`.
    count: u64,
    /// Fired once the tokens have been deducted.
    completion: watch::Sender<bool>,
}

impl Request {
    /// Construct a request together with the completion signal its creator
    /// observes.
    pub(crate) fn new(count: u64) -> (Self, Completion) {
        let (completion, rx) = watch::channel(false);
        (Self { count, completion }, Completion { rx })
    }

    #[inline]
    pub(crate) fn count(&self) -> u64 {
        self.count
    }

    /// Fire the completion signal.
    ///
    /// Consumes the request, so it can only ever happen once. The grant sticks
    /// even if every observer has already gone away.
    pub(crate) fn grant(self) {
        self.completion.send_replace(true);
    }
}

/// A one-shot signal which fires once the tokens of an
/// [`acquire`][crate::Faregate::acquire] have been granted.
///
/// The signal can be cloned and observed from any number of places. Dropping
/// every clone does not give the tokens back to the bucket; they are still
/// deducted once the request is granted.
#[derive(Debug, Clone)]
pub struct Completion {
    rx: watch::Receiver<bool>,
}

impl Completion {
    /// Test whether the tokens have been granted yet without waiting.
    pub fn is_granted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the tokens have been granted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the gate was closed while the request was
    /// still waiting in the backlog. A request that was granted before the gate
    /// closed keeps reporting success.
    ///
    /// # Examples
    ///
    /// ```
    /// use faregate::Faregate;
    /// use std::time::Duration;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), faregate::Error> {
    /// let gate = Faregate::builder()
    ///     .refresh_interval(Duration::from_millis(10))
    ///     .token_count(2)
    ///     .build()?;
    ///
    /// let completion = gate.acquire(2).await?;
    /// completion.wait().await?;
    /// assert!(completion.is_granted());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait(&self) -> Result<(), Error> {
        let mut rx = self.rx.clone();
        let result = rx.wait_for(|granted| *granted).await.map(|_| ());
        result.map_err(|_| Error::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::Request;
    use crate::Error;

    #[tokio::test]
    async fn test_grant_is_observed_by_all_clones() {
        let (request, completion) = Request::new(3);
        let other = completion.clone();

        assert_eq!(request.count(), 3);
        assert!(!completion.is_granted());
        assert!(!other.is_granted());

        request.grant();

        assert!(completion.is_granted());
        assert!(other.is_granted());
        assert_eq!(completion.wait().await, Ok(()));
        assert_eq!(other.wait().await, Ok(()));
        // Waiting again is fine.
        assert_eq!(completion.wait().await, Ok(()));
    }

    #[tokio::test]
    async fn test_dropped_request_reports_closed() {
        let (request, completion) = Request::new(1);
        drop(request);

        assert!(!completion.is_granted());
        assert_eq!(completion.wait().await, Err(Error::Closed));
    }

    #[tokio::test]
    async fn test_grant_without_observers() {
        let (request, completion) = Request::new(1);
        drop(completion);
        request.grant();
    }

    #[tokio::test]
    async fn test_wait_wakes_on_grant() {
        let (request, completion) = Request::new(1);

        let waiter = tokio::spawn(async move { completion.wait().await });
        tokio::task::yield_now().await;
        request.grant();

        assert_eq!(waiter.await.unwrap(), Ok(()));
    }
}
