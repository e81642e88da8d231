use thiserror::Error;

/// Error type for the load shaper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The token count was never set, or was set to zero.
    #[error("faregate: illegal token count")]
    IllegalTokenCount,
    /// The refresh interval was never set, or was set to zero.
    #[error("faregate: illegal refresh interval")]
    IllegalRefreshInterval,
    /// The gate was built outside of a Tokio runtime, so its controller could
    /// not be spawned.
    #[error("faregate: must be built inside of a tokio runtime")]
    NoRuntime,
    /// Zero tokens were requested.
    #[error("faregate: at least one token must be requested")]
    EmptyRequest,
    /// More tokens were requested than the bucket can ever hold.
    #[error("faregate: too many tokens requested ({requested} > {capacity})")]
    TooManyTokens {
        /// The number of tokens requested.
        requested: u64,
        /// The capacity of the bucket.
        capacity: u64,
    },
    /// The gate has been closed.
    #[error("faregate: gate is closed")]
    Closed,
}
