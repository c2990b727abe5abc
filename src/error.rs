//! Errors returned by queue operations.
//!
//! Nothing on the normal paths fails: an empty queue is reported through `Option`. These types
//! only cover the cases a caller has to react to.

use std::fmt;

use thiserror::Error;

/// The queue refused an item because it has been shut down.
///
/// The rejected item is handed back so it is not lost.
#[derive(Error, PartialEq, Eq)]
#[error("queue is shut down")]
pub struct ProduceError<T>(pub T);

impl<T> ProduceError<T> {
    /// Returns the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for ProduceError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ProduceError(..)")
    }
}

/// A bounded blocking consume returned without an item.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeTimeoutError {
    /// The timeout elapsed while the queue stayed empty.
    #[error("timed out waiting for an item")]
    Timeout,

    /// The queue is shut down and has no items left.
    #[error("queue is shut down and empty")]
    Shutdown,
}

impl ConsumeTimeoutError {
    /// Returns `true` if the timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        *self == ConsumeTimeoutError::Timeout
    }

    /// Returns `true` if the queue was shut down and empty.
    pub fn is_shutdown(&self) -> bool {
        *self == ConsumeTimeoutError::Shutdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produce_error_returns_item() {
        let err = ProduceError(vec![1, 2, 3]);
        assert_eq!(err.to_string(), "queue is shut down");
        assert_eq!(format!("{:?}", err), "ProduceError(..)");
        assert_eq!(err.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn timeout_error_kinds() {
        assert!(ConsumeTimeoutError::Timeout.is_timeout());
        assert!(!ConsumeTimeoutError::Timeout.is_shutdown());
        assert!(ConsumeTimeoutError::Shutdown.is_shutdown());
        assert_eq!(
            ConsumeTimeoutError::Shutdown.to_string(),
            "queue is shut down and empty"
        );
    }
}
