//! Queue configuration.
//!
//! # Examples
//!
//! ```
//! use sync_queue::{Builder, ProducePolicy};
//!
//! let queue = Builder::new()
//!     .name("ingest")
//!     .capacity(64)
//!     .produce_policy(ProducePolicy::Accept)
//!     .build::<String>();
//!
//! assert_eq!(queue.name(), Some("ingest"));
//! ```

use crate::sync::queue::SyncQueue;

/// What `produce` does once shutdown has been requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProducePolicy {
    /// Hand the item back in a `ProduceError`.
    Reject,
    /// Enqueue it anyway. Consumers still take it, but no blocking consume will wait for it.
    Accept,
}

impl Default for ProducePolicy {
    fn default() -> Self {
        ProducePolicy::Reject
    }
}

/// Builds a `SyncQueue` with non-default settings.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    pub(crate) name: Option<String>,
    pub(crate) capacity: usize,
    pub(crate) policy: ProducePolicy,
}

impl Builder {
    /// Creates a builder for an unnamed queue that rejects items produced after shutdown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used to tell queues apart in log output.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Preallocates room for `capacity` items. The queue still grows without bound.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets what `produce` does after shutdown. Defaults to `ProducePolicy::Reject`.
    pub fn produce_policy(mut self, policy: ProducePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Creates an empty queue with these settings.
    pub fn build<T>(self) -> SyncQueue<T> {
        SyncQueue::from_builder(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let b = Builder::new();
        assert_eq!(b.name, None);
        assert_eq!(b.capacity, 0);
        assert_eq!(b.policy, ProducePolicy::Reject);
    }

    #[test]
    fn settings_reach_the_queue() {
        let q = Builder::new()
            .name("jobs")
            .capacity(16)
            .produce_policy(ProducePolicy::Accept)
            .build::<u32>();
        assert_eq!(q.name(), Some("jobs"));
        assert_eq!(q.produce_policy(), ProducePolicy::Accept);
        assert!(q.is_empty());
    }
}
