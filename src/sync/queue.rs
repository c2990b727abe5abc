//! An unbounded FIFO queue for any number of producer and consumer threads.
//!
//! All state lives behind a single mutex. Two condition variables hang off it: consumers wait on
//! `item_available` until there is an item or the queue is finishing, and `shutdown` waits on
//! `drain_complete` until no consumer is left inside a blocking call.
//!
//! Shutdown is one-way. `finishing` is set once and never cleared, so a consumer that wakes late
//! still sees it and can't go back to sleep on a queue nobody will feed.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crossbeam_utils::CachePadded;
use log::{debug, trace, warn};
use scopeguard::ScopeGuard;

use crate::config::{Builder, ProducePolicy};
use crate::error::{ConsumeTimeoutError, ProduceError};
use crate::sync::iter::Iter;

/// Lifecycle of a queue: `Open -> Draining -> Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Shutdown has not been requested.
    Open,
    /// Shutdown has been requested and blocked consumers are still unwinding.
    Draining,
    /// Shutdown has been requested and no consumer is inside a blocking call.
    Closed,
}

struct State<T> {
    /// Queued items, head first.
    items: VecDeque<T>,
    /// Set by the first `shutdown`. Never cleared.
    finishing: bool,
    /// Number of consumers inside `consume_blocking` or `consume_timeout`.
    active_consumers: usize,
}

impl<T> State<T> {
    /// Whether a blocking consumer has to keep sleeping.
    fn must_wait(&self) -> bool {
        self.items.is_empty() && !self.finishing
    }
}

/// A thread-safe, unbounded FIFO queue with a draining shutdown.
///
/// Items are moved in by `produce` and moved out by `try_consume`, `consume_blocking` or
/// `consume_timeout`. `shutdown` wakes every blocked consumer and returns only after all of them
/// have left the queue. Dropping the queue shuts it down as well.
///
/// Share it between threads with an `Arc` or a scoped thread.
pub struct SyncQueue<T> {
    state: CachePadded<Mutex<State<T>>>,
    item_available: Condvar,
    drain_complete: Condvar,
    name: Option<String>,
    policy: ProducePolicy,
}

impl<T> SyncQueue<T> {
    /// Creates a new, empty queue.
    pub fn new() -> Self {
        Self::from_builder(Builder::new())
    }

    /// Creates a new, empty queue with room for `capacity` items before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_builder(Builder::new().capacity(capacity))
    }

    pub(crate) fn from_builder(builder: Builder) -> Self {
        SyncQueue {
            state: CachePadded::new(Mutex::new(State {
                items: VecDeque::with_capacity(builder.capacity),
                finishing: false,
                active_consumers: 0,
            })),
            item_available: Condvar::new(),
            drain_complete: Condvar::new(),
            name: builder.name,
            policy: builder.policy,
        }
    }

    /// Returns the name given through `Builder::name`, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns what `produce` does after shutdown.
    pub fn produce_policy(&self) -> ProducePolicy {
        self.policy
    }

    // Every update to `State` is a single step that can't panic halfway, so a poisoned lock
    // still guards consistent state.
    fn lock(&self) -> MutexGuard<State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn label(&self) -> &str {
        self.name().unwrap_or("<unnamed>")
    }

    /// Appends `item` at the tail and wakes one blocked consumer.
    ///
    /// Never blocks. Once shutdown has been requested the item is handed back in the error,
    /// unless the queue was built with `ProducePolicy::Accept`.
    pub fn produce(&self, item: T) -> Result<(), ProduceError<T>> {
        let mut state = self.lock();
        if state.finishing && self.policy == ProducePolicy::Reject {
            drop(state);
            warn!("queue {}: rejected an item produced after shutdown", self.label());
            return Err(ProduceError(item));
        }
        state.items.push_back(item);
        self.item_available.notify_one();
        Ok(())
    }

    /// Returns the number of queued items.
    ///
    /// The value may be stale by the time the caller looks at it.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Returns `true` if no items are queued. Advisory, like `len`.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Removes the head item without blocking.
    ///
    /// Returns `None` if the queue is observed to be empty. Works in every phase, so items left
    /// behind by a shutdown stay reachable.
    pub fn try_consume(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Removes the head item, blocking while the queue is empty.
    ///
    /// Returns `None` only once shutdown has been requested and the queue is empty. After
    /// shutdown this never blocks.
    pub fn consume_blocking(&self) -> Option<T> {
        let registration = self.register();
        let mut state = self
            .item_available
            .wait_while(self.lock(), |s| s.must_wait())
            .unwrap_or_else(PoisonError::into_inner);

        let item = state.items.pop_front();
        ScopeGuard::into_inner(registration);
        let active = self.deregister(&mut state);
        drop(state);
        trace!("queue {}: consumer left ({} active)", self.label(), active);
        item
    }

    /// Like `consume_blocking`, but gives up after `timeout`.
    pub fn consume_timeout(&self, timeout: Duration) -> Result<T, ConsumeTimeoutError> {
        let registration = self.register();
        let (mut state, _) = self
            .item_available
            .wait_timeout_while(self.lock(), timeout, |s| s.must_wait())
            .unwrap_or_else(PoisonError::into_inner);

        let result = match state.items.pop_front() {
            Some(item) => Ok(item),
            None if state.finishing => Err(ConsumeTimeoutError::Shutdown),
            None => Err(ConsumeTimeoutError::Timeout),
        };
        ScopeGuard::into_inner(registration);
        let active = self.deregister(&mut state);
        drop(state);
        trace!("queue {}: consumer left ({} active)", self.label(), active);
        result
    }

    /// Counts the calling thread as an active consumer.
    ///
    /// The returned guard is armed as soon as the count is bumped and deregisters the consumer if
    /// the caller unwinds before disarming it. The lock is not held on return, so callers take it
    /// after this call and the guard can always reacquire it while unwinding.
    fn register<'a>(&'a self) -> ScopeGuard<(), impl FnOnce(()) + 'a> {
        let active = {
            let mut state = self.lock();
            state.active_consumers += 1;
            state.active_consumers
        };
        let registration = scopeguard::guard((), move |()| {
            let mut state = self.lock();
            self.deregister(&mut state);
        });
        trace!("queue {}: consumer registered ({} active)", self.label(), active);
        registration
    }

    /// Drops one registration and wakes `shutdown` callers once none is left. Returns the number
    /// of consumers still registered.
    fn deregister(&self, state: &mut State<T>) -> usize {
        state.active_consumers -= 1;
        if state.active_consumers == 0 {
            self.drain_complete.notify_all();
        }
        state.active_consumers
    }

    /// Requests shutdown and waits for every blocked consumer to return.
    ///
    /// All consumers waiting in `consume_blocking` or `consume_timeout` are woken. They take any
    /// remaining items in order and return `None` (or `Shutdown`) once the queue is empty. Items
    /// nobody takes stay in the queue for `try_consume`.
    ///
    /// Calling it again, or from several threads at once, is fine: every call returns once the
    /// drain is complete.
    ///
    /// Must not be called from a thread that is itself inside a blocking consume of this queue.
    pub fn shutdown(&self) {
        let requested = {
            let mut state = self.lock();
            if state.finishing {
                None
            } else {
                state.finishing = true;
                self.item_available.notify_all();
                Some((state.active_consumers, state.items.len()))
            }
        };
        if let Some((waiting, left)) = requested {
            debug!(
                "queue {}: shutdown requested ({} consumers waiting, {} items left)",
                self.label(),
                waiting,
                left
            );
        }

        let state = self
            .drain_complete
            .wait_while(self.lock(), |s| s.active_consumers > 0)
            .unwrap_or_else(PoisonError::into_inner);
        let left = state.items.len();
        drop(state);
        if requested.is_some() {
            debug!("queue {}: drained ({} items left)", self.label(), left);
        }
    }

    /// Returns `true` once shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.lock().finishing
    }

    /// Returns the current lifecycle phase.
    pub fn phase(&self) -> Phase {
        let state = self.lock();
        match (state.finishing, state.active_consumers) {
            (false, _) => Phase::Open,
            (true, 0) => Phase::Closed,
            (true, _) => Phase::Draining,
        }
    }

    /// Returns the number of consumers inside a blocking consume. Advisory, like `len`.
    pub fn waiting_consumers(&self) -> usize {
        self.lock().active_consumers
    }

    /// Returns an iterator that blocks for each item and ends once the queue is shut down and
    /// empty.
    pub fn iter(&self) -> Iter<T> {
        Iter::new(self)
    }
}

impl<T> Default for SyncQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for SyncQueue<T> {
    fn drop(&mut self) {
        // Exclusive access: no consumer can be inside, so shutting down is only marking it.
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        debug_assert_eq!(state.active_consumers, 0);
        state.finishing = true;
        trace!(
            "queue {}: dropped with {} items left",
            self.name.as_deref().unwrap_or("<unnamed>"),
            state.items.len()
        );
    }
}

impl<T> fmt::Debug for SyncQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SyncQueue")
            .field("name", &self.name)
            .field("len", &self.len())
            .field("phase", &self.phase())
            .finish()
    }
}
