//! An unbounded FIFO queue for handing items between threads, with a shutdown that waits for
//! blocked consumers.
//!
//! Any number of producers call [`produce`], any number of consumers call [`try_consume`] or
//! [`consume_blocking`]. [`shutdown`] wakes every blocked consumer and returns once all of them
//! have left the queue, so the queue can be torn down without a consumer still inside it.
//! Dropping the queue shuts it down as well.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use sync_queue::SyncQueue;
//!
//! let queue = Arc::new(SyncQueue::new());
//!
//! let worker = {
//!     let queue = queue.clone();
//!     thread::spawn(move || {
//!         let mut total = 0;
//!         while let Some(n) = queue.consume_blocking() {
//!             total += n;
//!         }
//!         total
//!     })
//! };
//!
//! for n in 1..=10 {
//!     queue.produce(n).unwrap();
//! }
//!
//! // Wakes the worker; it drains what is left and then sees `None`.
//! queue.shutdown();
//! assert_eq!(worker.join().unwrap(), 55);
//! assert!(queue.produce(11).is_err());
//! ```
//!
//! [`produce`]: struct.SyncQueue.html#method.produce
//! [`try_consume`]: struct.SyncQueue.html#method.try_consume
//! [`consume_blocking`]: struct.SyncQueue.html#method.consume_blocking
//! [`shutdown`]: struct.SyncQueue.html#method.shutdown

mod config;
mod error;
pub mod sync;

pub use self::config::{Builder, ProducePolicy};
pub use self::error::{ConsumeTimeoutError, ProduceError};
pub use self::sync::iter::Iter;
pub use self::sync::queue::{Phase, SyncQueue};
