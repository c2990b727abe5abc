use crate::sync::queue::SyncQueue;

/// A blocking iterator over the items of a `SyncQueue`.
///
/// Each call to `next` waits like `consume_blocking`. Iteration ends once the queue is shut down
/// and empty.
///
/// This struct is created by [`SyncQueue::iter`].
///
/// [`SyncQueue::iter`]: struct.SyncQueue.html#method.iter
#[derive(Debug)]
pub struct Iter<'a, T: 'a> {
    queue: &'a SyncQueue<T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(queue: &'a SyncQueue<T>) -> Self {
        Iter { queue }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.consume_blocking()
    }
}

impl<'a, T> IntoIterator for &'a SyncQueue<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_utils::thread::scope;

    use crate::sync::queue::SyncQueue;

    #[test]
    fn iter_ends_after_shutdown() {
        let q = SyncQueue::new();
        for i in 0..10 {
            q.produce(i).unwrap();
        }
        q.shutdown();
        assert_eq!(q.iter().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
        assert_eq!(q.iter().next(), None);
    }

    #[test]
    fn consumer_loop() {
        let q = SyncQueue::new();

        scope(|s| {
            let consumer = s.spawn(|_| {
                let mut sum = 0u64;
                for item in &q {
                    sum += item;
                }
                sum
            });

            for i in 1..=100 {
                q.produce(i).unwrap();
            }
            // Items still queued at shutdown are drained before the loop ends.
            q.shutdown();

            assert_eq!(consumer.join().unwrap(), 5050);
        })
        .unwrap();
    }
}
