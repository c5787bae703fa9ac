use std::thread;

use crossbeam_channel::{bounded, Receiver};

/// Runs an iterator on a background thread, keeping up to `depth` items ready.
///
/// Items arrive in the order the inner iterator produces them. The worker
/// exits once the consumer drops this iterator or the inner iterator ends.
pub struct Prefetch<T> {
    receiver: Receiver<T>,
}

impl<T: Send + 'static> Prefetch<T> {
    pub fn new<I>(inner: I, depth: usize) -> Self
    where
        I: Iterator<Item = T> + Send + 'static,
    {
        let (sender, receiver) = bounded(depth.max(1));

        thread::spawn(move || {
            for item in inner {
                if sender.send(item).is_err() {
                    break;
                }
            }
        });

        Prefetch { receiver }
    }
}

impl<T> Iterator for Prefetch<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}

pub trait PrefetchIterator: Iterator + Sized {
    fn prefetch(self, depth: usize) -> Prefetch<Self::Item>
    where
        Self: Send + 'static,
        Self::Item: Send + 'static,
    {
        Prefetch::new(self, depth)
    }
}

impl<I: Iterator> PrefetchIterator for I {}
