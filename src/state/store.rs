use std::sync::Arc;
use tokio::sync::watch;

/// Read, write and observe a single value.
pub trait StateStore<T>: Send + Sync {
    fn get(&self) -> T;

    /// Replaces the value and notifies subscribers.
    fn set(&self, value: T);

    /// Receiver starts at the current value and sees every later write.
    fn subscribe(&self) -> watch::Receiver<T>;
}

/// [`StateStore`] backed by a `tokio::sync::watch` channel.
pub struct WatchStore<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for WatchStore<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Clone + Send + Sync> WatchStore<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sets `value` and returns the previous one.
    pub fn replace(&self, value: T) -> T {
        self.sender.send_replace(value)
    }

    /// Edits the value in place; subscribers are notified only if `edit`
    /// returns true. The read and the write happen under one lock.
    pub fn modify(&self, edit: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender.send_if_modified(edit)
    }
}

impl<T: Clone + Send + Sync> StateStore<T> for WatchStore<T> {
    fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}
