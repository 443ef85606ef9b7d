use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delays a callback until `wait` has passed without another call.
///
/// Every `call` cancels the pending invocation, so only the last argument of a burst
/// reaches the callback. Must be used from within a tokio runtime.
pub struct Debouncer<T> {
    func: Arc<dyn Fn(T) + Send + Sync>,
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(func: F, wait: Duration) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            wait,
            pending: Mutex::new(None),
        }
    }

    pub fn call(&self, arg: T) {
        let func = Arc::clone(&self.func);
        let wait = self.wait;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            func(arg);
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Drops the pending invocation, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}
