//! Internal teardown bag collecting destroy hooks.

use std::future::Future;
use std::pin::Pin;

/// Future type for async destroy hooks.
pub(crate) type BoxFutureUnit = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Container for bound destroy hooks with LIFO execution order.
///
/// Hooks are pushed as instances are constructed, so popping tears down
/// dependents before the things they depend on. Async hooks run first (in
/// reverse order), followed by sync hooks.
#[derive(Default)]
pub(crate) struct TeardownBag {
    sync: Vec<Box<dyn FnOnce() + Send>>,
    asyncs: Vec<Box<dyn FnOnce() -> BoxFutureUnit + Send>>,
}

impl TeardownBag {
    /// Add a synchronous destroy hook.
    pub(crate) fn push_sync(&mut self, f: Box<dyn FnOnce() + Send>) {
        self.sync.push(f);
    }

    /// Add an asynchronous destroy hook.
    pub(crate) fn push_async<Fut, F>(&mut self, f: F)
    where
        Fut: Future<Output = ()> + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
    {
        self.asyncs.push(Box::new(move || Box::pin(f())));
    }

    /// Execute all sync hooks in reverse order (LIFO).
    pub(crate) fn run_all_sync_reverse(&mut self) {
        while let Some(f) = self.sync.pop() {
            (f)();
        }
    }

    /// Execute all async hooks in reverse order (LIFO).
    pub(crate) async fn run_all_async_reverse(&mut self) {
        while let Some(f) = self.asyncs.pop() {
            (f)().await;
        }
    }

    /// Check if the bag is empty (no hooks registered).
    pub(crate) fn is_empty(&self) -> bool {
        self.sync.is_empty() && self.asyncs.is_empty()
    }

    /// Whether any async hooks are still pending.
    pub(crate) fn has_async(&self) -> bool {
        !self.asyncs.is_empty()
    }
}
