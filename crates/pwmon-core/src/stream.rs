// ── Surface subscriptions ──

use tokio::sync::watch;

/// A subscription to one surface of the [`SurfaceStore`](crate::SurfaceStore).
///
/// Holds the value seen at creation (or at the last [`changed`](Self::changed))
/// and lets consumers wait for the next publish.
pub struct SurfaceStream<T: Clone> {
    current: T,
    receiver: watch::Receiver<T>,
}

impl<T: Clone> SurfaceStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<T>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The value captured at creation or at the last `changed()`.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Wait for the next publish, returning the new value.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        let value = self.receiver.borrow_and_update().clone();
        self.current = value.clone();
        Some(value)
    }
}
