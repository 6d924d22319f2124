use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use tokio::sync::Notify;

/// A unique identifier for a signal that cannot be forged or extracted.
/// Two handles share an id exactly when they observe the same underlying signal.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SignalId(usize);

impl SignalId {
    fn of(inner: &Arc<Inner>) -> Self { Self(Arc::as_ptr(inner) as usize) }
}

impl std::fmt::Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

struct Inner {
    closed: AtomicBool,
    notify: Notify,
}

impl Inner {
    fn new(closed: bool) -> Arc<Self> { Arc::new(Self { closed: AtomicBool::new(closed), notify: Notify::new() }) }

    fn is_closed(&self) -> bool { self.closed.load(Ordering::SeqCst) }

    fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.notify.notify_waiters();
        true
    }
}

/// The observe-only side of a one-shot done signal.
///
/// A signal starts open and transitions to closed at most once. Cloning a
/// `Signal` yields another handle onto the same state; every handle (and every
/// pending [`Signal::wait`]) observes the close. Only the paired [`Trigger`]
/// can close it.
#[derive(Clone)]
pub struct Signal {
    inner: Arc<Inner>,
}

impl Signal {
    /// A signal that is already closed. Waiting on it completes immediately.
    pub fn closed() -> Self { Self { inner: Inner::new(true) } }

    /// A signal with no trigger. It stays open forever.
    pub fn never() -> Self { Self { inner: Inner::new(false) } }

    /// A timer-backed signal that closes once `duration` has elapsed.
    ///
    /// This is the way to bolt a timeout onto a fan-in: pass
    /// `Signal::after(timeout)` as one more input to [`crate::merge_or`].
    /// Must be called from within a tokio runtime with the time driver enabled.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn after(duration: Duration) -> Self {
        let trigger = Trigger::new();
        let signal = trigger.signal();
        crate::task::spawn(async move {
            tokio::time::sleep(duration).await;
            trigger.close();
        });
        signal
    }

    pub fn is_closed(&self) -> bool { self.inner.is_closed() }

    /// Wait until the signal is closed. Returns immediately if it already is.
    pub async fn wait(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // register as a waiter before checking the flag, otherwise a close landing
        // between the check and the first poll would go unnoticed
        notified.as_mut().enable();
        if self.inner.is_closed() {
            return;
        }
        notified.await;
    }

    /// Get the unique identifier for this signal
    pub fn id(&self) -> SignalId { SignalId::of(&self.inner) }

    /// Whether both handles observe the same underlying signal
    pub fn ptr_eq(a: &Signal, b: &Signal) -> bool { Arc::ptr_eq(&a.inner, &b.inner) }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("id", &self.id()).field("closed", &self.is_closed()).finish()
    }
}

/// The write side of a one-shot done signal. Holds the exclusive right to close it.
///
/// Dropping a trigger does not close its signal.
pub struct Trigger {
    inner: Arc<Inner>,
}

impl Default for Trigger {
    fn default() -> Self { Self::new() }
}

impl Trigger {
    pub fn new() -> Self { Self { inner: Inner::new(false) } }

    /// Get an observe-only handle onto this trigger's signal
    pub fn signal(&self) -> Signal { Signal { inner: self.inner.clone() } }

    /// Close the signal, waking every waiter. Returns false if it was already closed.
    pub fn close(&self) -> bool { self.inner.close() }

    pub fn is_closed(&self) -> bool { self.inner.is_closed() }

    /// The id of the signal this trigger closes
    pub fn id(&self) -> SignalId { SignalId::of(&self.inner) }
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger").field("id", &self.id()).field("closed", &self.is_closed()).finish()
    }
}
