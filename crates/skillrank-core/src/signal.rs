//! Single-resolution completion signals.
//!
//! A [`SignalLatch`] hands out one [`SignalWait`] per wait. The first
//! `resolve` after `arm` completes that wait; later resolves are no-ops until
//! the latch is armed again. Arming replaces any pending wait, so listeners
//! never accumulate across repeated waits.

use std::sync::Mutex;

use tokio::sync::oneshot;

/// Latch for externally triggered one-shot signals such as a start button.
#[derive(Debug, Default)]
pub struct SignalLatch {
    pending: Mutex<Option<oneshot::Sender<()>>>,
}

/// The waiting half produced by [`SignalLatch::arm`].
#[derive(Debug)]
pub struct SignalWait {
    rx: oneshot::Receiver<()>,
}

impl SignalLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh wait. A previously armed, unresolved wait is superseded.
    pub fn arm(&self) -> SignalWait {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        *pending = Some(tx);
        SignalWait { rx }
    }

    /// Resolve the armed wait. Returns `false` if nothing was armed or the
    /// wait was already resolved.
    pub fn resolve(&self) -> bool {
        let sender = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match sender {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Whether a wait is armed and still unresolved.
    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }
}

impl SignalWait {
    /// Suspend until resolved. Returns `false` if the wait was superseded by
    /// a later `arm` instead.
    pub async fn wait(self) -> bool {
        self.rx.await.is_ok()
    }
}
