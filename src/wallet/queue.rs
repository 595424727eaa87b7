//! FIFO serialization of wallet prompts.
//!
//! Each operation runs only after every earlier operation has settled,
//! whether it succeeded or failed. Tokio's mutex is fair, so waiters are
//! served in arrival order.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

/// Single-slot queue guarding one wallet session.
#[derive(Debug, Default)]
pub struct SignatureQueue {
    slot: Mutex<()>,
    pending: AtomicUsize,
}

struct PendingGuard<'a>(&'a AtomicUsize);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SignatureQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations waiting or running.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Run `op` once all previously queued operations have settled.
    pub async fn run<F, Fut, T>(&self, method: &'static str, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let _pending = PendingGuard(&self.pending);

        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("wallet_request", %request_id, method);

        async {
            let _slot = self.slot.lock().await;
            tracing::debug!("Dispatching to wallet");
            op().await
        }
        .instrument(span)
        .await
    }
}
