//! Stop signal for the per-network health probers.
//!
//! `RpcManager` owns one [`Shutdown`]; each `HealthMonitor` it spawns holds a
//! receiver and leaves its probe loop on the first signal. The manager
//! triggers it from `shutdown()` and again on drop; repeated triggers are
//! harmless.

use tokio::sync::broadcast;

#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for one prober task.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscribed prober. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    /// Probers still holding a receiver.
    pub fn listening(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_probers() {
        let shutdown = Shutdown::new();
        let mut mainnet = shutdown.subscribe();
        let mut testnet = shutdown.subscribe();
        assert_eq!(shutdown.listening(), 2);

        assert_eq!(shutdown.trigger(), 2);
        assert!(mainnet.recv().await.is_ok());
        assert!(testnet.recv().await.is_ok());

        drop(mainnet);
        drop(testnet);
        assert_eq!(shutdown.listening(), 0);
        // Triggering with nobody listening (e.g. on drop after shutdown)
        assert_eq!(shutdown.trigger(), 0);
    }
}
