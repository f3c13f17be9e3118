//! Per-entity event serialization.
//!
//! An at-least-once bus can deliver Created/Updated/Deleted for the same
//! template concurrently. Reconciliation is read-then-write: two
//! interleaved passes for one template can both observe "no schedule
//! task" and create twice. This serializer pins all reconciliation for
//! one entity key behind a per-key mutex — FIFO within a key, unordered
//! across keys.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// Keyed mutex registry for per-entity critical sections.
///
/// Entries are retained for the serializer's lifetime: eager removal can
/// hand two waiters different mutexes for the same key, which would void
/// the exclusivity guarantee. The registry is bounded by the number of
/// distinct entities one process observes.
#[derive(Debug, Default)]
pub struct PerEntitySerializer {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PerEntitySerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entity keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.locks.len()
    }

    /// Run `fut` while holding `entity_key`'s lock. Waiters on the same
    /// key acquire in FIFO order; other keys proceed concurrently.
    pub async fn run_exclusive<F, T>(&self, entity_key: &str, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        let lock = self
            .locks
            .entry(entity_key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;
        fut.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_same_key_never_interleaves() {
        let serializer = Arc::new(PerEntitySerializer::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let serializer = Arc::clone(&serializer);
            let in_flight = Arc::clone(&in_flight);
            let max_in_flight = Arc::clone(&max_in_flight);
            handles.push(tokio::spawn(async move {
                serializer
                    .run_exclusive("template-a", async {
                        let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_in_flight.fetch_max(current, Ordering::SeqCst);
                        sleep(Duration::from_millis(2)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(serializer.tracked_keys(), 1);
    }

    #[tokio::test]
    async fn test_same_key_runs_fifo() {
        let serializer = Arc::new(PerEntitySerializer::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        // Hold the key so every later waiter queues behind it.
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let holder = {
            let serializer = Arc::clone(&serializer);
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                serializer
                    .run_exclusive("template-a", async {
                        release_rx.await.unwrap();
                        log.lock().await.push(0);
                    })
                    .await;
            })
        };
        sleep(Duration::from_millis(20)).await;

        let mut handles = vec![holder];
        for i in 1..=4 {
            let serializer = Arc::clone(&serializer);
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                serializer
                    .run_exclusive("template-a", async {
                        log.lock().await.push(i);
                    })
                    .await;
            }));
            // Stagger spawns so waiters enqueue in a known order
            sleep(Duration::from_millis(10)).await;
        }

        release_tx.send(()).unwrap();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*log.lock().await, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_different_keys_run_concurrently() {
        let serializer = Arc::new(PerEntitySerializer::new());
        let (tx_a, rx_a) = oneshot::channel::<()>();
        let (tx_b, rx_b) = oneshot::channel::<()>();

        // Each side only completes if the other is in flight at the same
        // time; serialized execution would deadlock here.
        let first = {
            let serializer = Arc::clone(&serializer);
            tokio::spawn(async move {
                serializer
                    .run_exclusive("template-a", async {
                        tx_a.send(()).unwrap();
                        rx_b.await.unwrap();
                    })
                    .await;
            })
        };
        let second = {
            let serializer = Arc::clone(&serializer);
            tokio::spawn(async move {
                serializer
                    .run_exclusive("template-b", async {
                        rx_a.await.unwrap();
                        tx_b.send(()).unwrap();
                    })
                    .await;
            })
        };

        timeout(Duration::from_secs(5), async {
            first.await.unwrap();
            second.await.unwrap();
        })
        .await
        .expect("cross-key execution must not serialize");
    }
}
