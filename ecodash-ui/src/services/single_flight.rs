//! Request deduplication
//!
//! The dashboard's fetch-on-activation path can fire repeatedly in quick
//! succession (tab switches, refresh clicks). Instead of an ambient
//! in-flight flag that silently skips later callers, [`SingleFlight`] is a
//! promise cache for one logical operation: concurrent callers join the
//! outstanding request and all receive its result.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use tokio::sync::Mutex;

/// One-slot promise cache.
///
/// The slot carries a generation counter so a caller finishing late cannot
/// clear a newer in-flight future installed after its own completed.
pub struct SingleFlight<T: Clone + Send + Sync + 'static> {
    slot: Mutex<SlotState<T>>,
}

struct SlotState<T: Clone> {
    generation: u64,
    inflight: Option<Shared<BoxFuture<'static, T>>>,
}

impl<T: Clone + Send + Sync + 'static> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(SlotState {
                generation: 0,
                inflight: None,
            }),
        }
    }

    /// Join the in-flight call if one exists, otherwise start one.
    ///
    /// `make` is only invoked when no call is outstanding.
    pub async fn run<F, Fut>(&self, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (generation, shared) = {
            let mut slot = self.slot.lock().await;
            match &slot.inflight {
                Some(existing) => {
                    tracing::debug!("Joining in-flight request");
                    (slot.generation, existing.clone())
                }
                None => {
                    slot.generation += 1;
                    let shared = make().boxed().shared();
                    slot.inflight = Some(shared.clone());
                    (slot.generation, shared)
                }
            }
        };

        let result = shared.await;

        let mut slot = self.slot.lock().await;
        if slot.generation == generation {
            slot.inflight = None;
        }
        result
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}
