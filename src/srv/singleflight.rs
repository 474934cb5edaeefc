//! Collapsing of concurrent lookups for the same origin.
//!
//! Each key moves through `absent -> pending -> absent`. The first caller
//! for a key spawns the lookup and registers a shared handle to it before
//! returning; later callers clone the handle and observe the same result,
//! success or failure. The entry is removed as soon as the lookup settles,
//! so nothing is reused past that point: this bounds duplicate work, it is
//! not a cache.
//!
//! The lookup runs in its own task, so a caller that stops polling (a
//! timeout, a dropped request) does not cancel it and the entry is still
//! cleared when it finishes.

use crate::base::lookuperror::LookupError;
use crate::srv::ResolvedEndpoint;
use dashmap::{mapref::entry::Entry, DashMap};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// Result shared between all callers of one in-flight lookup.
pub type SharedResult = Result<Arc<[ResolvedEndpoint]>, LookupError>;

/// Handle to an in-flight lookup. Cloning it joins the same lookup.
pub type SharedLookup = Shared<BoxFuture<'static, SharedResult>>;

struct InFlight {
    id: u64,
    lookup: SharedLookup,
}

/// Map from origin key to the lookup currently running for it.
#[derive(Clone, Default)]
pub struct SingleFlight {
    entries: Arc<DashMap<String, InFlight>>,
    next_id: Arc<AtomicU64>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the lookup in flight for `key`, or start one with `make`.
    ///
    /// `make` is only called when no lookup is in flight. Must be called
    /// from within a tokio runtime.
    pub fn run<F, Fut>(&self, key: String, make: F) -> SharedLookup
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ResolvedEndpoint>, LookupError>> + Send + 'static,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                tracing::debug!(key = %entry.key(), "joining in-flight SRV lookup");
                entry.get().lookup.clone()
            }
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let evict = Evict {
                    entries: Arc::clone(&self.entries),
                    key: entry.key().clone(),
                    id,
                };
                let fut = make();

                let handle = tokio::spawn(async move {
                    // Dropped when the lookup settles, panics included, and
                    // before any waiter is woken.
                    let _evict = evict;
                    fut.await.map(Arc::<[ResolvedEndpoint]>::from)
                });

                let lookup: SharedLookup = async move {
                    handle
                        .await
                        .unwrap_or_else(|e| Err(LookupError::Aborted(e.to_string())))
                }
                .boxed()
                .shared();

                entry.insert(InFlight {
                    id,
                    lookup: lookup.clone(),
                });
                lookup
            }
        }
    }

    /// Number of keys with a lookup in flight.
    pub fn in_flight(&self) -> usize {
        self.entries.len()
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl std::fmt::Debug for SingleFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.entries.len())
            .finish()
    }
}

/// Removes its entry on drop, unless the key has since been reused.
struct Evict {
    entries: Arc<DashMap<String, InFlight>>,
    key: String,
    id: u64,
}

impl Drop for Evict {
    fn drop(&mut self) {
        self.entries.remove_if(&self.key, |_, entry| entry.id == self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn endpoint(port: u16) -> ResolvedEndpoint {
        ResolvedEndpoint::new(Ipv4Addr::LOCALHOST, port, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_run() {
        let flight = SingleFlight::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel::<()>();

        let r = Arc::clone(&runs);
        let first = flight.run("http://svc".into(), move || async move {
            r.fetch_add(1, Ordering::SeqCst);
            let _ = rx.await;
            Ok(vec![endpoint(1)])
        });
        let r = Arc::clone(&runs);
        let second = flight.run("http://svc".into(), move || async move {
            r.fetch_add(1, Ordering::SeqCst);
            Ok(vec![endpoint(2)])
        });

        assert_eq!(flight.in_flight(), 1);
        tx.send(()).unwrap();

        let (a, b) = tokio::join!(first, second);
        assert_eq!(&*a.unwrap(), &[endpoint(1)]);
        assert_eq!(&*b.unwrap(), &[endpoint(1)]);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(flight.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_separately() {
        let flight = SingleFlight::new();
        let a = flight.run("http://a".into(), || async { Ok(vec![endpoint(1)]) });
        let b = flight.run("http://b".into(), || async { Ok(vec![endpoint(2)]) });

        assert_eq!(flight.in_flight(), 2);
        assert_eq!(&*a.await.unwrap(), &[endpoint(1)]);
        assert_eq!(&*b.await.unwrap(), &[endpoint(2)]);
    }

    #[tokio::test]
    async fn test_entry_cleared_after_failure() {
        let flight = SingleFlight::new();
        let result = flight
            .run("http://svc".into(), || async {
                Err(LookupError::Aggregate(vec![]))
            })
            .await;

        assert!(matches!(result, Err(LookupError::Aggregate(_))));
        assert!(!flight.is_in_flight("http://svc"));
    }

    async fn explode() -> Result<Vec<ResolvedEndpoint>, LookupError> {
        panic!("resolver exploded")
    }

    #[tokio::test]
    async fn test_panic_surfaces_as_aborted() {
        let flight = SingleFlight::new();
        let result = flight.run("http://svc".into(), explode).await;

        assert!(matches!(result, Err(LookupError::Aborted(_))));
        assert_eq!(flight.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_abandoned_lookup_still_clears() {
        let flight = SingleFlight::new();
        let (tx, rx) = oneshot::channel::<()>();

        let lookup = flight.run("http://svc".into(), move || async move {
            let _ = rx.await;
            Ok(vec![endpoint(1)])
        });
        drop(lookup);
        assert!(flight.is_in_flight("http://svc"));

        tx.send(()).unwrap();
        for _ in 0..100 {
            if !flight.is_in_flight("http://svc") {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!flight.is_in_flight("http://svc"));
    }
}
