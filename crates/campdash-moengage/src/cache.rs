//! Read-through cache with a time-to-live and single-flight loading.
//!
//! Each key owns a slot. The first caller to miss runs the loader; callers
//! arriving while that load is in flight wait on the same slot and receive
//! its outcome, success or failure alike. Only successes are stored: a failed
//! or cancelled load removes its slot, so the next caller starts a fresh one.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::watch;

/// Outcome of one load, published once to every caller that waited on it.
type Outcome<V, E> = Option<Result<V, Arc<E>>>;

enum Slot<V, E> {
    Loading(watch::Receiver<Outcome<V, E>>),
    Ready { value: V, stored_at: Instant },
}

enum Claim<V, E> {
    Hit(V),
    Wait(watch::Receiver<Outcome<V, E>>),
    Lead(watch::Sender<Outcome<V, E>>),
}

pub struct TtlCache<K, V, E> {
    ttl: Duration,
    slots: Mutex<HashMap<K, Slot<V, E>>>,
}

impl<K, V, E> TtlCache<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the live value for `key`, running `load` on a miss.
    ///
    /// Callers that arrive while a load for `key` is in flight do not run
    /// their own `load`; they receive the in-flight outcome.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, shared with every caller that waited on the
    /// same load. Nothing is cached in that case.
    pub async fn get_or_try_load<F, Fut>(&self, key: K, load: F) -> Result<V, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let tx = loop {
            match self.claim(&key) {
                Claim::Hit(value) => return Ok(value),
                Claim::Lead(tx) => break tx,
                Claim::Wait(mut rx) => {
                    // A closed channel with no outcome means the loading caller
                    // was dropped mid-load; claim the key again.
                    let shared = rx
                        .wait_for(Option::is_some)
                        .await
                        .ok()
                        .and_then(|outcome| (*outcome).clone());
                    if let Some(result) = shared {
                        return result;
                    }
                }
            }
        };

        let lead = Lead {
            cache: self,
            key,
            tx: Some(tx),
        };
        let result = load().await.map_err(Arc::new);
        lead.finish(result)
    }

    /// Live value for `key` without loading.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        match self.lock().get(key) {
            Some(Slot::Ready { value, stored_at }) if stored_at.elapsed() < self.ttl => {
                Some(value.clone())
            }
            _ => None,
        }
    }

    /// Drops the entry for `key`. An in-flight load still completes for its
    /// waiters but its value is not stored.
    pub fn invalidate(&self, key: &K) {
        self.lock().remove(key);
    }

    /// Number of keys holding a live value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready { .. }) && !self.is_expired(slot))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decides this caller's role for `key`, evicting expired entries first.
    /// The lock is released before any loader runs.
    fn claim(&self, key: &K) -> Claim<V, E> {
        let mut slots = self.lock();
        slots.retain(|_, slot| !self.is_expired(slot));
        match slots.get(key) {
            Some(Slot::Ready { value, .. }) => Claim::Hit(value.clone()),
            Some(Slot::Loading(rx)) => Claim::Wait(rx.clone()),
            None => {
                let (tx, rx) = watch::channel(None);
                slots.insert(key.clone(), Slot::Loading(rx));
                Claim::Lead(tx)
            }
        }
    }

    fn is_expired(&self, slot: &Slot<V, E>) -> bool {
        matches!(slot, Slot::Ready { stored_at, .. } if stored_at.elapsed() >= self.ttl)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Slot<V, E>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V, E> std::fmt::Debug for TtlCache<K, V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// The caller running a load. Dropping it unfinished releases the slot.
struct Lead<'a, K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    cache: &'a TtlCache<K, V, E>,
    key: K,
    tx: Option<watch::Sender<Outcome<V, E>>>,
}

impl<K, V, E> Lead<'_, K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn finish(mut self, result: Result<V, Arc<E>>) -> Result<V, Arc<E>> {
        if let Some(tx) = self.tx.take() {
            self.release(&tx, result.as_ref().ok().cloned());
            tx.send_replace(Some(result.clone()));
        }
        result
    }

    /// Stores `ready` in this load's slot, or removes the slot when `None`.
    /// A slot replaced since the load began (after `invalidate`) is left alone.
    fn release(&self, tx: &watch::Sender<Outcome<V, E>>, ready: Option<V>) {
        let mut slots = self.cache.lock();
        let owned = matches!(
            slots.get(&self.key),
            Some(Slot::Loading(rx)) if rx.same_channel(&tx.subscribe())
        );
        if !owned {
            return;
        }
        match ready {
            Some(value) => {
                slots.insert(
                    self.key.clone(),
                    Slot::Ready {
                        value,
                        stored_at: Instant::now(),
                    },
                );
            }
            None => {
                slots.remove(&self.key);
            }
        }
    }
}

impl<K, V, E> Drop for Lead<'_, K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            self.release(&tx, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn counting_load(
        calls: &Arc<AtomicU32>,
        value: u32,
    ) -> impl Future<Output = Result<u32, String>> {
        let calls = Arc::clone(calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        }
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_served_from_cache() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicU32::new(0));

        let first = cache
            .get_or_try_load("k", || counting_load(&calls, 1))
            .await
            .unwrap();
        let second = cache
            .get_or_try_load("k", || counting_load(&calls, 2))
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 1, "cached value should be returned");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&"k"), Some(1));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn distinct_keys_load_independently() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicU32::new(0));

        cache
            .get_or_try_load("a", || counting_load(&calls, 1))
            .await
            .unwrap();
        cache
            .get_or_try_load("b", || counting_load(&calls, 2))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[tokio::test]
    async fn expired_entry_is_reloaded() {
        let cache = TtlCache::new(Duration::ZERO);
        let calls = Arc::new(AtomicU32::new(0));

        cache
            .get_or_try_load("k", || counting_load(&calls, 1))
            .await
            .unwrap();
        let second = cache
            .get_or_try_load("k", || counting_load(&calls, 2))
            .await
            .unwrap();

        assert_eq!(second, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.get(&"k").is_none());
    }

    #[tokio::test]
    async fn failed_load_is_not_cached() {
        let cache: TtlCache<&str, u32, String> = TtlCache::new(Duration::from_secs(60));

        let err = cache
            .get_or_try_load("k", || async { Err("boom".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(*err, "boom");
        assert!(cache.is_empty());
        assert!(cache.lock().is_empty(), "failed load left a slot behind");

        let value = cache
            .get_or_try_load("k", || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_load() {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicU32::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_try_load("k", || async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok::<_, String>(42)
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_failures_share_one_load() {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicU32::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_try_load("k", || async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Err::<u32, _>("boom".to_string())
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            let err = task.await.unwrap().unwrap_err();
            assert_eq!(*err, "boom");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1, "waiters must not retry");
        assert!(cache.lock().is_empty(), "failed load left a slot behind");
    }

    #[tokio::test]
    async fn cancelled_load_releases_its_slot() {
        let cache: TtlCache<&str, u32, String> = TtlCache::new(Duration::from_secs(60));

        let pending = tokio::time::timeout(
            Duration::from_millis(10),
            cache.get_or_try_load("k", || async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(1)
            }),
        )
        .await;
        assert!(pending.is_err(), "load should have been cut off");
        assert!(cache.lock().is_empty(), "cancelled load left a slot behind");

        let value = cache
            .get_or_try_load("k", || async { Ok(2) })
            .await
            .unwrap();
        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn load_invalidated_in_flight_is_not_stored() {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60)));

        let task = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .get_or_try_load("k", || async {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, String>(1)
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;
        cache.invalidate(&"k");

        assert_eq!(task.await.unwrap().unwrap(), 1);
        assert!(cache.get(&"k").is_none());
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicU32::new(0));

        cache
            .get_or_try_load("k", || counting_load(&calls, 1))
            .await
            .unwrap();
        cache.invalidate(&"k");
        let value = cache
            .get_or_try_load("k", || counting_load(&calls, 2))
            .await
            .unwrap();

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
