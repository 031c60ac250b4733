use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::broadcast;

use crate::error::HelperError;

/// What every observer of a cache entry sees: one shared resolution, success
/// or failure. Failed fetches stay cached until the entry is invalidated.
pub type CacheOutcome<V> = std::result::Result<Arc<V>, HelperError>;

type SharedFetch<V> = Shared<BoxFuture<'static, CacheOutcome<V>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent<K> {
    /// The fetch for this key settled (resolved or rejected).
    Settled(K),
    /// The entry for this key was dropped; observers should re-request it.
    Invalidated(K),
}

/// Per-key request cache with at-most-one outstanding fetch per distinct key.
///
/// Each entry is a shared handle to the fetch itself, so concurrent callers
/// of [`get`](RequestCache::get) join the in-flight request instead of
/// spawning their own, and late callers read the settled value from the same
/// handle. Nothing here ever revalidates on its own: entries only leave the
/// map through [`invalidate`](RequestCache::invalidate) or process teardown.
///
/// Invalidation removes the entry rather than mutating it. An in-flight fetch
/// for a removed entry still settles for whoever already holds the handle,
/// but it is detached from the map and can never overwrite a newer entry for
/// the same or any other key.
pub struct RequestCache<K, V> {
    entries: Mutex<HashMap<K, SharedFetch<V>>>,
    events: broadcast::Sender<CacheEvent<K>>,
}

impl<K, V> RequestCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            entries: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Return the shared fetch for `key`, invoking `loader` only if no entry
    /// exists. The lock guards map access only and is never held across an
    /// await, so insertion is atomic with respect to task boundaries.
    pub async fn get<F, Fut>(&self, key: K, loader: F) -> CacheOutcome<V>
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = crate::error::Result<V>> + Send + 'static,
    {
        let fetch = {
            let mut entries = self.entries.lock().unwrap();
            match entries.get(&key) {
                Some(existing) => existing.clone(),
                None => {
                    let fut = loader(key.clone());
                    let events = self.events.clone();
                    let event_key = key.clone();
                    let shared = async move {
                        let outcome = fut.await.map(Arc::new);
                        let _ = events.send(CacheEvent::Settled(event_key));
                        outcome
                    }
                    .boxed()
                    .shared();
                    entries.insert(key, shared.clone());
                    shared
                }
            }
        };
        fetch.await
    }

    /// Drop the entry for exactly this key and tell subscribers. Observers
    /// that re-request the key coalesce onto a single new fetch through
    /// [`get`](RequestCache::get), so invalidation causes at most one
    /// re-fetch regardless of observer count.
    pub fn invalidate(&self, key: &K) {
        let removed = self.entries.lock().unwrap().remove(key).is_some();
        if removed {
            let _ = self.events.send(CacheEvent::Invalidated(key.clone()));
        }
    }

    /// Subscription interface for views; decoupled from any rendering layer.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent<K>> {
        self.events.subscribe()
    }
}

impl<K, V> Default for RequestCache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
