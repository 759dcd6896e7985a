//! Key-batched loader
//!
//! A [`BatchLoader`] collects every key requested during one scheduling tick
//! into a single call of its [`BatchFn`], deduplicates repeated keys and
//! memoizes results for its own lifetime. Loaders are created per request
//! (see [`super::LoaderRegistry`]), so the cache never outlives a request.
//!
//! Keys are enqueued when [`BatchLoader::load`] is *called*, not when the
//! returned future is first polled. The first key of a new batch spawns a
//! flush task which waits for the tick boundary (or the configured batch
//! delay) before dispatching, so every sibling resolver that runs in the
//! same tick lands in the same batch. The flush task only holds a weak
//! handle, so a batch whose loader was dropped with its request never
//! reaches the store.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::hash::Hash;
use std::mem;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures_util::future::try_join_all;
use futures_util::FutureExt;
use tokio::sync::oneshot;
use tracing::Instrument;

use crate::error::LoaderError;

/// Batch fetch function behind a [`BatchLoader`]
///
/// `Value` doubles as the result shape: keys missing from the returned map
/// resolve to `Value::default()`, so single-record loaders use `Option<T>`
/// and collection loaders use `Vec<T>`.
pub trait BatchFn<K>: Send + Sync + 'static {
    type Value: Default + Clone + Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Fetch all `keys` at once. Keys are distinct and in first-seen order.
    fn fetch(
        &self,
        keys: &[K],
    ) -> impl Future<Output = Result<HashMap<K, Self::Value>, Self::Error>> + Send;
}

/// Timing knobs shared by every loader of a registry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoaderSettings {
    /// Extra time to keep a batch open after it is created.
    /// `None` flushes at the next tick boundary.
    pub batch_delay: Option<Duration>,
}

impl LoaderSettings {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            batch_delay: Some(delay),
        }
    }
}

type Slot<V> = oneshot::Sender<Result<V, LoaderError>>;

struct State<K, V> {
    cache: HashMap<K, V>,
    /// Waiters per key, for keys in the open batch and in-flight batches
    pending: HashMap<K, Vec<Slot<V>>>,
    /// Keys of the open batch in first-seen order
    open: Vec<K>,
    /// In-flight keys cleared after dispatch; their results are not cached
    evicted: HashSet<K>,
}

struct Inner<K, F: BatchFn<K>> {
    batch_fn: F,
    settings: LoaderSettings,
    state: Mutex<State<K, F::Value>>,
}

enum Ticket<V> {
    Ready(V),
    Waiting(oneshot::Receiver<Result<V, LoaderError>>),
}

/// Request-scoped batching and caching loader
pub struct BatchLoader<K, F: BatchFn<K>> {
    inner: Arc<Inner<K, F>>,
}

impl<K, F: BatchFn<K>> Clone for BatchLoader<K, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, F> BatchLoader<K, F>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    F: BatchFn<K>,
{
    pub fn new(batch_fn: F, settings: LoaderSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                batch_fn,
                settings,
                state: Mutex::new(State {
                    cache: HashMap::new(),
                    pending: HashMap::new(),
                    open: Vec::new(),
                    evicted: HashSet::new(),
                }),
            }),
        }
    }

    /// Loader name from the batch function
    pub fn name(&self) -> &'static str {
        self.inner.batch_fn.name()
    }

    /// Load one key
    ///
    /// Cached keys resolve immediately without joining a batch. Keys already
    /// pending share the slot set of their batch.
    pub fn load(
        &self,
        key: K,
    ) -> impl Future<Output = Result<F::Value, LoaderError>> + Send + 'static {
        let ticket = self.enqueue(key);
        let loader = self.name();
        async move {
            match ticket {
                Ticket::Ready(value) => Ok(value),
                Ticket::Waiting(rx) => rx
                    .await
                    .unwrap_or(Err(LoaderError::Abandoned { loader })),
            }
        }
    }

    /// Load several keys, returning values in input order (duplicates included)
    pub fn load_many(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> impl Future<Output = Result<Vec<F::Value>, LoaderError>> + Send + 'static {
        let loads: Vec<_> = keys.into_iter().map(|key| self.load(key)).collect();
        try_join_all(loads)
    }

    /// Seed the cache without fetching
    ///
    /// Returns `false` and changes nothing when the key is already cached or
    /// pending.
    pub fn prime(&self, key: K, value: F::Value) -> bool {
        let mut state = self.inner.lock();
        if state.cache.contains_key(&key) || state.pending.contains_key(&key) {
            return false;
        }
        state.cache.insert(key, value);
        true
    }

    /// Prime every pair, returning how many were stored
    pub fn prime_many(&self, entries: impl IntoIterator<Item = (K, F::Value)>) -> usize {
        entries
            .into_iter()
            .filter(|(key, value)| self.prime(key.clone(), value.clone()))
            .count()
    }

    /// Overwrite the cached value for `key`
    ///
    /// Callers already waiting on the key receive `value` right away; a batch
    /// still fetching the key keeps this value when it completes.
    pub fn force_prime(&self, key: K, value: F::Value) {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        state.open.retain(|k| *k != key);
        state.evicted.remove(&key);
        for slot in state.pending.remove(&key).unwrap_or_default() {
            let _ = slot.send(Ok(value.clone()));
        }
        state.cache.insert(key, value);
    }

    /// Drop the cached value for `key` so the next load fetches it again
    ///
    /// A batch already fetching the key still answers its waiters but does
    /// not cache the result.
    pub fn clear(&self, key: &K) {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        state.cache.remove(key);
        if state.pending.contains_key(key) && !state.open.contains(key) {
            state.evicted.insert(key.clone());
        }
    }

    /// Drop every cached value
    pub fn clear_all(&self) {
        let mut guard = self.inner.lock();
        let state = &mut *guard;
        state.cache.clear();
        let in_flight: Vec<K> = state
            .pending
            .keys()
            .filter(|k| !state.open.contains(k))
            .cloned()
            .collect();
        state.evicted.extend(in_flight);
    }

    /// Cached value for `key`, if any
    pub fn cached(&self, key: &K) -> Option<F::Value> {
        self.inner.lock().cache.get(key).cloned()
    }

    fn enqueue(&self, key: K) -> Ticket<F::Value> {
        let mut guard = self.inner.lock();
        let state = &mut *guard;

        if let Some(value) = state.cache.get(&key) {
            return Ticket::Ready(value.clone());
        }

        let (tx, rx) = oneshot::channel();
        if let Some(slots) = state.pending.get_mut(&key) {
            slots.push(tx);
            return Ticket::Waiting(rx);
        }

        state.pending.insert(key.clone(), vec![tx]);
        state.open.push(key);
        let opens_batch = state.open.len() == 1;
        drop(guard);

        if opens_batch {
            self.schedule_flush();
        }
        Ticket::Waiting(rx)
    }

    fn schedule_flush(&self) {
        let inner = Arc::downgrade(&self.inner);
        let delay = self.inner.settings.batch_delay;
        let flush = async move {
            match delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => tokio::task::yield_now().await,
            }
            dispatch(inner).await;
        };
        // Dispatch logs stay inside the span of the request that opened the batch
        tokio::spawn(flush.in_current_span());
    }
}

impl<K, F> Inner<K, F>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    F: BatchFn<K>,
{
    fn lock(&self) -> MutexGuard<'_, State<K, F::Value>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn dispatch_batch(&self) {
        let keys = mem::take(&mut self.lock().open);
        if keys.is_empty() {
            return;
        }

        let loader = self.batch_fn.name();
        tracing::debug!(loader, keys = keys.len(), "Dispatching batch");

        let outcome = AssertUnwindSafe(self.batch_fn.fetch(&keys))
            .catch_unwind()
            .await;

        let mut guard = self.lock();
        let state = &mut *guard;
        match outcome {
            Ok(Ok(mut values)) => {
                for key in keys {
                    let value = match state.cache.get(&key) {
                        Some(forced) => forced.clone(),
                        None if state.evicted.remove(&key) => {
                            values.remove(&key).unwrap_or_default()
                        }
                        None => {
                            let value = values.remove(&key).unwrap_or_default();
                            state.cache.insert(key.clone(), value.clone());
                            value
                        }
                    };
                    for slot in state.pending.remove(&key).unwrap_or_default() {
                        let _ = slot.send(Ok(value.clone()));
                    }
                }
            }
            Ok(Err(err)) => {
                tracing::warn!(loader, keys = keys.len(), error = %err, "Batch fetch failed");
                let err = LoaderError::batch_fetch(loader, err);
                settle(state, keys, err);
            }
            Err(_) => {
                tracing::error!(loader, keys = keys.len(), "Batch fetch panicked");
                settle(state, keys, LoaderError::Abandoned { loader });
            }
        }
    }
}

/// Run the open batch unless every handle to the loader is gone
async fn dispatch<K, F>(inner: Weak<Inner<K, F>>)
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    F: BatchFn<K>,
{
    match inner.upgrade() {
        Some(inner) => inner.dispatch_batch().await,
        None => tracing::debug!("Loader dropped before its batch was dispatched"),
    }
}

/// Complete the slots of a failed batch without caching anything
fn settle<K: Eq + Hash, V: Clone>(state: &mut State<K, V>, keys: Vec<K>, err: LoaderError) {
    for key in keys {
        state.evicted.remove(&key);
        let result = match state.cache.get(&key) {
            Some(forced) => Ok(forced.clone()),
            None => Err(err.clone()),
        };
        for slot in state.pending.remove(&key).unwrap_or_default() {
            let _ = slot.send(result.clone());
        }
    }
}
