//! Request-deduplicating cache for report and list queries.
//!
//! Entries are keyed by a [`CacheKey`] string and hold a shared future: every
//! caller asking for the same key while the request is in flight, or after it
//! settled, observes the same outcome. Failures stay cached until the key is
//! invalidated. There is no time-based expiry; a cache built with
//! [`PagedResultCache::with_capacity`] evicts its oldest keys instead of
//! growing without bound.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};

/// Handle to a pending or settled cached request.
pub type CacheHandle<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Deterministic key built from every request-affecting input.
///
/// Filter pairs are kept sorted by name so insertion order never matters.
/// Names and values are form-encoded, so a value can never imitate another
/// filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    endpoint: String,
    filters: BTreeMap<String, String>,
    page: Option<(usize, usize)>,
}

impl CacheKey {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            filters: BTreeMap::new(),
            page: None,
        }
    }

    pub fn filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    pub fn page(mut self, page: usize, size: usize) -> Self {
        self.page = Some((page, size));
        self
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.endpoint)?;
        if !self.filters.is_empty() {
            let pairs: Vec<(&str, &str)> = self
                .filters
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();
            let encoded = serde_html_form::to_string(&pairs).map_err(|_| std::fmt::Error)?;
            write!(f, "?{encoded}")?;
        }
        if let Some((page, size)) = self.page {
            write!(f, "#page={page}&size={size}")?;
        }
        Ok(())
    }
}

struct Entries<T, E> {
    handles: HashMap<String, CacheHandle<T, E>>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<String>,
}

impl<T, E> Entries<T, E> {
    fn retain<P>(&mut self, keep: P) -> usize
    where
        P: Fn(&str, &CacheHandle<T, E>) -> bool,
    {
        let before = self.handles.len();
        self.handles.retain(|key, handle| keep(key, handle));
        let handles = &self.handles;
        self.order.retain(|key| handles.contains_key(key));
        before - self.handles.len()
    }
}

/// Explicitly owned request cache. Drop it to end its lifetime.
pub struct PagedResultCache<T, E> {
    entries: Mutex<Entries<T, E>>,
    capacity: Option<usize>,
}

impl<T, E> Default for PagedResultCache<T, E> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Entries {
                handles: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: None,
        }
    }
}

impl<T, E> PagedResultCache<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `capacity` keys. Inserting past it evicts the
    /// oldest key; callers already holding its handle still get the result.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    fn entries(&self) -> MutexGuard<'_, Entries<T, E>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the handle stored under `key`, calling `factory` only when
    /// there is none. The new handle is stored before the request settles,
    /// so racing callers join it.
    pub fn get<F, Fut>(&self, key: &str, factory: F) -> CacheHandle<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let mut entries = self.entries();
        if let Some(handle) = entries.handles.get(key) {
            return handle.clone();
        }
        if let Some(capacity) = self.capacity {
            while entries.handles.len() >= capacity {
                let Some(oldest) = entries.order.pop_front() else {
                    break;
                };
                entries.handles.remove(&oldest);
            }
        }
        let handle = factory().boxed().shared();
        entries.handles.insert(key.to_string(), handle.clone());
        entries.order.push_back(key.to_string());
        handle
    }

    /// Removes one entry. Returns whether it existed.
    pub fn invalidate(&self, key: &str) -> bool {
        self.invalidate_where(|candidate| candidate == key) > 0
    }

    /// Removes every entry whose request settled with an error. Pending and
    /// successful entries stay.
    pub fn invalidate_failed(&self) -> usize {
        self.entries()
            .retain(|_, handle| !matches!(handle.peek(), Some(Err(_))))
    }

    /// Removes every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.invalidate_where(|key| key.starts_with(prefix))
    }

    /// Removes every entry whose key matches `predicate`. Returns how many
    /// were removed.
    pub fn invalidate_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&str) -> bool,
    {
        self.entries().retain(|key, _| !predicate(key))
    }

    pub fn clear(&self) {
        let mut entries = self.entries();
        entries.handles.clear();
        entries.order.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries().handles.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries().handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::channel::oneshot;
    use futures::executor::block_on;

    use super::*;

    type Cache = PagedResultCache<Vec<u32>, String>;

    fn counting_factory(
        calls: &Arc<AtomicUsize>,
        result: Result<Vec<u32>, String>,
    ) -> impl FnOnce() -> futures::future::Ready<Result<Vec<u32>, String>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(result)
        }
    }

    #[test]
    fn key_sorts_filters() {
        let a = CacheKey::new("statistics/category-sales")
            .filter("to", "2025-06-30")
            .filter("from", "2025-06-01");
        let b = CacheKey::new("statistics/category-sales")
            .filter("from", "2025-06-01")
            .filter("to", "2025-06-30");

        assert_eq!(a, b);
        assert_eq!(
            a.to_string(),
            "statistics/category-sales?from=2025-06-01&to=2025-06-30"
        );
        assert_eq!(
            CacheKey::new("addresses").page(2, 10).to_string(),
            "addresses#page=2&size=10"
        );
    }

    #[test]
    fn key_values_cannot_imitate_other_filters() {
        let crafted = CacheKey::new("statistics/subcategory-sales")
            .filter("categoryName", "Bikes&from=2025-01-01&to=2025-01-31");
        let plain = CacheKey::new("statistics/subcategory-sales")
            .filter("categoryName", "Bikes")
            .filter("from", "2025-01-01")
            .filter("to", "2025-01-31");

        assert_ne!(crafted.to_string(), plain.to_string());
        assert!(!crafted.to_string().ends_with("from=2025-01-01&to=2025-01-31"));
        assert_eq!(
            CacheKey::new("r").filter("name", "a b&c").to_string(),
            "r?name=a+b%26c"
        );
    }

    #[test]
    fn concurrent_callers_share_one_request() {
        let cache = Cache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (sender, receiver) = oneshot::channel::<Vec<u32>>();

        let first = cache.get("k", {
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { receiver.await.map_err(|err| err.to_string()) }
            }
        });
        let second = cache.get("k", counting_factory(&calls, Ok(vec![9])));

        sender.send(vec![1, 2]).unwrap();
        let (a, b) = block_on(futures::future::join(first, second));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, Ok(vec![1, 2]));
        assert_eq!(b, Ok(vec![1, 2]));
    }

    #[test]
    fn completed_entries_are_served_without_a_new_call() {
        let cache = Cache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = block_on(cache.get("k", counting_factory(&calls, Ok(vec![1]))));
        let again = block_on(cache.get("k", counting_factory(&calls, Ok(vec![2]))));

        assert_eq!(first, Ok(vec![1]));
        assert_eq!(again, Ok(vec![1]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_shared_and_not_retried_until_invalidated() {
        let cache = Cache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let failed = block_on(cache.get("k", counting_factory(&calls, Err("boom".into()))));
        let joined = block_on(cache.get("k", counting_factory(&calls, Ok(vec![1]))));

        assert_eq!(failed, Err("boom".to_string()));
        assert_eq!(joined, Err("boom".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(cache.invalidate("k"));
        let retried = block_on(cache.get("k", counting_factory(&calls, Ok(vec![1]))));

        assert_eq!(retried, Ok(vec![1]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clear_and_prefix_invalidation_remove_entries() {
        let cache = Cache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        for key in ["reports/a?x=1", "reports/b?x=1", "addresses#page=0&size=10"] {
            drop(cache.get(key, counting_factory(&calls, Ok(vec![]))));
        }

        assert_eq!(cache.invalidate_where(|key| key.contains("b?")), 1);
        assert_eq!(cache.invalidate_prefix("reports/"), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("addresses#page=0&size=10"));

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.invalidate("addresses#page=0&size=10"));
    }

    #[test]
    fn only_failed_entries_are_dropped() {
        let cache = Cache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (_sender, receiver) = oneshot::channel::<Vec<u32>>();

        block_on(cache.get("ok", counting_factory(&calls, Ok(vec![1])))).unwrap();
        block_on(cache.get("failed", counting_factory(&calls, Err("boom".into())))).unwrap_err();
        drop(cache.get("pending", move || async move {
            receiver.await.map_err(|err| err.to_string())
        }));

        assert_eq!(cache.invalidate_failed(), 1);
        assert!(cache.contains("ok"));
        assert!(cache.contains("pending"));

        let retried = block_on(cache.get("failed", counting_factory(&calls, Ok(vec![2]))));
        assert_eq!(retried, Ok(vec![2]));
    }

    #[test]
    fn bounded_cache_evicts_the_oldest_key() {
        let cache = Cache::with_capacity(2);
        let calls = Arc::new(AtomicUsize::new(0));

        for key in ["a", "b", "c"] {
            block_on(cache.get(key, counting_factory(&calls, Ok(vec![])))).unwrap();
        }

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b") && cache.contains("c"));

        assert!(cache.invalidate("b"));
        block_on(cache.get("d", counting_factory(&calls, Ok(vec![])))).unwrap();
        assert!(cache.contains("c") && cache.contains("d"));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
