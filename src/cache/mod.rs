//! Client-side server-state cache.
//!
//! Entries hold the last JSON payload fetched for a [`QueryKey`]. Reads return fresh
//! data without touching the network; invalidated (stale) or missing entries are
//! refetched. Every entry carries a generation counter: cancelling a key bumps it so a
//! response that was in flight when an optimistic edit landed is dropped instead of
//! overwriting the edit.

mod key;
pub mod keys;

use std::{
    future::Future,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;

pub use self::key::QueryKey;

struct CacheEntry {
    data: Option<Value>,
    stale: bool,
    generation: u64,
    fetches: u64,
    last_access: Instant,
}

impl CacheEntry {
    fn empty() -> Self {
        Self {
            data: None,
            stale: true,
            generation: 0,
            fetches: 0,
            last_access: Instant::now(),
        }
    }
}

/// Verbatim copy of cache entries taken before an optimistic edit.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    entries: Vec<(QueryKey, Option<Value>)>,
}

impl CacheSnapshot {
    /// Keys captured by the snapshot.
    pub fn keys(&self) -> impl Iterator<Item = &QueryKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry matched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keyed store of server responses shared by every query and mutation.
#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, CacheEntry>,
}

impl QueryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, running `fetcher` when it is missing or stale.
    ///
    /// The fetched value is stored only if the key was not cancelled meanwhile; the
    /// caller receives it either way.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<Value, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ClientError>>,
    {
        let generation = {
            let mut entry = self
                .entries
                .entry(key.clone())
                .or_insert_with(CacheEntry::empty);
            entry.last_access = Instant::now();
            if !entry.stale {
                if let Some(data) = &entry.data {
                    return Ok(data.clone());
                }
            }
            entry.generation
        };

        debug!(%key, "fetching query");
        let value = fetcher().await?;

        match self.entries.get_mut(key) {
            Some(mut entry) if entry.generation == generation => {
                entry.data = Some(value.clone());
                entry.stale = false;
                entry.fetches += 1;
            }
            _ => debug!(%key, "discarding response of cancelled query"),
        }

        Ok(value)
    }

    /// Typed wrapper around [`QueryCache::fetch`].
    pub async fn fetch_as<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ClientError>>,
    {
        let value = self.fetch(key, fetcher).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Current data for `key`, fresh or stale.
    pub fn get(&self, key: &QueryKey) -> Option<Value> {
        self.entries.get(key).and_then(|entry| entry.data.clone())
    }

    /// Store `value` for `key` as fresh data.
    pub fn set(&self, key: QueryKey, value: Value) {
        let mut entry = self.entries.entry(key).or_insert_with(CacheEntry::empty);
        entry.data = Some(value);
        entry.stale = false;
        entry.last_access = Instant::now();
    }

    /// True when `key` is absent or marked stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_none_or(|entry| entry.stale)
    }

    /// Number of fetches whose result was stored for `key`.
    pub fn fetch_count(&self, key: &QueryKey) -> u64 {
        self.entries.get(key).map_or(0, |entry| entry.fetches)
    }

    /// Mark every entry covered by `prefix` stale; returns how many matched.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for mut entry in self.entries.iter_mut() {
            if entry.key().starts_with(prefix) {
                entry.stale = true;
                count += 1;
            }
        }
        debug!(%prefix, count, "invalidated queries");
        count
    }

    /// Cancel in-flight fetches for every entry covered by `prefix`.
    pub fn cancel(&self, prefix: &QueryKey) {
        for mut entry in self.entries.iter_mut() {
            if entry.key().starts_with(prefix) {
                entry.generation += 1;
            }
        }
    }

    /// Capture the data of every entry covered by one of `prefixes`.
    pub fn snapshot(&self, prefixes: &[QueryKey]) -> CacheSnapshot {
        let mut entries = self
            .entries
            .iter()
            .filter(|entry| prefixes.iter().any(|prefix| entry.key().starts_with(prefix)))
            .map(|entry| (entry.key().clone(), entry.data.clone()))
            .collect::<Vec<_>>();
        entries.sort_by(|(left, _), (right, _)| left.cmp(right));
        CacheSnapshot { entries }
    }

    /// Put every captured entry back exactly as it was.
    pub fn restore(&self, snapshot: CacheSnapshot) {
        for (key, data) in snapshot.entries {
            let mut entry = self.entries.entry(key).or_insert_with(CacheEntry::empty);
            entry.data = data;
        }
    }

    /// Edit in place every entry covered by `prefix` that currently holds data.
    pub fn update<F>(&self, prefix: &QueryKey, mut patch: F) -> usize
    where
        F: FnMut(&QueryKey, &mut Value),
    {
        let mut count = 0;
        for mut entry in self.entries.iter_mut() {
            if !entry.key().starts_with(prefix) {
                continue;
            }
            let (key, entry) = entry.pair_mut();
            if let Some(data) = entry.data.as_mut() {
                patch(key, data);
                count += 1;
            }
        }
        count
    }

    /// Drop entries nobody read for at least `max_idle`; returns how many were removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.last_access.elapsed() < max_idle);
        before.saturating_sub(self.entries.len())
    }

    /// Forget every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
