//! Per-row async data store

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use log::warn;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::error::RenderableDataError;

/// Supplies per-row data for async-backed cells.
///
/// The grid never performs network calls itself; callers implement this
/// over whatever backend they use.
#[async_trait]
pub trait RowDataSource<T>: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<T, RenderableDataError>;
}

/// Fixed data keyed by row, for fixtures and tests.
#[derive(Debug, Clone, Default)]
pub struct MapSource<T> {
    data: HashMap<String, T>,
}

impl<T> MapSource<T> {
    pub fn new(data: HashMap<String, T>) -> Self {
        Self { data }
    }
}

impl<T> FromIterator<(String, T)> for MapSource<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> RowDataSource<T> for MapSource<T> {
    async fn fetch(&self, key: &str) -> Result<T, RenderableDataError> {
        self.data
            .get(key)
            .cloned()
            .ok_or_else(|| RenderableDataError::NotFound(key.to_string()))
    }
}

/// State of one mounted row's data.
#[derive(Debug)]
pub enum CellSlot<T> {
    Loading,
    Failed(RenderableDataError),
    Ready(Arc<T>),
}

impl<T> Clone for CellSlot<T> {
    fn clone(&self) -> Self {
        match self {
            CellSlot::Loading => CellSlot::Loading,
            CellSlot::Failed(err) => CellSlot::Failed(err.clone()),
            CellSlot::Ready(data) => CellSlot::Ready(Arc::clone(data)),
        }
    }
}

struct Entry<T> {
    generation: u64,
    cancel: CancellationToken,
    slot: CellSlot<T>,
}

/// Owns the fetch tasks for rows currently on screen.
///
/// Mounting a row spawns one tokio task with its own child cancellation
/// token; unmounting cancels it and drops the slot. A result is only
/// published if the row is still mounted under the same generation, so a
/// slow response never overwrites a newer mount. Dropping the store cancels
/// every task.
pub struct AsyncCellStore<T> {
    source: Arc<dyn RowDataSource<T>>,
    entries: Arc<DashMap<String, Entry<T>>>,
    shutdown: CancellationToken,
    generation: AtomicU64,
    changed: Arc<Notify>,
}

impl<T: Send + Sync + 'static> AsyncCellStore<T> {
    pub fn new(source: impl RowDataSource<T> + 'static) -> Self {
        Self::from_arc(Arc::new(source))
    }

    pub fn from_arc(source: Arc<dyn RowDataSource<T>>) -> Self {
        Self {
            source,
            entries: Arc::new(DashMap::new()),
            shutdown: CancellationToken::new(),
            generation: AtomicU64::new(0),
            changed: Arc::new(Notify::new()),
        }
    }

    /// Starts fetching data for `key` unless it is already mounted.
    ///
    /// Must be called from within a tokio runtime; otherwise the slot is
    /// marked failed and the cell degrades to a placeholder.
    pub fn mount(&self, key: &str) {
        if self.entries.contains_key(key) {
            return;
        }
        self.spawn(key);
    }

    /// Refetches `key`, discarding any in-flight request.
    pub fn refresh(&self, key: &str) {
        self.unmount(key);
        self.spawn(key);
    }

    /// Cancels and forgets `key`.
    pub fn unmount(&self, key: &str) {
        if let Some((_, entry)) = self.entries.remove(key) {
            entry.cancel.cancel();
            self.changed.notify_waiters();
        }
    }

    /// Unmounts every key for which `keep` returns `false`.
    pub fn retain(&self, keep: impl Fn(&str) -> bool) {
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| !keep(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();
        for key in stale {
            self.unmount(&key);
        }
    }

    fn spawn(&self, key: &str) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = self.shutdown.child_token();

        let Ok(handle) = Handle::try_current() else {
            warn!("No tokio runtime to fetch row data for {key}");
            self.entries.insert(
                key.to_string(),
                Entry {
                    generation,
                    cancel,
                    slot: CellSlot::Failed(RenderableDataError::NoRuntime(key.to_string())),
                },
            );
            return;
        };

        self.entries.insert(
            key.to_string(),
            Entry {
                generation,
                cancel: cancel.clone(),
                slot: CellSlot::Loading,
            },
        );

        let source = Arc::clone(&self.source);
        let entries = Arc::clone(&self.entries);
        let changed = Arc::clone(&self.changed);
        let key = key.to_string();
        handle.spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Fetch for {key} cancelled");
                    return;
                }
                result = source.fetch(&key) => result,
            };
            if cancel.is_cancelled() {
                return;
            }
            if let Some(mut entry) = entries.get_mut(&key)
                && entry.generation == generation
            {
                entry.slot = match result {
                    Ok(data) => CellSlot::Ready(Arc::new(data)),
                    Err(err) => {
                        warn!("Row data for {key} unavailable: {err}");
                        CellSlot::Failed(err)
                    }
                };
            }
            changed.notify_waiters();
        });
    }

    /// Current state of `key`, or `None` when it is not mounted.
    pub fn slot(&self, key: &str) -> Option<CellSlot<T>> {
        self.entries.get(key).map(|entry| entry.slot.clone())
    }

    /// Cached data for `key` without triggering a fetch.
    pub fn snapshot(&self, key: &str) -> Option<Arc<T>> {
        match self.entries.get(key)?.slot {
            CellSlot::Ready(ref data) => Some(Arc::clone(data)),
            _ => None,
        }
    }

    pub fn is_mounted(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn mounted(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no mounted row is still loading.
    pub fn is_settled(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| !matches!(entry.slot, CellSlot::Loading))
    }

    /// Waits until every mounted row has finished loading.
    pub async fn settled(&self) {
        loop {
            let notified = self.changed.notified();
            if self.is_settled() {
                return;
            }
            notified.await;
        }
    }

    /// Cancels every in-flight fetch. Slots already loaded stay readable.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl<T> Drop for AsyncCellStore<T> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl<T> std::fmt::Debug for AsyncCellStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCellStore")
            .field("mounted", &self.entries.len())
            .field("shutdown", &self.shutdown.is_cancelled())
            .finish_non_exhaustive()
    }
}
