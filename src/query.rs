//! Cached reads of the goals API.
//!
//! Each [`Query`] holds the last value fetched for one key. A value is fresh
//! for `stale_time` after it was fetched, unless it is invalidated first.
//! Stale or missing values are re-fetched on the next read, with at most one
//! fetch in flight per key. A fetch outlives the reader that started it.

use crate::models::{PendingGoal, SummaryAggregate};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinError;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Summary,
    PendingGoals,
}

impl QueryKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::PendingGoals => "pendingGoals",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Slot<V> {
    data: Option<Arc<V>>,
    fetched_at: Option<Instant>,
    generation: u64,
}

pub struct Query<V> {
    key: QueryKey,
    stale_time: Duration,
    slot: Mutex<Slot<V>>,
    fetch_gate: Arc<tokio::sync::Mutex<()>>,
}

impl<V> Query<V> {
    pub fn new(key: QueryKey, stale_time: Duration) -> Self {
        Self {
            key,
            stale_time,
            slot: Mutex::new(Slot {
                data: None,
                fetched_at: None,
                generation: 0,
            }),
            fetch_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn key(&self) -> QueryKey {
        self.key
    }

    fn slot(&self) -> MutexGuard<'_, Slot<V>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last successfully fetched value, fresh or not.
    pub fn data(&self) -> Option<Arc<V>> {
        self.slot().data.clone()
    }

    pub fn is_stale(&self) -> bool {
        match self.slot().fetched_at {
            Some(at) => at.elapsed() >= self.stale_time,
            None => true,
        }
    }

    fn fresh(&self) -> Option<Arc<V>> {
        let slot = self.slot();
        match slot.fetched_at {
            Some(at) if at.elapsed() < self.stale_time => slot.data.clone(),
            _ => None,
        }
    }

    fn store(&self, generation: u64, value: Arc<V>) {
        let mut slot = self.slot();
        slot.data = Some(value);
        // Invalidated mid-flight: keep the value but leave it stale.
        slot.fetched_at = (slot.generation == generation).then(Instant::now);
    }

    pub fn invalidate(&self) {
        let mut slot = self.slot();
        slot.generation = slot.generation.wrapping_add(1);
        slot.fetched_at = None;
        debug!(key = %self.key, "query invalidated");
    }
}

impl<V> Query<V>
where
    V: Send + Sync + 'static,
{
    /// Returns the cached value while it is fresh, otherwise runs `fetcher`.
    ///
    /// The request runs on its own task holding the fetch gate, so concurrent
    /// callers queue behind one in-flight fetch and reuse its result. Dropping
    /// the returned future only stops the wait: the request still completes
    /// and fills the cache for the next read.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's error; the previously cached value is kept.
    pub async fn fetch<F, Fut, E>(self: &Arc<Self>, fetcher: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
        E: From<JoinError> + Send + 'static,
    {
        if let Some(value) = self.fresh() {
            debug!(key = %self.key, "query cache hit");
            return Ok(value);
        }

        let gate = Arc::clone(&self.fetch_gate).lock_owned().await;
        if let Some(value) = self.fresh() {
            debug!(key = %self.key, "query filled by concurrent fetch");
            return Ok(value);
        }

        let generation = self.slot().generation;
        debug!(key = %self.key, "query cache miss, fetching");
        let query = Arc::clone(self);
        let request = fetcher();
        let task = tokio::spawn(async move {
            let _gate = gate;
            let value = Arc::new(request.await?);
            query.store(generation, Arc::clone(&value));
            Ok::<_, E>(value)
        });

        task.await?
    }
}

/// The two cached reads behind the summary page.
pub struct QueryClient {
    summary: Arc<Query<SummaryAggregate>>,
    pending_goals: Arc<Query<Vec<PendingGoal>>>,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            summary: Arc::new(Query::new(QueryKey::Summary, stale_time)),
            pending_goals: Arc::new(Query::new(QueryKey::PendingGoals, stale_time)),
        }
    }

    pub fn summary(&self) -> &Arc<Query<SummaryAggregate>> {
        &self.summary
    }

    pub fn pending_goals(&self) -> &Arc<Query<Vec<PendingGoal>>> {
        &self.pending_goals
    }

    pub fn invalidate(&self, key: QueryKey) {
        match key {
            QueryKey::Summary => self.summary.invalidate(),
            QueryKey::PendingGoals => self.pending_goals.invalidate(),
        }
    }

    pub fn invalidate_many(&self, keys: &[QueryKey]) {
        for key in keys {
            self.invalidate(*key);
        }
    }

    pub fn is_stale(&self, key: QueryKey) -> bool {
        match key {
            QueryKey::Summary => self.summary.is_stale(),
            QueryKey::PendingGoals => self.pending_goals.is_stale(),
        }
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}
