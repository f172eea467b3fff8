pub mod memory;
pub mod task;

use anyhow::Result;
use async_trait::async_trait;

use crate::registry::task::TaskRecord;

// --- Interface ---

/// Read interface onto the authoritative task store.
///
/// The ingester that applies broker events lives outside this crate; queries
/// only ever read. Implementations are expected to be in-memory fast, but the
/// trait is async so a remote registry's calls become the request's
/// suspension points and caller cancellation propagates through them.
#[async_trait]
pub trait TaskRegistry: Send + Sync {
    /// Look up a single task by id.
    async fn get(&self, id: &str) -> Result<Option<TaskRecord>>;

    /// Every task currently known, in registry iteration order.
    async fn all(&self) -> Result<Vec<TaskRecord>>;

    /// Tasks matching the free-text predicate. Match semantics belong to the
    /// registry; an empty search matches everything.
    async fn filtered(&self, search: &str) -> Result<Vec<TaskRecord>>;

    /// Every known (parent, child) spawn relation. The grouping pre-pass
    /// reads this for the whole registry, never just the filtered set.
    async fn relations(&self) -> Result<Vec<(String, String)>>;
}
