use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::registry::TaskRegistry;
use crate::registry::task::TaskRecord;

/// DashMap-backed registry for single-process deployments and tests.
///
/// The broker-event ingester calls the write surface (`insert`,
/// `record_child`) while queries read concurrently through the
/// [`TaskRegistry`] trait; iteration sees a best-effort snapshot, which is
/// all a monitoring page needs.
#[derive(Default)]
pub struct InMemoryRegistry {
    tasks: DashMap<String, TaskRecord>,
    children: DashMap<String, Vec<String>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a task. A known `parent_id` also records the spawn
    /// relation for the grouping pre-pass.
    pub fn insert(&self, task: TaskRecord) {
        if let Some(parent) = &task.parent_id {
            self.record_child(parent, &task.id);
        }
        self.tasks.insert(task.id.clone(), task);
    }

    /// Record a spawn relation observed from the parent side. The broker may
    /// reveal a task's children before the child record itself arrives.
    pub fn record_child(&self, parent_id: &str, child_id: &str) {
        let mut entry = self.children.entry(parent_id.to_string()).or_default();
        if !entry.iter().any(|c| c == child_id) {
            entry.push(child_id.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // Case-insensitive substring match over the id and every attribute,
    // non-string values going through their canonical JSON text.
    fn matches(task: &TaskRecord, needle: &str) -> bool {
        if task.id.to_lowercase().contains(needle) {
            return true;
        }
        task.attributes.values().any(|value| match value {
            Value::String(s) => s.to_lowercase().contains(needle),
            Value::Null => false,
            other => other.to_string().to_lowercase().contains(needle),
        })
    }
}

#[async_trait]
impl TaskRegistry for InMemoryRegistry {
    async fn get(&self, id: &str) -> Result<Option<TaskRecord>> {
        Ok(self.tasks.get(id).map(|entry| entry.value().clone()))
    }

    async fn all(&self) -> Result<Vec<TaskRecord>> {
        Ok(self.tasks.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn filtered(&self, search: &str) -> Result<Vec<TaskRecord>> {
        let needle = search.trim().to_lowercase();
        Ok(self
            .tasks
            .iter()
            .filter(|entry| needle.is_empty() || Self::matches(entry.value(), &needle))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn relations(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .children
            .iter()
            .flat_map(|entry| {
                let parent = entry.key().clone();
                entry
                    .value()
                    .iter()
                    .map(move |child| (parent.clone(), child.clone()))
                    .collect::<Vec<_>>()
            })
            .collect())
    }
}
