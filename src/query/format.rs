use std::sync::Arc;

use anyhow::Result;
use tracing::error;

use crate::registry::task::TaskRecord;

/// Caller-supplied per-record transform, installed at engine construction.
pub type FormatFn = Arc<dyn Fn(TaskRecord) -> Result<TaskRecord> + Send + Sync>;

/// Applies the optional transform to a copy of each outgoing record.
///
/// A failing transform is logged with the task's id and the untouched record
/// ships instead; one bad record never aborts the page.
#[derive(Clone, Default)]
pub struct RecordFormatter {
    transform: Option<FormatFn>,
}

impl RecordFormatter {
    pub fn new(transform: Option<FormatFn>) -> Self {
        Self { transform }
    }

    pub fn format(&self, task: TaskRecord) -> TaskRecord {
        let Some(transform) = &self.transform else {
            return task;
        };
        match transform(task.clone()) {
            Ok(formatted) => formatted,
            Err(e) => {
                error!(task_id = %task.id, "Failed to format task: {:#}", e);
                task
            }
        }
    }
}
