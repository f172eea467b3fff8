use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::hierarchy::ancestry::AncestryResolver;
use crate::hierarchy::group::group_by_root;
use crate::query::QueryError;
use crate::query::format::{FormatFn, RecordFormatter};
use crate::query::params::TableQuery;
use crate::registry::TaskRegistry;
use crate::registry::task::TaskRecord;

/// One page of results, serialized with the wire field names the grid
/// expects. Both counts are taken after filtering and before pagination, so
/// at this layer they are always equal.
#[derive(Debug, Serialize)]
pub struct Page {
    pub draw: u64,
    pub data: Vec<Value>,
    #[serde(rename = "recordsTotal")]
    pub records_total: usize,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: usize,
}

/// Orchestrates filtering, optional grouping, sorting and pagination over a
/// shared task registry.
///
/// The ancestry resolver is injected so the enclosing service owns the
/// parent map and every concurrent query shares one copy; it is append-only
/// and kept for the life of the process.
pub struct QueryEngine {
    registry: Arc<dyn TaskRegistry>,
    resolver: AncestryResolver,
    formatter: RecordFormatter,
}

impl QueryEngine {
    pub fn new(registry: Arc<dyn TaskRegistry>, resolver: AncestryResolver) -> Self {
        Self {
            registry,
            resolver,
            formatter: RecordFormatter::default(),
        }
    }

    /// Install a caller-supplied per-record transform (see
    /// [`RecordFormatter`] for its failure contract).
    pub fn with_format(mut self, transform: FormatFn) -> Self {
        self.formatter = RecordFormatter::new(Some(transform));
        self
    }

    /// Answer one data-grid request.
    pub async fn page(&self, query: &TableQuery) -> Result<Page, QueryError> {
        let mut tasks = self.registry.filtered(&query.search).await?;

        if query.grouping {
            // Relations are learned from the whole registry, not the
            // filtered set: a matched task's ancestor may not itself match
            // the search predicate.
            for (parent, child) in self.registry.relations().await? {
                self.resolver.learn(&parent, &child);
            }
            tasks = group_by_root(
                tasks,
                &self.resolver,
                |task| sort_key(task, &query.sort_by),
                query.ascending,
            );
        } else {
            tasks.sort_by(|a, b| {
                let ord = sort_key(a, &query.sort_by).cmp(&sort_key(b, &query.sort_by));
                if query.ascending { ord } else { ord.reverse() }
            });
        }

        let total = tasks.len();
        debug!(draw = query.draw, total, start = query.start, "Serving task page");

        // Counts need the fully materialized sequence; formatting and
        // display post-processing only ever touch the requested window.
        let data = tasks
            .into_iter()
            .skip(query.start)
            .take(query.length)
            .map(|task| self.to_row(task))
            .collect();

        Ok(Page {
            draw: query.draw,
            data,
            records_total: total,
            records_filtered: total,
        })
    }

    /// Single-task detail lookup; an unknown id is a client-visible miss.
    /// The ascendant chain is attached once grouping has populated the
    /// shared resolver.
    pub async fn task_detail(&self, id: &str) -> Result<TaskRecord, QueryError> {
        let mut task = self
            .registry
            .get(id)
            .await?
            .ok_or_else(|| QueryError::TaskNotFound { id: id.to_string() })?;
        if self.resolver.known() > 0 && task.hierarchy.is_none() {
            task.hierarchy = Some(self.resolver.resolve_chain(&task.id));
        }
        Ok(task)
    }

    // Flatten one record into a wire row: attributes at the top level, the
    // hierarchy chain collapsed to "<root>_<depth>", a worker reference
    // object collapsed to its hostname.
    fn to_row(&self, task: TaskRecord) -> Value {
        let task = self.formatter.format(task);
        let compact = task
            .hierarchy
            .as_ref()
            .map(|chain| format!("{}_{}", chain.last().unwrap_or(&task.id), chain.len() - 1));

        let TaskRecord {
            id,
            attributes,
            parent_id,
            ..
        } = task;

        let mut row: Map<String, Value> = attributes;
        row.insert("id".to_string(), Value::String(id));
        if let Some(parent) = parent_id {
            row.insert("parent_id".to_string(), Value::String(parent));
        }
        if let Some(compact) = compact {
            row.insert("hierarchy".to_string(), Value::String(compact));
        }

        let hostname = row
            .get("worker")
            .and_then(|worker| worker.get("hostname"))
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(hostname) = hostname {
            row.insert("worker".to_string(), Value::String(hostname));
        }

        Value::Object(row)
    }
}

/// Canonical string coercion for sort keys.
///
/// Attributes are heterogeneous across records, so every comparison goes
/// through one total order. A missing attribute coerces to the empty string,
/// which keeps the sort total for any client-chosen `sort_by`; the synthetic
/// `hierarchy` field sorts by the coerced chain.
fn sort_key(task: &TaskRecord, field: &str) -> String {
    match field {
        "id" => task.id.clone(),
        "hierarchy" => match &task.hierarchy {
            Some(chain) => chain.join("/"),
            None => task.id.clone(),
        },
        _ => match task.attributes.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        },
    }
}
