use serde::Serialize;
use serde_json::{Map, Value};

/// One tracked unit of work.
///
/// `attributes` is an open mapping because the pipeline reports heterogeneous
/// fields (state, worker, timestamps, name, ...) and the grid sorts, searches
/// and displays them generically. `parent_id` is known only once the spawn
/// relationship has been observed.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Ascendant chain, self first, ultimate root last. Attached by grouped
    /// queries only and never empty when present (it contains at least `id`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Vec<String>>,
}

impl TaskRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
            parent_id: None,
            hierarchy: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Ultimate root id, once a hierarchy has been attached.
    pub fn root_id(&self) -> Option<&str> {
        self.hierarchy
            .as_ref()
            .and_then(|chain| chain.last())
            .map(String::as_str)
    }

    /// Distance from the root; 0 for a root or an unattached record.
    pub fn depth(&self) -> usize {
        self.hierarchy.as_ref().map_or(0, |chain| chain.len() - 1)
    }
}
