use std::sync::Arc;

use dashmap::DashMap;
use tracing::warn;

/// Child-id to parent-id relation shared by every grouped query.
///
/// The map grows for the life of the process and relations are never removed
/// (whether completed tasks should eventually be evicted is an open issue).
/// Cloning hands out another handle to the same map, so the owning service
/// can share one resolver across all concurrent queries.
#[derive(Clone, Default)]
pub struct AncestryResolver {
    parents: Arc<DashMap<String, String>>,
}

impl AncestryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a spawn relation. Idempotent; a child reported twice with
    /// different parents keeps the last one (relations are not expected to
    /// change, so this is a defensive contract, not a normal path).
    pub fn learn(&self, parent_id: &str, child_id: &str) {
        self.parents
            .insert(child_id.to_string(), parent_id.to_string());
    }

    /// Number of relations learned so far.
    pub fn known(&self) -> usize {
        self.parents.len()
    }

    /// Ascendant chain for `id`, self first, ultimate root last.
    ///
    /// A task with no recorded parent, or one that reports itself as its own
    /// parent, is a fixed point and terminates the walk. A genuine multi-node
    /// cycle never reaches a fixed point, so the walk is also bounded by the
    /// number of known relations; hitting that bound logs a warning and
    /// returns the chain built so far instead of looping. Entries the cycle
    /// walked twice are trimmed off the tail, so the chain never repeats an
    /// id and its last element stays usable as the root.
    pub fn resolve_chain(&self, id: &str) -> Vec<String> {
        let mut chain = vec![id.to_string()];
        let mut current = id.to_string();
        let bound = self.parents.len() + 1;

        loop {
            let parent = match self.parents.get(&current) {
                Some(entry) if entry.value() != &current => entry.value().clone(),
                _ => break,
            };
            if chain.len() >= bound {
                warn!(task_id = %id, "Parent chain exceeded known relation count, assuming cycle");
                while chain.len() > 1 && chain[..chain.len() - 1].contains(&chain[chain.len() - 1])
                {
                    chain.pop();
                }
                break;
            }
            chain.push(parent.clone());
            current = parent;
        }

        chain
    }
}
