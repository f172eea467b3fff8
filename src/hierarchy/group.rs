use std::collections::HashMap;

use crate::hierarchy::ancestry::AncestryResolver;
use crate::registry::task::TaskRecord;

/// Reorder `tasks` so members of the same ancestry tree are contiguous.
///
/// Each task gets its ascendant chain attached (if not already present from
/// this query), trees are keyed by ultimate root, members within a tree are
/// ordered root first by ascending depth, and the trees themselves are
/// ordered by `key` applied to each tree's root member. All sorts are stable,
/// so equal keys keep their original iteration order.
pub fn group_by_root<K>(
    mut tasks: Vec<TaskRecord>,
    resolver: &AncestryResolver,
    key: K,
    ascending: bool,
) -> Vec<TaskRecord>
where
    K: Fn(&TaskRecord) -> String,
{
    for task in &mut tasks {
        if task.hierarchy.is_none() {
            task.hierarchy = Some(resolver.resolve_chain(&task.id));
        }
    }

    // Partition by ultimate root, preserving input order inside each tree.
    let mut groups: Vec<Vec<TaskRecord>> = Vec::new();
    let mut slot_by_root: HashMap<String, usize> = HashMap::new();
    for task in tasks {
        let root = task
            .root_id()
            .map(str::to_string)
            .unwrap_or_else(|| task.id.clone());
        let slot = *slot_by_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(task);
    }

    // Roots first, deepest descendants last.
    for group in &mut groups {
        group.sort_by_key(|task| task.hierarchy.as_ref().map_or(1, Vec::len));
    }

    // Order the trees by their root member's key, then flatten back into one
    // sequence with tree contiguity intact.
    let mut keyed: Vec<(String, Vec<TaskRecord>)> = groups
        .into_iter()
        .map(|group| (key(&group[0]), group))
        .collect();
    keyed.sort_by(|a, b| if ascending { a.0.cmp(&b.0) } else { b.0.cmp(&a.0) });

    keyed.into_iter().flat_map(|(_, group)| group).collect()
}
