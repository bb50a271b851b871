//! Structural invariant sweeps over the classification graph
//!
//! Each function scans the whole graph and reports every violation of one
//! invariant. The mutation path keeps these invariants by construction;
//! sweeps are for tests and externally-loaded snapshots.

use std::collections::HashSet;

use fleetclass_core_types::{ClassId, GroupId, NodeId};

use crate::ops::ClassificationGraph;

/// Find membership edges whose group endpoint is missing or tombstoned
///
/// Returns (node, group) pairs.
pub fn find_dangling_memberships(graph: &ClassificationGraph) -> Vec<(NodeId, GroupId)> {
    let mut dangling = Vec::new();
    for node in graph.list_nodes() {
        for &group in &node.direct_group_ids {
            if graph.get_group(group).is_err() {
                dangling.push((node.id, group));
            }
        }
    }
    dangling
}

/// Find class-assignment edges whose class endpoint is missing or tombstoned
///
/// Returns (node, class) pairs.
pub fn find_dangling_class_assignments(graph: &ClassificationGraph) -> Vec<(NodeId, ClassId)> {
    let mut dangling = Vec::new();
    for node in graph.list_nodes() {
        for &class in &node.direct_class_ids {
            if graph.get_class(class).is_err() {
                dangling.push((node.id, class));
            }
        }
    }
    dangling
}

/// Find nesting edges whose parent endpoint is missing or tombstoned
///
/// Returns (child, parent) pairs.
pub fn find_dangling_group_parents(graph: &ClassificationGraph) -> Vec<(GroupId, GroupId)> {
    let mut dangling = Vec::new();
    for group in graph.list_groups() {
        for &parent in &group.parent_group_ids {
            if graph.get_group(parent).is_err() {
                dangling.push((group.id, parent));
            }
        }
    }
    dangling
}

/// Find attachment edges with a missing or tombstoned endpoint
///
/// Returns (group, class) pairs.
pub fn find_dangling_attachments(graph: &ClassificationGraph) -> Vec<(GroupId, ClassId)> {
    graph
        .attachments()
        .filter(|a| graph.get_group(a.group).is_err() || graph.get_class(a.class).is_err())
        .map(|a| (a.group, a.class))
        .collect()
}

/// Find a group that participates in a nesting cycle, if any exists
///
/// Walks the upward `parent_group_ids` edges from every live group with an
/// explicit stack. Returns the first group found on a cycle.
pub fn find_nesting_cycle(graph: &ClassificationGraph) -> Option<GroupId> {
    let mut done: HashSet<GroupId> = HashSet::new();

    for start in graph.list_groups() {
        if done.contains(&start.id) {
            continue;
        }
        // Iterative DFS with an on-path set for back-edge detection
        let mut on_path: HashSet<GroupId> = HashSet::new();
        let mut stack: Vec<(GroupId, Vec<GroupId>)> =
            vec![(start.id, parents_of(graph, start.id))];
        on_path.insert(start.id);

        loop {
            let next = match stack.last_mut() {
                None => break,
                Some((_, pending)) => pending.pop(),
            };
            match next {
                Some(parent) => {
                    if on_path.contains(&parent) {
                        return Some(parent);
                    }
                    if done.contains(&parent) {
                        continue;
                    }
                    on_path.insert(parent);
                    let grand = parents_of(graph, parent);
                    stack.push((parent, grand));
                }
                None => {
                    if let Some((current, _)) = stack.pop() {
                        on_path.remove(&current);
                        done.insert(current);
                    }
                }
            }
        }
    }
    None
}

fn parents_of(graph: &ClassificationGraph, group: GroupId) -> Vec<GroupId> {
    match graph.get_group(group) {
        Ok(g) => g.parent_group_ids.iter().copied().collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::ClassificationGraph;

    #[test]
    fn test_empty_graph_has_no_violations() {
        let graph = ClassificationGraph::new();
        assert!(find_dangling_memberships(&graph).is_empty());
        assert!(find_dangling_group_parents(&graph).is_empty());
        assert!(find_dangling_attachments(&graph).is_empty());
        assert!(find_nesting_cycle(&graph).is_none());
    }

    #[test]
    fn test_detects_hand_built_cycle() {
        let mut graph = ClassificationGraph::new();
        let a = graph.alloc_group("a".to_string());
        let b = graph.alloc_group("b".to_string());

        // Bypass the mutation path to wire a cycle directly
        graph.groups[a.index()].parent_group_ids.insert(b);
        graph.groups[b.index()].parent_group_ids.insert(a);

        assert!(find_nesting_cycle(&graph).is_some());
    }

    #[test]
    fn test_detects_dangling_parent() {
        let mut graph = ClassificationGraph::new();
        let a = graph.alloc_group("a".to_string());
        let b = graph.alloc_group("b".to_string());
        graph.groups[a.index()].parent_group_ids.insert(b);
        graph.groups[b.index()].deleted = true;

        assert_eq!(find_dangling_group_parents(&graph), vec![(a, b)]);
    }
}
