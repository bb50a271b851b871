use std::collections::HashSet;

use chrono::Utc;
use fleetclass_core_types::GroupId;

use super::store::ClassificationGraph;
use crate::errors::{ClassifierError, Result};

/// Nest a group under a parent group
///
/// Performs a reachability check from the proposed parent upward before
/// committing: if the child is already an ancestor of the parent, the new
/// edge would close a cycle and the mutation is rejected with the graph
/// unchanged.
///
/// # Errors
/// * `UnknownEntity` - If either group doesn't exist
/// * `AlreadyNested` - If the nesting edge already exists
/// * `NestingCycle` - If the edge would create an ancestry cycle (self-nest
///   included)
pub fn nest_group(
    graph: &mut ClassificationGraph,
    child_id: GroupId,
    parent_id: GroupId,
) -> Result<()> {
    let child = graph.get_group(child_id)?;
    graph.get_group(parent_id)?;

    if child.parent_group_ids.contains(&parent_id) {
        return Err(ClassifierError::AlreadyNested {
            child: child_id,
            parent: parent_id,
        });
    }

    if child_id == parent_id || reaches_upward(graph, parent_id, child_id)? {
        return Err(ClassifierError::NestingCycle {
            child: child_id,
            parent: parent_id,
        });
    }

    let child = graph.get_group_mut(child_id)?;
    child.parent_group_ids.insert(parent_id);
    child.updated_at = Utc::now();
    Ok(())
}

/// Remove a nesting edge
///
/// # Errors
/// * `UnknownEntity` - If either group doesn't exist
/// * `NotNested` - If no nesting edge exists between the pair
pub fn unnest_group(
    graph: &mut ClassificationGraph,
    child_id: GroupId,
    parent_id: GroupId,
) -> Result<()> {
    let child = graph.get_group(child_id)?;
    graph.get_group(parent_id)?;

    if !child.parent_group_ids.contains(&parent_id) {
        return Err(ClassifierError::NotNested {
            child: child_id,
            parent: parent_id,
        });
    }

    let child = graph.get_group_mut(child_id)?;
    child.parent_group_ids.remove(&parent_id);
    child.updated_at = Utc::now();
    Ok(())
}

/// Check whether `target` is reachable from `start` by walking nesting edges
/// upward (through `parent_group_ids`)
///
/// Plain DFS with a visited set; the visited set also terminates cleanly on
/// graphs that already contain a cycle, though the mutation path never lets
/// one in.
fn reaches_upward(
    graph: &ClassificationGraph,
    start: GroupId,
    target: GroupId,
) -> Result<bool> {
    let mut visited: HashSet<GroupId> = HashSet::new();
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        if current == target {
            return Ok(true);
        }
        let group = graph.get_group(current)?;
        stack.extend(group.parent_group_ids.iter().copied());
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::entity_ops;

    fn group(graph: &mut ClassificationGraph, name: &str) -> GroupId {
        entity_ops::create_group(graph, name.to_string()).unwrap()
    }

    #[test]
    fn test_nest_updates_parent_set() {
        let mut graph = ClassificationGraph::new();
        let child = group(&mut graph, "web");
        let parent = group(&mut graph, "all");

        nest_group(&mut graph, child, parent).unwrap();

        assert!(graph
            .get_group(child)
            .unwrap()
            .parent_group_ids
            .contains(&parent));
    }

    #[test]
    fn test_self_nest_is_a_cycle() {
        let mut graph = ClassificationGraph::new();
        let g = group(&mut graph, "web");

        let result = nest_group(&mut graph, g, g);
        assert!(matches!(result, Err(ClassifierError::NestingCycle { .. })));
    }

    #[test]
    fn test_reaches_upward_detects_ancestry() {
        let mut graph = ClassificationGraph::new();
        let a = group(&mut graph, "a");
        let b = group(&mut graph, "b");
        let c = group(&mut graph, "c");

        nest_group(&mut graph, b, a).unwrap();
        nest_group(&mut graph, c, b).unwrap();

        // a is an ancestor of c
        assert!(reaches_upward(&graph, c, a).unwrap());
        assert!(!reaches_upward(&graph, a, c).unwrap());
    }

    #[test]
    fn test_closing_edge_is_rejected() {
        let mut graph = ClassificationGraph::new();
        let a = group(&mut graph, "a");
        let b = group(&mut graph, "b");
        let c = group(&mut graph, "c");

        nest_group(&mut graph, b, a).unwrap();
        nest_group(&mut graph, c, b).unwrap();

        // a under c would close a cycle: a -> b -> c -> a
        let result = nest_group(&mut graph, a, c);
        assert!(matches!(result, Err(ClassifierError::NestingCycle { .. })));
        // The edge set is unchanged
        assert!(graph.get_group(a).unwrap().parent_group_ids.is_empty());
    }
}
