use chrono::Utc;
use fleetclass_core_types::{ClassId, GroupId, NodeId, ParamMap};

use super::store::ClassificationGraph;
use crate::errors::Result;
use crate::rules::validation;

/// Create a new node
///
/// # Errors
/// * `InvalidName` - If the name is empty or whitespace-only
pub fn create_node(graph: &mut ClassificationGraph, name: String) -> Result<NodeId> {
    validation::validate_name(&name)?;
    Ok(graph.alloc_node(name))
}

/// Create a new group
///
/// # Errors
/// * `InvalidName` - If the name is empty or whitespace-only
pub fn create_group(graph: &mut ClassificationGraph, name: String) -> Result<GroupId> {
    validation::validate_name(&name)?;
    Ok(graph.alloc_group(name))
}

/// Create a new class
///
/// # Errors
/// * `InvalidName` - If the name is empty or whitespace-only
pub fn create_class(graph: &mut ClassificationGraph, name: String) -> Result<ClassId> {
    validation::validate_name(&name)?;
    Ok(graph.alloc_class(name))
}

/// Remove a node (tombstone)
///
/// The node's membership and class-assignment edges live on the node record,
/// so tombstoning it removes them with it.
///
/// # Errors
/// * `UnknownEntity` - If the node doesn't exist or was already removed
pub fn remove_node(graph: &mut ClassificationGraph, id: NodeId) -> Result<()> {
    graph.get_node(id)?;

    let node = graph.get_node_mut(id)?;
    node.deleted = true;
    node.updated_at = Utc::now();
    Ok(())
}

/// Remove a group (cascading tombstone)
///
/// Every edge that references the group goes with it, in the same atomic
/// mutation: memberships of nodes, nesting edges of other groups, and all of
/// the group's class attachments.
///
/// # Errors
/// * `UnknownEntity` - If the group doesn't exist or was already removed
pub fn remove_group(graph: &mut ClassificationGraph, id: GroupId) -> Result<()> {
    graph.get_group(id)?;
    let now = Utc::now();

    for node in graph.nodes.iter_mut().filter(|n| !n.deleted) {
        if node.direct_group_ids.remove(&id) {
            node.updated_at = now;
        }
    }
    for group in graph.groups.iter_mut().filter(|g| !g.deleted) {
        if group.parent_group_ids.remove(&id) {
            group.updated_at = now;
        }
    }
    graph.attachments.retain(|a| a.group != id);

    let group = graph.get_group_mut(id)?;
    group.deleted = true;
    group.updated_at = now;
    Ok(())
}

/// Remove a class (cascading tombstone)
///
/// Direct assignments and attachments referencing the class are removed in
/// the same atomic mutation.
///
/// # Errors
/// * `UnknownEntity` - If the class doesn't exist or was already removed
pub fn remove_class(graph: &mut ClassificationGraph, id: ClassId) -> Result<()> {
    graph.get_class(id)?;
    let now = Utc::now();

    for node in graph.nodes.iter_mut().filter(|n| !n.deleted) {
        if node.direct_class_ids.remove(&id) {
            node.updated_at = now;
        }
    }
    graph.attachments.retain(|a| a.class != id);

    let class = graph.get_class_mut(id)?;
    class.deleted = true;
    class.updated_at = now;
    Ok(())
}

/// Replace a node's parameter map
///
/// # Errors
/// * `UnknownEntity` - If the node doesn't exist
/// * `InvalidParameter` - If a key or value is malformed
pub fn set_node_parameters(
    graph: &mut ClassificationGraph,
    id: NodeId,
    parameters: ParamMap,
) -> Result<()> {
    graph.get_node(id)?;
    validation::validate_parameters(&parameters)?;

    let stamp = graph.next_version();
    let node = graph.get_node_mut(id)?;
    node.direct_parameters = parameters;
    node.params_version = stamp;
    node.updated_at = Utc::now();
    Ok(())
}

/// Replace a group's parameter map
///
/// # Errors
/// * `UnknownEntity` - If the group doesn't exist
/// * `InvalidParameter` - If a key or value is malformed
pub fn set_group_parameters(
    graph: &mut ClassificationGraph,
    id: GroupId,
    parameters: ParamMap,
) -> Result<()> {
    graph.get_group(id)?;
    validation::validate_parameters(&parameters)?;

    let stamp = graph.next_version();
    let group = graph.get_group_mut(id)?;
    group.own_parameters = parameters;
    group.params_version = stamp;
    group.updated_at = Utc::now();
    Ok(())
}

/// Replace a class's default parameter map
///
/// # Errors
/// * `UnknownEntity` - If the class doesn't exist
/// * `InvalidParameter` - If a key or value is malformed
pub fn set_class_parameters(
    graph: &mut ClassificationGraph,
    id: ClassId,
    parameters: ParamMap,
) -> Result<()> {
    graph.get_class(id)?;
    validation::validate_parameters(&parameters)?;

    let stamp = graph.next_version();
    let class = graph.get_class_mut(id)?;
    class.default_parameters = parameters;
    class.params_version = stamp;
    class.updated_at = Utc::now();
    Ok(())
}
