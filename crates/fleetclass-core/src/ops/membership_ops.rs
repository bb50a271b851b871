use chrono::Utc;
use fleetclass_core_types::{ClassId, GroupId, NodeId};

use super::store::ClassificationGraph;
use crate::errors::{ClassifierError, Result};

/// Make a node a direct member of a group
///
/// # Errors
/// * `UnknownEntity` - If the node or group doesn't exist
/// * `AlreadyMember` - If the membership edge already exists
pub fn assign_node_to_group(
    graph: &mut ClassificationGraph,
    node_id: NodeId,
    group_id: GroupId,
) -> Result<()> {
    let node = graph.get_node(node_id)?;
    graph.get_group(group_id)?;

    if node.direct_group_ids.contains(&group_id) {
        return Err(ClassifierError::AlreadyMember {
            node: node_id,
            group: group_id,
        });
    }

    let node = graph.get_node_mut(node_id)?;
    node.direct_group_ids.insert(group_id);
    node.updated_at = Utc::now();
    Ok(())
}

/// Remove a node's direct membership in a group
///
/// # Errors
/// * `UnknownEntity` - If the node or group doesn't exist
/// * `NotAMember` - If no membership edge exists
pub fn unassign_node_from_group(
    graph: &mut ClassificationGraph,
    node_id: NodeId,
    group_id: GroupId,
) -> Result<()> {
    let node = graph.get_node(node_id)?;
    graph.get_group(group_id)?;

    if !node.direct_group_ids.contains(&group_id) {
        return Err(ClassifierError::NotAMember {
            node: node_id,
            group: group_id,
        });
    }

    let node = graph.get_node_mut(node_id)?;
    node.direct_group_ids.remove(&group_id);
    node.updated_at = Utc::now();
    Ok(())
}

/// Assign a class directly to a node
///
/// # Errors
/// * `UnknownEntity` - If the node or class doesn't exist
/// * `AlreadyAssigned` - If the assignment edge already exists
pub fn assign_class_to_node(
    graph: &mut ClassificationGraph,
    node_id: NodeId,
    class_id: ClassId,
) -> Result<()> {
    let node = graph.get_node(node_id)?;
    graph.get_class(class_id)?;

    if node.direct_class_ids.contains(&class_id) {
        return Err(ClassifierError::AlreadyAssigned {
            node: node_id,
            class: class_id,
        });
    }

    let node = graph.get_node_mut(node_id)?;
    node.direct_class_ids.insert(class_id);
    node.updated_at = Utc::now();
    Ok(())
}

/// Remove a direct class assignment from a node
///
/// # Errors
/// * `UnknownEntity` - If the node or class doesn't exist
/// * `NotAssigned` - If no assignment edge exists
pub fn unassign_class_from_node(
    graph: &mut ClassificationGraph,
    node_id: NodeId,
    class_id: ClassId,
) -> Result<()> {
    let node = graph.get_node(node_id)?;
    graph.get_class(class_id)?;

    if !node.direct_class_ids.contains(&class_id) {
        return Err(ClassifierError::NotAssigned {
            node: node_id,
            class: class_id,
        });
    }

    let node = graph.get_node_mut(node_id)?;
    node.direct_class_ids.remove(&class_id);
    node.updated_at = Utc::now();
    Ok(())
}
