use fleetclass_core_types::{ClassId, GroupId, ParamMap};

use super::store::ClassificationGraph;
use crate::errors::{ClassifierError, Result};
use crate::model::AttachmentEdge;
use crate::rules::validation;

/// Attach a class to a group with a parameter overlay
///
/// The new edge is stamped with the version this mutation commits at; that
/// stamp is the commit-order witness used by force resolution.
///
/// # Errors
/// * `UnknownEntity` - If the group or class doesn't exist
/// * `AlreadyAttached` - If an edge already exists for the pair
/// * `InvalidParameter` - If an override key or value is malformed
pub fn attach_class_to_group(
    graph: &mut ClassificationGraph,
    group_id: GroupId,
    class_id: ClassId,
    overrides: ParamMap,
) -> Result<()> {
    graph.get_group(group_id)?;
    graph.get_class(class_id)?;
    validation::validate_parameters(&overrides)?;

    if graph.attachment(group_id, class_id).is_some() {
        return Err(ClassifierError::AlreadyAttached {
            group: group_id,
            class: class_id,
        });
    }

    let committed_at = graph.next_version();
    graph
        .attachments
        .push(AttachmentEdge::new(group_id, class_id, overrides, committed_at));
    Ok(())
}

/// Detach a class from a group, dropping its overlay
///
/// # Errors
/// * `UnknownEntity` - If the group or class doesn't exist
/// * `NotAttached` - If no edge exists for the pair
pub fn detach_class_from_group(
    graph: &mut ClassificationGraph,
    group_id: GroupId,
    class_id: ClassId,
) -> Result<()> {
    graph.get_group(group_id)?;
    graph.get_class(class_id)?;

    if graph.attachment(group_id, class_id).is_none() {
        return Err(ClassifierError::NotAttached {
            group: group_id,
            class: class_id,
        });
    }

    graph
        .attachments
        .retain(|a| !(a.group == group_id && a.class == class_id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::entity_ops;

    #[test]
    fn test_attach_records_commit_version() {
        let mut graph = ClassificationGraph::new();
        let group = entity_ops::create_group(&mut graph, "web".to_string()).unwrap();
        let class = entity_ops::create_class(&mut graph, "apache".to_string()).unwrap();
        graph.bump_version();
        graph.bump_version();

        let mut overrides = ParamMap::new();
        overrides.insert("port".to_string(), 8080.into());
        attach_class_to_group(&mut graph, group, class, overrides).unwrap();

        let edge = graph.attachment(group, class).unwrap();
        assert_eq!(edge.committed_at, graph.graph_version() + 1);
    }

    #[test]
    fn test_duplicate_attach_fails() {
        let mut graph = ClassificationGraph::new();
        let group = entity_ops::create_group(&mut graph, "web".to_string()).unwrap();
        let class = entity_ops::create_class(&mut graph, "apache".to_string()).unwrap();

        attach_class_to_group(&mut graph, group, class, ParamMap::new()).unwrap();
        let dup = attach_class_to_group(&mut graph, group, class, ParamMap::new());
        assert!(matches!(dup, Err(ClassifierError::AlreadyAttached { .. })));
    }

    #[test]
    fn test_detach_removes_edge() {
        let mut graph = ClassificationGraph::new();
        let group = entity_ops::create_group(&mut graph, "web".to_string()).unwrap();
        let class = entity_ops::create_class(&mut graph, "apache".to_string()).unwrap();

        attach_class_to_group(&mut graph, group, class, ParamMap::new()).unwrap();
        detach_class_from_group(&mut graph, group, class).unwrap();
        assert!(graph.attachment(group, class).is_none());

        let missing = detach_class_from_group(&mut graph, group, class);
        assert!(matches!(missing, Err(ClassifierError::NotAttached { .. })));
    }
}
