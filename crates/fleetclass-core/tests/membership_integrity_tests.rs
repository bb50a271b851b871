/// Membership integrity
///
/// Tests edge mutations against referential integrity: unknown endpoints are
/// rejected atomically, cascading removal leaves no dangling edges.
use fleetclass_core::rules::{invariants, validation};
use fleetclass_core::{
    apply, ClassificationGraph, ClassificationSwitch, ClassifierError, Command, NoopEventSink,
};
use fleetclass_core_types::{GroupId, NodeId, ParamMap};

mod common;
use common::*;

#[test]
fn test_happy_membership_round_trip() {
    // GIVEN a node and a group
    let mut graph = new_graph();
    let node = add_node(&mut graph, "web01");
    let group = add_group(&mut graph, "web servers");

    // WHEN assigning and unassigning
    member(&mut graph, node, group);
    assert!(graph
        .get_node(node)
        .unwrap()
        .direct_group_ids
        .contains(&group));

    apply(
        &mut graph,
        Command::UnassignNodeFromGroup { node, group },
        ClassificationSwitch::Enabled,
        &NoopEventSink,
    )
    .unwrap();

    // THEN the edge is gone and the graph stays valid
    assert!(graph.get_node(node).unwrap().direct_group_ids.is_empty());
    assert!(validation::validate_graph(&graph).is_ok());
}

#[test]
fn test_error_unknown_endpoint_leaves_version_unchanged() {
    // GIVEN a graph with one node
    let mut graph = new_graph();
    let node = add_node(&mut graph, "web01");
    let version = graph.graph_version();

    // WHEN assigning to a group that does not exist
    let result = apply(
        &mut graph,
        Command::AssignNodeToGroup {
            node,
            group: GroupId(99),
        },
        ClassificationSwitch::Enabled,
        &NoopEventSink,
    );

    // THEN the mutation fails and nothing moved
    assert!(matches!(result, Err(ClassifierError::UnknownEntity { .. })));
    assert_eq!(graph.graph_version(), version);
    assert!(graph.get_node(node).unwrap().direct_group_ids.is_empty());
}

#[test]
fn test_error_mutating_removed_node_fails() {
    let mut graph = new_graph();
    let node = add_node(&mut graph, "web01");
    let group = add_group(&mut graph, "web");

    apply(
        &mut graph,
        Command::RemoveNode { node },
        ClassificationSwitch::Enabled,
        &NoopEventSink,
    )
    .unwrap();

    let result = apply(
        &mut graph,
        Command::AssignNodeToGroup { node, group },
        ClassificationSwitch::Enabled,
        &NoopEventSink,
    );
    assert!(matches!(result, Err(ClassifierError::UnknownEntity { .. })));
}

#[test]
fn test_remove_group_cascades_all_edge_kinds() {
    // GIVEN a group referenced by a node, a child group and an attachment
    let mut graph = new_graph();
    let node = add_node(&mut graph, "web01");
    let parent = add_group(&mut graph, "all");
    let child = add_group(&mut graph, "web");
    let class = add_class(&mut graph, "apache");
    member(&mut graph, node, parent);
    nest(&mut graph, child, parent);
    attach(&mut graph, parent, class, ParamMap::new());

    // WHEN removing the group
    apply(
        &mut graph,
        Command::RemoveGroup { group: parent },
        ClassificationSwitch::Enabled,
        &NoopEventSink,
    )
    .unwrap();

    // THEN no edge dangles
    assert!(invariants::find_dangling_memberships(&graph).is_empty());
    assert!(invariants::find_dangling_group_parents(&graph).is_empty());
    assert!(invariants::find_dangling_attachments(&graph).is_empty());
    assert!(validation::validate_graph(&graph).is_ok());

    // AND the tombstone is visible through raw access only
    assert!(graph.get_group(parent).is_err());
    assert!(graph.get_group_raw(parent).unwrap().deleted);
}

#[test]
fn test_remove_class_cascades_assignments_and_attachments() {
    let mut graph = new_graph();
    let node = add_node(&mut graph, "web01");
    let group = add_group(&mut graph, "web");
    let class = add_class(&mut graph, "apache");
    assign_class(&mut graph, node, class);
    attach(&mut graph, group, class, ParamMap::new());

    apply(
        &mut graph,
        Command::RemoveClass { class },
        ClassificationSwitch::Enabled,
        &NoopEventSink,
    )
    .unwrap();

    assert!(graph.get_node(node).unwrap().direct_class_ids.is_empty());
    assert_eq!(graph.attachments().count(), 0);
    assert!(invariants::find_dangling_class_assignments(&graph).is_empty());
}

#[test]
fn test_every_successful_mutation_bumps_version_once() {
    let mut graph = new_graph();
    let before = graph.graph_version();

    let node = add_node(&mut graph, "web01");
    let group = add_group(&mut graph, "web");
    member(&mut graph, node, group);

    assert_eq!(graph.graph_version(), before + 3);
}

#[test]
fn test_invalid_parameters_rejected_before_commit() {
    let mut graph = new_graph();
    let node = add_node(&mut graph, "web01");
    let version = graph.graph_version();

    let mut bad = ParamMap::new();
    bad.insert(String::new(), "x".into());

    let result = apply(
        &mut graph,
        Command::SetNodeParameters {
            node,
            parameters: bad,
        },
        ClassificationSwitch::Enabled,
        &NoopEventSink,
    );

    assert!(matches!(
        result,
        Err(ClassifierError::InvalidParameter { .. })
    ));
    assert_eq!(graph.graph_version(), version);
    assert!(graph.get_node(node).unwrap().direct_parameters.is_empty());
}

#[test]
fn test_unknown_node_compile_fails() {
    let graph = ClassificationGraph::new();
    let result = compile_fresh(
        &graph,
        NodeId(7),
        &fleetclass_core::CompileOptions::strict(),
    );
    assert!(matches!(result, Err(ClassifierError::UnknownEntity { .. })));
}
