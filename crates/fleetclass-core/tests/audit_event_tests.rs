/// Audit trail
///
/// Every successful mutation emits exactly one event post-commit with
/// subject attribution; failed mutations emit nothing.
use fleetclass_core::{
    apply, ClassificationSwitch, Command, NoopEventSink, OperationKind, RecordingEventSink,
};
use fleetclass_core_types::{EntityKind, EntityRef, GroupId};

mod common;
use common::*;

#[test]
fn test_each_mutation_emits_one_event() {
    let mut graph = new_graph();
    let sink = RecordingEventSink::new();

    let node = apply(
        &mut graph,
        Command::CreateNode {
            name: "web01".to_string(),
        },
        ClassificationSwitch::Enabled,
        &sink,
    )
    .unwrap();
    let group = apply(
        &mut graph,
        Command::CreateGroup {
            name: "web".to_string(),
        },
        ClassificationSwitch::Enabled,
        &sink,
    )
    .unwrap();

    let (EntityRef::Node(node_id), EntityRef::Group(group_id)) = (node.subject, group.subject)
    else {
        panic!("unexpected subject kinds");
    };

    apply(
        &mut graph,
        Command::AssignNodeToGroup {
            node: node_id,
            group: group_id,
        },
        ClassificationSwitch::Enabled,
        &sink,
    )
    .unwrap();

    let events = sink.take();
    assert_eq!(events.len(), 3);

    assert_eq!(events[0].operation, OperationKind::Created);
    assert_eq!(events[0].subject_type(), EntityKind::Node);
    assert!(events[0].secondary_subject.is_none());

    assert_eq!(events[2].operation, OperationKind::AddedToGroup);
    assert_eq!(events[2].subject, EntityRef::Node(node_id));
    assert_eq!(events[2].secondary_subject, Some(EntityRef::Group(group_id)));

    // Versions line up with commit order
    assert_eq!(events[0].graph_version, 1);
    assert_eq!(events[1].graph_version, 2);
    assert_eq!(events[2].graph_version, 3);
}

#[test]
fn test_failed_mutation_emits_nothing() {
    let mut graph = new_graph();
    let sink = RecordingEventSink::new();

    let node = add_node(&mut graph, "web01");
    let result = apply(
        &mut graph,
        Command::AssignNodeToGroup {
            node,
            group: GroupId(5),
        },
        ClassificationSwitch::Enabled,
        &sink,
    );

    assert!(result.is_err());
    assert!(sink.is_empty());
}

#[test]
fn test_attach_event_names_both_endpoints() {
    let mut graph = new_graph();
    let group = add_group(&mut graph, "web");
    let class = add_class(&mut graph, "apache");

    let sink = RecordingEventSink::new();
    apply(
        &mut graph,
        Command::AttachClassToGroup {
            group,
            class,
            overrides: params(&[("port", 8080.into())]),
        },
        ClassificationSwitch::Enabled,
        &sink,
    )
    .unwrap();

    let events = sink.take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].operation, OperationKind::ClassAttached);
    assert_eq!(events[0].subject, EntityRef::Class(class));
    assert_eq!(events[0].secondary_subject, Some(EntityRef::Group(group)));
}

#[test]
fn test_event_ids_are_distinct() {
    let mut graph = new_graph();
    let sink = RecordingEventSink::new();

    for i in 0..3 {
        apply(
            &mut graph,
            Command::CreateNode {
                name: format!("node{}", i),
            },
            ClassificationSwitch::Enabled,
            &sink,
        )
        .unwrap();
    }

    let events = sink.take();
    assert_ne!(events[0].event_id, events[1].event_id);
    assert_ne!(events[1].event_id, events[2].event_id);
}

#[test]
fn test_sink_failure_isolation_is_not_required_for_noop() {
    // The noop sink simply drops events; the mutation still succeeds
    let mut graph = new_graph();
    let applied = apply(
        &mut graph,
        Command::CreateNode {
            name: "web01".to_string(),
        },
        ClassificationSwitch::Enabled,
        &NoopEventSink,
    )
    .unwrap();
    assert_eq!(applied.graph_version, 1);
}
