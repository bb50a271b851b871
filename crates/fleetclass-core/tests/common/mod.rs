use std::sync::Arc;

use fleetclass_core::compile::{compile, CompileCache, CompileOptions};
use fleetclass_core::policy::LatestEdgeWins;
use fleetclass_core::traversal::ClosureCache;
use fleetclass_core::{
    apply, ClassificationGraph, ClassificationSwitch, Command, CompilationResult, NoopEventSink,
    Result,
};
use fleetclass_core_types::{ClassId, EntityRef, GroupId, NodeId, ParamMap, ParamValue};

/// Create a new empty graph for testing
#[allow(dead_code)]
pub fn new_graph() -> ClassificationGraph {
    ClassificationGraph::new()
}

fn run(graph: &mut ClassificationGraph, cmd: Command) -> EntityRef {
    apply(graph, cmd, ClassificationSwitch::Enabled, &NoopEventSink)
        .expect("test setup command should succeed")
        .subject
}

/// Create a node through the mutation path
#[allow(dead_code)]
pub fn add_node(graph: &mut ClassificationGraph, name: &str) -> NodeId {
    match run(
        graph,
        Command::CreateNode {
            name: name.to_string(),
        },
    ) {
        EntityRef::Node(id) => id,
        other => panic!("expected node subject, got {}", other),
    }
}

/// Create a group through the mutation path
#[allow(dead_code)]
pub fn add_group(graph: &mut ClassificationGraph, name: &str) -> GroupId {
    match run(
        graph,
        Command::CreateGroup {
            name: name.to_string(),
        },
    ) {
        EntityRef::Group(id) => id,
        other => panic!("expected group subject, got {}", other),
    }
}

/// Create a class through the mutation path
#[allow(dead_code)]
pub fn add_class(graph: &mut ClassificationGraph, name: &str) -> ClassId {
    match run(
        graph,
        Command::CreateClass {
            name: name.to_string(),
        },
    ) {
        EntityRef::Class(id) => id,
        other => panic!("expected class subject, got {}", other),
    }
}

/// Make a node a member of a group
#[allow(dead_code)]
pub fn member(graph: &mut ClassificationGraph, node: NodeId, group: GroupId) {
    run(graph, Command::AssignNodeToGroup { node, group });
}

/// Assign a class directly to a node
#[allow(dead_code)]
pub fn assign_class(graph: &mut ClassificationGraph, node: NodeId, class: ClassId) {
    run(graph, Command::AssignClassToNode { node, class });
}

/// Nest a group under a parent
#[allow(dead_code)]
pub fn nest(graph: &mut ClassificationGraph, child: GroupId, parent: GroupId) {
    run(graph, Command::NestGroup { child, parent });
}

/// Attach a class to a group with overrides
#[allow(dead_code)]
pub fn attach(
    graph: &mut ClassificationGraph,
    group: GroupId,
    class: ClassId,
    overrides: ParamMap,
) {
    run(
        graph,
        Command::AttachClassToGroup {
            group,
            class,
            overrides,
        },
    );
}

/// Replace a node's parameters
#[allow(dead_code)]
pub fn set_node_params(graph: &mut ClassificationGraph, node: NodeId, parameters: ParamMap) {
    run(graph, Command::SetNodeParameters { node, parameters });
}

/// Replace a group's parameters
#[allow(dead_code)]
pub fn set_group_params(graph: &mut ClassificationGraph, group: GroupId, parameters: ParamMap) {
    run(graph, Command::SetGroupParameters { group, parameters });
}

/// Replace a class's default parameters
#[allow(dead_code)]
pub fn set_class_params(graph: &mut ClassificationGraph, class: ClassId, parameters: ParamMap) {
    run(graph, Command::SetClassParameters { class, parameters });
}

/// Build a parameter map from key/value pairs
#[allow(dead_code)]
pub fn params(pairs: &[(&str, ParamValue)]) -> ParamMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Compile with fresh caches and the default policy
#[allow(dead_code)]
pub fn compile_fresh(
    graph: &ClassificationGraph,
    node: NodeId,
    options: &CompileOptions,
) -> Result<Arc<CompilationResult>> {
    let mut closures = ClosureCache::new();
    let mut cache = CompileCache::new();
    compile(
        graph,
        node,
        options,
        ClassificationSwitch::Enabled,
        &mut closures,
        &mut cache,
        &LatestEdgeWins,
    )
}
