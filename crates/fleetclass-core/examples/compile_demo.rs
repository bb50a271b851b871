//! End-to-end demo: build a small fleet graph, provoke a conflict, inspect
//! the report, then force-resolve it.
//!
//! Run with: cargo run -p fleetclass-core --example compile_demo

use fleetclass_core::logging::{init, Profile};
use fleetclass_core::{
    apply, ClassificationGraph, ClassificationSwitch, Command, CompileOptions, NoopEventSink,
};
use fleetclass_core_types::{EntityRef, ParamMap, ParamValue};

fn must_apply(graph: &mut ClassificationGraph, cmd: Command) -> EntityRef {
    apply(graph, cmd, ClassificationSwitch::Enabled, &NoopEventSink)
        .expect("demo mutation")
        .subject
}

fn param(key: &str, value: ParamValue) -> ParamMap {
    let mut map = ParamMap::new();
    map.insert(key.to_string(), value);
    map
}

fn main() {
    init(Profile::Development);

    let mut graph = ClassificationGraph::new();

    let EntityRef::Node(web01) = must_apply(
        &mut graph,
        Command::CreateNode {
            name: "web01.example.net".to_string(),
        },
    ) else {
        unreachable!()
    };
    let EntityRef::Group(frontend) = must_apply(
        &mut graph,
        Command::CreateGroup {
            name: "frontend".to_string(),
        },
    ) else {
        unreachable!()
    };
    let EntityRef::Group(canary) = must_apply(
        &mut graph,
        Command::CreateGroup {
            name: "canary".to_string(),
        },
    ) else {
        unreachable!()
    };
    let EntityRef::Class(apache) = must_apply(
        &mut graph,
        Command::CreateClass {
            name: "apache".to_string(),
        },
    ) else {
        unreachable!()
    };

    must_apply(
        &mut graph,
        Command::AssignNodeToGroup {
            node: web01,
            group: frontend,
        },
    );
    must_apply(
        &mut graph,
        Command::AssignNodeToGroup {
            node: web01,
            group: canary,
        },
    );
    must_apply(
        &mut graph,
        Command::AttachClassToGroup {
            group: frontend,
            class: apache,
            overrides: param("port", 80.into()),
        },
    );
    must_apply(
        &mut graph,
        Command::AttachClassToGroup {
            group: canary,
            class: apache,
            overrides: param("port", 8080.into()),
        },
    );

    let mut closures = fleetclass_core::ClosureCache::new();
    let mut cache = fleetclass_core::CompileCache::new();
    let policy = fleetclass_core::LatestEdgeWins;

    let reported = fleetclass_core::compile(
        &graph,
        web01,
        &CompileOptions::permissive(),
        ClassificationSwitch::Enabled,
        &mut closures,
        &mut cache,
        &policy,
    )
    .expect("permissive compile");

    println!("conflict report:");
    println!("{}", serde_json::to_string_pretty(&reported.conflicts).unwrap());

    let forced = fleetclass_core::compile(
        &graph,
        web01,
        &CompileOptions::forced(),
        ClassificationSwitch::Enabled,
        &mut closures,
        &mut cache,
        &policy,
    )
    .expect("forced compile");

    println!("forced compilation:");
    println!("{}", serde_json::to_string_pretty(&*forced).unwrap());
}
